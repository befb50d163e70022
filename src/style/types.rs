//! Style type definitions
//!
//! This module contains the enum and value types used in computed styles.
//! These types represent CSS property values that drive flow layout.

/// Text direction
///
/// CSS: `direction`
/// Reference: CSS Writing Modes Level 3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Ltr,
  Rtl,
}

/// Block flow direction and line orientation
///
/// CSS: `writing-mode`
/// Reference: CSS Writing Modes Level 3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritingMode {
  HorizontalTb,
  VerticalRl,
  VerticalLr,
}

impl WritingMode {
  /// Returns true when lines stack top-to-bottom (`horizontal-tb`).
  pub fn is_horizontal(self) -> bool {
    matches!(self, WritingMode::HorizontalTb)
  }
}

/// Whitespace collapsing and wrapping behavior
///
/// CSS: `white-space`
/// Reference: CSS Text Module Level 3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteSpace {
  Normal,
  Nowrap,
  PreLine,
  Pre,
  PreWrap,
}

impl WhiteSpace {
  /// Returns true when segments of collapsible whitespace merge into one
  /// space (`normal`, `nowrap` and `pre-line`).
  pub fn is_collapsible(self) -> bool {
    matches!(self, WhiteSpace::Normal | WhiteSpace::Nowrap | WhiteSpace::PreLine)
  }

  /// Returns true when lines may not soft-wrap (`nowrap` and `pre`).
  pub fn is_nowrap(self) -> bool {
    matches!(self, WhiteSpace::Nowrap | WhiteSpace::Pre)
  }
}

/// Determines which box the width/height properties apply to.
///
/// CSS: `box-sizing`
/// Reference: CSS Box Sizing Module Level 3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxSizing {
  ContentBox,
  BorderBox,
}

/// Positioning scheme
///
/// CSS: `position`
/// Reference: CSS 2.1 §9.3.1. `fixed` behaves as `absolute` and `sticky`
/// behaves as `relative` in this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
  Static,
  Relative,
  Absolute,
}

/// Float placement
///
/// CSS: `float`
/// Reference: CSS 2.1 §9.5.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Float {
  None,
  Left,
  Right,
}

/// Clearance past floated boxes
///
/// CSS: `clear`
/// Reference: CSS 2.1 §9.5.2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clear {
  None,
  Left,
  Right,
  Both,
}

/// Border line style
///
/// CSS: `border-style`, `border-*-style`
/// Reference: CSS Backgrounds and Borders Module Level 3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
  None,
  Solid,
}

/// Overflow behavior for content that exceeds container bounds
///
/// CSS: `overflow`
/// Reference: CSS Overflow Module Level 3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
  Visible,
  Hidden,
}

/// Outer display role of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOuter {
  Block,
  Inline,
  None,
}

/// Inner display model of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayInner {
  Flow,
  FlowRoot,
  None,
}

/// Two-value display as defined by CSS Display Module Level 3
///
/// Legacy single keywords map onto pairs: `block` is `block flow`,
/// `inline-block` is `inline flow-root`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Display {
  pub outer: DisplayOuter,
  pub inner: DisplayInner,
}

impl Display {
  pub const BLOCK: Self = Self {
    outer: DisplayOuter::Block,
    inner: DisplayInner::Flow,
  };
  pub const INLINE: Self = Self {
    outer: DisplayOuter::Inline,
    inner: DisplayInner::Flow,
  };
  pub const INLINE_BLOCK: Self = Self {
    outer: DisplayOuter::Inline,
    inner: DisplayInner::FlowRoot,
  };
  pub const FLOW_ROOT: Self = Self {
    outer: DisplayOuter::Block,
    inner: DisplayInner::FlowRoot,
  };
  pub const NONE: Self = Self {
    outer: DisplayOuter::None,
    inner: DisplayInner::None,
  };

  pub fn is_none(self) -> bool {
    self.outer == DisplayOuter::None
  }
}

/// Word breaking rules inside words
///
/// CSS: `word-break`
/// Reference: CSS Text Module Level 3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordBreak {
  Normal,
  BreakWord,
}

/// Emergency wrapping of otherwise unbreakable content
///
/// CSS: `overflow-wrap`
/// Reference: CSS Text Module Level 3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowWrap {
  Normal,
  Anywhere,
  BreakWord,
}

/// Font slope
///
/// CSS: `font-style`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
  Normal,
  Italic,
  Oblique,
}

/// Small-caps selection
///
/// CSS: `font-variant`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontVariant {
  Normal,
  SmallCaps,
}

/// Font width selection
///
/// CSS: `font-stretch`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStretch {
  Condensed,
  Normal,
  Expanded,
}

/// Line box height
///
/// CSS: `line-height`. `Normal` derives the height from font metrics,
/// `Number` multiplies the used font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineHeight {
  Normal,
  Number(f32),
}

/// Extra spacing at word separators
///
/// CSS: `word-spacing`. Percentages resolve against the used font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WordSpacing {
  Normal,
  Px(f32),
  Percent(f32),
}

/// An RGBA color with 8-bit channels and a unit alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: f32,
}

impl Rgba {
  pub const TRANSPARENT: Self = Self {
    r: 0,
    g: 0,
    b: 0,
    a: 0.0,
  };
  pub const BLACK: Self = Self {
    r: 0,
    g: 0,
    b: 0,
    a: 1.0,
  };

  pub fn is_visible(self) -> bool {
    self.a > 0.0
  }
}

/// A length or percentage value
///
/// Percentages resolve against a measure of the containing block that
/// depends on the property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssValue {
  Px(f32),
  Percent(f32),
}

impl CssValue {
  /// Resolves against the given percentage basis.
  pub fn resolve(self, basis: f32) -> f32 {
    match self {
      CssValue::Px(px) => px,
      CssValue::Percent(pct) => pct * basis,
    }
  }
}

/// A length, percentage, or `auto` value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssValueAuto {
  Px(f32),
  Percent(f32),
  Auto,
}

impl CssValueAuto {
  /// Resolves against the given percentage basis; `auto` resolves to `None`.
  pub fn resolve(self, basis: f32) -> Option<f32> {
    match self {
      CssValueAuto::Px(px) => Some(px),
      CssValueAuto::Percent(pct) => Some(pct * basis),
      CssValueAuto::Auto => None,
    }
  }

  pub fn is_auto(self) -> bool {
    matches!(self, CssValueAuto::Auto)
  }
}

/// A length, percentage, or `none` value (used by max-width/max-height)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssValueNone {
  Px(f32),
  Percent(f32),
  None,
}

impl CssValueNone {
  /// Resolves against the given percentage basis; `none` resolves to `None`.
  pub fn resolve(self, basis: f32) -> Option<f32> {
    match self {
      CssValueNone::Px(px) => Some(px),
      CssValueNone::Percent(pct) => Some(pct * basis),
      CssValueNone::None => None,
    }
  }
}

/// A physical side of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalSide {
  Top,
  Right,
  Bottom,
  Left,
}

/// A physical axis of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalAxis {
  Width,
  Height,
}

/// Per-side values stored in physical order
///
/// Logical accessors on [`crate::style::Style`] index into these through
/// the writing-mode property maps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edges<T> {
  pub top: T,
  pub right: T,
  pub bottom: T,
  pub left: T,
}

impl<T: Copy> Edges<T> {
  pub const fn uniform(value: T) -> Self {
    Self {
      top: value,
      right: value,
      bottom: value,
      left: value,
    }
  }

  pub fn get(&self, side: PhysicalSide) -> T {
    match side {
      PhysicalSide::Top => self.top,
      PhysicalSide::Right => self.right,
      PhysicalSide::Bottom => self.bottom,
      PhysicalSide::Left => self.left,
    }
  }
}
