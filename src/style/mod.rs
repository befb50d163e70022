//! Computed styles and logical accessors
//!
//! A [`Style`] holds the computed values that flow layout consumes. Values
//! are stored against physical sides and axes; the logical accessors map
//! flow-relative queries (block-start margin, inline size, ...) onto the
//! physical storage through [`logical::logical_map`]. The map is chosen by
//! the containing block's established writing mode, since a box
//! participates in its parent's flow; percentages also resolve against the
//! containing block area.

pub mod logical;
pub mod types;

use std::sync::Arc;

use crate::style::logical::logical_map;
use crate::style::types::BorderStyle;
use crate::style::types::BoxSizing;
use crate::style::types::Clear;
use crate::style::types::CssValue;
use crate::style::types::CssValueAuto;
use crate::style::types::CssValueNone;
use crate::style::types::Direction;
use crate::style::types::Display;
use crate::style::types::DisplayInner;
use crate::style::types::DisplayOuter;
use crate::style::types::Edges;
use crate::style::types::Float;
use crate::style::types::FontStretch;
use crate::style::types::FontStyle;
use crate::style::types::FontVariant;
use crate::style::types::LineHeight;
use crate::style::types::Overflow;
use crate::style::types::OverflowWrap;
use crate::style::types::PhysicalAxis;
use crate::style::types::PhysicalSide;
use crate::style::types::Position;
use crate::style::types::Rgba;
use crate::style::types::WhiteSpace;
use crate::style::types::WordBreak;
use crate::style::types::WordSpacing;
use crate::style::types::WritingMode;
use crate::tree::box_tree::BoxArea;

/// Computed style for one box
///
/// Construct with [`Style::default`] for CSS initial values and override
/// fields as needed. Boxes share styles through [`Arc`].
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
  // Inherited properties
  pub white_space: WhiteSpace,
  pub color: Rgba,
  pub font_size: f32,
  pub font_family: Vec<String>,
  pub font_style: FontStyle,
  pub font_variant: FontVariant,
  pub font_weight: u16,
  pub font_stretch: FontStretch,
  pub line_height: LineHeight,
  pub direction: Direction,
  pub writing_mode: WritingMode,
  pub word_break: WordBreak,
  pub overflow_wrap: OverflowWrap,
  pub word_spacing: WordSpacing,

  // Box generation
  pub display: Display,
  pub position: Position,
  pub float: Float,
  pub clear: Clear,
  pub overflow: Overflow,
  pub box_sizing: BoxSizing,

  // Sizing
  pub width: CssValueAuto,
  pub height: CssValueAuto,
  pub min_width: CssValue,
  pub min_height: CssValue,
  pub max_width: CssValueNone,
  pub max_height: CssValueNone,

  // Edges
  pub margin: Edges<CssValueAuto>,
  pub padding: Edges<CssValue>,
  pub border_width: Edges<f32>,
  pub border_style: Edges<BorderStyle>,

  // Insets for positioned boxes
  pub inset: Edges<CssValueAuto>,

  // Paint
  pub background_color: Rgba,
}

impl Default for Style {
  fn default() -> Self {
    Self {
      white_space: WhiteSpace::Normal,
      color: Rgba::BLACK,
      font_size: 16.0,
      font_family: vec!["Helvetica".to_string()],
      font_style: FontStyle::Normal,
      font_variant: FontVariant::Normal,
      font_weight: 400,
      font_stretch: FontStretch::Normal,
      line_height: LineHeight::Normal,
      direction: Direction::Ltr,
      writing_mode: WritingMode::HorizontalTb,
      word_break: WordBreak::Normal,
      overflow_wrap: OverflowWrap::Normal,
      word_spacing: WordSpacing::Normal,
      display: Display::INLINE,
      position: Position::Static,
      float: Float::None,
      clear: Clear::None,
      overflow: Overflow::Visible,
      box_sizing: BoxSizing::ContentBox,
      width: CssValueAuto::Auto,
      height: CssValueAuto::Auto,
      min_width: CssValue::Px(0.0),
      min_height: CssValue::Px(0.0),
      max_width: CssValueNone::None,
      max_height: CssValueNone::None,
      margin: Edges::uniform(CssValueAuto::Px(0.0)),
      padding: Edges::uniform(CssValue::Px(0.0)),
      border_width: Edges::uniform(0.0),
      border_style: Edges::uniform(BorderStyle::None),
      inset: Edges::uniform(CssValueAuto::Auto),
      background_color: Rgba::TRANSPARENT,
    }
  }
}

impl Style {
  /// Creates the style for a generated child box: inherited properties are
  /// copied from the parent, everything else takes its initial value.
  pub fn inherited_from(parent: &Style) -> Self {
    Self {
      white_space: parent.white_space,
      color: parent.color,
      font_size: parent.font_size,
      font_family: parent.font_family.clone(),
      font_style: parent.font_style,
      font_variant: parent.font_variant,
      font_weight: parent.font_weight,
      font_stretch: parent.font_stretch,
      line_height: parent.line_height,
      direction: parent.direction,
      writing_mode: parent.writing_mode,
      word_break: parent.word_break,
      overflow_wrap: parent.overflow_wrap,
      word_spacing: parent.word_spacing,
      ..Self::default()
    }
  }

  /// Wraps this style in an [`Arc`] for sharing across the box tree.
  pub fn shared(self) -> Arc<Style> {
    Arc::new(self)
  }

  // --- Percentage bases ---------------------------------------------------

  /// Percentage basis for margins and paddings: the containing block's
  /// size on its own inline axis. Falls back to zero when indefinite.
  fn percent_basis(&self, cb: &BoxArea) -> f32 {
    let map = logical_map(cb.writing_mode);
    cb.physical_size(map.inline_size).unwrap_or(0.0)
  }

  // --- Margins ------------------------------------------------------------

  fn margin_on(&self, cb: &BoxArea, side: PhysicalSide) -> Option<f32> {
    self.margin.get(side).resolve(self.percent_basis(cb))
  }

  /// Margin on the block-start side. `None` means auto.
  pub fn margin_block_start(&self, cb: &BoxArea) -> Option<f32> {
    self.margin_on(cb, logical_map(cb.writing_mode).block_start)
  }

  /// Margin on the block-end side. `None` means auto.
  pub fn margin_block_end(&self, cb: &BoxArea) -> Option<f32> {
    self.margin_on(cb, logical_map(cb.writing_mode).block_end)
  }

  /// Margin on the line-left side. `None` means auto.
  pub fn margin_line_left(&self, cb: &BoxArea) -> Option<f32> {
    self.margin_on(cb, logical_map(cb.writing_mode).line_left)
  }

  /// Margin on the line-right side. `None` means auto.
  pub fn margin_line_right(&self, cb: &BoxArea) -> Option<f32> {
    self.margin_on(cb, logical_map(cb.writing_mode).line_right)
  }

  // --- Paddings -----------------------------------------------------------

  fn padding_on(&self, cb: &BoxArea, side: PhysicalSide) -> f32 {
    self.padding.get(side).resolve(self.percent_basis(cb))
  }

  pub fn padding_block_start(&self, cb: &BoxArea) -> f32 {
    self.padding_on(cb, logical_map(cb.writing_mode).block_start)
  }

  pub fn padding_block_end(&self, cb: &BoxArea) -> f32 {
    self.padding_on(cb, logical_map(cb.writing_mode).block_end)
  }

  pub fn padding_line_left(&self, cb: &BoxArea) -> f32 {
    self.padding_on(cb, logical_map(cb.writing_mode).line_left)
  }

  pub fn padding_line_right(&self, cb: &BoxArea) -> f32 {
    self.padding_on(cb, logical_map(cb.writing_mode).line_right)
  }

  // --- Borders ------------------------------------------------------------

  /// Used border width on a physical side: zero when the style is `none`.
  fn border_width_on(&self, side: PhysicalSide) -> f32 {
    if self.border_style.get(side) == BorderStyle::None {
      0.0
    } else {
      self.border_width.get(side)
    }
  }

  pub fn border_block_start_width(&self, cb: &BoxArea) -> f32 {
    self.border_width_on(logical_map(cb.writing_mode).block_start)
  }

  pub fn border_block_end_width(&self, cb: &BoxArea) -> f32 {
    self.border_width_on(logical_map(cb.writing_mode).block_end)
  }

  pub fn border_line_left_width(&self, cb: &BoxArea) -> f32 {
    self.border_width_on(logical_map(cb.writing_mode).line_left)
  }

  pub fn border_line_right_width(&self, cb: &BoxArea) -> f32 {
    self.border_width_on(logical_map(cb.writing_mode).line_right)
  }

  // --- Sizes --------------------------------------------------------------

  fn size_prop(&self, axis: PhysicalAxis) -> CssValueAuto {
    match axis {
      PhysicalAxis::Width => self.width,
      PhysicalAxis::Height => self.height,
    }
  }

  fn min_size_prop(&self, axis: PhysicalAxis) -> CssValue {
    match axis {
      PhysicalAxis::Width => self.min_width,
      PhysicalAxis::Height => self.min_height,
    }
  }

  fn max_size_prop(&self, axis: PhysicalAxis) -> CssValueNone {
    match axis {
      PhysicalAxis::Width => self.max_width,
      PhysicalAxis::Height => self.max_height,
    }
  }

  /// Paddings plus used borders along a physical axis.
  fn edge_extent(&self, cb: &BoxArea, axis: PhysicalAxis) -> f32 {
    let (a, b) = match axis {
      PhysicalAxis::Width => (PhysicalSide::Left, PhysicalSide::Right),
      PhysicalAxis::Height => (PhysicalSide::Top, PhysicalSide::Bottom),
    };
    self.padding_on(cb, a) + self.padding_on(cb, b) + self.border_width_on(a) + self.border_width_on(b)
  }

  /// Converts a specified size to a content-box size under `box-sizing`.
  fn to_content_size(&self, cb: &BoxArea, axis: PhysicalAxis, size: f32) -> f32 {
    match self.box_sizing {
      BoxSizing::ContentBox => size,
      BoxSizing::BorderBox => (size - self.edge_extent(cb, axis)).max(0.0),
    }
  }

  fn size_on_axis(&self, cb: &BoxArea, axis: PhysicalAxis) -> Option<f32> {
    let specified = match self.size_prop(axis) {
      CssValueAuto::Auto => return None,
      CssValueAuto::Px(px) => px,
      CssValueAuto::Percent(pct) => pct * cb.physical_size(axis)?,
    };
    Some(self.to_content_size(cb, axis, specified))
  }

  /// Content-box inline size. `None` means auto. A percentage against an
  /// indefinite containing block size also resolves to auto.
  pub fn inline_size(&self, cb: &BoxArea) -> Option<f32> {
    self.size_on_axis(cb, logical_map(cb.writing_mode).inline_size)
  }

  /// Content-box block size. `None` means auto.
  pub fn block_size(&self, cb: &BoxArea) -> Option<f32> {
    self.size_on_axis(cb, logical_map(cb.writing_mode).block_size)
  }

  fn clamp_on_axis(&self, cb: &BoxArea, axis: PhysicalAxis, size: f32) -> f32 {
    let basis = cb.physical_size(axis).unwrap_or(0.0);
    let min = self.to_content_size(cb, axis, self.min_size_prop(axis).resolve(basis));
    let max = self
      .max_size_prop(axis)
      .resolve(basis)
      .map(|m| self.to_content_size(cb, axis, m));
    let upper = match max {
      Some(m) => size.min(m),
      None => size,
    };
    upper.max(min)
  }

  /// Clamps a used content-box inline size between min and max constraints.
  /// Min wins over max when they conflict.
  pub fn clamp_inline_size(&self, cb: &BoxArea, size: f32) -> f32 {
    self.clamp_on_axis(cb, logical_map(cb.writing_mode).inline_size, size)
  }

  /// Clamps a used content-box block size between min and max constraints.
  pub fn clamp_block_size(&self, cb: &BoxArea, size: f32) -> f32 {
    self.clamp_on_axis(cb, logical_map(cb.writing_mode).block_size, size)
  }

  // --- Relative offsets ---------------------------------------------------

  fn inset_on(&self, side: PhysicalSide, basis: f32) -> Option<f32> {
    self.inset.get(side).resolve(basis)
  }

  /// Vertical shift applied by relative positioning. `top` wins over
  /// `bottom` when both are set.
  pub fn relative_vertical_shift(&self, cb: &BoxArea) -> f32 {
    let basis = cb.physical_size(PhysicalAxis::Height).unwrap_or(0.0);
    if let Some(top) = self.inset_on(PhysicalSide::Top, basis) {
      top
    } else if let Some(bottom) = self.inset_on(PhysicalSide::Bottom, basis) {
      -bottom
    } else {
      0.0
    }
  }

  /// Horizontal shift applied by relative positioning. When both `left`
  /// and `right` are set, the inline-start side wins per direction.
  pub fn relative_horizontal_shift(&self, cb: &BoxArea) -> f32 {
    let basis = cb.physical_size(PhysicalAxis::Width).unwrap_or(0.0);
    let left = self.inset_on(PhysicalSide::Left, basis);
    let right = self.inset_on(PhysicalSide::Right, basis);
    match (left, right, self.direction) {
      (Some(l), _, Direction::Ltr) => l,
      (Some(l), None, Direction::Rtl) => l,
      (_, Some(r), _) => -r,
      (None, None, _) => 0.0,
    }
  }

  // --- Area predicates ----------------------------------------------------

  fn edge_value_nonzero(v: CssValue) -> bool {
    match v {
      CssValue::Px(px) => px != 0.0,
      CssValue::Percent(pct) => pct != 0.0,
    }
  }

  fn margin_value_nonzero(v: CssValueAuto) -> bool {
    match v {
      CssValueAuto::Px(px) => px != 0.0,
      CssValueAuto::Percent(pct) => pct != 0.0,
      CssValueAuto::Auto => false,
    }
  }

  /// True when any padding is nonzero, so a distinct padding area exists.
  pub fn has_padding_area(&self) -> bool {
    Self::edge_value_nonzero(self.padding.top)
      || Self::edge_value_nonzero(self.padding.right)
      || Self::edge_value_nonzero(self.padding.bottom)
      || Self::edge_value_nonzero(self.padding.left)
  }

  /// True when any border has both a positive width and a visible style,
  /// so a distinct border area exists.
  pub fn has_border_area(&self) -> bool {
    self.border_width_on(PhysicalSide::Top) > 0.0
      || self.border_width_on(PhysicalSide::Right) > 0.0
      || self.border_width_on(PhysicalSide::Bottom) > 0.0
      || self.border_width_on(PhysicalSide::Left) > 0.0
  }

  /// True when the box paints a background or border of its own.
  pub fn has_paint(&self) -> bool {
    self.background_color.is_visible() || self.has_border_area()
  }

  fn has_gap_on(&self, side: PhysicalSide) -> bool {
    Self::margin_value_nonzero(self.margin.get(side))
      || Self::edge_value_nonzero(self.padding.get(side))
      || self.border_width_on(side) > 0.0
  }

  /// True when margin, padding or border occupy space on the line-left side.
  pub fn has_line_left_gap(&self, cb: &BoxArea) -> bool {
    self.has_gap_on(logical_map(cb.writing_mode).line_left)
  }

  /// True when margin, padding or border occupy space on the line-right side.
  pub fn has_line_right_gap(&self, cb: &BoxArea) -> bool {
    self.has_gap_on(logical_map(cb.writing_mode).line_right)
  }

  // --- Display ------------------------------------------------------------

  /// The used display after blockification: floated and absolutely
  /// positioned boxes become block-level.
  pub fn used_display(&self) -> Display {
    let mut display = self.display;
    if display.is_none() {
      return display;
    }
    if self.float != Float::None || self.position == Position::Absolute {
      if display.outer == DisplayOuter::Inline {
        display.outer = DisplayOuter::Block;
        if display.inner == DisplayInner::Flow {
          display.inner = DisplayInner::FlowRoot;
        }
      }
    }
    display
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tree::box_tree::BoxArea;

  fn horizontal_cb(width: f32, height: Option<f32>) -> BoxArea {
    let mut cb = BoxArea::root(WritingMode::HorizontalTb, Direction::Ltr, width, height.unwrap_or(0.0));
    cb.block_size_definite = height.is_some();
    cb
  }

  #[test]
  fn percent_margin_resolves_against_inline_size() {
    let cb = horizontal_cb(200.0, Some(100.0));
    let style = Style {
      margin: Edges::uniform(CssValueAuto::Percent(0.1)),
      ..Style::default()
    };
    assert_eq!(style.margin_block_start(&cb), Some(20.0));
    assert_eq!(style.margin_line_left(&cb), Some(20.0));
  }

  #[test]
  fn auto_margin_is_none() {
    let cb = horizontal_cb(200.0, Some(100.0));
    let style = Style::default();
    let style = Style {
      margin: Edges::uniform(CssValueAuto::Auto),
      ..style
    };
    assert_eq!(style.margin_block_start(&cb), None);
  }

  #[test]
  fn percent_height_against_indefinite_is_auto() {
    let cb = horizontal_cb(200.0, None);
    let style = Style {
      height: CssValueAuto::Percent(0.5),
      ..Style::default()
    };
    assert_eq!(style.block_size(&cb), None);

    let definite = horizontal_cb(200.0, Some(300.0));
    assert_eq!(style.block_size(&definite), Some(150.0));
  }

  #[test]
  fn border_box_subtracts_edges_and_clamps() {
    let cb = horizontal_cb(400.0, Some(100.0));
    let style = Style {
      width: CssValueAuto::Px(100.0),
      box_sizing: BoxSizing::BorderBox,
      padding: Edges::uniform(CssValue::Px(10.0)),
      border_width: Edges::uniform(5.0),
      border_style: Edges::uniform(BorderStyle::Solid),
      ..Style::default()
    };
    // 100 - (10 + 10) - (5 + 5) = 70
    assert_eq!(style.inline_size(&cb), Some(70.0));

    let tight = Style {
      width: CssValueAuto::Px(10.0),
      ..style
    };
    assert_eq!(tight.inline_size(&cb), Some(0.0));
  }

  #[test]
  fn border_width_ignored_when_style_none() {
    let cb = horizontal_cb(200.0, Some(100.0));
    let style = Style {
      border_width: Edges::uniform(4.0),
      ..Style::default()
    };
    assert_eq!(style.border_block_start_width(&cb), 0.0);
    assert!(!style.has_border_area());

    let solid = Style {
      border_style: Edges::uniform(BorderStyle::Solid),
      ..style
    };
    assert_eq!(solid.border_block_start_width(&cb), 4.0);
    assert!(solid.has_border_area());
  }

  #[test]
  fn vertical_containing_block_swaps_axes() {
    let mut cb = BoxArea::root(WritingMode::VerticalRl, Direction::Ltr, 100.0, 200.0);
    cb.block_size_definite = true;
    let style = Style {
      writing_mode: WritingMode::VerticalRl,
      width: CssValueAuto::Px(40.0),
      height: CssValueAuto::Px(60.0),
      ..Style::default()
    };
    // In a vertical-rl flow the inline size is the height property.
    assert_eq!(style.inline_size(&cb), Some(60.0));
    assert_eq!(style.block_size(&cb), Some(40.0));
  }

  #[test]
  fn accessors_follow_the_containing_block_mode() {
    // A vertical-rl box participating in a horizontal flow still reads
    // block-start from margin-top, not from its own inline axis.
    let cb = horizontal_cb(200.0, Some(100.0));
    let style = Style {
      writing_mode: WritingMode::VerticalRl,
      margin: Edges {
        top: CssValueAuto::Px(10.0),
        right: CssValueAuto::Px(99.0),
        bottom: CssValueAuto::Px(0.0),
        left: CssValueAuto::Px(0.0),
      },
      width: CssValueAuto::Px(40.0),
      ..Style::default()
    };
    assert_eq!(style.margin_block_start(&cb), Some(10.0));
    assert_eq!(style.margin_line_right(&cb), Some(99.0));
    assert_eq!(style.inline_size(&cb), Some(40.0));
  }

  #[test]
  fn min_max_clamp() {
    let cb = horizontal_cb(200.0, Some(100.0));
    let style = Style {
      min_width: CssValue::Px(50.0),
      max_width: CssValueNone::Px(80.0),
      ..Style::default()
    };
    assert_eq!(style.clamp_inline_size(&cb, 10.0), 50.0);
    assert_eq!(style.clamp_inline_size(&cb, 100.0), 80.0);
    assert_eq!(style.clamp_inline_size(&cb, 60.0), 60.0);
  }

  #[test]
  fn blockification_of_floats() {
    let style = Style {
      float: Float::Left,
      display: Display::INLINE,
      ..Style::default()
    };
    let used = style.used_display();
    assert_eq!(used.outer, DisplayOuter::Block);
  }

  #[test]
  fn inherited_child_style() {
    let parent = Style {
      font_size: 24.0,
      direction: Direction::Rtl,
      width: CssValueAuto::Px(100.0),
      ..Style::default()
    };
    let child = Style::inherited_from(&parent);
    assert_eq!(child.font_size, 24.0);
    assert_eq!(child.direction, Direction::Rtl);
    assert_eq!(child.width, CssValueAuto::Auto);
  }
}
