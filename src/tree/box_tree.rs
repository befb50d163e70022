//! Box tree and geometry arena
//!
//! The box tree is a flat `Vec` of [`LayoutNode`]s in pre-order. Each box
//! records the index range of its subtree (`tree_start..=tree_final`), so
//! walkers skip a subtree in O(1) by jumping past `tree_final` and detect
//! when a parent closes by comparing indices. There are no parent pointers
//! in the tree itself.
//!
//! Geometry lives in a parallel arena of [`BoxArea`]s. Each box owns a
//! chain of up to three areas (border, padding, content), allocated only
//! when the style gives them distinct extents. Areas link upward through
//! [`AreaId`]s: a box's outermost area is parented to an area of its
//! containing block during prelayout.

use std::sync::Arc;

use crate::error::Result;
use crate::error::StructuralError;
use crate::geometry::Rect;
use crate::geometry::Size;
use crate::style::types::Direction;
use crate::style::types::PhysicalAxis;
use crate::style::types::WritingMode;
use crate::style::Style;
use crate::text::FaceId;

/// Named bit flags stored on boxes and runs.
///
/// Bits 8 and up propagate from content to the boxes above it; see
/// [`PROPAGATES_TO_INLINE_BITS`]. Bits 8 and 9 are shared: on block
/// containers they mean inline-level and BFC-root, on inline content they
/// mean has-text and has-complex-text. The two uses never meet because
/// block containers are never inline content.
pub mod flags {
  /// Box was generated, not supplied by the host.
  pub const IS_ANONYMOUS: u32 = 1 << 0;
  /// Box paints a background or border itself.
  pub const HAS_BACKGROUND_IN_LAYER: u32 = 1 << 4;
  /// Box paints text itself.
  pub const HAS_FOREGROUND_IN_LAYER: u32 = 1 << 5;
  /// Some descendant paints a background or border.
  pub const HAS_BACKGROUND_IN_DESCENDANT: u32 = 1 << 6;
  /// Some descendant paints text.
  pub const HAS_FOREGROUND_IN_DESCENDANT: u32 = 1 << 7;
  /// Block container is inline-level (an inline-block).
  pub const IS_INLINE_LEVEL: u32 = 1 << 8;
  /// Run or inline subtree contains non-whitespace text.
  pub const HAS_TEXT: u32 = 1 << 8;
  /// Box establishes its own block formatting context.
  pub const IS_BFC_ROOT: u32 = 1 << 9;
  /// Text contains characters outside basic ASCII.
  pub const HAS_COMPLEX_TEXT: u32 = 1 << 9;
  /// Text contains soft hyphens (U+00AD).
  pub const HAS_SOFT_HYPHEN: u32 = 1 << 10;
  /// Text contains hard line breaks.
  pub const HAS_NEWLINES: u32 = 1 << 11;
  /// Text may soft-wrap at spaces.
  pub const HAS_SOFT_WRAP: u32 = 1 << 12;
  /// A style in the subtree sets word-spacing.
  pub const HAS_WORD_SPACING: u32 = 1 << 13;
  /// An inline in the subtree paints a background or border.
  pub const HAS_PAINTED_INLINES: u32 = 1 << 14;
  /// An inline in the subtree occupies space of its own.
  pub const HAS_SIZED_INLINE: u32 = 1 << 15;
  /// Subtree contains a hard break, inline-block or replaced box.
  pub const HAS_BREAK_INLINE_OR_REPLACED: u32 = 1 << 16;
  /// Subtree contains a float or replaced box.
  pub const HAS_FLOAT_OR_REPLACED: u32 = 1 << 17;
  /// Subtree contains inline-blocks.
  pub const HAS_INLINE_BLOCKS: u32 = 1 << 18;

  /// Mask of bits that propagate from content up through inlines.
  pub const PROPAGATES_TO_INLINE_BITS: u32 = 0xffff_ff00;

  /// Bits a run sets when it holds visible text.
  pub const TEXT_BITS: u32 = HAS_TEXT | HAS_FOREGROUND_IN_LAYER | HAS_FOREGROUND_IN_DESCENDANT;
}

/// Index of a [`BoxArea`] in the layout's area arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AreaId(pub usize);

/// One rectangle of box geometry.
///
/// During layout an area holds flow-relative coordinates: `block_start`
/// and `line_left` offsets within the parent area, and logical sizes.
/// These are expressed in the writing mode of the context that positioned
/// the area. After layout, [`BoxArea::absolutify`] converts the chain to
/// absolute physical coordinates in `x`/`y`/`width`/`height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxArea {
  /// The area this one is positioned within.
  pub parent: Option<AreaId>,
  /// Writing mode of the box this area belongs to.
  pub writing_mode: WritingMode,
  pub direction: Direction,
  /// Block-axis offset from the parent area's origin.
  pub block_start: f32,
  /// Size on the block axis.
  pub block_size: f32,
  /// Whether `block_size` has been resolved yet. Percentages against an
  /// area with an indefinite block size behave as auto.
  pub block_size_definite: bool,
  /// Line-left offset from the parent area's origin.
  pub line_left: f32,
  /// Size on the inline axis.
  pub inline_size: f32,
  /// Absolute physical position, valid after absolutification.
  pub x: f32,
  pub y: f32,
  pub width: f32,
  pub height: f32,
}

impl BoxArea {
  /// Creates an unpositioned area for a box with the given style.
  pub fn new(style: &Style) -> Self {
    Self {
      parent: None,
      writing_mode: style.writing_mode,
      direction: style.direction,
      block_start: 0.0,
      block_size: 0.0,
      block_size_definite: false,
      line_left: 0.0,
      inline_size: 0.0,
      x: 0.0,
      y: 0.0,
      width: 0.0,
      height: 0.0,
    }
  }

  /// Creates a root area (the initial containing block) with definite
  /// physical dimensions and no parent.
  pub fn root(writing_mode: WritingMode, direction: Direction, width: f32, height: f32) -> Self {
    let (inline_size, block_size) = if writing_mode.is_horizontal() {
      (width, height)
    } else {
      (height, width)
    };
    Self {
      parent: None,
      writing_mode,
      direction,
      block_start: 0.0,
      block_size,
      block_size_definite: true,
      line_left: 0.0,
      inline_size,
      x: 0.0,
      y: 0.0,
      width,
      height,
    }
  }

  /// Size along a physical axis, through this area's own writing mode.
  /// Returns `None` when that dimension is still indefinite.
  pub fn physical_size(&self, axis: PhysicalAxis) -> Option<f32> {
    let on_inline_axis = match axis {
      PhysicalAxis::Width => self.writing_mode.is_horizontal(),
      PhysicalAxis::Height => !self.writing_mode.is_horizontal(),
    };
    if on_inline_axis {
      Some(self.inline_size)
    } else if self.block_size_definite {
      Some(self.block_size)
    } else {
      None
    }
  }

  /// Physical width implied by the logical sizes, through this area's own
  /// writing mode. Usable before absolutification.
  pub fn layout_width(&self) -> f32 {
    if self.writing_mode.is_horizontal() {
      self.inline_size
    } else {
      self.block_size
    }
  }

  /// Physical height implied by the logical sizes.
  pub fn layout_height(&self) -> f32 {
    if self.writing_mode.is_horizontal() {
      self.block_size
    } else {
      self.inline_size
    }
  }

  /// Converts flow-relative coordinates to absolute physical ones, given
  /// the already-absolutified parent area. The parent's writing mode
  /// decides how the logical offsets map onto axes; in `vertical-rl` the
  /// block axis grows leftward from the parent's right edge.
  pub fn absolutify(&mut self, parent: &BoxArea) {
    match parent.writing_mode {
      WritingMode::HorizontalTb => {
        self.x = parent.x + self.line_left;
        self.y = parent.y + self.block_start;
        self.width = self.inline_size;
        self.height = self.block_size;
      }
      WritingMode::VerticalLr => {
        self.x = parent.x + self.block_start;
        self.y = parent.y + self.line_left;
        self.width = self.block_size;
        self.height = self.inline_size;
      }
      WritingMode::VerticalRl => {
        self.x = parent.x + parent.width - self.block_start - self.block_size;
        self.y = parent.y + self.line_left;
        self.width = self.block_size;
        self.height = self.inline_size;
      }
    }
  }

  /// Rounds the absolute rectangle to whole pixels. The far edge is
  /// rounded before the near edge so adjacent areas that shared an edge
  /// before snapping still share it afterwards.
  pub fn snap_pixels(&mut self) {
    let right = (self.x + self.width).round();
    let bottom = (self.y + self.height).round();
    self.x = self.x.round();
    self.y = self.y.round();
    self.width = right - self.x;
    self.height = bottom - self.y;
  }

  /// The absolute rectangle, valid after absolutification.
  pub fn rect(&self) -> Rect {
    Rect::new(self.x, self.y, self.width, self.height)
  }
}

/// Data common to all boxes: style, flags, subtree range and geometry.
#[derive(Debug, Clone)]
pub struct BoxData {
  pub style: Arc<Style>,
  pub bits: u32,
  /// Index of this box in the flattened tree.
  pub tree_start: usize,
  /// Index of the last node in this box's subtree.
  pub tree_final: usize,
  pub content: AreaId,
  pub padding: Option<AreaId>,
  pub border: Option<AreaId>,
  /// Area of the containing block, assigned during prelayout.
  pub containing_block: Option<AreaId>,
}

impl BoxData {
  pub fn new(style: Arc<Style>, bits: u32) -> Self {
    Self {
      style,
      bits,
      tree_start: 0,
      tree_final: 0,
      content: AreaId(0),
      padding: None,
      border: None,
      containing_block: None,
    }
  }

  /// The outermost area of this box's chain.
  pub fn border_area_id(&self) -> AreaId {
    self.border.or(self.padding).unwrap_or(self.content)
  }

  /// The area just inside the border: padding if distinct, else content.
  pub fn padding_area_id(&self) -> AreaId {
    self.padding.unwrap_or(self.content)
  }

  pub fn containing_block(&self) -> Result<AreaId> {
    self
      .containing_block
      .ok_or_else(|| StructuralError::UnlinkedArea(self.tree_start).into())
  }
}

/// Vertical metrics of an inline, in CSS pixels, with leading applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineMetrics {
  /// Ascent above the baseline including half-leading.
  pub ascender_box: f32,
  /// Font ascent above the baseline.
  pub ascender: f32,
  pub x_height: f32,
  /// Font descent below the baseline, as a positive value.
  pub descender: f32,
  /// Descent below the baseline including half-leading.
  pub descender_box: f32,
  /// Used line height.
  pub line_height: f32,
}

/// A shaped stretch of text belonging to one inline formatting context.
#[derive(Debug, Clone)]
pub struct ShapedItem {
  pub style: Arc<Style>,
  pub face: FaceId,
  /// Glyph records with stride [`crate::text::shaper::GLYPH_STRIDE`].
  pub glyphs: Vec<i32>,
  /// Font units per em of `face`, cached so positioning needs no shaper.
  pub units_per_em: f32,
  /// Byte range into the IFC text.
  pub text_start: usize,
  pub text_end: usize,
  /// Position of the item's origin within the IFC content area.
  pub x: f32,
  pub y: f32,
}

impl ShapedItem {
  /// Scale from font units to CSS pixels for this item's style.
  pub fn scale(&self) -> f32 {
    self.style.font_size / self.units_per_em
  }
}

/// One line of an inline formatting context.
#[derive(Debug, Clone, Copy)]
pub struct Linebox {
  /// Block offset of the line's top within the IFC content area.
  pub block_offset: f32,
  pub ascender: f32,
  pub descender: f32,
}

impl Linebox {
  pub fn height(&self) -> f32 {
    self.ascender + self.descender
  }
}

/// Paragraph state of a block container of inlines.
#[derive(Debug, Clone, Default)]
pub struct IfcState {
  /// Concatenated text of all runs, whitespace-collapsed in place.
  pub text: String,
  pub items: Vec<ShapedItem>,
  pub lineboxes: Vec<Linebox>,
}

/// Which children a block container holds.
#[derive(Debug, Clone)]
pub enum BlockKind {
  /// Only block-level children.
  Blocks,
  /// Only inline-level children; the container is an IFC root.
  Inlines(IfcState),
}

/// A block container box.
#[derive(Debug, Clone)]
pub struct BlockContainer {
  pub data: BoxData,
  pub kind: BlockKind,
}

impl BlockContainer {
  /// The paragraph state, if this container holds inlines.
  pub fn ifc(&self) -> Option<&IfcState> {
    match &self.kind {
      BlockKind::Inlines(ifc) => Some(ifc),
      BlockKind::Blocks => None,
    }
  }

  pub fn ifc_mut(&mut self) -> Option<&mut IfcState> {
    match &mut self.kind {
      BlockKind::Inlines(ifc) => Some(ifc),
      BlockKind::Blocks => None,
    }
  }
}

/// An inline box. Its text range covers the IFC text its subtree spans.
#[derive(Debug, Clone)]
pub struct InlineBox {
  pub data: BoxData,
  pub text_start: usize,
  pub text_end: usize,
  pub metrics: InlineMetrics,
}

/// A run of text inside an inline formatting context.
#[derive(Debug, Clone)]
pub struct TextRun {
  pub style: Arc<Style>,
  pub bits: u32,
  /// Byte range into the owning IFC's text.
  pub text_start: usize,
  pub text_end: usize,
}

/// A forced line break (`<br>`).
#[derive(Debug, Clone)]
pub struct HardBreak {
  pub style: Arc<Style>,
}

/// A replaced box with intrinsic dimensions supplied by the host.
#[derive(Debug, Clone)]
pub struct ReplacedBox {
  pub data: BoxData,
  pub intrinsic: Option<Size>,
}

impl ReplacedBox {
  const FALLBACK_SIZE: f32 = 0.0;

  fn ratio(&self) -> Option<f32> {
    self
      .intrinsic
      .filter(|s| s.width > 0.0 && s.height > 0.0)
      .map(|s| s.width / s.height)
  }

  /// Intrinsic size along this box's inline axis.
  pub fn intrinsic_inline_size(&self) -> f32 {
    let horizontal = self.data.style.writing_mode.is_horizontal();
    match self.intrinsic {
      Some(s) if horizontal => s.width,
      Some(s) => s.height,
      None => Self::FALLBACK_SIZE,
    }
  }

  fn intrinsic_block_size(&self) -> f32 {
    let horizontal = self.data.style.writing_mode.is_horizontal();
    match self.intrinsic {
      Some(s) if horizontal => s.height,
      Some(s) => s.width,
      None => Self::FALLBACK_SIZE,
    }
  }

  /// Used inline size: the specified size, or derived from the block size
  /// through the intrinsic aspect ratio, or the intrinsic inline size.
  pub fn definite_inline_size(&self, cb: &BoxArea) -> f32 {
    let style = &self.data.style;
    if let Some(size) = style.inline_size(cb) {
      return style.clamp_inline_size(cb, size);
    }
    if let (Some(block), Some(ratio)) = (style.block_size(cb), self.ratio()) {
      let ratio = if style.writing_mode.is_horizontal() { ratio } else { 1.0 / ratio };
      return style.clamp_inline_size(cb, block * ratio);
    }
    style.clamp_inline_size(cb, self.intrinsic_inline_size())
  }

  /// Used block size by the same rules as [`Self::definite_inline_size`].
  pub fn definite_block_size(&self, cb: &BoxArea) -> f32 {
    let style = &self.data.style;
    if let Some(size) = style.block_size(cb) {
      return style.clamp_block_size(cb, size);
    }
    if let (Some(inline), Some(ratio)) = (style.inline_size(cb), self.ratio()) {
      let ratio = if style.writing_mode.is_horizontal() { ratio } else { 1.0 / ratio };
      return style.clamp_block_size(cb, inline / ratio);
    }
    style.clamp_block_size(cb, self.intrinsic_block_size())
  }
}

/// A node of the flattened box tree.
#[derive(Debug, Clone)]
pub enum LayoutNode {
  Block(BlockContainer),
  Inline(InlineBox),
  Run(TextRun),
  Break(HardBreak),
  Replaced(ReplacedBox),
}

impl LayoutNode {
  pub fn style(&self) -> &Arc<Style> {
    match self {
      LayoutNode::Block(b) => &b.data.style,
      LayoutNode::Inline(i) => &i.data.style,
      LayoutNode::Run(r) => &r.style,
      LayoutNode::Break(br) => &br.style,
      LayoutNode::Replaced(r) => &r.data.style,
    }
  }

  /// Box data, for nodes that are boxes with geometry.
  pub fn data(&self) -> Option<&BoxData> {
    match self {
      LayoutNode::Block(b) => Some(&b.data),
      LayoutNode::Inline(i) => Some(&i.data),
      LayoutNode::Replaced(r) => Some(&r.data),
      LayoutNode::Run(_) | LayoutNode::Break(_) => None,
    }
  }

  pub fn data_mut(&mut self) -> Option<&mut BoxData> {
    match self {
      LayoutNode::Block(b) => Some(&mut b.data),
      LayoutNode::Inline(i) => Some(&mut i.data),
      LayoutNode::Replaced(r) => Some(&mut r.data),
      LayoutNode::Run(_) | LayoutNode::Break(_) => None,
    }
  }

  pub fn bits(&self) -> u32 {
    match self {
      LayoutNode::Run(r) => r.bits,
      other => other.data().map_or(0, |d| d.bits),
    }
  }

  /// Last index of this node's subtree; leaves end at themselves.
  pub fn tree_final(&self, ix: usize) -> usize {
    self.data().map_or(ix, |d| d.tree_final)
  }

  pub fn is_block_container(&self) -> bool {
    matches!(self, LayoutNode::Block(_))
  }
}

/// A laid-out (or in-progress) box tree with its geometry arena.
///
/// Area 0 is always the initial containing block.
#[derive(Debug)]
pub struct Layout {
  pub tree: Vec<LayoutNode>,
  pub areas: Vec<BoxArea>,
}

impl Layout {
  /// Takes ownership of a constructed tree, allocates the area chain for
  /// every box and installs `icb` as area 0.
  pub fn new(mut tree: Vec<LayoutNode>, icb: BoxArea) -> Self {
    let mut areas = vec![icb];
    for node in &mut tree {
      let Some(data) = node.data_mut() else { continue };
      let style = Arc::clone(&data.style);
      let border = style.has_border_area().then(|| {
        areas.push(BoxArea::new(&style));
        AreaId(areas.len() - 1)
      });
      let padding = style.has_padding_area().then(|| {
        let mut area = BoxArea::new(&style);
        area.parent = border;
        areas.push(area);
        AreaId(areas.len() - 1)
      });
      let mut content = BoxArea::new(&style);
      content.parent = padding.or(border);
      areas.push(content);
      data.border = border;
      data.padding = padding;
      data.content = AreaId(areas.len() - 1);
    }
    Self { tree, areas }
  }

  pub fn style(&self, ix: usize) -> &Arc<Style> {
    self.tree[ix].style()
  }

  pub fn bits(&self, ix: usize) -> u32 {
    self.tree[ix].bits()
  }

  /// Box data for node `ix`, which must be a box.
  pub fn box_data(&self, ix: usize) -> Result<&BoxData> {
    self.tree[ix].data().ok_or_else(|| {
      StructuralError::MalformedTree {
        message: format!("node {ix} is not a box"),
      }
      .into()
    })
  }

  pub fn area(&self, id: AreaId) -> &BoxArea {
    &self.areas[id.0]
  }

  pub fn area_mut(&mut self, id: AreaId) -> &mut BoxArea {
    &mut self.areas[id.0]
  }

  /// The containing block area of box `ix`.
  pub fn containing_block(&self, ix: usize) -> Result<&BoxArea> {
    let id = self.box_data(ix)?.containing_block()?;
    Ok(self.area(id))
  }

  /// Writes the fixed offsets of the box's inner areas: padding sits
  /// inside the border by the border widths, content inside the padding
  /// by the paddings. Percent paddings resolve against the containing
  /// block, which must be assigned first.
  pub fn fill_areas(&mut self, ix: usize) -> Result<()> {
    let data = self.box_data(ix)?;
    let style = Arc::clone(&data.style);
    let (content, padding) = (data.content, data.padding);
    let cb = *self.containing_block(ix)?;
    if let Some(pid) = padding {
      let area = self.area_mut(pid);
      area.block_start = style.border_block_start_width(&cb);
      area.line_left = style.border_line_left_width(&cb);
      let area = self.area_mut(content);
      area.block_start = style.padding_block_start(&cb);
      area.line_left = style.padding_line_left(&cb);
    } else {
      let area = self.area_mut(content);
      area.block_start = style.border_block_start_width(&cb);
      area.line_left = style.border_line_left_width(&cb);
    }
    Ok(())
  }

  /// Sets the content-box block size and grows it outward through the
  /// padding and border areas.
  pub fn set_block_size(&mut self, ix: usize, size: f32) -> Result<()> {
    let data = self.box_data(ix)?;
    let style = Arc::clone(&data.style);
    let (content, padding, border) = (data.content, data.padding, data.border);
    let cb = *self.containing_block(ix)?;
    let area = self.area_mut(content);
    area.block_size = size;
    area.block_size_definite = true;
    let padded = size + style.padding_block_start(&cb) + style.padding_block_end(&cb);
    if let Some(pid) = padding {
      let area = self.area_mut(pid);
      area.block_size = padded;
      area.block_size_definite = true;
    }
    if let Some(bid) = border {
      let area = self.area_mut(bid);
      area.block_size = padded + style.border_block_start_width(&cb) + style.border_block_end_width(&cb);
      area.block_size_definite = true;
    }
    Ok(())
  }

  /// Sets the border-box inline size and shrinks it inward through the
  /// padding and content areas. Inner sizes clamp at zero.
  pub fn set_inline_outer_size(&mut self, ix: usize, size: f32) -> Result<()> {
    let data = self.box_data(ix)?;
    let style = Arc::clone(&data.style);
    let (content, padding, border) = (data.content, data.padding, data.border);
    let cb = *self.containing_block(ix)?;
    if let Some(bid) = border {
      self.area_mut(bid).inline_size = size;
    }
    let inner =
      (size - style.border_line_left_width(&cb) - style.border_line_right_width(&cb)).max(0.0);
    if let Some(pid) = padding {
      self.area_mut(pid).inline_size = inner;
    }
    let content_size =
      (inner - style.padding_line_left(&cb) - style.padding_line_right(&cb)).max(0.0);
    self.area_mut(content).inline_size = content_size;
    Ok(())
  }

  /// Positions the box's outermost area on the block axis within its parent.
  pub fn set_block_position(&mut self, ix: usize, position: f32) -> Result<()> {
    let border = self.box_data(ix)?.border_area_id();
    self.area_mut(border).block_start = position;
    Ok(())
  }

  /// Positions the box's outermost area on the inline axis within its parent.
  pub fn set_inline_position(&mut self, ix: usize, position: f32) -> Result<()> {
    let border = self.box_data(ix)?.border_area_id();
    self.area_mut(border).line_left = position;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::style::types::BorderStyle;
  use crate::style::types::CssValue;
  use crate::style::types::Edges;

  fn boxed_style(style: Style) -> Arc<Style> {
    Arc::new(style)
  }

  #[test]
  fn area_chain_allocation_is_conditional() {
    let plain = LayoutNode::Block(BlockContainer {
      data: BoxData::new(boxed_style(Style::default()), 0),
      kind: BlockKind::Blocks,
    });
    let padded = LayoutNode::Block(BlockContainer {
      data: BoxData::new(
        boxed_style(Style {
          padding: Edges::uniform(CssValue::Px(4.0)),
          border_width: Edges::uniform(1.0),
          border_style: Edges::uniform(BorderStyle::Solid),
          ..Style::default()
        }),
        0,
      ),
      kind: BlockKind::Blocks,
    });
    let icb = BoxArea::root(WritingMode::HorizontalTb, Direction::Ltr, 100.0, 100.0);
    let layout = Layout::new(vec![plain, padded], icb);

    let plain_data = layout.box_data(0).unwrap();
    assert!(plain_data.border.is_none());
    assert!(plain_data.padding.is_none());
    assert_eq!(plain_data.border_area_id(), plain_data.content);

    let padded_data = layout.box_data(1).unwrap();
    assert!(padded_data.border.is_some());
    assert!(padded_data.padding.is_some());
    // ICB plus one area for the first box and three for the second.
    assert_eq!(layout.areas.len(), 5);
  }

  #[test]
  fn absolutify_horizontal() {
    let parent = BoxArea::root(WritingMode::HorizontalTb, Direction::Ltr, 100.0, 50.0);
    let mut child = BoxArea::new(&Style::default());
    child.block_start = 10.0;
    child.line_left = 20.0;
    child.inline_size = 30.0;
    child.block_size = 5.0;
    child.absolutify(&parent);
    assert_eq!(child.rect(), Rect::new(20.0, 10.0, 30.0, 5.0));
  }

  #[test]
  fn absolutify_vertical_rl_grows_leftward() {
    let parent = BoxArea::root(WritingMode::VerticalRl, Direction::Ltr, 100.0, 50.0);
    let mut child = BoxArea::new(&Style::default());
    child.block_start = 10.0;
    child.block_size = 30.0;
    child.line_left = 5.0;
    child.inline_size = 40.0;
    child.absolutify(&parent);
    // Block axis runs right to left: 100 - 10 - 30 = 60.
    assert_eq!(child.rect(), Rect::new(60.0, 5.0, 30.0, 40.0));
  }

  #[test]
  fn absolutify_vertical_lr() {
    let parent = BoxArea::root(WritingMode::VerticalLr, Direction::Ltr, 100.0, 50.0);
    let mut child = BoxArea::new(&Style::default());
    child.block_start = 10.0;
    child.block_size = 30.0;
    child.line_left = 5.0;
    child.inline_size = 40.0;
    child.absolutify(&parent);
    assert_eq!(child.rect(), Rect::new(10.0, 5.0, 30.0, 40.0));
  }

  #[test]
  fn snapping_preserves_shared_edges() {
    let mut a = BoxArea::root(WritingMode::HorizontalTb, Direction::Ltr, 10.0, 10.0);
    a.x = 0.0;
    a.width = 10.3;
    let mut b = a;
    b.x = 10.3;
    b.width = 10.3;
    a.snap_pixels();
    b.snap_pixels();
    assert_eq!(a.x + a.width, b.x);
  }

  #[test]
  fn block_size_grows_through_chain() {
    let style = Style {
      padding: Edges::uniform(CssValue::Px(4.0)),
      border_width: Edges::uniform(2.0),
      border_style: Edges::uniform(BorderStyle::Solid),
      ..Style::default()
    };
    let node = LayoutNode::Block(BlockContainer {
      data: BoxData::new(boxed_style(style), 0),
      kind: BlockKind::Blocks,
    });
    let icb = BoxArea::root(WritingMode::HorizontalTb, Direction::Ltr, 100.0, 100.0);
    let mut layout = Layout::new(vec![node], icb);
    if let Some(data) = layout.tree[0].data_mut() {
      data.containing_block = Some(AreaId(0));
    }

    layout.set_block_size(0, 50.0).unwrap();
    let data = layout.box_data(0).unwrap();
    assert_eq!(layout.area(data.content).block_size, 50.0);
    assert_eq!(layout.area(data.padding.unwrap()).block_size, 58.0);
    assert_eq!(layout.area(data.border.unwrap()).block_size, 62.0);

    layout.set_inline_outer_size(0, 62.0).unwrap();
    let data = layout.box_data(0).unwrap();
    assert_eq!(layout.area(data.border.unwrap()).inline_size, 62.0);
    assert_eq!(layout.area(data.padding.unwrap()).inline_size, 58.0);
    assert_eq!(layout.area(data.content).inline_size, 50.0);
  }

  #[test]
  fn containing_block_must_be_assigned() {
    let node = LayoutNode::Block(BlockContainer {
      data: BoxData::new(boxed_style(Style::default()), 0),
      kind: BlockKind::Blocks,
    });
    let icb = BoxArea::root(WritingMode::HorizontalTb, Direction::Ltr, 100.0, 100.0);
    let layout = Layout::new(vec![node], icb);
    assert!(layout.containing_block(0).is_err());
  }
}
