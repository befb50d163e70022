//! Host adapter boundary
//!
//! The host hands over a parent element and its children with resolved
//! styles; this module classifies them, builds the flattened box tree
//! (wrapping inline content in anonymous block containers where block
//! and inline children mix), drives the layout passes and returns one
//! absolute, pixel-snapped rectangle per laid-out child element.

use std::sync::Arc;

use crate::error::Result;
use crate::geometry::Rect;
use crate::geometry::Size;
use crate::layout::block::layout_block_level_box;
use crate::layout::inline::collapse_whitespace;
use crate::style::types::DisplayInner;
use crate::style::types::DisplayOuter;
use crate::style::types::Float;
use crate::style::types::Overflow;
use crate::style::types::Position;
use crate::style::Style;
use crate::text::TextShaper;
use crate::tree::box_tree::flags;
use crate::tree::box_tree::BlockContainer;
use crate::tree::box_tree::BlockKind;
use crate::tree::box_tree::BoxArea;
use crate::tree::box_tree::BoxData;
use crate::tree::box_tree::HardBreak;
use crate::tree::box_tree::IfcState;
use crate::tree::box_tree::InlineBox;
use crate::tree::box_tree::InlineMetrics;
use crate::tree::box_tree::Layout;
use crate::tree::box_tree::LayoutNode;
use crate::tree::box_tree::ReplacedBox;
use crate::tree::box_tree::TextRun;
use crate::tree::walk::postlayout;
use crate::tree::walk::prelayout;

/// One element as supplied by the host, with its style already resolved.
#[derive(Debug, Clone)]
pub struct HostElement {
  pub id: String,
  pub tag: String,
  pub style: Arc<Style>,
  /// Text content, rendered as a run inside the element's paragraph.
  pub text: Option<String>,
  /// Natural dimensions for replaced elements, in CSS pixels.
  pub intrinsic_size: Option<Size>,
}

/// The absolute snapped border-box rectangle of one laid-out element.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedRect {
  pub id: String,
  pub rect: Rect,
}

const REPLACED_ELEMENT_TAGS: [&str; 7] =
  ["img", "video", "audio", "canvas", "iframe", "embed", "object"];

fn is_replaced_element(tag: &str) -> bool {
  REPLACED_ELEMENT_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t))
}

/// Whether a style establishes a new block formatting context: flow-root
/// inner display, inline outer display (inline-block), hidden overflow,
/// a float, or absolute positioning.
pub fn style_creates_bfc(style: &Style) -> bool {
  style.display.inner == DisplayInner::FlowRoot
    || style.display.outer == DisplayOuter::Inline
    || style.overflow == Overflow::Hidden
    || style.float != Float::None
    || style.position == Position::Absolute
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildClass {
  Block,
  Inline,
  Replaced,
  None,
}

/// Classifies a child by its blockified display. Floated and absolutely
/// positioned elements are block-level regardless of specified display.
fn classify_child(element: &HostElement) -> ChildClass {
  let display = element.style.used_display();
  if display.is_none() {
    return ChildClass::None;
  }
  if is_replaced_element(&element.tag) {
    return ChildClass::Replaced;
  }
  if element.tag.eq_ignore_ascii_case("br") || display.outer == DisplayOuter::Inline {
    return ChildClass::Inline;
  }
  ChildClass::Block
}

fn bfc_bits(style: &Style) -> u32 {
  if style_creates_bfc(style) {
    flags::IS_BFC_ROOT
  } else {
    0
  }
}

fn block_node(style: Arc<Style>, bits: u32, kind: BlockKind, ix: usize) -> LayoutNode {
  let mut data = BoxData::new(style, bits);
  data.tree_start = ix;
  data.tree_final = ix;
  LayoutNode::Block(BlockContainer { data, kind })
}

fn inline_node(style: Arc<Style>, bits: u32, ix: usize) -> LayoutNode {
  let mut data = BoxData::new(style, bits);
  data.tree_start = ix;
  data.tree_final = ix;
  LayoutNode::Inline(InlineBox {
    data,
    text_start: 0,
    text_end: 0,
    metrics: InlineMetrics::default(),
  })
}

fn set_tree_final(tree: &mut [LayoutNode], ix: usize, tree_final: usize) {
  if let Some(data) = tree[ix].data_mut() {
    data.tree_final = tree_final;
  }
}

/// Builds the paragraph of one block container of inlines in place.
/// Opens the container and its root inline, appends inline content, and
/// on `close` fixes the subtree ranges, stores the paragraph text and
/// collapses its whitespace.
struct IfcBuilder {
  ifc_ix: usize,
  inline_ix: usize,
  text: String,
}

impl IfcBuilder {
  fn open(
    tree: &mut Vec<LayoutNode>,
    container_style: Arc<Style>,
    container_bits: u32,
  ) -> Self {
    let ifc_ix = tree.len();
    tree.push(block_node(
      Arc::clone(&container_style),
      container_bits,
      BlockKind::Inlines(IfcState::default()),
      ifc_ix,
    ));
    let inline_ix = tree.len();
    let root_inline_style = Arc::new(Style::inherited_from(&container_style));
    tree.push(inline_node(
      root_inline_style,
      flags::IS_ANONYMOUS,
      inline_ix,
    ));
    Self {
      ifc_ix,
      inline_ix,
      text: String::new(),
    }
  }

  fn push_text(&mut self, tree: &mut Vec<LayoutNode>, style: Arc<Style>, text: &str) {
    let text_start = self.text.len();
    self.text.push_str(text);
    tree.push(LayoutNode::Run(TextRun {
      style,
      bits: 0,
      text_start,
      text_end: self.text.len(),
    }));
  }

  fn close(self, tree: &mut Vec<LayoutNode>) -> Result<()> {
    let last = tree.len() - 1;
    if let LayoutNode::Inline(inline) = &mut tree[self.inline_ix] {
      inline.text_start = 0;
      inline.text_end = self.text.len();
    }
    set_tree_final(tree, self.inline_ix, last);
    set_tree_final(tree, self.ifc_ix, last);
    if let LayoutNode::Block(b) = &mut tree[self.ifc_ix] {
      if let Some(ifc) = b.ifc_mut() {
        ifc.text = self.text;
      }
    }
    collapse_whitespace(tree, self.ifc_ix)
  }
}

/// Appends one inline-level child to the open paragraph.
fn push_inline_child(
  tree: &mut Vec<LayoutNode>,
  ifc: &mut IfcBuilder,
  child: &HostElement,
) {
  if child.tag.eq_ignore_ascii_case("br") {
    tree.push(LayoutNode::Break(HardBreak {
      style: Arc::clone(&child.style),
    }));
    return;
  }

  let ix = tree.len();
  tree.push(inline_node(Arc::clone(&child.style), 0, ix));
  let text_start = ifc.text.len();

  if child.style.display.inner == DisplayInner::FlowRoot {
    // Inline-block: a block container nested inside the inline wrapper.
    let inner_ix = tree.len();
    tree.push(block_node(
      Arc::clone(&child.style),
      flags::IS_INLINE_LEVEL | bfc_bits(&child.style),
      BlockKind::Blocks,
      inner_ix,
    ));
  } else if let Some(text) = &child.text {
    ifc.push_text(tree, Arc::clone(&child.style), text);
  }

  let last = tree.len() - 1;
  if let LayoutNode::Inline(inline) = &mut tree[ix] {
    inline.text_start = text_start;
    inline.text_end = ifc.text.len();
  }
  set_tree_final(tree, ix, last);
}

/// Appends one block-level child. A child with text becomes a block
/// container of inlines holding its own paragraph; otherwise a leaf
/// block container of blocks.
fn push_block_child(tree: &mut Vec<LayoutNode>, child: &HostElement) -> Result<()> {
  let bits = bfc_bits(&child.style);
  match &child.text {
    Some(text) => {
      let mut ifc = IfcBuilder::open(tree, Arc::clone(&child.style), bits);
      let run_style = Arc::new(Style::inherited_from(&child.style));
      ifc.push_text(tree, run_style, text);
      ifc.close(tree)
    }
    None => {
      let ix = tree.len();
      tree.push(block_node(
        Arc::clone(&child.style),
        bits,
        BlockKind::Blocks,
        ix,
      ));
      Ok(())
    }
  }
}

fn push_replaced_child(tree: &mut Vec<LayoutNode>, child: &HostElement) {
  let ix = tree.len();
  let mut data = BoxData::new(Arc::clone(&child.style), 0);
  data.tree_start = ix;
  data.tree_final = ix;
  tree.push(LayoutNode::Replaced(ReplacedBox {
    data,
    intrinsic: child.intrinsic_size,
  }));
}

/// Builds the flattened box tree for one parent element and its children.
///
/// The root is always a BFC root. Pure inline content makes the root a
/// block container of inlines; mixed content wraps consecutive inline
/// children in anonymous block containers between the block-level ones.
pub fn build_box_tree(
  parent: &HostElement,
  children: &[HostElement],
  available_width: f32,
  available_height: f32,
) -> Result<Layout> {
  let parent_style = Arc::clone(&parent.style);
  let root_bits = bfc_bits(&parent_style) | flags::IS_BFC_ROOT;

  let visible: Vec<&HostElement> = children
    .iter()
    .filter(|c| classify_child(c) != ChildClass::None)
    .collect();
  let has_blocks = visible
    .iter()
    .any(|c| matches!(classify_child(c), ChildClass::Block | ChildClass::Replaced));
  let has_inline_content =
    parent.text.is_some() || visible.iter().any(|c| classify_child(c) == ChildClass::Inline);

  let mut tree: Vec<LayoutNode> = Vec::new();

  if has_inline_content && !has_blocks {
    let mut ifc = IfcBuilder::open(&mut tree, Arc::clone(&parent_style), root_bits);
    if let Some(text) = &parent.text {
      let run_style = Arc::new(Style::inherited_from(&parent_style));
      ifc.push_text(&mut tree, run_style, text);
    }
    for child in &visible {
      match classify_child(child) {
        ChildClass::Inline => push_inline_child(&mut tree, &mut ifc, child),
        ChildClass::Replaced => push_replaced_child(&mut tree, child),
        ChildClass::Block | ChildClass::None => {}
      }
    }
    ifc.close(&mut tree)?;
  } else {
    tree.push(block_node(
      Arc::clone(&parent_style),
      root_bits,
      BlockKind::Blocks,
      0,
    ));
    let anon_style = Arc::new(Style::inherited_from(&parent_style));
    let mut anon: Option<IfcBuilder> = None;

    if let Some(text) = &parent.text {
      let mut ifc = IfcBuilder::open(&mut tree, Arc::clone(&anon_style), flags::IS_ANONYMOUS);
      let run_style = Arc::clone(&anon_style);
      ifc.push_text(&mut tree, run_style, text);
      anon = Some(ifc);
    }

    for child in &visible {
      match classify_child(child) {
        ChildClass::Inline => {
          if anon.is_none() {
            anon = Some(IfcBuilder::open(
              &mut tree,
              Arc::clone(&anon_style),
              flags::IS_ANONYMOUS,
            ));
          }
          if let Some(ifc) = &mut anon {
            push_inline_child(&mut tree, ifc, child);
          }
        }
        ChildClass::Block => {
          if let Some(ifc) = anon.take() {
            ifc.close(&mut tree)?;
          }
          push_block_child(&mut tree, child)?;
        }
        ChildClass::Replaced => {
          if let Some(ifc) = anon.take() {
            ifc.close(&mut tree)?;
          }
          push_replaced_child(&mut tree, child);
        }
        ChildClass::None => {}
      }
    }
    if let Some(ifc) = anon.take() {
      ifc.close(&mut tree)?;
    }
    let last = tree.len() - 1;
    set_tree_final(&mut tree, 0, last);
  }

  let icb = BoxArea::root(
    parent_style.writing_mode,
    parent_style.direction,
    available_width,
    available_height,
  );
  Ok(Layout::new(tree, icb))
}

fn run_layout(
  parent: &HostElement,
  children: &[HostElement],
  available_width: f32,
  available_height: f32,
  shaper: &mut dyn TextShaper,
) -> Result<Layout> {
  let mut layout = build_box_tree(parent, children, available_width, available_height)?;
  log::debug!(
    "prelayout: {} nodes, {} areas",
    layout.tree.len(),
    layout.areas.len()
  );
  prelayout(&mut layout, shaper)?;
  log::debug!("block layout: icb {available_width}x{available_height}");
  layout_block_level_box(&mut layout, 0, None)?;
  log::debug!("postlayout");
  postlayout(&mut layout)?;
  Ok(layout)
}

/// Boxes that correspond to child elements, in document order: the
/// depth-1 boxes under the root, looking through anonymous wrappers.
/// Inline boxes carry no geometry of their own, so an inline child
/// reports the nearest enclosing block container, which holds the
/// laid-out line geometry.
fn collect_child_boxes(layout: &Layout) -> Vec<usize> {
  let mut boxes = Vec::new();
  let root_final = layout.tree[0].tree_final(0);
  // Open block containers enclosing the walk position.
  let mut blocks: Vec<(usize, usize)> = vec![(0, root_final)];
  let mut i = 1;
  while i <= root_final {
    while blocks.last().map_or(false, |&(_, fin)| fin < i) {
      blocks.pop();
    }
    match &layout.tree[i] {
      LayoutNode::Run(_) | LayoutNode::Break(_) => i += 1,
      LayoutNode::Inline(inline) if layout.bits(i) & flags::IS_ANONYMOUS == 0 => {
        boxes.push(blocks.last().map_or(0, |&(b, _)| b));
        i = inline.data.tree_final + 1;
      }
      node => {
        if layout.bits(i) & flags::IS_ANONYMOUS != 0 {
          if matches!(node, LayoutNode::Block(_)) {
            blocks.push((i, node.tree_final(i)));
          }
          i += 1;
        } else {
          boxes.push(i);
          i = node.tree_final(i) + 1;
        }
      }
    }
  }
  boxes
}

fn extract_rects(layout: &Layout, children: &[HostElement]) -> Vec<ComputedRect> {
  let boxes = collect_child_boxes(layout);
  let paired: Vec<&HostElement> = children
    .iter()
    .filter(|c| classify_child(c) != ChildClass::None && !c.tag.eq_ignore_ascii_case("br"))
    .collect();

  paired
    .iter()
    .zip(boxes)
    .filter_map(|(child, ix)| {
      let data = layout.tree[ix].data()?;
      let area = layout.area(data.border_area_id());
      Some(ComputedRect {
        id: child.id.clone(),
        rect: area.rect(),
      })
    })
    .collect()
}

/// Lays out `children` within `parent` and returns the absolute snapped
/// border-box rectangle of each visible child, in document order. A
/// layout failure is logged and yields no rectangles, never partial
/// geometry.
pub fn compute_layout(
  parent: &HostElement,
  children: &[HostElement],
  available_width: f32,
  available_height: f32,
  shaper: &mut dyn TextShaper,
) -> Vec<ComputedRect> {
  if children.is_empty() && parent.text.is_none() {
    return Vec::new();
  }
  match run_layout(parent, children, available_width, available_height, shaper) {
    Ok(layout) => extract_rects(&layout, children),
    Err(err) => {
      log::error!(
        "layout failed for <{}> with {} children: {err}",
        parent.tag,
        children.len()
      );
      Vec::new()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::style::types::CssValueAuto;
  use crate::style::types::Display;
  use crate::text::MonospaceShaper;

  fn element(id: &str, tag: &str, style: Style) -> HostElement {
    HostElement {
      id: id.to_string(),
      tag: tag.to_string(),
      style: Arc::new(style),
      text: None,
      intrinsic_size: None,
    }
  }

  fn block_of(height: f32) -> Style {
    Style {
      display: Display::BLOCK,
      height: CssValueAuto::Px(height),
      ..Style::default()
    }
  }

  #[test]
  fn block_children_stack_vertically() {
    let parent = element("p", "div", Style::default());
    let children = vec![
      element("a", "div", block_of(10.0)),
      element("b", "div", block_of(20.0)),
    ];
    let mut shaper = MonospaceShaper::with_families(&["Helvetica"]);
    let rects = compute_layout(&parent, &children, 100.0, 200.0, &mut shaper);

    assert_eq!(rects.len(), 2);
    assert_eq!(rects[0], ComputedRect { id: "a".to_string(), rect: Rect::new(0.0, 0.0, 100.0, 10.0) });
    assert_eq!(rects[1], ComputedRect { id: "b".to_string(), rect: Rect::new(0.0, 10.0, 100.0, 20.0) });
  }

  #[test]
  fn display_none_children_are_skipped() {
    let parent = element("p", "div", Style::default());
    let children = vec![
      element("a", "div", Style { display: Display::NONE, ..Style::default() }),
      element("b", "div", block_of(5.0)),
    ];
    let mut shaper = MonospaceShaper::with_families(&["Helvetica"]);
    let rects = compute_layout(&parent, &children, 50.0, 50.0, &mut shaper);

    assert_eq!(rects.len(), 1);
    assert_eq!(rects[0].id, "b");
    assert_eq!(rects[0].rect.y, 0.0);
  }

  #[test]
  fn replaced_child_uses_intrinsic_size() {
    let parent = element("p", "div", Style::default());
    let mut img = element("i", "img", Style::default());
    img.intrinsic_size = Some(Size::new(40.0, 30.0));
    let mut shaper = MonospaceShaper::with_families(&["Helvetica"]);
    let rects = compute_layout(&parent, &[img], 100.0, 100.0, &mut shaper);

    assert_eq!(rects.len(), 1);
    assert_eq!(rects[0].rect, Rect::new(0.0, 0.0, 40.0, 30.0));
  }

  #[test]
  fn mixed_content_wraps_inlines_anonymously() {
    let parent = element("p", "div", Style::default());
    let mut span = element("s", "span", Style {
      display: Display::INLINE,
      ..Style::default()
    });
    span.text = Some("hello".to_string());
    let children = vec![element("a", "div", block_of(10.0)), span];
    let mut shaper = MonospaceShaper::with_families(&["Helvetica"]);
    let rects = compute_layout(&parent, &children, 100.0, 100.0, &mut shaper);

    assert_eq!(rects.len(), 2);
    assert_eq!(rects[0].id, "a");
    // The span reports its line's block container: below the 10px block,
    // full width, one 16px line tall.
    assert_eq!(rects[1].id, "s");
    assert_eq!(rects[1].rect, Rect::new(0.0, 10.0, 100.0, 16.0));
  }

  #[test]
  fn inline_child_reports_its_line_geometry() {
    let parent = element("p", "div", Style::default());
    let mut span = element("s", "span", Style {
      display: Display::INLINE,
      ..Style::default()
    });
    span.text = Some("hello".to_string());
    let mut shaper = MonospaceShaper::with_families(&["Helvetica"]);
    let rects = compute_layout(&parent, &[span], 100.0, 100.0, &mut shaper);

    // Inline boxes carry no area; the span surfaces the enclosing block
    // container's laid-out geometry, never a degenerate rect.
    assert_eq!(rects.len(), 1);
    assert_eq!(rects[0].rect, Rect::new(0.0, 0.0, 100.0, 16.0));
  }

  #[test]
  fn text_only_parent_lays_out_a_paragraph() {
    let mut parent = element("p", "div", Style::default());
    parent.text = Some("Hello World".to_string());
    let mut shaper = MonospaceShaper::with_families(&["Helvetica"]);
    let layout = run_layout(&parent, &[], 200.0, 100.0, &mut shaper).unwrap();

    // 11 chars at 8px fit one 16px line; auto height wraps it exactly.
    let content = layout.box_data(0).unwrap().content;
    assert_eq!(layout.area(content).height, 16.0);
  }

  #[test]
  fn bfc_detection_follows_style() {
    assert!(style_creates_bfc(&Style {
      display: Display::FLOW_ROOT,
      ..Style::default()
    }));
    assert!(style_creates_bfc(&Style {
      display: Display::INLINE_BLOCK,
      ..Style::default()
    }));
    assert!(style_creates_bfc(&Style {
      float: Float::Left,
      ..Style::default()
    }));
    assert!(style_creates_bfc(&Style {
      position: Position::Absolute,
      ..Style::default()
    }));
    assert!(!style_creates_bfc(&Style {
      display: Display::BLOCK,
      ..Style::default()
    }));
  }

  #[test]
  fn empty_input_yields_no_rects() {
    let parent = element("p", "div", Style::default());
    let mut shaper = MonospaceShaper::new();
    assert!(compute_layout(&parent, &[], 10.0, 10.0, &mut shaper).is_empty());
  }
}
