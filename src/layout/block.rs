//! Block formatting contexts
//!
//! Margin collapsing makes final block positions unknowable while margins
//! are still accumulating, so the BFC defers them: boxes entering and
//! leaving the flow push onto a stack, and `position_block_containers`
//! flushes the stack whenever something interrupts collapsing (padding,
//! a border, clearance, non-auto sizes). Between flushes the collapsed
//! margin lives in a [`CollapsedMargin`].
//!
//! A box whose margins collapse through it gets a hypothetical position
//! recorded at the time its end margin joins the collection; the flush
//! backs its position up by the difference between the final collapsed
//! margin and the hypothetical one.

use std::mem;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::LayoutError;
use crate::error::Result;
use crate::error::StructuralError;
use crate::layout::float::FloatBasis;
use crate::layout::float::FloatContext;
use crate::layout::inline::do_text_layout;
use crate::layout::inline::ifc_contribution;
use crate::layout::inline::linebox_height;
use crate::layout::inline::should_layout_content;
use crate::layout::inline::ContributionMode;
use crate::style::types::Clear;
use crate::style::types::Direction;
use crate::style::types::Float;
use crate::style::Style;
use crate::tree::box_tree::flags;
use crate::tree::box_tree::BlockKind;
use crate::tree::box_tree::BoxArea;
use crate::tree::box_tree::Layout;
use crate::tree::box_tree::LayoutNode;
use crate::tree::box_tree::Linebox;

fn used(value: Option<f32>, property: &'static str) -> Result<f32> {
  value.ok_or_else(|| LayoutError::UnresolvedUsedValue { property }.into())
}

/// Margins adjoining at one point collapse to the largest positive plus
/// the most negative, not the sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollapsedMargin {
  positive: f32,
  negative: f32,
}

impl CollapsedMargin {
  pub fn new(initial: f32) -> Self {
    let mut margin = Self::default();
    margin.add(initial);
    margin
  }

  pub fn add(&mut self, margin: f32) {
    if margin < 0.0 {
      self.negative = self.negative.max(-margin);
    } else {
      self.positive = self.positive.max(margin);
    }
  }

  /// A copy with one more margin joined in.
  pub fn adjoin(mut self, margin: f32) -> Self {
    self.add(margin);
    self
  }

  pub fn get(&self) -> f32 {
    self.positive - self.negative
  }
}

/// The margin collection currently accumulating, tied to the nesting
/// level it opened at.
#[derive(Debug)]
struct MarginState {
  level: usize,
  collection: CollapsedMargin,
  /// Level at which clearance interrupted collapsing, if any. A box
  /// ending at or below this level cannot collapse through.
  clearance_at_level: Option<usize>,
}

impl MarginState {
  fn at_level(level: usize) -> Self {
    Self {
      level,
      collection: CollapsedMargin::default(),
      clearance_at_level: None,
    }
  }
}

/// In-flow boxes seen since the last flush, in traversal order.
#[derive(Debug, Clone, Copy)]
enum StackEntry {
  /// Box `ix` opened.
  Pre(usize),
  /// Box `ix` closed.
  Post(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
  Start,
  End,
}

/// One block formatting context.
///
/// `cb_block_start`/`cb_line_left`/`cb_line_right` track the offsets of
/// the current containing block's content box within this BFC's root
/// content box; floats are positioned in those coordinates.
#[derive(Debug)]
pub struct Bfc {
  /// Inline size of the root's content box.
  pub inline_size: f32,
  pub fctx: Option<FloatContext>,
  stack: Vec<StackEntry>,
  pub cb_block_start: f32,
  pub cb_line_left: f32,
  pub cb_line_right: f32,
  /// Accumulated in-flow size per open nesting level.
  size_stack: Vec<f32>,
  /// `cb_block_start` snapshot per open nesting level.
  offset_stack: Vec<f32>,
  last: Option<Last>,
  level: usize,
  /// Positions boxes would take if their margins did not collapse
  /// through, keyed by tree index.
  hypotheticals: FxHashMap<usize, f32>,
  margin: MarginState,
}

impl Bfc {
  pub fn new(inline_size: f32) -> Self {
    Self {
      inline_size,
      fctx: None,
      stack: Vec::new(),
      cb_block_start: 0.0,
      cb_line_left: 0.0,
      cb_line_right: 0.0,
      size_stack: vec![0.0],
      offset_stack: vec![0.0],
      last: None,
      level: 0,
      hypotheticals: FxHashMap::default(),
      margin: MarginState::at_level(0),
    }
  }

  /// Containing-block offsets captured for float placement calls.
  pub fn basis(&self) -> FloatBasis {
    FloatBasis {
      inline_size: self.inline_size,
      cb_block_start: self.cb_block_start,
      cb_line_left: self.cb_line_left,
      cb_line_right: self.cb_line_right,
    }
  }

  /// Joins a box's start margin into the collection, or interrupts
  /// collapsing with clearance when the box clears past a float.
  fn collapse_start(&mut self, layout: &mut Layout, ix: usize) -> Result<()> {
    let style = Arc::clone(layout.style(ix));
    let cb = *layout.containing_block(ix)?;
    let margin_block_start = used(style.margin_block_start(&cb), "margin-block-start")?;
    let mut float_bottom = 0.0f32;
    let mut clearance = 0.0f32;

    if let Some(fctx) = &self.fctx {
      if matches!(style.clear, Clear::Left | Clear::Both) {
        float_bottom = float_bottom.max(fctx.left_bottom());
      }
      if matches!(style.clear, Clear::Right | Clear::Both) {
        float_bottom = float_bottom.max(fctx.right_bottom());
      }
    }

    if style.clear != Clear::None {
      let hypothetical = self.margin.collection.adjoin(margin_block_start).get();
      clearance = clearance.max(float_bottom - (self.cb_block_start + hypothetical));
    }

    if clearance == 0.0 {
      self.margin.collection.add(margin_block_start);
    } else {
      self.position_block_containers(layout)?;
      self.margin = MarginState {
        level: self.level,
        collection: CollapsedMargin::new(float_bottom - self.cb_block_start),
        clearance_at_level: can_collapse_through(layout, ix)?.then_some(self.level),
      };
    }
    Ok(())
  }

  /// Enters a block container. For a block container of inlines this is
  /// also where its text lays out, with the flow position known; the
  /// text layout of a BFC root uses the context it establishes.
  pub fn box_start(
    &mut self,
    layout: &mut Layout,
    ix: usize,
    established: Option<&mut Bfc>,
  ) -> Result<()> {
    let style = Arc::clone(layout.style(ix));
    let cb = *layout.containing_block(ix)?;
    let (block_start, line_left, line_right) = containing_block_to_content(layout, ix, &cb)?;
    let adjoins_next =
      style.padding_block_start(&cb) == 0.0 && style.border_block_start_width(&cb) == 0.0;

    self.collapse_start(layout, ix)?;

    self.last = Some(Last::Start);
    self.level += 1;
    self.cb_line_left += line_left;
    self.cb_line_right += line_right;
    self.stack.push(StackEntry::Pre(ix));

    let is_ifc = matches!(&layout.tree[ix], LayoutNode::Block(b) if b.ifc().is_some());
    if is_ifc {
      let advance = block_start + self.margin.collection.get();
      self.cb_block_start += advance;
      if let Some(fctx) = &mut self.fctx {
        fctx.box_start(self.cb_block_start);
      }
      match established {
        Some(eb) => text_layout_in(eb, layout, ix)?,
        None => text_layout_in(self, layout, ix)?,
      }
      self.cb_block_start -= advance;
    } else if let Some(fctx) = &mut self.fctx {
      fctx.box_start(self.cb_block_start);
    }

    if !adjoins_next {
      self.position_block_containers(layout)?;
      self.margin = MarginState::at_level(self.level);
    }
    Ok(())
  }

  /// Leaves a block container, deciding whether its end margin adjoins
  /// the margins collected inside it.
  pub fn box_end(&mut self, layout: &mut Layout, ix: usize) -> Result<()> {
    let style = Arc::clone(layout.style(ix));
    let cb = *layout.containing_block(ix)?;
    let (_, line_left, line_right) = containing_block_to_content(layout, ix, &cb)?;
    let margin_block_end = used(style.margin_block_end(&cb), "margin-block-end")?;
    let mut adjoins = style.padding_block_end(&cb) == 0.0
      && style.border_block_end_width(&cb) == 0.0
      && self.margin.clearance_at_level.map_or(true, |l| self.level > l);

    if adjoins {
      adjoins = if self.last == Some(Last::Start) {
        can_collapse_through(layout, ix)?
      } else {
        style.block_size(&cb).is_none()
      };
    }

    self.stack.push(StackEntry::Post(ix));
    self.level -= 1;
    self.cb_line_left -= line_left;
    self.cb_line_right -= line_right;

    if !adjoins {
      self.position_block_containers(layout)?;
      self.margin = MarginState::at_level(self.level);
    }

    if self.last == Some(Last::Start) {
      self.hypotheticals.insert(ix, self.margin.collection.get());
    }

    self.margin.collection.add(margin_block_end);
    if self.level < self.margin.level {
      self.margin.level = self.level;
    }
    self.last = Some(Last::End);
    Ok(())
  }

  /// Lays a replaced box into the flow. Atomic boxes interrupt margin
  /// collapsing on both sides.
  pub fn box_atomic(&mut self, layout: &mut Layout, ix: usize) -> Result<()> {
    let cb = *layout.containing_block(ix)?;
    let margin_block_end = used(layout.style(ix).margin_block_end(&cb), "margin-block-end")?;
    self.collapse_start(layout, ix)?;
    if let Some(fctx) = &mut self.fctx {
      fctx.box_start(self.cb_block_start);
    }
    self.position_block_containers(layout)?;
    layout.set_block_position(ix, self.cb_block_start)?;
    self.margin.collection = CollapsedMargin::new(margin_block_end);
    self.last = Some(Last::End);
    Ok(())
  }

  /// Places a float at the current flow position. Commits pending
  /// positions first so the shelf starts at the float's hypothetical
  /// block offset.
  pub fn layout_float(&mut self, layout: &mut Layout, ix: usize) -> Result<()> {
    self.position_block_containers(layout)?;
    self.margin = MarginState::at_level(self.level);
    let offset = self.cb_block_start;
    let basis = self.basis();
    let fctx = self.ensure_float_context(offset);
    fctx.drop_shelf(offset);
    fctx.place_float(layout, 0.0, true, ix, basis)
  }

  pub fn ensure_float_context(&mut self, block_offset: f32) -> &mut FloatContext {
    self.fctx.get_or_insert_with(|| FloatContext::new(block_offset))
  }

  /// Commits the positions of every stacked box, resolving auto block
  /// sizes of closed containers from their accumulated content.
  pub fn position_block_containers(&mut self, layout: &mut Layout) -> Result<()> {
    let margin = self.margin.collection.get();
    let mut passed_margin_level = self.margin.level == self.offset_stack.len() - 1;
    let mut level_needs_post_offset = self.offset_stack.len() - 1;

    self.size_stack[self.margin.level] += margin;
    self.cb_block_start += margin;

    let stack = mem::take(&mut self.stack);
    for entry in stack {
      match entry {
        StackEntry::Post(ix) => {
          let (child_size, offset) = match (self.size_stack.pop(), self.offset_stack.pop()) {
            (Some(size), Some(offset)) if !self.size_stack.is_empty() => (size, offset),
            _ => {
              return Err(
                StructuralError::MalformedTree {
                  message: "unbalanced block container stack".to_string(),
                }
                .into(),
              )
            }
          };
          let level = self.size_stack.len() - 1;
          let cb = *layout.containing_block(ix)?;
          let style = Arc::clone(layout.style(ix));
          let is_bcb =
            matches!(&layout.tree[ix], LayoutNode::Block(b) if b.ifc().is_none());
          if style.block_size(&cb).is_none()
            && is_bcb
            && layout.bits(ix) & flags::IS_BFC_ROOT == 0
          {
            layout.set_block_size(ix, child_size)?;
          }
          let block_size = layout.area(layout.box_data(ix)?.border_area_id()).block_size;

          self.size_stack[level] += block_size;
          self.cb_block_start = offset + block_size;

          if level < level_needs_post_offset {
            level_needs_post_offset -= 1;
            self.cb_block_start += margin;
          }
        }
        StackEntry::Pre(ix) => {
          let hypothetical = self.hypotheticals.get(&ix).copied();
          let level = self.size_stack.len() - 1;
          let mut block_offset = self.size_stack[level];

          if !passed_margin_level {
            passed_margin_level = self.margin.level == level;
          }
          if !passed_margin_level {
            block_offset += margin;
          }
          if let Some(hypothetical) = hypothetical {
            block_offset -= margin - hypothetical;
          }

          layout.set_block_position(ix, block_offset)?;
          self.size_stack.push(0.0);
          self.offset_stack.push(self.cb_block_start);
        }
      }
    }
    Ok(())
  }

  /// Closes out the BFC at its root: commits pending positions and
  /// resolves the root's auto block size from its in-flow content,
  /// lineboxes and float bottoms.
  pub fn finalize(&mut self, layout: &mut Layout, ix: usize) -> Result<()> {
    if layout.bits(ix) & flags::IS_BFC_ROOT == 0 {
      return Err(
        StructuralError::MalformedTree {
          message: format!("finalize called on box {ix}, which is not a BFC root"),
        }
        .into(),
      );
    }
    let style = Arc::clone(layout.style(ix));
    let cb = *layout.containing_block(ix)?;

    self.position_block_containers(layout)?;

    if style.block_size(&cb).is_none() {
      let line_height = linebox_height(layout, ix);
      let float_bottom = self.fctx.as_ref().map_or(0.0, FloatContext::both_bottom);
      layout.set_block_size(ix, line_height.max(self.cb_block_start).max(float_bottom))?;
    }
    Ok(())
  }
}

/// Text layout within the given BFC: lines place themselves beside its
/// floats, and queued floats resolve as lines pass them.
fn text_layout_in(bfc: &mut Bfc, layout: &mut Layout, ix: usize) -> Result<()> {
  let basis = bfc.basis();
  if let Some(fctx) = &mut bfc.fctx {
    fctx.pre_text_content(layout, basis)?;
  }
  do_text_layout(layout, ix, bfc.fctx.as_ref().map(|fctx| (fctx, basis)))?;
  if bfc.fctx.is_some() {
    let lines: Vec<Linebox> = match &layout.tree[ix] {
      LayoutNode::Block(b) => b.ifc().map(|ifc| ifc.lineboxes.clone()).unwrap_or_default(),
      _ => Vec::new(),
    };
    if let Some(fctx) = &mut bfc.fctx {
      for (i, line) in lines.iter().enumerate() {
        fctx.post_line(layout, line, i + 1 < lines.len(), basis)?;
      }
    }
  }
  Ok(())
}

/// Whether margins collapse straight through this box: it must have no
/// block size of its own and no content that interrupts the flow.
pub fn can_collapse_through(layout: &Layout, ix: usize) -> Result<bool> {
  let cb = *layout.containing_block(ix)?;
  if let Some(size) = layout.style(ix).block_size(&cb) {
    if size != 0.0 {
      return Ok(false);
    }
  }

  match &layout.tree[ix] {
    LayoutNode::Block(b) => match &b.kind {
      BlockKind::Inlines(_) => match layout.tree.get(b.data.tree_start + 1) {
        Some(LayoutNode::Inline(inline)) => Ok(inline.data.bits & flags::HAS_TEXT == 0),
        _ => Err(
          StructuralError::MalformedTree {
            message: format!("block container of inlines at {ix} has no root inline"),
          }
          .into(),
        ),
      },
      BlockKind::Blocks => Ok(b.data.tree_final == b.data.tree_start),
    },
    _ => Ok(false),
  }
}

/// Inline size of the containing block as seen by a child, transposed
/// when the child's writing mode is orthogonal to the block's.
fn cb_inline_size(cb: &BoxArea, style: &Style) -> f32 {
  if cb.writing_mode.is_horizontal() != style.writing_mode.is_horizontal() {
    if cb.block_size_definite {
      cb.block_size
    } else {
      0.0
    }
  } else {
    cb.inline_size
  }
}

/// Offsets from the containing block's content origin to this box's
/// content origin (block-start relative to the box's own border edge,
/// which is positioned later).
fn containing_block_to_content(
  layout: &Layout,
  ix: usize,
  cb: &BoxArea,
) -> Result<(f32, f32, f32)> {
  let style = layout.style(ix);
  let inline_size = cb_inline_size(cb, style);
  let data = layout.box_data(ix)?;
  let border_area = layout.area(data.border_area_id());
  let content_area = layout.area(data.content);
  let block_start = style.border_block_start_width(cb) + style.padding_block_start(cb);
  let line_left =
    border_area.line_left + style.border_line_left_width(cb) + style.padding_line_left(cb);
  let line_right = inline_size - line_left - content_area.inline_size;
  Ok((block_start, line_left, line_right))
}

/// The specified inner inline size, if any; replaced boxes derive one
/// from their intrinsic dimensions.
fn definite_inner_inline_size(layout: &Layout, ix: usize, cb: &BoxArea) -> Option<f32> {
  let style = layout.style(ix);
  match &layout.tree[ix] {
    LayoutNode::Replaced(replaced) => Some(replaced.definite_inline_size(cb)),
    _ => style
      .inline_size(cb)
      .map(|size| style.clamp_inline_size(cb, size)),
  }
}

/// The specified inner block size, if any.
fn definite_inner_block_size(layout: &Layout, ix: usize, cb: &BoxArea) -> Option<f32> {
  let style = layout.style(ix);
  match &layout.tree[ix] {
    LayoutNode::Replaced(replaced) => Some(replaced.definite_block_size(cb)),
    _ => style
      .block_size(cb)
      .map(|size| style.clamp_block_size(cb, size)),
  }
}

/// Resolves the inline position and outer inline size of a block-level
/// box: auto margins absorb the free space (both auto centers; with a
/// definite size and no auto margin the end-side margin takes the
/// remainder, or the start side in rtl).
fn do_inline_box_model_for_block_box(layout: &mut Layout, ix: usize) -> Result<()> {
  let style = Arc::clone(layout.style(ix));
  let cb = *layout.containing_block(ix)?;
  let c_inline_size = cb_inline_size(&cb, &style);
  let inline_size = definite_inner_inline_size(layout, ix, &cb);
  let mut margin_line_left = style.margin_line_left(&cb);
  let mut margin_line_right = style.margin_line_right(&cb);

  if let Some(inline_size) = inline_size {
    let specified = inline_size
      + style.border_line_left_width(&cb)
      + style.padding_line_left(&cb)
      + style.padding_line_right(&cb)
      + style.border_line_right_width(&cb)
      + margin_line_left.unwrap_or(0.0)
      + margin_line_right.unwrap_or(0.0);

    // Over-constrained: auto margins become zero before resolution.
    if specified > c_inline_size {
      margin_line_left = Some(margin_line_left.unwrap_or(0.0));
      margin_line_right = Some(margin_line_right.unwrap_or(0.0));
    }

    match (margin_line_left, margin_line_right) {
      (Some(_), Some(right)) => {
        if cb.direction == Direction::Ltr {
          margin_line_right = Some(c_inline_size - (specified - right));
        } else {
          margin_line_left = Some(c_inline_size - (specified - right));
        }
      }
      (None, Some(_)) => margin_line_left = Some(c_inline_size - specified),
      (Some(_), None) => margin_line_right = Some(c_inline_size - specified),
      (None, None) => {
        let margin = (c_inline_size - specified) / 2.0;
        margin_line_left = Some(margin);
        margin_line_right = Some(margin);
      }
    }
  } else {
    margin_line_left = Some(margin_line_left.unwrap_or(0.0));
    margin_line_right = Some(margin_line_right.unwrap_or(0.0));
  }

  let margin_line_left = used(margin_line_left, "margin-line-left")?;
  let margin_line_right = used(margin_line_right, "margin-line-right")?;

  layout.set_inline_position(ix, margin_line_left)?;
  layout.set_inline_outer_size(ix, c_inline_size - margin_line_left - margin_line_right)
}

/// Sets a block container's specified block size; an auto size that can
/// collapse through resolves to zero now, anything else waits for the
/// position flush.
fn do_block_box_model_for_block_box(layout: &mut Layout, ix: usize) -> Result<()> {
  let style = Arc::clone(layout.style(ix));
  let cb = *layout.containing_block(ix)?;
  match style.block_size(&cb) {
    None => {
      if can_collapse_through(layout, ix)? {
        layout.set_block_size(ix, 0.0)?;
      }
    }
    Some(size) => layout.set_block_size(ix, style.clamp_block_size(&cb, size))?,
  }
  Ok(())
}

fn layout_block_box_inner(
  layout: &mut Layout,
  ix: usize,
  mut containing: Option<&mut Bfc>,
) -> Result<()> {
  let mut established = if layout.bits(ix) & flags::IS_BFC_ROOT != 0 {
    let inline_size = layout.area(layout.box_data(ix)?.content).inline_size;
    Some(Bfc::new(inline_size))
  } else {
    None
  };

  if let Some(bfc) = containing.as_deref_mut() {
    bfc.box_start(layout, ix, established.as_mut())?;
  }

  let (tree_start, tree_final, is_ifc) = {
    let LayoutNode::Block(b) = &layout.tree[ix] else {
      return Err(
        StructuralError::MalformedTree {
          message: format!("node {ix} is not a block container"),
        }
        .into(),
      );
    };
    (b.data.tree_start, b.data.tree_final, b.ifc().is_some())
  };

  if is_ifc {
    // With a containing BFC, text layout already ran in its box_start
    // at the committed flow position.
    if containing.is_none() {
      match established.as_mut() {
        Some(eb) => text_layout_in(eb, layout, ix)?,
        None => do_text_layout(layout, ix, None)?,
      }
    }
  } else {
    let mut i = tree_start + 1;
    while i <= tree_final {
      let child_final = layout.tree[i].tree_final(i);
      let bfc = match established.as_mut() {
        Some(eb) => Some(eb),
        None => containing.as_deref_mut(),
      };
      layout_block_level_box(layout, i, bfc)?;
      i = child_final + 1;
    }
  }

  if let Some(eb) = established.as_mut() {
    eb.finalize(layout, ix)?;
  }

  if let Some(bfc) = containing.as_deref_mut() {
    bfc.box_end(layout, ix)?;
  }
  Ok(())
}

fn layout_block_box(layout: &mut Layout, ix: usize, containing: Option<&mut Bfc>) -> Result<()> {
  layout.fill_areas(ix)?;
  do_inline_box_model_for_block_box(layout, ix)?;
  do_block_box_model_for_block_box(layout, ix)?;
  layout_block_box_inner(layout, ix, containing)
}

fn layout_replaced_box(layout: &mut Layout, ix: usize, containing: Option<&mut Bfc>) -> Result<()> {
  layout.fill_areas(ix)?;
  do_inline_box_model_for_block_box(layout, ix)?;
  let cb = *layout.containing_block(ix)?;
  let block_size = definite_inner_block_size(layout, ix, &cb).unwrap_or(0.0);
  layout.set_block_size(ix, block_size)?;
  let Some(bfc) = containing else {
    return Err(LayoutError::MissingFormattingContext.into());
  };
  bfc.box_atomic(layout, ix)
}

/// Lays out one block-level box within an optional containing BFC.
/// Floats size themselves out of flow and then take a position from the
/// containing BFC's float context.
pub fn layout_block_level_box(
  layout: &mut Layout,
  ix: usize,
  mut bfc: Option<&mut Bfc>,
) -> Result<()> {
  if layout.style(ix).float != Float::None {
    layout_float_box(layout, ix)?;
    if let Some(bfc) = bfc.as_deref_mut() {
      bfc.layout_float(layout, ix)?;
    }
    return Ok(());
  }
  match &layout.tree[ix] {
    LayoutNode::Block(_) => layout_block_box(layout, ix, bfc),
    LayoutNode::Replaced(_) => layout_replaced_box(layout, ix, bfc),
    _ => Err(
      StructuralError::MalformedTree {
        message: format!("node {ix} is not block-level"),
      }
      .into(),
    ),
  }
}

/// Intrinsic inline contribution of a block-level box: its margins,
/// borders and paddings plus its specified inline size, or the largest
/// contribution of its content when auto.
pub fn layout_contribution(layout: &Layout, ix: usize, mode: ContributionMode) -> Result<f32> {
  let style = layout.style(ix);
  let cb = *layout.containing_block(ix)?;
  let contribution = style.margin_line_left(&cb).unwrap_or(0.0)
    + style.border_line_left_width(&cb)
    + style.padding_line_left(&cb)
    + style.padding_line_right(&cb)
    + style.border_line_right_width(&cb)
    + style.margin_line_right(&cb).unwrap_or(0.0);

  let inline_size = match style.inline_size(&cb) {
    Some(size) => size,
    None => match &layout.tree[ix] {
      LayoutNode::Replaced(replaced) => replaced.intrinsic_inline_size(),
      LayoutNode::Block(b) => match &b.kind {
        BlockKind::Blocks => {
          let mut size = 0.0f32;
          let mut i = b.data.tree_start + 1;
          while i <= b.data.tree_final {
            let child_final = layout.tree[i].tree_final(i);
            size = size.max(layout_contribution(layout, i, mode)?);
            i = child_final + 1;
          }
          size
        }
        BlockKind::Inlines(_) => {
          if should_layout_content(layout, ix) {
            ifc_contribution(layout, ix, mode)
          } else {
            0.0
          }
        }
      },
      _ => 0.0,
    },
  };

  Ok(contribution + inline_size)
}

/// Sizes a float: a definite outer inline size if specified, otherwise
/// shrink-to-fit between its min- and max-content contributions.
pub fn layout_float_box(layout: &mut Layout, ix: usize) -> Result<()> {
  layout.fill_areas(ix)?;
  let style = Arc::clone(layout.style(ix));
  let cb = *layout.containing_block(ix)?;

  let inline_size = match definite_inner_inline_size(layout, ix, &cb) {
    Some(size) => {
      size
        + style.border_line_left_width(&cb)
        + style.padding_line_left(&cb)
        + style.padding_line_right(&cb)
        + style.border_line_right_width(&cb)
    }
    None => {
      let min_content = layout_contribution(layout, ix, ContributionMode::MinContent)?;
      let max_content = layout_contribution(layout, ix, ContributionMode::MaxContent)?;
      let available = cb.inline_size;
      let mut size = min_content.max(max_content.min(available));
      if let Some(margin) = style.margin_line_left(&cb) {
        size -= margin;
      }
      if let Some(margin) = style.margin_line_right(&cb) {
        size -= margin;
      }
      size
    }
  };

  layout.set_inline_outer_size(ix, inline_size)?;
  if let Some(block_size) = definite_inner_block_size(layout, ix, &cb) {
    layout.set_block_size(ix, block_size)?;
  }
  if layout.tree[ix].is_block_container() {
    layout_block_box_inner(layout, ix, None)?;
  }
  Ok(())
}
