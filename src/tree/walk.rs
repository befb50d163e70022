//! Prelayout and postlayout walks over the flattened tree
//!
//! Prelayout runs once before flow layout: it parents every box's area
//! chain into its containing block, computes inline font metrics,
//! classifies run text into bit flags and propagates those flags up
//! through the enclosing inlines, and shapes each paragraph as its IFC
//! closes. Postlayout runs once after flow layout: it converts the
//! flow-relative area chains to absolute physical coordinates, applies
//! relative-positioning shifts, and snaps every rectangle to whole
//! pixels.
//!
//! Both walks are single passes over the pre-order `Vec`. A stack of
//! open parents tracks nesting; a parent closes when the walk index
//! reaches its `tree_final`.

use std::sync::Arc;

use crate::error::Result;
use crate::error::StructuralError;
use crate::layout::inline::compute_inline_metrics;
use crate::layout::inline::create_ifc_shaped_items;
use crate::layout::inline::run_bits;
use crate::layout::inline::should_layout_content;
use crate::style::types::Float;
use crate::style::types::Position;
use crate::text::TextShaper;
use crate::tree::box_tree::flags;
use crate::tree::box_tree::AreaId;
use crate::tree::box_tree::Layout;
use crate::tree::box_tree::LayoutNode;

/// Links containing blocks, computes inline metrics, propagates content
/// bits upward and shapes each paragraph.
pub fn prelayout(layout: &mut Layout, shaper: &mut dyn TextShaper) -> Result<()> {
  let mut parents: Vec<usize> = Vec::new();
  let mut ifcs: Vec<usize> = Vec::new();
  // Containing-block areas: block containers for in-flow boxes, the
  // padding areas of positioned boxes for absolutes. Area 0 is the ICB.
  let mut bstack: Vec<AreaId> = vec![AreaId(0)];
  let mut pstack: Vec<AreaId> = vec![AreaId(0)];

  for i in 0..layout.tree.len() {
    if layout.tree[i].data().is_some() {
      let absolute = layout.style(i).position == Position::Absolute;
      let cb = if absolute {
        pstack.last().copied().unwrap_or(AreaId(0))
      } else {
        bstack.last().copied().unwrap_or(AreaId(0))
      };
      let border = layout.box_data(i)?.border_area_id();
      layout.area_mut(border).parent = Some(cb);
      if let Some(data) = layout.tree[i].data_mut() {
        data.containing_block = Some(cb);
      }
    }

    match &layout.tree[i] {
      LayoutNode::Block(b) => {
        if b.ifc().is_some() {
          ifcs.push(i);
        }
        bstack.push(b.data.content);
        if b.data.style.position != Position::Static {
          pstack.push(b.data.padding_area_id());
        }
        parents.push(i);
      }
      LayoutNode::Inline(_) => {
        let style = Arc::clone(layout.style(i));
        let metrics = compute_inline_metrics(shaper, &style)?;
        if let LayoutNode::Inline(inline) = &mut layout.tree[i] {
          inline.metrics = metrics;
        }
        parents.push(i);
      }
      LayoutNode::Run(run) => {
        let style = Arc::clone(&run.style);
        let (start, end) = (run.text_start, run.text_end);
        let ifc_ix = *ifcs.last().ok_or_else(|| StructuralError::MalformedTree {
          message: format!("run at {i} outside any inline formatting context"),
        })?;
        let bits = match &layout.tree[ifc_ix] {
          LayoutNode::Block(b) => match b.ifc() {
            Some(ifc) => run_bits(&style, &ifc.text[start..end]),
            None => 0,
          },
          _ => 0,
        };
        if let LayoutNode::Run(run) = &mut layout.tree[i] {
          run.bits = bits;
        }
        let parent = open_parent(&parents, i)?;
        if let Some(data) = layout.tree[parent].data_mut() {
          data.bits |= bits;
        }
      }
      LayoutNode::Break(_) => {
        let parent = open_parent(&parents, i)?;
        if let Some(data) = layout.tree[parent].data_mut() {
          data.bits |= flags::HAS_BREAK_INLINE_OR_REPLACED;
        }
      }
      LayoutNode::Replaced(_) => {
        let parent = open_parent(&parents, i)?;
        propagate_box(layout, i, parent)?;
      }
    }

    while let Some(&top) = parents.last() {
      if layout.tree[top].tree_final(top) != i {
        break;
      }
      parents.pop();

      if let LayoutNode::Block(b) = &layout.tree[top] {
        let is_ifc = b.ifc().is_some();
        bstack.pop();
        if b.data.style.position != Position::Static {
          pstack.pop();
        }
        if is_ifc {
          ifcs.pop();
          if should_layout_content(layout, top) {
            create_ifc_shaped_items(layout, top, shaper)?;
          }
        }
      }

      if let Some(&parent) = parents.last() {
        propagate_box(layout, top, parent)?;
      }
    }
  }
  Ok(())
}

fn open_parent(parents: &[usize], i: usize) -> Result<usize> {
  parents.last().copied().ok_or_else(|| {
    StructuralError::MalformedTree {
      message: format!("inline content at {i} has no parent box"),
    }
    .into()
  })
}

/// Carries a closed box's bits into its parent. Paint bits accumulate on
/// every ancestor; text layout bits only cross inline-to-inline edges,
/// where the whole propagating range is forwarded.
fn propagate_box(layout: &mut Layout, child: usize, parent: usize) -> Result<()> {
  let style = Arc::clone(layout.style(child));
  let child_bits = layout.bits(child);
  let has_background = style.has_paint();
  let layer_root = style.float != Float::None || style.position != Position::Static;
  let mut add = 0u32;

  if !layer_root {
    if has_background || child_bits & flags::HAS_BACKGROUND_IN_LAYER != 0 {
      add |= flags::HAS_BACKGROUND_IN_LAYER;
    }
    if child_bits & flags::HAS_FOREGROUND_IN_LAYER != 0 {
      add |= flags::HAS_FOREGROUND_IN_LAYER;
    }
  }
  if has_background || child_bits & flags::HAS_BACKGROUND_IN_DESCENDANT != 0 {
    add |= flags::HAS_BACKGROUND_IN_DESCENDANT;
  }
  if child_bits & flags::HAS_FOREGROUND_IN_DESCENDANT != 0 {
    add |= flags::HAS_FOREGROUND_IN_DESCENDANT;
  }

  match &layout.tree[child] {
    LayoutNode::Block(_) => {
      if child_bits & flags::IS_INLINE_LEVEL != 0 {
        add |= flags::HAS_INLINE_BLOCKS;
      }
      if style.float != Float::None {
        add |= flags::HAS_FLOAT_OR_REPLACED;
      }
    }
    LayoutNode::Replaced(_) => {
      add |= flags::HAS_BREAK_INLINE_OR_REPLACED | flags::HAS_FLOAT_OR_REPLACED;
    }
    LayoutNode::Inline(_) => {
      if matches!(&layout.tree[parent], LayoutNode::Inline(_)) {
        add |= flags::HAS_BREAK_INLINE_OR_REPLACED;
        if has_background {
          add |= flags::HAS_PAINTED_INLINES;
        }
        let cb = *layout.containing_block(child)?;
        if layout.bits(parent) & flags::HAS_SIZED_INLINE == 0
          && (style.has_line_left_gap(&cb) || style.has_line_right_gap(&cb))
        {
          add |= flags::HAS_SIZED_INLINE;
        }
        add |= child_bits & flags::PROPAGATES_TO_INLINE_BITS;
      }
    }
    LayoutNode::Run(_) | LayoutNode::Break(_) => {}
  }

  if let Some(data) = layout.tree[parent].data_mut() {
    data.bits |= add;
  }
  Ok(())
}

/// Converts every area chain to absolute physical coordinates, then
/// snaps each box to whole pixels once its subtree is done. Children
/// absolutify against unsnapped parent coordinates so rounding does not
/// compound down the tree.
pub fn postlayout(layout: &mut Layout) -> Result<()> {
  let mut parents: Vec<usize> = Vec::new();

  for i in 0..layout.tree.len() {
    if layout.tree[i].data().is_some() {
      absolutify_box(layout, i)?;
    }
    match &layout.tree[i] {
      LayoutNode::Block(_) | LayoutNode::Inline(_) => parents.push(i),
      LayoutNode::Replaced(_) => snap_box(layout, i)?,
      LayoutNode::Run(_) | LayoutNode::Break(_) => {}
    }

    while let Some(&top) = parents.last() {
      if layout.tree[top].tree_final(top) != i {
        break;
      }
      parents.pop();
      snap_box(layout, top)?;
    }
  }
  Ok(())
}

/// The box's distinct areas, outermost first.
fn area_chain(layout: &Layout, ix: usize) -> Result<Vec<AreaId>> {
  let data = layout.box_data(ix)?;
  let mut chain = Vec::with_capacity(3);
  if let Some(border) = data.border {
    chain.push(border);
  }
  if let Some(padding) = data.padding {
    chain.push(padding);
  }
  chain.push(data.content);
  Ok(chain)
}

fn absolutify_box(layout: &mut Layout, ix: usize) -> Result<()> {
  let style = Arc::clone(layout.style(ix));
  let chain = area_chain(layout, ix)?;
  for (n, &id) in chain.iter().enumerate() {
    let parent_id = layout
      .area(id)
      .parent
      .ok_or(StructuralError::UnlinkedArea(ix))?;
    let parent = *layout.area(parent_id);
    let area = layout.area_mut(id);
    area.absolutify(&parent);
    if n == 0 && style.position == Position::Relative {
      let cb = parent;
      let shift_x = style.relative_horizontal_shift(&cb);
      let shift_y = style.relative_vertical_shift(&cb);
      let area = layout.area_mut(id);
      area.x += shift_x;
      area.y += shift_y;
    }
  }
  Ok(())
}

fn snap_box(layout: &mut Layout, ix: usize) -> Result<()> {
  for id in area_chain(layout, ix)? {
    layout.area_mut(id).snap_pixels();
  }
  Ok(())
}
