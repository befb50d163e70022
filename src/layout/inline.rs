//! Inline formatting: whitespace collapsing, shaping, line breaking
//!
//! Each block container of inlines (IFC) owns one paragraph string made
//! of all its runs' text. Whitespace collapses in place before layout,
//! compacting both the string and the tree: runs left empty are removed
//! and the index ranges of every following node shift down.
//!
//! Shaping is a single run over the whole paragraph with the first face
//! of the root inline's cascade. Line breaking is greedy: break after
//! the last space or tab that fits, or mid-word when nothing fits.

use std::mem;

use crate::error::Result;
use crate::error::ShaperError;
use crate::error::StructuralError;
use crate::layout::float::FloatBasis;
use crate::layout::float::FloatContext;
use crate::style::types::LineHeight;
use crate::style::types::WhiteSpace;
use crate::style::types::WordSpacing;
use crate::style::Style;
use crate::text::shaper::G_AX;
use crate::text::shaper::GLYPH_STRIDE;
use crate::text::FaceId;
use crate::text::ShapeBuffer;
use crate::text::TextShaper;
use crate::tree::box_tree::flags;
use crate::tree::box_tree::InlineMetrics;
use crate::tree::box_tree::Layout;
use crate::tree::box_tree::LayoutNode;
use crate::tree::box_tree::Linebox;
use crate::tree::box_tree::ShapedItem;

/// Sizing mode for intrinsic contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionMode {
  MinContent,
  MaxContent,
}

fn is_collapsible_ws(b: u8) -> bool {
  b == b' ' || b == b'\t' || b == b'\n'
}

/// Classifies a run's text into the bit flags that drive text layout.
pub fn run_bits(style: &Style, text: &str) -> u32 {
  let mut bits = 0;
  if !style.white_space.is_nowrap() {
    bits |= flags::HAS_SOFT_WRAP;
  }
  for ch in text.chars() {
    if (ch as u32) & 0xff80 != 0 {
      bits |= flags::HAS_COMPLEX_TEXT;
    }
    match ch {
      '\u{ad}' => bits |= flags::HAS_SOFT_HYPHEN,
      '\n' => bits |= flags::HAS_NEWLINES,
      ' ' if style.word_spacing != WordSpacing::Normal => bits |= flags::HAS_WORD_SPACING,
      _ => {}
    }
    if !matches!(ch, ' ' | '\t' | '\n') {
      bits |= flags::TEXT_BITS;
    }
  }
  bits
}

/// Collapses whitespace of one IFC in place, per each run's `white-space`.
///
/// Must run while the IFC subtree is the tail of `tree`: removing empty
/// runs compacts the tree and truncates it by the number removed. All
/// collapsible characters are single-byte, so text deltas are byte
/// deltas and multi-byte characters copy through untouched.
pub fn collapse_whitespace(tree: &mut Vec<LayoutNode>, ifc_ix: usize) -> Result<()> {
  let (tree_start, tree_final) = {
    let LayoutNode::Block(b) = &tree[ifc_ix] else {
      return Err(
        StructuralError::MalformedTree {
          message: format!("node {ifc_ix} is not a block container"),
        }
        .into(),
      );
    };
    (b.data.tree_start, b.data.tree_final)
  };
  if tree_final != tree.len() - 1 {
    return Err(
      StructuralError::MalformedTree {
        message: format!("IFC at {ifc_ix} is not the tail of the tree"),
      }
      .into(),
    );
  }

  let text = {
    let LayoutNode::Block(b) = &mut tree[ifc_ix] else { unreachable!() };
    match b.ifc_mut() {
      Some(ifc) => mem::take(&mut ifc.text),
      None => return Ok(()),
    }
  };
  let bytes = text.as_bytes();
  let mut out: Vec<u8> = Vec::with_capacity(bytes.len());

  let mut parents: Vec<usize> = Vec::new();
  let mut delta = 0usize;
  // The paragraph opens in whitespace so leading collapsible spaces
  // vanish instead of collapsing to one.
  let mut in_whitespace = true;
  let mut tree_delta = 0usize;
  let mut w = tree_start + 2;

  enum Action {
    Keep,
    Drop,
    PushInline,
    /// Move the node and its whole subtree, which ends at this index.
    Subtree(usize),
  }

  let mut r = tree_start + 2;
  while r <= tree_final {
    let action = match &mut tree[r] {
      LayoutNode::Run(run) => {
        let original_start = run.text_start;
        let original_end = run.text_end;
        run.text_start -= delta;

        match run.style.white_space {
          WhiteSpace::Normal | WhiteSpace::Nowrap => {
            for i in original_start..original_end {
              let is_ws = is_collapsible_ws(bytes[i]);
              if in_whitespace && is_ws {
                delta += 1;
              } else {
                out.push(if is_ws { b' ' } else { bytes[i] });
              }
              in_whitespace = is_ws;
            }
          }
          WhiteSpace::PreLine => {
            let mut i = original_start;
            while i < original_end {
              if is_collapsible_ws(bytes[i]) {
                // Whole whitespace segment collapses to a space, or to
                // newlines when it contains any.
                let mut j = i + 1;
                let mut has_nl = bytes[i] == b'\n';
                while j < original_end && is_collapsible_ws(bytes[j]) {
                  has_nl = has_nl || bytes[j] == b'\n';
                  j += 1;
                }
                while i < j {
                  if bytes[i] == b' ' || bytes[i] == b'\t' {
                    if in_whitespace || has_nl {
                      delta += 1;
                    } else {
                      out.push(b' ');
                    }
                    in_whitespace = true;
                  } else {
                    out.push(b'\n');
                    in_whitespace = false;
                  }
                  i += 1;
                }
              } else {
                out.push(bytes[i]);
                in_whitespace = false;
                i += 1;
              }
            }
          }
          WhiteSpace::Pre | WhiteSpace::PreWrap => {
            in_whitespace = false;
            out.extend_from_slice(&bytes[original_start..original_end]);
          }
        }

        run.text_end = original_end - delta;
        if run.text_end > run.text_start {
          Action::Keep
        } else {
          Action::Drop
        }
      }
      node @ (LayoutNode::Block(_) | LayoutNode::Replaced(_)) => {
        // A nested formatting box: its contents belong to another
        // context, so the whole subtree shifts wholesale.
        let inline_level = node.bits() & flags::IS_INLINE_LEVEL != 0
          || matches!(node, LayoutNode::Replaced(_));
        let final_ix = node.tree_final(r);
        if let Some(data) = node.data_mut() {
          data.tree_start -= tree_delta;
          data.tree_final -= tree_delta;
        }
        if inline_level {
          in_whitespace = false;
        }
        Action::Subtree(final_ix)
      }
      LayoutNode::Inline(inline) => {
        inline.text_start -= delta;
        inline.data.tree_start -= tree_delta;
        Action::PushInline
      }
      LayoutNode::Break(_) => Action::Keep,
    };

    match action {
      Action::Keep => {
        tree.swap(w, r);
        w += 1;
      }
      Action::Drop => tree_delta += 1,
      Action::PushInline => {
        tree.swap(w, r);
        parents.push(w);
        w += 1;
      }
      Action::Subtree(final_ix) => {
        tree.swap(w, r);
        w += 1;
        while r + 1 <= final_ix {
          r += 1;
          if let Some(data) = tree[r].data_mut() {
            data.tree_start -= tree_delta;
            data.tree_final -= tree_delta;
          }
          tree.swap(w, r);
          w += 1;
        }
      }
    }

    while let Some(&p) = parents.last() {
      let closes = match &tree[p] {
        LayoutNode::Inline(inline) => inline.data.tree_final == r,
        _ => false,
      };
      if !closes {
        break;
      }
      parents.pop();
      if let LayoutNode::Inline(inline) = &mut tree[p] {
        inline.text_end -= delta;
        inline.data.tree_final -= tree_delta;
      }
    }

    r += 1;
  }

  if let LayoutNode::Inline(root) = &mut tree[tree_start + 1] {
    root.text_end -= delta;
    root.data.tree_final -= tree_delta;
  }

  // A trailing collapsed space never reaches layout either. Text ranges
  // that ran to the old end clamp to the shortened paragraph.
  if in_whitespace && out.last() == Some(&b' ') {
    out.pop();
    let end = out.len();
    for node in tree[tree_start + 1..w].iter_mut() {
      match node {
        LayoutNode::Run(run) => {
          run.text_start = run.text_start.min(end);
          run.text_end = run.text_end.min(end);
        }
        LayoutNode::Inline(inline) => inline.text_end = inline.text_end.min(end),
        _ => {}
      }
    }
  }

  let collapsed = String::from_utf8(out).map_err(|_| StructuralError::MalformedTree {
    message: "collapsed text is not valid UTF-8".to_string(),
  })?;
  let LayoutNode::Block(b) = &mut tree[ifc_ix] else { unreachable!() };
  b.data.tree_final -= tree_delta;
  if let Some(ifc) = b.ifc_mut() {
    ifc.text = collapsed;
  }
  let len = tree.len();
  tree.truncate(len - tree_delta);
  Ok(())
}

/// Computes the vertical metrics of an inline per CSS 2 §10.8.
///
/// `line-height: normal` takes the font's content height (ascent plus
/// descent plus line gap); a number multiplies the font size and the
/// difference distributes as half-leading above and below.
pub fn compute_inline_metrics(shaper: &dyn TextShaper, style: &Style) -> Result<InlineMetrics> {
  let cascade = shaper.font_cascade(style, "en");
  let Some(&face) = cascade.first() else {
    return Ok(InlineMetrics::default());
  };
  let raw = shaper.font_metrics(face, style.direction)?;
  let scale = style.font_size / raw.units_per_em;
  let ascender = raw.ascender * scale;
  let descender = raw.descender * scale;
  let line_gap = raw.line_gap * scale;
  let x_height = raw.x_height * scale;
  let content_height = ascender - descender + line_gap;
  let line_height = match style.line_height {
    LineHeight::Normal => content_height,
    LineHeight::Number(n) => n * style.font_size,
  };
  let half_leading = (line_height - content_height) / 2.0;
  Ok(InlineMetrics {
    ascender_box: ascender + half_leading,
    ascender,
    x_height,
    descender: -descender,
    descender_box: -descender + half_leading,
    line_height,
  })
}

fn ifc_bounds(layout: &Layout, ifc_ix: usize) -> (usize, usize) {
  let data = layout.tree[ifc_ix].data();
  data.map_or((ifc_ix, ifc_ix), |d| (d.tree_start, d.tree_final))
}

/// Shapes the IFC's whole paragraph as one run with the first face of
/// the root inline's cascade and stores the result on the IFC.
pub fn create_ifc_shaped_items(
  layout: &mut Layout,
  ifc_ix: usize,
  shaper: &mut dyn TextShaper,
) -> Result<()> {
  let (tree_start, _) = ifc_bounds(layout, ifc_ix);
  let root_style = match layout.tree.get(tree_start + 1) {
    Some(LayoutNode::Inline(inline)) => inline.data.style.clone(),
    _ => return Ok(()),
  };

  let text = {
    let LayoutNode::Block(b) = &mut layout.tree[ifc_ix] else { return Ok(()) };
    match b.ifc_mut() {
      Some(ifc) => mem::take(&mut ifc.text),
      None => return Ok(()),
    }
  };
  let items = if text.is_empty() {
    Vec::new()
  } else {
    let cascade = shaper.font_cascade(&root_style, "en");
    let Some(&face) = cascade.first() else {
      return Err(
        ShaperError::EmptyCascade {
          families: root_style.font_family.join(", "),
        }
        .into(),
      );
    };
    let mut buffer = shaper.allocate_buffer(text.len());
    let glyphs = shape_run(shaper, &text, &mut buffer, face, &root_style)?;
    let units_per_em = shaper.font_metrics(face, root_style.direction)?.units_per_em;
    vec![ShapedItem {
      style: root_style,
      face,
      glyphs,
      units_per_em,
      text_start: 0,
      text_end: text.len(),
      x: 0.0,
      y: 0.0,
    }]
  };

  let LayoutNode::Block(b) = &mut layout.tree[ifc_ix] else { return Ok(()) };
  if let Some(ifc) = b.ifc_mut() {
    ifc.text = text;
    ifc.items = items;
  }
  Ok(())
}

fn shape_run(
  shaper: &mut dyn TextShaper,
  text: &str,
  buffer: &mut ShapeBuffer,
  face: FaceId,
  style: &Style,
) -> Result<Vec<i32>> {
  shaper.shape(text, buffer, 0, text.len(), face, "Latn", "en", style.direction)
}

/// Per-char advances in CSS pixels, pairing the nth char with the nth
/// glyph record. Holds for the single-run shaping this engine does.
fn char_advances(item: &ShapedItem, char_count: usize) -> Vec<f32> {
  let scale = item.scale();
  let glyph_count = item.glyphs.len() / GLYPH_STRIDE;
  (0..char_count)
    .map(|ci| {
      if ci < glyph_count {
        item.glyphs[ci * GLYPH_STRIDE + G_AX] as f32 * scale
      } else {
        0.0
      }
    })
    .collect()
}

/// Whether the IFC has anything to lay out: text, sized inlines, floats
/// or replaced content, or inline-blocks.
pub fn should_layout_content(layout: &Layout, ifc_ix: usize) -> bool {
  let (tree_start, _) = ifc_bounds(layout, ifc_ix);
  let bits = match layout.tree.get(tree_start + 1) {
    Some(LayoutNode::Inline(inline)) => inline.data.bits,
    _ => return false,
  };
  let content =
    flags::HAS_TEXT | flags::HAS_SIZED_INLINE | flags::HAS_FLOAT_OR_REPLACED | flags::HAS_INLINE_BLOCKS;
  bits & content != 0
}

/// Bottom edge of the last linebox, zero when there are none.
pub fn linebox_height(layout: &Layout, ifc_ix: usize) -> f32 {
  let LayoutNode::Block(b) = &layout.tree[ifc_ix] else { return 0.0 };
  b.ifc()
    .and_then(|ifc| ifc.lineboxes.last())
    .map_or(0.0, |line| line.block_offset + line.height())
}

/// Breaks the IFC's paragraph into line boxes.
///
/// With a float context present, each line is pushed down to the first
/// block offset where its content fits beside the floats.
pub fn create_ifc_lineboxes(
  layout: &mut Layout,
  ifc_ix: usize,
  fctx: Option<(&FloatContext, FloatBasis)>,
) -> Result<()> {
  let (tree_start, _) = ifc_bounds(layout, ifc_ix);
  let (metrics, can_wrap) = match layout.tree.get(tree_start + 1) {
    Some(LayoutNode::Inline(inline)) => {
      (inline.metrics, inline.data.bits & flags::HAS_SOFT_WRAP != 0)
    }
    _ => (InlineMetrics::default(), true),
  };

  let (text, item) = {
    let LayoutNode::Block(b) = &layout.tree[ifc_ix] else { return Ok(()) };
    let Some(ifc) = b.ifc() else { return Ok(()) };
    if ifc.text.is_empty() || ifc.items.is_empty() {
      return Ok(());
    }
    (ifc.text.clone(), ifc.items[0].clone())
  };

  let data = layout.box_data(ifc_ix)?;
  let content = data.content;
  let max_width = layout.area(content).inline_size;

  let ascender = metrics.ascender_box;
  let descender = metrics.descender_box;
  let line_height = metrics.line_height;

  // Lines stack at line-height intervals; floats can push one further
  // down, and every later line starts below it.
  let place = |natural_offset: f32, line_width: f32| -> f32 {
    match fctx {
      Some((fctx, basis)) => {
        let vacancy = fctx.find_line_position(
          basis.cb_block_start + natural_offset,
          line_height,
          line_width,
          basis,
        );
        vacancy.block_offset - basis.cb_block_start
      }
      None => natural_offset,
    }
  };

  let chars: Vec<char> = text.chars().collect();
  let advances = char_advances(&item, chars.len());
  let mut lineboxes: Vec<Linebox> = Vec::new();
  let mut next_offset = 0.0f32;
  let mut line_start = 0usize;
  let mut current_width = 0.0f32;
  let mut last_break: Option<usize> = None;
  let mut last_break_width = 0.0f32;

  for ci in 0..chars.len() {
    let advance = advances[ci];
    let ch = chars[ci];

    // Break opportunity after a space or tab.
    if ch == ' ' || ch == '\t' {
      last_break = Some(ci + 1);
      last_break_width = current_width + advance;
    }

    if ch == '\n' {
      let offset = place(next_offset, current_width);
      lineboxes.push(Linebox {
        block_offset: offset,
        ascender,
        descender,
      });
      next_offset = offset + line_height;
      line_start = ci + 1;
      current_width = 0.0;
      last_break = None;
      last_break_width = 0.0;
      continue;
    }

    current_width += advance;

    if can_wrap && current_width > max_width && max_width > 0.0 {
      let closed_width = match last_break {
        Some(b) if b > line_start => last_break_width,
        _ => current_width - advance,
      };
      let offset = place(next_offset, closed_width);
      lineboxes.push(Linebox {
        block_offset: offset,
        ascender,
        descender,
      });
      next_offset = offset + line_height;
      match last_break {
        Some(b) if b > line_start => {
          line_start = b;
          current_width -= last_break_width;
        }
        _ => {
          // Nothing fits: break mid-word before this character.
          line_start = ci;
          current_width = advance;
        }
      }
      last_break = None;
      last_break_width = 0.0;
    }
  }

  // The content past the last break always forms a final line.
  let offset = place(next_offset, current_width);
  lineboxes.push(Linebox {
    block_offset: offset,
    ascender,
    descender,
  });

  let LayoutNode::Block(b) = &mut layout.tree[ifc_ix] else { return Ok(()) };
  if let Some(ifc) = b.ifc_mut() {
    ifc.lineboxes = lineboxes;
  }
  Ok(())
}

/// Positions the IFC's shaped items within its content area.
pub fn position_ifc_items(layout: &mut Layout, ifc_ix: usize) {
  let LayoutNode::Block(b) = &mut layout.tree[ifc_ix] else { return };
  let Some(ifc) = b.ifc_mut() else { return };
  if let Some(item) = ifc.items.first_mut() {
    item.x = 0.0;
    item.y = 0.0;
  }
}

/// Runs line breaking and item positioning for one IFC, skipping
/// contentless paragraphs, then resolves an auto block size to the
/// bottom of the last line.
pub fn do_text_layout(
  layout: &mut Layout,
  ifc_ix: usize,
  fctx: Option<(&FloatContext, FloatBasis)>,
) -> Result<()> {
  let block_size = {
    let cb = *layout.containing_block(ifc_ix)?;
    layout.style(ifc_ix).block_size(&cb)
  };
  if should_layout_content(layout, ifc_ix) {
    create_ifc_lineboxes(layout, ifc_ix, fctx)?;
    position_ifc_items(layout, ifc_ix);
  }
  if block_size.is_none() {
    let height = linebox_height(layout, ifc_ix);
    layout.set_block_size(ifc_ix, height)?;
  }
  Ok(())
}

/// Intrinsic inline contribution of an IFC: the widest unbreakable word
/// for min-content, the unwrapped paragraph width for max-content.
pub fn ifc_contribution(layout: &Layout, ifc_ix: usize, mode: ContributionMode) -> f32 {
  let LayoutNode::Block(b) = &layout.tree[ifc_ix] else { return 0.0 };
  let Some(ifc) = b.ifc() else { return 0.0 };
  if ifc.text.is_empty() || ifc.items.is_empty() {
    return 0.0;
  }
  let item = &ifc.items[0];
  let chars: Vec<char> = ifc.text.chars().collect();
  let advances = char_advances(item, chars.len());

  match mode {
    ContributionMode::MaxContent => advances.iter().sum(),
    ContributionMode::MinContent => {
      let mut widest = 0.0f32;
      let mut word = 0.0f32;
      for (ci, &ch) in chars.iter().enumerate() {
        if matches!(ch, ' ' | '\t' | '\n') {
          widest = widest.max(word);
          word = 0.0;
        } else {
          word += advances[ci];
        }
      }
      widest.max(word)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  use crate::style::types::Direction;
  use crate::style::types::WritingMode;
  use crate::text::MonospaceShaper;
  use crate::tree::box_tree::BlockContainer;
  use crate::tree::box_tree::BlockKind;
  use crate::tree::box_tree::BoxArea;
  use crate::tree::box_tree::BoxData;
  use crate::tree::box_tree::IfcState;
  use crate::tree::box_tree::InlineBox;
  use crate::tree::box_tree::TextRun;

  /// An IFC holding one run over the whole text.
  fn one_run_ifc(text: &str, white_space: WhiteSpace) -> Vec<LayoutNode> {
    let style = Arc::new(Style {
      white_space,
      ..Style::default()
    });
    let mut ifc_data = BoxData::new(style.clone(), 0);
    ifc_data.tree_start = 0;
    ifc_data.tree_final = 2;
    let mut root_data = BoxData::new(style.clone(), 0);
    root_data.tree_start = 1;
    root_data.tree_final = 2;
    vec![
      LayoutNode::Block(BlockContainer {
        data: ifc_data,
        kind: BlockKind::Inlines(IfcState {
          text: text.to_string(),
          ..IfcState::default()
        }),
      }),
      LayoutNode::Inline(InlineBox {
        data: root_data,
        text_start: 0,
        text_end: text.len(),
        metrics: InlineMetrics::default(),
      }),
      LayoutNode::Run(TextRun {
        style,
        bits: 0,
        text_start: 0,
        text_end: text.len(),
      }),
    ]
  }

  fn collapsed_text(tree: &[LayoutNode]) -> &str {
    let LayoutNode::Block(b) = &tree[0] else { panic!("not a block") };
    &b.ifc().unwrap().text
  }

  #[test]
  fn normal_collapses_runs_of_whitespace() {
    let mut tree = one_run_ifc("  a \t\n  b  ", WhiteSpace::Normal);
    collapse_whitespace(&mut tree, 0).unwrap();
    // Inner runs collapse to one space; the paragraph edges to none.
    assert_eq!(collapsed_text(&tree), "a b");
    let LayoutNode::Run(run) = &tree[2] else { panic!("run removed") };
    assert_eq!((run.text_start, run.text_end), (0, 3));
  }

  #[test]
  fn emptied_run_is_removed_and_tree_compacts() {
    // Two runs over "a   ": the first ends in a space, so the second
    // collapses to nothing and its node is dropped.
    let mut tree = one_run_ifc("a", WhiteSpace::Normal);
    let style = tree[2].style().clone();
    {
      let LayoutNode::Block(b) = &mut tree[0] else { unreachable!() };
      b.data.tree_final = 3;
      b.ifc_mut().unwrap().text = "a   ".to_string();
    }
    {
      let LayoutNode::Inline(root) = &mut tree[1] else { unreachable!() };
      root.data.tree_final = 3;
      root.text_end = 4;
    }
    {
      let LayoutNode::Run(run) = &mut tree[2] else { unreachable!() };
      run.text_end = 2;
    }
    tree.push(LayoutNode::Run(TextRun {
      style,
      bits: 0,
      text_start: 2,
      text_end: 4,
    }));

    collapse_whitespace(&mut tree, 0).unwrap();
    assert_eq!(collapsed_text(&tree), "a");
    assert_eq!(tree.len(), 3);
    let LayoutNode::Run(run) = &tree[2] else { panic!("first run removed") };
    assert_eq!((run.text_start, run.text_end), (0, 1));
    let LayoutNode::Inline(root) = &tree[1] else { panic!("root inline missing") };
    assert_eq!(root.data.tree_final, 2);
    assert_eq!(root.text_end, 1);
  }

  #[test]
  fn pre_preserves_everything() {
    let mut tree = one_run_ifc("  a\n\tb  ", WhiteSpace::Pre);
    collapse_whitespace(&mut tree, 0).unwrap();
    assert_eq!(collapsed_text(&tree), "  a\n\tb  ");
  }

  #[test]
  fn pre_line_keeps_hard_breaks() {
    let mut tree = one_run_ifc("a  \n  b   c", WhiteSpace::PreLine);
    collapse_whitespace(&mut tree, 0).unwrap();
    assert_eq!(collapsed_text(&tree), "a\nb c");
  }

  #[test]
  fn multibyte_text_survives_collapsing() {
    let mut tree = one_run_ifc("á   é", WhiteSpace::Normal);
    collapse_whitespace(&mut tree, 0).unwrap();
    assert_eq!(collapsed_text(&tree), "á é");
  }

  #[test]
  fn run_bit_classification() {
    let style = Style::default();
    let bits = run_bits(&style, "hello\nwörld\u{ad}");
    assert_ne!(bits & flags::HAS_TEXT, 0);
    assert_ne!(bits & flags::HAS_NEWLINES, 0);
    assert_ne!(bits & flags::HAS_COMPLEX_TEXT, 0);
    assert_ne!(bits & flags::HAS_SOFT_HYPHEN, 0);
    assert_ne!(bits & flags::HAS_SOFT_WRAP, 0);

    let ws_only = run_bits(&style, "  \t");
    assert_eq!(ws_only & flags::HAS_TEXT, 0);

    let nbsp = run_bits(&style, "\u{a0}");
    assert_ne!(nbsp & flags::HAS_COMPLEX_TEXT, 0);

    let nowrap = Style {
      white_space: WhiteSpace::Nowrap,
      ..Style::default()
    };
    assert_eq!(run_bits(&nowrap, "x") & flags::HAS_SOFT_WRAP, 0);
  }

  #[test]
  fn word_spacing_needs_a_space() {
    let style = Style {
      word_spacing: WordSpacing::Px(2.0),
      ..Style::default()
    };
    assert_eq!(run_bits(&style, "word") & flags::HAS_WORD_SPACING, 0);
    assert_ne!(run_bits(&style, "two words") & flags::HAS_WORD_SPACING, 0);
  }

  #[test]
  fn normal_line_height_from_font_metrics() {
    let shaper = MonospaceShaper::with_families(&["Helvetica"]);
    let style = Style::default();
    let m = compute_inline_metrics(&shaper, &style).unwrap();
    // 16px font on a 1000 upem face with 800/-200/0 metrics.
    assert_eq!(m.ascender, 12.8);
    assert_eq!(m.descender, 3.2);
    assert_eq!(m.line_height, 16.0);
    assert_eq!(m.ascender_box, 12.8);
    assert_eq!(m.descender_box, 3.2);
  }

  #[test]
  fn numeric_line_height_distributes_half_leading() {
    let shaper = MonospaceShaper::with_families(&["Helvetica"]);
    let style = Style {
      line_height: LineHeight::Number(2.0),
      ..Style::default()
    };
    let m = compute_inline_metrics(&shaper, &style).unwrap();
    assert_eq!(m.line_height, 32.0);
    // Half of the 16px of leading goes above, half below.
    assert_eq!(m.ascender_box, 12.8 + 8.0);
    assert_eq!(m.descender_box, 3.2 + 8.0);
  }

  #[test]
  fn empty_cascade_metrics_are_zero() {
    let shaper = MonospaceShaper::new();
    let m = compute_inline_metrics(&shaper, &Style::default()).unwrap();
    assert_eq!(m.line_height, 0.0);
  }

  fn shaped_layout(text: &str, width: f32) -> Layout {
    let mut tree = one_run_ifc(text, WhiteSpace::Normal);
    let mut shaper = MonospaceShaper::with_families(&["Helvetica"]);
    collapse_whitespace(&mut tree, 0).unwrap();
    let icb = BoxArea::root(WritingMode::HorizontalTb, Direction::Ltr, width, 400.0);
    let mut layout = Layout::new(tree, icb);
    if let Some(data) = layout.tree[0].data_mut() {
      data.containing_block = Some(crate::tree::box_tree::AreaId(0));
    }
    let content = layout.box_data(0).unwrap().content;
    layout.area_mut(content).inline_size = width;
    let metrics = compute_inline_metrics(&shaper, &Style::default()).unwrap();
    if let LayoutNode::Inline(root) = &mut layout.tree[1] {
      root.metrics = metrics;
      root.data.bits |= flags::HAS_TEXT | flags::HAS_SOFT_WRAP;
    }
    create_ifc_shaped_items(&mut layout, 0, &mut shaper).unwrap();
    layout
  }

  fn lineboxes(layout: &Layout) -> &[Linebox] {
    let LayoutNode::Block(b) = &layout.tree[0] else { panic!("not a block") };
    &b.ifc().unwrap().lineboxes
  }

  #[test]
  fn breaks_after_last_fitting_space() {
    // "Hello World" at 8px per char needs 88px; 80px forces a break at
    // the space.
    let mut layout = shaped_layout("Hello World", 80.0);
    do_text_layout(&mut layout, 0, None).unwrap();
    let lines = lineboxes(&layout);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].block_offset, 0.0);
    assert_eq!(lines[1].block_offset, 16.0);
    let content = layout.box_data(0).unwrap().content;
    assert_eq!(layout.area(content).block_size, 32.0);
  }

  #[test]
  fn breaks_mid_word_when_nothing_fits() {
    // 10 chars at 8px in a 32px container: 4 chars per line.
    let mut layout = shaped_layout("abcdefghij", 32.0);
    do_text_layout(&mut layout, 0, None).unwrap();
    assert_eq!(lineboxes(&layout).len(), 3);
  }

  #[test]
  fn single_line_when_everything_fits() {
    let mut layout = shaped_layout("Hello", 400.0);
    do_text_layout(&mut layout, 0, None).unwrap();
    assert_eq!(lineboxes(&layout).len(), 1);
  }

  #[test]
  fn contributions() {
    let layout = shaped_layout("aa bbbb c", 400.0);
    // Widest word "bbbb" is 32px; whole text is 9 chars = 72px.
    assert_eq!(ifc_contribution(&layout, 0, ContributionMode::MinContent), 32.0);
    assert_eq!(ifc_contribution(&layout, 0, ContributionMode::MaxContent), 72.0);
  }

  #[test]
  fn edge_whitespace_does_not_widen_the_paragraph() {
    // "  a   b  " measures like "a b": 3 glyphs of 8px.
    let layout = shaped_layout("  a   b  ", 400.0);
    assert_eq!(ifc_contribution(&layout, 0, ContributionMode::MinContent), 8.0);
    assert_eq!(ifc_contribution(&layout, 0, ContributionMode::MaxContent), 24.0);
  }
}
