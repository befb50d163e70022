//! Float placement
//!
//! Floats in one block formatting context are tracked per side as a list
//! of tracks: horizontal bands of constant occupied inline space. Track
//! boundaries are the block offsets stored in `block_offsets`, which has
//! one more entry than the per-track arrays. Placing a float splits
//! tracks at its top and bottom edges and widens the bands it covers.
//!
//! A shelf marks the lowest block offset new floats may be placed at.
//! Floats that do not fit beside existing ones queue as misfits and are
//! retried when the shelf drops past a line or a track edge.

use crate::error::LayoutError;
use crate::error::Result;
use crate::style::types::Clear;
use crate::style::types::Float;
use crate::tree::box_tree::Layout;
use crate::tree::box_tree::Linebox;

/// Tolerance for fit checks, in CSS pixels. Coarser than f32 epsilon so
/// accumulated rounding from shaping does not wrongly reject a fit.
const EPSILON: f32 = 1.0 / 64.0;

/// Offsets of the current containing block within its BFC, copied from
/// the formatting context each call so the float side needs no back-ref.
#[derive(Debug, Clone, Copy)]
pub struct FloatBasis {
  /// Inline size of the BFC root's content box.
  pub inline_size: f32,
  pub cb_block_start: f32,
  pub cb_line_left: f32,
  pub cb_line_right: f32,
}

/// First track whose boundary is at or before `offset`.
fn track_search(offsets: &[f32], offset: f32) -> usize {
  let mut start = offsets.partition_point(|&o| o < offset);
  if start == offsets.len() || offsets[start] != offset {
    start = start.saturating_sub(1);
  }
  start
}

/// Float bookkeeping for one side (left or right) of a BFC.
#[derive(Debug)]
struct FloatSide {
  items: Vec<usize>,
  shelf_block_offset: f32,
  shelf_track_index: usize,
  /// Track boundaries; one more entry than the per-track arrays.
  block_offsets: Vec<f32>,
  inline_sizes: Vec<f32>,
  inline_offsets: Vec<f32>,
  float_counts: Vec<u32>,
}

impl FloatSide {
  fn new(block_offset: f32) -> Self {
    Self {
      items: Vec::new(),
      shelf_block_offset: block_offset,
      shelf_track_index: 0,
      block_offsets: vec![block_offset],
      inline_sizes: vec![0.0],
      inline_offsets: vec![0.0],
      float_counts: vec![0],
    }
  }

  fn size_of_tracks(&self, start: usize, end: usize, inline_offset: f32) -> f32 {
    let mut max = 0.0f32;
    for i in start..end {
      if self.float_counts[i] > 0 {
        max = max.max(inline_offset + self.inline_sizes[i] + self.inline_offsets[i]);
      }
    }
    max
  }

  fn float_count_of_tracks(&self, start: usize, end: usize) -> u32 {
    let mut max = 0;
    for i in start..end {
      max = max.max(self.float_counts[i]);
    }
    max
  }

  fn end_track(&self, start: usize, block_offset: f32, block_size: f32) -> usize {
    let block_position = block_offset + block_size;
    let mut end = start + 1;
    while end < self.block_offsets.len() && self.block_offsets[end] < block_position {
      end += 1;
    }
    end
  }

  fn track_range(&self, block_offset: f32, block_size: f32) -> (usize, usize) {
    let start = track_search(&self.block_offsets, block_offset);
    (start, self.end_track(start, block_offset, block_size))
  }

  fn occupied_space(&self, block_offset: f32, block_size: f32, inline_offset: f32) -> f32 {
    if self.items.is_empty() {
      return 0.0;
    }
    let (start, end) = self.track_range(block_offset, block_size);
    self.size_of_tracks(start, end, inline_offset)
  }

  fn box_start(&mut self, block_offset: f32) {
    self.shelf_block_offset = block_offset;
    self.shelf_track_index = track_search(&self.block_offsets, block_offset);
  }

  fn drop_shelf(&mut self, block_offset: f32) {
    if block_offset > self.shelf_block_offset {
      self.shelf_block_offset = block_offset;
      self.shelf_track_index = track_search(&self.block_offsets, block_offset);
    }
  }

  fn next_track_offset(&self) -> f32 {
    if self.shelf_track_index + 1 < self.block_offsets.len() {
      self.block_offsets[self.shelf_track_index + 1]
    } else {
      self.block_offsets[self.shelf_track_index]
    }
  }

  fn bottom(&self) -> f32 {
    *self.block_offsets.last().unwrap_or(&0.0)
  }

  /// Splits track `index` in two at `block_offset`. Both halves keep the
  /// track's occupied size and count.
  fn split_track(&mut self, index: usize, block_offset: f32) {
    let size = self.inline_sizes[index];
    let offset = self.inline_offsets[index];
    let count = self.float_counts[index];
    self.block_offsets.insert(index + 1, block_offset);
    self.inline_sizes.insert(index, size);
    self.inline_offsets.insert(index, offset);
    self.float_counts.insert(index, count);
  }

  fn split_if_shelf_dropped(&mut self) {
    if self.block_offsets[self.shelf_track_index] != self.shelf_block_offset {
      self.split_track(self.shelf_track_index, self.shelf_block_offset);
      self.shelf_track_index += 1;
    }
  }

  fn place_float(
    &mut self,
    layout: &mut Layout,
    ix: usize,
    vacancy: &IfcVacancy,
    basis: FloatBasis,
  ) -> Result<()> {
    let style = layout.style(ix).clone();
    if style.float == Float::None {
      return Err(
        LayoutError::FloatPlacement {
          message: format!("box {ix} is not floated"),
        }
        .into(),
      );
    }
    if vacancy.block_offset != self.shelf_block_offset {
      return Err(
        LayoutError::FloatPlacement {
          message: "vacancy is stale for the current shelf".to_string(),
        }
        .into(),
      );
    }

    self.split_if_shelf_dropped();

    let cb = *layout.containing_block(ix)?;
    let border = *layout.area(layout.box_data(ix)?.border_area_id());
    let start_track = self.shelf_track_index;
    let margin_block_start = style.margin_block_start(&cb).unwrap_or(0.0);
    let margin_block_end = style.margin_block_end(&cb).unwrap_or(0.0);
    let margin_line_left = style.margin_line_left(&cb).unwrap_or(0.0);
    let margin_line_right = style.margin_line_right(&cb).unwrap_or(0.0);
    let block_size = border.layout_height() + margin_block_start + margin_block_end;
    let block_end_offset = self.shelf_block_offset + block_size;

    let end_track = if block_size > 0.0 {
      let end = self.end_track(start_track, self.shelf_block_offset, block_size);
      if self.block_offsets[end] != block_end_offset {
        self.split_track(end - 1, block_end_offset);
      }
      end
    } else {
      start_track
    };

    let left = style.float == Float::Left;
    let vc_offset = if left { vacancy.left_offset } else { vacancy.right_offset };
    let cb_offset = if left { basis.cb_line_left } else { basis.cb_line_right };
    let margin_offset = if left { margin_line_left } else { margin_line_right };
    let margin_end = if left { margin_line_right } else { margin_line_left };

    if left {
      layout.set_inline_position(ix, vc_offset - cb_offset + margin_offset)?;
    } else {
      let cb_inline_size = cb.inline_size;
      let size = border.inline_size;
      layout.set_inline_position(ix, cb_inline_size - size - vc_offset + cb_offset - margin_offset)?;
    }

    for track in start_track..end_track {
      if self.float_counts[track] == 0 {
        self.inline_offsets[track] = vc_offset;
        self.inline_sizes[track] = margin_offset + border.layout_width() + margin_end;
      } else {
        self.inline_sizes[track] =
          vc_offset - self.inline_offsets[track] + margin_offset + border.layout_width() + margin_end;
      }
      self.float_counts[track] += 1;
    }

    self.items.push(ix);
    Ok(())
  }
}

/// Free inline space found for a line or a float at one block offset.
#[derive(Debug, Clone, Copy)]
pub struct IfcVacancy {
  pub left_offset: f32,
  pub right_offset: f32,
  pub inline_size: f32,
  pub block_offset: f32,
  pub left_float_count: u32,
  pub right_float_count: u32,
}

impl IfcVacancy {
  pub fn fits(&self, inline_size: f32) -> bool {
    inline_size - self.inline_size < EPSILON
  }

  pub fn has_floats(&self) -> bool {
    self.left_float_count > 0 || self.right_float_count > 0
  }
}

/// All float state for one block formatting context.
#[derive(Debug)]
pub struct FloatContext {
  left: FloatSide,
  right: FloatSide,
  misfits: Vec<usize>,
}

impl FloatContext {
  pub fn new(block_offset: f32) -> Self {
    Self {
      left: FloatSide::new(block_offset),
      right: FloatSide::new(block_offset),
      misfits: Vec::new(),
    }
  }

  /// Moves both shelves to the block offset where in-flow content starts.
  pub fn box_start(&mut self, cb_block_start: f32) {
    self.left.box_start(cb_block_start);
    self.right.box_start(cb_block_start);
  }

  /// Free space for a line of the given extent.
  pub fn vacancy_for_line(&self, block_offset: f32, block_size: f32, basis: FloatBasis) -> IfcVacancy {
    let left_space = self.left.occupied_space(block_offset, block_size, -basis.cb_line_left);
    let right_space = self.right.occupied_space(block_offset, block_size, -basis.cb_line_right);
    let left_offset = basis.cb_line_left + left_space;
    let right_offset = basis.cb_line_right + right_space;
    IfcVacancy {
      left_offset,
      right_offset,
      inline_size: basis.inline_size - left_offset - right_offset,
      block_offset,
      left_float_count: 0,
      right_float_count: 0,
    }
  }

  /// Free space at the shelf of the side a float would go on, alongside a
  /// partially filled line of `line_width`.
  fn vacancy_for_box(&self, layout: &Layout, ix: usize, line_width: f32, basis: FloatBasis) -> Result<IfcVacancy> {
    let left = layout.style(ix).float == Float::Left;
    let (floats, opposite) = if left { (&self.left, &self.right) } else { (&self.right, &self.left) };
    let inline_offset = if left { -basis.cb_line_left } else { -basis.cb_line_right };
    let opposite_inline_offset = if left { -basis.cb_line_right } else { -basis.cb_line_left };
    let block_offset = floats.shelf_block_offset;
    let block_size = layout.area(layout.box_data(ix)?.border_area_id()).layout_height();
    let start_track = floats.shelf_track_index;
    let end_track = floats.end_track(start_track, block_offset, block_size);
    let inline_space = floats.size_of_tracks(start_track, end_track, inline_offset);
    let (opp_start, opp_end) = opposite.track_range(block_offset, block_size);
    let opposite_space = opposite.size_of_tracks(opp_start, opp_end, opposite_inline_offset);
    let left_offset = basis.cb_line_left + if left { inline_space } else { opposite_space };
    let right_offset = basis.cb_line_right + if left { opposite_space } else { inline_space };
    let float_count = floats.float_count_of_tracks(start_track, end_track);
    let opposite_count = opposite.float_count_of_tracks(opp_start, opp_end);
    Ok(IfcVacancy {
      left_offset,
      right_offset,
      inline_size: basis.inline_size - left_offset - right_offset - line_width,
      block_offset,
      left_float_count: if left { float_count } else { opposite_count },
      right_float_count: if left { opposite_count } else { float_count },
    })
  }

  pub fn left_bottom(&self) -> f32 {
    self.left.bottom()
  }

  pub fn right_bottom(&self) -> f32 {
    self.right.bottom()
  }

  pub fn both_bottom(&self) -> f32 {
    self.left.bottom().max(self.right.bottom())
  }

  /// Finds the highest block offset at or below `block_offset` where a
  /// line of the given inline size fits, stepping down track boundaries.
  pub fn find_line_position(
    &self,
    block_offset: f32,
    block_size: f32,
    inline_size: f32,
    basis: FloatBasis,
  ) -> IfcVacancy {
    let mut block_offset = block_offset;
    let (mut left_ix, _) = self.left.track_range(block_offset, block_size);
    let (mut right_ix, _) = self.right.track_range(block_offset, block_size);

    while left_ix < self.left.inline_sizes.len() || right_ix < self.right.inline_sizes.len() {
      let left_off = if left_ix < self.left.inline_sizes.len() {
        self.left.block_offsets[left_ix]
      } else {
        f32::INFINITY
      };
      let right_off = if right_ix < self.right.inline_sizes.len() {
        self.right.block_offsets[right_ix]
      } else {
        f32::INFINITY
      };

      block_offset = block_offset.max(left_off.min(right_off));
      let vacancy = self.vacancy_for_line(block_offset, block_size, basis);
      if inline_size <= vacancy.inline_size {
        return vacancy;
      }

      if left_off <= right_off {
        left_ix += 1;
      }
      if right_off <= left_off {
        right_ix += 1;
      }
    }

    self.vacancy_for_line(block_offset, block_size, basis)
  }

  /// Places a float, or queues it as a misfit when it does not fit at the
  /// current shelf. `line_width` is the occupied width of the line being
  /// built, zero outside text layout.
  pub fn place_float(
    &mut self,
    layout: &mut Layout,
    line_width: f32,
    line_is_empty: bool,
    ix: usize,
    basis: FloatBasis,
  ) -> Result<()> {
    let style = layout.style(ix).clone();
    if style.float == Float::None {
      return Err(
        LayoutError::FloatPlacement {
          message: format!("box {ix} is not floated"),
        }
        .into(),
      );
    }

    if !self.misfits.is_empty() {
      self.misfits.push(ix);
      return Ok(());
    }

    let left = style.float == Float::Left;
    if style.clear == Clear::Left || style.clear == Clear::Both {
      let bottom = self.left.bottom();
      self.side_mut(left).drop_shelf(bottom);
    }
    if style.clear == Clear::Right || style.clear == Clear::Both {
      let bottom = self.right.bottom();
      self.side_mut(left).drop_shelf(bottom);
    }

    let vacancy = self.vacancy_for_box(layout, ix, line_width, basis)?;
    let cb = *layout.containing_block(ix)?;
    let margin_line_left = style.margin_line_left(&cb).unwrap_or(0.0);
    let margin_line_right = style.margin_line_right(&cb).unwrap_or(0.0);
    let margin_block_start = style.margin_block_start(&cb).unwrap_or(0.0);
    let border_width = layout.area(layout.box_data(ix)?.border_area_id()).layout_width();
    let inline_size = border_width + margin_line_left + margin_line_right;

    if vacancy.fits(inline_size) || (line_is_empty && !vacancy.has_floats()) {
      let shelf = self.side_mut(left).shelf_block_offset;
      layout.set_block_position(ix, shelf + margin_block_start - basis.cb_block_start)?;
      self.side_mut(left).place_float(layout, ix, &vacancy, basis)?;
    } else {
      let retry = self.vacancy_for_box(layout, ix, 0.0, basis)?;
      if !retry.fits(inline_size) {
        let count = if left { retry.left_float_count } else { retry.right_float_count };
        let opposite_count = if left { retry.right_float_count } else { retry.left_float_count };
        if count > 0 {
          let next = self.side_mut(left).next_track_offset();
          self.side_mut(left).drop_shelf(next);
        } else if opposite_count > 0 {
          let shelf = self.side_mut(left).shelf_block_offset;
          let opposite = self.side(!left);
          let (_, track) = opposite.track_range(shelf, 0.0);
          if track == opposite.block_offsets.len() {
            return Err(
              LayoutError::FloatPlacement {
                message: "opposite side has no track past the shelf".to_string(),
              }
              .into(),
            );
          }
          let offset = opposite.block_offsets[track];
          self.side_mut(left).drop_shelf(offset);
        }
      }
      self.misfits.push(ix);
    }
    Ok(())
  }

  /// Retries queued floats until the queue drains or stops shrinking.
  pub fn consume_misfits(&mut self, layout: &mut Layout, basis: FloatBasis) -> Result<()> {
    while !self.misfits.is_empty() {
      let misfits = std::mem::take(&mut self.misfits);
      for ix in misfits {
        self.place_float(layout, 0.0, true, ix, basis)?;
      }
    }
    Ok(())
  }

  pub fn drop_shelf(&mut self, block_offset: f32) {
    self.left.drop_shelf(block_offset);
    self.right.drop_shelf(block_offset);
  }

  /// Called after each line box is placed: if the line broke or floats
  /// are queued, the shelf drops below the line and misfits retry.
  pub fn post_line(&mut self, layout: &mut Layout, line: &Linebox, did_break: bool, basis: FloatBasis) -> Result<()> {
    if did_break || !self.misfits.is_empty() {
      self.drop_shelf(basis.cb_block_start + line.block_offset + line.height());
    }
    self.consume_misfits(layout, basis)
  }

  /// Called before text content lays out at the current position.
  pub fn pre_text_content(&mut self, layout: &mut Layout, basis: FloatBasis) -> Result<()> {
    self.consume_misfits(layout, basis)
  }

  fn side(&self, left: bool) -> &FloatSide {
    if left {
      &self.left
    } else {
      &self.right
    }
  }

  fn side_mut(&mut self, left: bool) -> &mut FloatSide {
    if left {
      &mut self.left
    } else {
      &mut self.right
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn track_search_finds_containing_track() {
    let offsets = [0.0, 10.0, 30.0];
    assert_eq!(track_search(&offsets, 0.0), 0);
    assert_eq!(track_search(&offsets, 10.0), 1);
    assert_eq!(track_search(&offsets, 15.0), 1);
    assert_eq!(track_search(&offsets, 30.0), 2);
    assert_eq!(track_search(&offsets, 99.0), 2);
  }

  #[test]
  fn split_track_duplicates_occupancy() {
    let mut side = FloatSide::new(0.0);
    side.inline_sizes[0] = 40.0;
    side.inline_offsets[0] = 5.0;
    side.float_counts[0] = 1;
    side.split_track(0, 12.0);
    assert_eq!(side.block_offsets, vec![0.0, 12.0]);
    assert_eq!(side.inline_sizes, vec![40.0, 40.0]);
    assert_eq!(side.inline_offsets, vec![5.0, 5.0]);
    assert_eq!(side.float_counts, vec![1, 1]);
  }

  #[test]
  fn vacancy_fit_uses_tolerance() {
    let vacancy = IfcVacancy {
      left_offset: 0.0,
      right_offset: 0.0,
      inline_size: 100.0,
      block_offset: 0.0,
      left_float_count: 0,
      right_float_count: 0,
    };
    assert!(vacancy.fits(100.0));
    assert!(vacancy.fits(100.0 + EPSILON / 2.0));
    assert!(!vacancy.fits(101.0));
  }

  #[test]
  fn empty_side_occupies_nothing() {
    let side = FloatSide::new(0.0);
    assert_eq!(side.occupied_space(0.0, 10.0, 0.0), 0.0);
    assert_eq!(side.bottom(), 0.0);
  }
}
