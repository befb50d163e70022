//! Logical-to-physical property mapping
//!
//! CSS Writing Modes define layout in terms of flow-relative directions:
//! block-start, block-end, line-left and line-right. Each writing mode maps
//! those onto physical sides and axes. Styles store values physically and
//! all layout code reads them through these maps.

use crate::style::types::PhysicalAxis;
use crate::style::types::PhysicalSide;
use crate::style::types::WritingMode;

/// Physical interpretation of the logical directions for one writing mode
#[derive(Debug, Clone, Copy)]
pub struct LogicalPropertyMap {
  pub block_start: PhysicalSide,
  pub block_end: PhysicalSide,
  pub line_left: PhysicalSide,
  pub line_right: PhysicalSide,
  pub inline_size: PhysicalAxis,
  pub block_size: PhysicalAxis,
}

const HORIZONTAL_TB: LogicalPropertyMap = LogicalPropertyMap {
  block_start: PhysicalSide::Top,
  block_end: PhysicalSide::Bottom,
  line_left: PhysicalSide::Left,
  line_right: PhysicalSide::Right,
  inline_size: PhysicalAxis::Width,
  block_size: PhysicalAxis::Height,
};

const VERTICAL_LR: LogicalPropertyMap = LogicalPropertyMap {
  block_start: PhysicalSide::Left,
  block_end: PhysicalSide::Right,
  line_left: PhysicalSide::Top,
  line_right: PhysicalSide::Bottom,
  inline_size: PhysicalAxis::Height,
  block_size: PhysicalAxis::Width,
};

const VERTICAL_RL: LogicalPropertyMap = LogicalPropertyMap {
  block_start: PhysicalSide::Right,
  block_end: PhysicalSide::Left,
  line_left: PhysicalSide::Top,
  line_right: PhysicalSide::Bottom,
  inline_size: PhysicalAxis::Height,
  block_size: PhysicalAxis::Width,
};

/// Returns the side and axis map for a writing mode.
pub fn logical_map(mode: WritingMode) -> &'static LogicalPropertyMap {
  match mode {
    WritingMode::HorizontalTb => &HORIZONTAL_TB,
    WritingMode::VerticalLr => &VERTICAL_LR,
    WritingMode::VerticalRl => &VERTICAL_RL,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn horizontal_maps_block_to_vertical() {
    let map = logical_map(WritingMode::HorizontalTb);
    assert_eq!(map.block_start, PhysicalSide::Top);
    assert_eq!(map.block_end, PhysicalSide::Bottom);
    assert_eq!(map.line_left, PhysicalSide::Left);
    assert_eq!(map.inline_size, PhysicalAxis::Width);
    assert_eq!(map.block_size, PhysicalAxis::Height);
  }

  #[test]
  fn vertical_rl_blocks_flow_right_to_left() {
    let map = logical_map(WritingMode::VerticalRl);
    assert_eq!(map.block_start, PhysicalSide::Right);
    assert_eq!(map.block_end, PhysicalSide::Left);
    assert_eq!(map.line_left, PhysicalSide::Top);
    assert_eq!(map.line_right, PhysicalSide::Bottom);
    assert_eq!(map.inline_size, PhysicalAxis::Height);
  }

  #[test]
  fn vertical_lr_blocks_flow_left_to_right() {
    let map = logical_map(WritingMode::VerticalLr);
    assert_eq!(map.block_start, PhysicalSide::Left);
    assert_eq!(map.block_end, PhysicalSide::Right);
    assert_eq!(map.block_size, PhysicalAxis::Width);
  }
}
