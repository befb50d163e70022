use std::sync::Arc;

use flowlayout::compute_layout;
use flowlayout::style::types::CssValueAuto;
use flowlayout::style::types::Display;
use flowlayout::style::types::Edges;
use flowlayout::style::types::WritingMode;
use flowlayout::HostElement;
use flowlayout::MonospaceShaper;
use flowlayout::Style;

fn element(id: &str, style: Style) -> HostElement {
  HostElement {
    id: id.to_string(),
    tag: "div".to_string(),
    style: Arc::new(style),
    text: None,
    intrinsic_size: None,
  }
}

fn px(v: f32) -> CssValueAuto {
  CssValueAuto::Px(v)
}

fn shaper() -> MonospaceShaper {
  MonospaceShaper::with_families(&["Helvetica"])
}

fn stacked_children(writing_mode: WritingMode) -> Vec<HostElement> {
  // In a vertical writing mode the block axis is horizontal, so `width`
  // is the block size of these children.
  let (first, second) = match writing_mode {
    WritingMode::HorizontalTb => (
      Style {
        display: Display::BLOCK,
        height: px(30.0),
        ..Style::default()
      },
      Style {
        display: Display::BLOCK,
        height: px(40.0),
        ..Style::default()
      },
    ),
    WritingMode::VerticalRl | WritingMode::VerticalLr => (
      Style {
        display: Display::BLOCK,
        width: px(30.0),
        writing_mode,
        ..Style::default()
      },
      Style {
        display: Display::BLOCK,
        width: px(40.0),
        writing_mode,
        ..Style::default()
      },
    ),
  };
  vec![element("a", first), element("b", second)]
}

#[test]
fn horizontal_tb_stacks_downward() {
  let parent = element("p", Style::default());
  let children = stacked_children(WritingMode::HorizontalTb);
  let rects = compute_layout(&parent, &children, 100.0, 200.0, &mut shaper());

  assert_eq!(rects[0].rect.y, 0.0);
  assert_eq!(rects[0].rect.height, 30.0);
  assert_eq!(rects[0].rect.width, 100.0);
  assert_eq!(rects[1].rect.y, 30.0);
  assert_eq!(rects[1].rect.height, 40.0);
}

#[test]
fn vertical_rl_stacks_leftward_from_the_right_edge() {
  let parent = element(
    "p",
    Style {
      writing_mode: WritingMode::VerticalRl,
      ..Style::default()
    },
  );
  let children = stacked_children(WritingMode::VerticalRl);
  let rects = compute_layout(&parent, &children, 100.0, 200.0, &mut shaper());

  // First block column hugs the right edge, the next stacks to its left.
  assert_eq!(rects[0].rect.x, 70.0);
  assert_eq!(rects[0].rect.width, 30.0);
  assert_eq!(rects[0].rect.height, 200.0);
  assert_eq!(rects[1].rect.x, 30.0);
  assert_eq!(rects[1].rect.width, 40.0);
}

#[test]
fn vertical_lr_stacks_rightward() {
  let parent = element(
    "p",
    Style {
      writing_mode: WritingMode::VerticalLr,
      ..Style::default()
    },
  );
  let children = stacked_children(WritingMode::VerticalLr);
  let rects = compute_layout(&parent, &children, 100.0, 200.0, &mut shaper());

  assert_eq!(rects[0].rect.x, 0.0);
  assert_eq!(rects[0].rect.width, 30.0);
  assert_eq!(rects[1].rect.x, 30.0);
  assert_eq!(rects[1].rect.width, 40.0);
}

#[test]
fn orthogonal_child_participates_in_the_parent_flow() {
  // A vertical-rl child in a horizontal-tb parent still stacks downward:
  // its block axis, margins and sizes resolve in the parent's mode, so
  // `height` is its block size and `margin-top` its block-start margin.
  let parent = element("p", Style::default());
  let child = Style {
    display: Display::BLOCK,
    writing_mode: WritingMode::VerticalRl,
    height: px(30.0),
    margin: Edges {
      top: px(10.0),
      ..Edges::uniform(CssValueAuto::Px(0.0))
    },
    ..Style::default()
  };
  let rects = compute_layout(&parent, &[element("a", child)], 100.0, 200.0, &mut shaper());

  assert_eq!(rects[0].rect.y, 10.0);
  assert_eq!(rects[0].rect.height, 30.0);
  assert_eq!(rects[0].rect.width, 100.0);
}

#[test]
fn snapping_keeps_adjacent_edges_seam_free() {
  let parent = element("p", Style::default());
  let children = vec![
    element(
      "a",
      Style {
        display: Display::BLOCK,
        height: px(10.5),
        ..Style::default()
      },
    ),
    element(
      "b",
      Style {
        display: Display::BLOCK,
        height: px(10.5),
        ..Style::default()
      },
    ),
  ];
  let rects = compute_layout(&parent, &children, 100.0, 200.0, &mut shaper());

  // The shared edge rounds once, so the boxes neither gap nor overlap.
  let a_bottom = rects[0].rect.y + rects[0].rect.height;
  assert_eq!(a_bottom, rects[1].rect.y);
  assert_eq!(rects[0].rect.y.fract(), 0.0);
  assert_eq!(rects[1].rect.y.fract(), 0.0);
  assert_eq!(rects[1].rect.height.fract(), 0.0);
}
