use std::sync::Arc;

use flowlayout::compute_layout;
use flowlayout::host::build_box_tree;
use flowlayout::style::types::CssValueAuto;
use flowlayout::style::types::Display;
use flowlayout::style::types::WhiteSpace;
use flowlayout::HostElement;
use flowlayout::LayoutNode;
use flowlayout::MonospaceShaper;
use flowlayout::Style;

// The monospace shaper advances half an em per glyph: 8px wide glyphs
// and 16px lines at the default 16px font size.
const GLYPH: f32 = 8.0;
const LINE: f32 = 16.0;

fn element(id: &str, tag: &str, style: Style) -> HostElement {
  HostElement {
    id: id.to_string(),
    tag: tag.to_string(),
    style: Arc::new(style),
    text: None,
    intrinsic_size: None,
  }
}

fn span(id: &str, text: &str, style: Style) -> HostElement {
  let mut el = element(
    id,
    "span",
    Style {
      display: Display::INLINE,
      ..style
    },
  );
  el.text = Some(text.to_string());
  el
}

/// A zero-margin block after the text; its y position is the paragraph's
/// used height.
fn marker() -> HostElement {
  element(
    "marker",
    "div",
    Style {
      display: Display::BLOCK,
      height: CssValueAuto::Px(5.0),
      ..Style::default()
    },
  )
}

fn shaper() -> MonospaceShaper {
  MonospaceShaper::with_families(&["Helvetica"])
}

fn paragraph_height(text: &str, available_width: f32) -> f32 {
  let parent = element("p", "div", Style::default());
  let children = vec![span("s", text, Style::default()), marker()];
  let rects = compute_layout(&parent, &children, available_width, 400.0, &mut shaper());
  let marker = rects.iter().find(|r| r.id == "marker");
  marker.map(|r| r.rect.y).unwrap_or(f32::NAN)
}

#[test]
fn short_text_fits_one_line() {
  assert_eq!(paragraph_height("Hello", 100.0), LINE);
}

#[test]
fn text_breaks_at_a_space_opportunity() {
  // "Hello " fills 48px exactly; "World" moves to a second line.
  assert_eq!(paragraph_height("Hello World", 6.0 * GLYPH), 2.0 * LINE);
}

#[test]
fn unbreakable_text_breaks_mid_word() {
  // Eight glyphs at 8px in a 40px line: five on the first, three on the
  // second.
  assert_eq!(paragraph_height("aaaaaaaa", 40.0), 2.0 * LINE);
}

#[test]
fn pre_line_newline_forces_a_break() {
  let parent = element("p", "div", Style::default());
  let children = vec![
    span(
      "s",
      "a\nb",
      Style {
        white_space: WhiteSpace::PreLine,
        ..Style::default()
      },
    ),
    marker(),
  ];
  let rects = compute_layout(&parent, &children, 100.0, 400.0, &mut shaper());
  let marker = rects.iter().find(|r| r.id == "marker").unwrap();
  assert_eq!(marker.rect.y, 2.0 * LINE);
}

#[test]
fn normal_whitespace_collapses_and_trims_the_edges() {
  let mut parent = element("p", "div", Style::default());
  parent.text = Some("  a   b  ".to_string());
  let layout = build_box_tree(&parent, &[], 100.0, 100.0).unwrap();

  // Inner runs become one space; leading and trailing whitespace none.
  let LayoutNode::Block(b) = &layout.tree[0] else {
    panic!("expected a block container root");
  };
  assert_eq!(b.ifc().unwrap().text, "a b");
}

#[test]
fn nowrap_text_never_breaks() {
  let parent = element("p", "div", Style::default());
  let children = vec![
    span(
      "s",
      "Hello World",
      Style {
        white_space: WhiteSpace::Nowrap,
        ..Style::default()
      },
    ),
    marker(),
  ];
  let rects = compute_layout(&parent, &children, 6.0 * GLYPH, 400.0, &mut shaper());
  let marker = rects.iter().find(|r| r.id == "marker").unwrap();
  assert_eq!(marker.rect.y, LINE);
}

#[test]
fn layout_is_deterministic() {
  let parent = element("p", "div", Style::default());
  let children = vec![span("s", "The quick brown fox", Style::default()), marker()];
  let first = compute_layout(&parent, &children, 70.0, 400.0, &mut shaper());
  let second = compute_layout(&parent, &children, 70.0, 400.0, &mut shaper());
  assert_eq!(first, second);
}
