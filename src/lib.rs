//! CSS flow layout engine.
//!
//! Takes a tree of styled elements from a host, builds a flattened box
//! tree, runs block and inline flow layout (margin collapsing, floats,
//! line breaking over a pluggable [`text::TextShaper`]) and returns
//! absolute, pixel-snapped rectangles.
//!
//! The pipeline is three passes over one flat pre-order `Vec`:
//! prelayout (containing blocks, font metrics, paragraph shaping), block
//! layout (formatting contexts and box models), and postlayout
//! (absolutification and pixel snapping). See [`host::compute_layout`]
//! for the entry point.

pub mod error;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod style;
pub mod text;
pub mod tree;

pub use error::{Error, Result};
pub use geometry::{Point, Rect, Size};
pub use host::{compute_layout, ComputedRect, HostElement};
pub use style::Style;
pub use text::{MonospaceShaper, TextShaper};
pub use tree::{Layout, LayoutNode};
