//! Text shaping boundary and reference shaper

pub mod monospace;
pub mod shaper;

pub use monospace::MonospaceShaper;
pub use shaper::FaceId;
pub use shaper::FaceSource;
pub use shaper::FontMetrics;
pub use shaper::ShapeBuffer;
pub use shaper::TextShaper;
