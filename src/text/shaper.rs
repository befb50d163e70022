//! Text shaping boundary
//!
//! Layout never talks to a font library directly. All font selection,
//! metric queries and glyph shaping go through the [`TextShaper`] trait,
//! which callers provide when driving layout. Shaped output is a flat
//! `i32` record stream with a fixed stride so implementations can hand
//! back buffers from any shaping backend without conversion.

use crate::error::Result;
use crate::style::types::Direction;
use crate::style::Style;

/// Record layout of shaped glyph output. Each glyph occupies
/// [`GLYPH_STRIDE`] consecutive `i32`s at these offsets.
pub const G_ID: usize = 0;
/// Cluster: byte offset into the source text this glyph maps back to.
pub const G_CL: usize = 1;
/// Advance on the inline axis, in font units.
pub const G_AX: usize = 2;
/// Advance on the block axis, in font units.
pub const G_AY: usize = 3;
/// Offset on the inline axis, in font units.
pub const G_DX: usize = 4;
/// Offset on the block axis, in font units.
pub const G_DY: usize = 5;
/// Per-glyph flags (backend defined).
pub const G_FL: usize = 6;
/// Number of `i32`s per glyph record.
pub const GLYPH_STRIDE: usize = 7;

/// Handle to a registered font face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceId(pub u32);

/// Vertical metrics for a face, in font units.
///
/// `ascender` is positive above the baseline and `descender` is negative
/// below it. Scale to CSS pixels with `font_size / units_per_em`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
  pub ascender: f32,
  pub descender: f32,
  pub line_gap: f32,
  pub x_height: f32,
  pub units_per_em: f32,
}

/// A font face to register with a shaper.
#[derive(Debug, Clone)]
pub struct FaceSource {
  /// Identifier for diagnostics, typically the source URL or path.
  pub url: String,
  /// Family names this face matches during cascade resolution.
  pub families: Vec<String>,
  pub units_per_em: f32,
  /// Raw font data. Backends that synthesize faces may leave this empty.
  pub data: Vec<u8>,
}

/// Reusable scratch buffer for UTF-16 conversion inside shapers.
#[derive(Debug, Default)]
pub struct ShapeBuffer {
  pub data: Vec<u16>,
}

/// The shaping backend layout depends on.
///
/// Implementations own their registered faces. The same shaper instance
/// must serve every call within one layout pass so face ids stay valid.
pub trait TextShaper {
  /// Registers a face and returns its id.
  fn register_face(&mut self, source: FaceSource) -> Result<FaceId>;

  /// Resolves a style's font-family list to an ordered cascade of faces.
  /// An empty result means no registered face can render the style.
  fn font_cascade(&self, style: &Style, lang: &str) -> Vec<FaceId>;

  /// Shapes `text[offset..offset + len]` (byte indexed) with the given
  /// face. Returns glyph records with stride [`GLYPH_STRIDE`], advances
  /// and offsets in font units, clusters as byte offsets into `text`.
  #[allow(clippy::too_many_arguments)]
  fn shape(
    &mut self,
    text: &str,
    buffer: &mut ShapeBuffer,
    offset: usize,
    len: usize,
    face: FaceId,
    script: &str,
    lang: &str,
    direction: Direction,
  ) -> Result<Vec<i32>>;

  /// Metrics for a face. Vertical typesetting may substitute metrics
  /// appropriate for the requested direction.
  fn font_metrics(&self, face: FaceId, direction: Direction) -> Result<FontMetrics>;

  /// Allocates a scratch buffer sized for `capacity` code units.
  fn allocate_buffer(&self, capacity: usize) -> ShapeBuffer {
    ShapeBuffer {
      data: Vec::with_capacity(capacity),
    }
  }

  /// Releases backend resources. Face ids are invalid afterwards.
  fn dispose(&mut self) {}
}
