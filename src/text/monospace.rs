//! Deterministic monospace shaper
//!
//! A [`TextShaper`] that needs no font data: every glyph advances half the
//! font size and metrics are fixed fractions of the em. Useful for tests
//! and headless layout where exact typography does not matter.
//!
//! With the default 1000 units-per-em face, a character at `font-size: 16px`
//! is 8px wide and a `normal` line-height paragraph has 16px lines.

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::error::ShaperError;
use crate::style::types::Direction;
use crate::style::Style;
use crate::text::shaper::FaceId;
use crate::text::shaper::FaceSource;
use crate::text::shaper::FontMetrics;
use crate::text::shaper::ShapeBuffer;
use crate::text::shaper::TextShaper;
use crate::text::shaper::GLYPH_STRIDE;
use crate::text::shaper::G_AX;
use crate::text::shaper::G_CL;
use crate::text::shaper::G_ID;

const UNITS_PER_EM: f32 = 1000.0;
const ADVANCE: i32 = 500;
const ASCENDER: f32 = 800.0;
const DESCENDER: f32 = -200.0;
const X_HEIGHT: f32 = 500.0;

/// Fixed-advance shaper with synthetic metrics.
#[derive(Debug, Default)]
pub struct MonospaceShaper {
  faces: Vec<FaceSource>,
  by_family: FxHashMap<String, FaceId>,
}

impl MonospaceShaper {
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a shaper with one face registered for the given families.
  pub fn with_families(families: &[&str]) -> Self {
    let mut shaper = Self::new();
    // Registration of a synthetic face cannot fail.
    let _ = shaper.register_face(FaceSource {
      url: "monospace://default".to_string(),
      families: families.iter().map(|f| f.to_string()).collect(),
      units_per_em: UNITS_PER_EM,
      data: Vec::new(),
    });
    shaper
  }
}

impl TextShaper for MonospaceShaper {
  fn register_face(&mut self, source: FaceSource) -> Result<FaceId> {
    let id = FaceId(self.faces.len() as u32);
    for family in &source.families {
      self.by_family.entry(family.to_lowercase()).or_insert(id);
    }
    self.faces.push(source);
    Ok(id)
  }

  fn font_cascade(&self, style: &Style, _lang: &str) -> Vec<FaceId> {
    let mut cascade = Vec::new();
    for family in &style.font_family {
      if let Some(&id) = self.by_family.get(&family.to_lowercase()) {
        if !cascade.contains(&id) {
          cascade.push(id);
        }
      }
    }
    // Any registered face can render anything, so fall back to the first.
    if cascade.is_empty() && !self.faces.is_empty() {
      cascade.push(FaceId(0));
    }
    cascade
  }

  fn shape(
    &mut self,
    text: &str,
    _buffer: &mut ShapeBuffer,
    offset: usize,
    len: usize,
    face: FaceId,
    _script: &str,
    _lang: &str,
    _direction: Direction,
  ) -> Result<Vec<i32>> {
    if face.0 as usize >= self.faces.len() {
      return Err(ShaperError::UnknownFace { id: face.0 }.into());
    }
    let slice = &text[offset..offset + len];
    let mut out = Vec::with_capacity(slice.chars().count() * GLYPH_STRIDE);
    for (i, ch) in slice.char_indices() {
      let mut record = [0i32; GLYPH_STRIDE];
      record[G_ID] = ch as i32;
      record[G_CL] = (offset + i) as i32;
      // Hard breaks occupy no inline space.
      record[G_AX] = if ch == '\n' { 0 } else { ADVANCE };
      out.extend_from_slice(&record);
    }
    Ok(out)
  }

  fn font_metrics(&self, face: FaceId, _direction: Direction) -> Result<FontMetrics> {
    if face.0 as usize >= self.faces.len() {
      return Err(ShaperError::UnknownFace { id: face.0 }.into());
    }
    Ok(FontMetrics {
      ascender: ASCENDER,
      descender: DESCENDER,
      line_gap: 0.0,
      x_height: X_HEIGHT,
      units_per_em: self.faces[face.0 as usize].units_per_em,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn shapes_one_glyph_per_char() {
    let mut shaper = MonospaceShaper::with_families(&["Helvetica"]);
    let mut buffer = ShapeBuffer::default();
    let glyphs = shaper
      .shape("abc", &mut buffer, 0, 3, FaceId(0), "Latn", "en", Direction::Ltr)
      .unwrap();
    assert_eq!(glyphs.len(), 3 * GLYPH_STRIDE);
    assert_eq!(glyphs[G_CL], 0);
    assert_eq!(glyphs[GLYPH_STRIDE + G_CL], 1);
    assert_eq!(glyphs[G_AX], 500);
  }

  #[test]
  fn newline_has_no_advance() {
    let mut shaper = MonospaceShaper::with_families(&["Helvetica"]);
    let mut buffer = ShapeBuffer::default();
    let glyphs = shaper
      .shape("a\nb", &mut buffer, 0, 3, FaceId(0), "Latn", "en", Direction::Ltr)
      .unwrap();
    assert_eq!(glyphs[GLYPH_STRIDE + G_AX], 0);
  }

  #[test]
  fn cascade_falls_back_to_any_face() {
    let shaper = MonospaceShaper::with_families(&["Helvetica"]);
    let style = Style {
      font_family: vec!["Nonexistent".to_string()],
      ..Style::default()
    };
    assert_eq!(shaper.font_cascade(&style, "en"), vec![FaceId(0)]);
  }

  #[test]
  fn empty_shaper_has_empty_cascade() {
    let shaper = MonospaceShaper::new();
    let style = Style::default();
    assert!(shaper.font_cascade(&style, "en").is_empty());
  }

  #[test]
  fn unknown_face_is_an_error() {
    let shaper = MonospaceShaper::new();
    assert!(shaper.font_metrics(FaceId(7), Direction::Ltr).is_err());
  }
}
