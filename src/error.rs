//! Error types for the layout engine.
//!
//! All fallible operations return [`Result`], which wraps the top-level
//! [`Error`] enum. Errors are grouped by the stage that produces them:
//!
//! - [`StructuralError`]: malformed box trees or unlinked geometry
//! - [`LayoutError`]: used values that cannot be resolved during layout
//! - [`ShaperError`]: font and shaping failures

use thiserror::Error;

/// Convenience alias used throughout the crate.
///
/// # Examples
///
/// ```
/// use flowlayout::error::Result;
///
/// fn parse_px(s: &str) -> Result<f32> {
///   Ok(s.trim_end_matches("px").parse::<f32>().unwrap_or(0.0))
/// }
///
/// assert_eq!(parse_px("12px").unwrap(), 12.0);
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
  /// The box tree is structurally invalid.
  #[error("structural error: {0}")]
  Structural(#[from] StructuralError),

  /// Layout could not resolve a used value.
  #[error("layout error: {0}")]
  Layout(#[from] LayoutError),

  /// Text shaping failed.
  #[error("shaper error: {0}")]
  Shaper(#[from] ShaperError),
}

/// Errors raised while building or validating the box tree.
#[derive(Debug, Error)]
pub enum StructuralError {
  /// An area was queried for a containing block before one was assigned.
  #[error("area {0} has no containing block")]
  UnlinkedArea(usize),

  /// The tree violates an ordering or nesting invariant.
  #[error("malformed box tree: {message}")]
  MalformedTree { message: String },
}

/// Errors raised while computing used values.
#[derive(Debug, Error)]
pub enum LayoutError {
  /// A property that must be definite at this point is still auto or percent.
  #[error("used value for '{property}' was not resolved")]
  UnresolvedUsedValue { property: &'static str },

  /// An operation required a formatting context that was never established.
  #[error("no formatting context is in scope")]
  MissingFormattingContext,

  /// Float placement reached an impossible state.
  #[error("float placement failed: {message}")]
  FloatPlacement { message: String },
}

/// Errors raised by a [`crate::text::TextShaper`] implementation.
#[derive(Debug, Error)]
pub enum ShaperError {
  /// No registered face matched the requested font families.
  #[error("no face matches families [{families}]")]
  EmptyCascade { families: String },

  /// A face id was used that the shaper never issued.
  #[error("unknown face id {id}")]
  UnknownFace { id: u32 },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn structural_error_display() {
    let err = Error::from(StructuralError::UnlinkedArea(3));
    assert_eq!(err.to_string(), "structural error: area 3 has no containing block");
  }

  #[test]
  fn malformed_tree_display() {
    let err = Error::from(StructuralError::MalformedTree {
      message: "run outside inline".to_string(),
    });
    assert_eq!(err.to_string(), "structural error: malformed box tree: run outside inline");
  }

  #[test]
  fn layout_error_display() {
    let err = Error::from(LayoutError::UnresolvedUsedValue { property: "width" });
    assert_eq!(err.to_string(), "layout error: used value for 'width' was not resolved");
  }

  #[test]
  fn shaper_error_display() {
    let err = Error::from(ShaperError::EmptyCascade {
      families: "Helvetica, Arial".to_string(),
    });
    assert_eq!(
      err.to_string(),
      "shaper error: no face matches families [Helvetica, Arial]"
    );
  }

  #[test]
  fn from_conversions() {
    fn takes_result() -> Result<()> {
      Err(ShaperError::UnknownFace { id: 9 })?;
      Ok(())
    }
    assert!(matches!(takes_result(), Err(Error::Shaper(_))));
  }
}
