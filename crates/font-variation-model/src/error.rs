//! Error types for variation modeling.

use font_designspace::NormalizedLocation;

/// Result type for variation-model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying a variation model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two master locations collapse to the same point once explicit zeros
    /// are dropped.
    #[error("duplicate master location {location:?}")]
    DuplicateMaster { location: NormalizedLocation },

    /// A master coordinate outside the normalized range.
    #[error("coordinate {value} for axis '{tag}' is outside [-1, 1]")]
    CoordinateOutOfRange { tag: String, value: f64 },

    /// A per-master sequence whose length does not match the master count.
    #[error("expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}
