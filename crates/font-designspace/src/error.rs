//! Error types for designspace operations.

/// Result type for designspace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while mapping or normalizing coordinates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Axis extremes are out of order.
    #[error("axis bounds must satisfy minimum <= default <= maximum, got {minimum}/{default}/{maximum}")]
    InvalidAxisBounds {
        minimum: f64,
        default: f64,
        maximum: f64,
    },
}
