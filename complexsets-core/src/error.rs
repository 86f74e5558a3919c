use thiserror::Error;

/// Errors raised while building core configuration values.
///
/// The per-pixel operations themselves are infallible; only construction
/// from user-supplied settings can fail.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid escape radius: {0} (must be > 0.0 and finite)")]
    InvalidEscapeRadius(f64),

    #[error("a color gradient needs at least one stop")]
    EmptyGradient,

    #[error("invalid color stop position: {0} (must be within 0.0..=1.0)")]
    InvalidStopPosition(f32),
}
