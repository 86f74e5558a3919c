pub mod color;
pub mod complex;
pub mod complex_map;
pub mod error;
pub mod escape;
pub mod gradient;

// Re-export primary types for convenience.
pub use color::{Color, Pixel};
pub use complex::Complex;
pub use complex_map::ComplexMap;
pub use error::CoreError;
pub use escape::{EscapeEvaluator, EscapeParams};
pub use gradient::{ColorGradient, ColorStop};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
