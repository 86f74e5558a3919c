pub mod buffer;
pub mod controller;
pub mod error;
pub mod rasterizer;
pub mod rect;

pub use buffer::{PixelBuffer, RowSegment};
pub use controller::{ViewState, ViewportController, WindowPlacement};
pub use error::RenderError;
pub use rasterizer::{Rasterizer, RenderStats};
pub use rect::PixelRect;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
