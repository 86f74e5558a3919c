use thiserror::Error;

/// Errors raised while setting up the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to start render worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Core(#[from] complexsets_core::CoreError),
}
