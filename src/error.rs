//! Error type shared by startup and the few failures that stop a running scene.

use thiserror::Error;

/// Everything that can stop the scene.
///
/// Only [`SnowError::GraphicsUnavailable`] is expected in practice; most remaining variants
/// guard the embedded assets, user-supplied geometry and the platform layer.
#[derive(Debug, Error)]
pub enum SnowError {
    /// Neither the primary backends nor the GL fallback produced a usable adapter.
    #[error("no usable graphics context: neither the primary backends nor the GL fallback produced an adapter")]
    GraphicsUnavailable,

    #[error("failed to request a graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("no shader stage registered under id `{0}`")]
    MissingShader(String),

    #[error("invalid snowflake geometry: {0}")]
    Geometry(#[from] serde_json::Error),

    #[error("snowflake geometry contains no points")]
    EmptyGeometry,

    #[error("{0} snowstorm particles do not fit in one draw call")]
    TooManyParticles(usize),

    #[error("presentation surface failed: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("renderer creation was cancelled before it finished")]
    RendererCancelled,

    #[error("failed to create the window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
