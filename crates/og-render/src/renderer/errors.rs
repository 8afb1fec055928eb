//! Error types for registration and rendering

use thiserror::Error;

/// Renderer errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// The secondary-script font could not be loaded. Registration logs this
    /// and falls back; it never reaches a render call.
    #[error("Font registration failed for '{path}': {reason}")]
    FontRegistration { path: String, reason: String },

    #[error("No embedded default font available")]
    MissingDefaultFont,

    /// Canvas creation or PNG encoding failed
    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Render timeout after {0}ms")]
    Timeout(u64),

    #[error("Render task failed: {0}")]
    TaskFailed(String),
}
