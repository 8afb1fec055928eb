//! Async rendering on the blocking pool
//!
//! Renders are CPU-bound, so servers hand them to tokio's blocking pool and
//! bound them with a timeout instead of running them on a reactor thread.

use std::time::Duration;

use super::errors::RenderError;
use super::output::{ImageFormat, RenderedImage};
use super::{PreviewRenderer, RenderRequest};

/// Render on the blocking pool, giving up after `timeout_ms`
pub async fn render(
    renderer: &PreviewRenderer,
    request: RenderRequest,
    format: ImageFormat,
    timeout_ms: u64,
) -> Result<RenderedImage, RenderError> {
    let renderer = renderer.clone();

    let result = tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        tokio::task::spawn_blocking(move || {
            renderer.render_image(&request, format, &mut rand::thread_rng())
        }),
    )
    .await;

    match result {
        Ok(Ok(rendered)) => rendered,
        Ok(Err(join_error)) => Err(RenderError::TaskFailed(format!(
            "Render task panicked: {}",
            join_error
        ))),
        Err(_timeout) => Err(RenderError::Timeout(timeout_ms)),
    }
}
