//! Preview image rendering entry points

pub mod errors;
pub mod output;
#[cfg(feature = "server")]
pub mod render;

pub use errors::RenderError;
pub use output::{decode_data_uri, to_data_uri, ImageFormat, RenderedImage};
#[cfg(feature = "server")]
pub use render::render;

use std::sync::Arc;

use rand::Rng;

use crate::color::Color;
use crate::fonts::FontRegistry;
use crate::layout::{layout_titles, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::raster::{Canvas, Typefaces, OVERLAY_ALPHA};

/// Inputs of a single render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderRequest {
    pub primary_title: String,
    pub secondary_title: String,
    /// Picked from [`crate::PALETTE`] when absent
    pub background: Option<Color>,
}

impl RenderRequest {
    pub fn new(primary_title: impl Into<String>, secondary_title: impl Into<String>) -> Self {
        Self {
            primary_title: primary_title.into(),
            secondary_title: secondary_title.into(),
            background: None,
        }
    }

    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    /// The requested background, or a palette entry drawn from `rng`
    pub fn resolve_background<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.background.unwrap_or_else(|| Color::random(rng))
    }
}

/// Renders preview images over a registered font set.
///
/// Holds no mutable state; clones share the registry and can render
/// concurrently.
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    fonts: Arc<FontRegistry>,
}

impl PreviewRenderer {
    pub fn new(fonts: FontRegistry) -> Self {
        Self {
            fonts: Arc::new(fonts),
        }
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Render and return a `data:image/png;base64,...` URI
    pub fn render_as_data_uri(
        &self,
        primary_title: &str,
        secondary_title: &str,
        background: Option<Color>,
    ) -> Result<String, RenderError> {
        self.render_as_data_uri_with_rng(
            primary_title,
            secondary_title,
            background,
            &mut rand::thread_rng(),
        )
    }

    pub fn render_as_data_uri_with_rng<R: Rng + ?Sized>(
        &self,
        primary_title: &str,
        secondary_title: &str,
        background: Option<Color>,
        rng: &mut R,
    ) -> Result<String, RenderError> {
        let request =
            RenderRequest::new(primary_title, secondary_title).with_background(background);
        let png = self.render_png(&request, rng)?;
        Ok(to_data_uri(&png))
    }

    /// Render and return PNG bytes
    pub fn render_as_bytes(
        &self,
        primary_title: &str,
        secondary_title: &str,
        background: Option<Color>,
    ) -> Result<Vec<u8>, RenderError> {
        self.render_as_bytes_with_rng(
            primary_title,
            secondary_title,
            background,
            &mut rand::thread_rng(),
        )
    }

    pub fn render_as_bytes_with_rng<R: Rng + ?Sized>(
        &self,
        primary_title: &str,
        secondary_title: &str,
        background: Option<Color>,
        rng: &mut R,
    ) -> Result<Vec<u8>, RenderError> {
        let request =
            RenderRequest::new(primary_title, secondary_title).with_background(background);
        self.render_png(&request, rng)
    }

    /// Render a request into the given output format
    pub fn render_image<R: Rng + ?Sized>(
        &self,
        request: &RenderRequest,
        format: ImageFormat,
        rng: &mut R,
    ) -> Result<RenderedImage, RenderError> {
        let png = self.render_png(request, rng)?;
        Ok(RenderedImage::encode(png, format))
    }

    /// Layout the titles would get, without rasterizing
    #[cfg(test)]
    pub(crate) fn layout(
        &self,
        request: &RenderRequest,
    ) -> Result<crate::layout::TitleLayout, RenderError> {
        let faces = Typefaces::load(&self.fonts)?;
        Ok(layout_titles(
            &faces,
            &request.primary_title,
            &request.secondary_title,
        ))
    }

    fn render_png<R: Rng + ?Sized>(
        &self,
        request: &RenderRequest,
        rng: &mut R,
    ) -> Result<Vec<u8>, RenderError> {
        let background = request.resolve_background(rng);
        let canvas = self.paint(request, background)?;
        canvas.encode_png()
    }

    /// Background, darkening overlay, then both title blocks
    fn paint(
        &self,
        request: &RenderRequest,
        background: Color,
    ) -> Result<Canvas, RenderError> {
        let faces = Typefaces::load(&self.fonts)?;
        let layout = layout_titles(&faces, &request.primary_title, &request.secondary_title);

        let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT)?;
        canvas.fill(background);
        canvas.darken(OVERLAY_ALPHA)?;

        for line in &layout.lines {
            canvas.draw_line(&faces, line);
        }

        tracing::debug!(
            %background,
            lines = layout.lines.len(),
            "Rendered preview image"
        );

        Ok(canvas)
    }
}
