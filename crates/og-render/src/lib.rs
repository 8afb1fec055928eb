//! Open-Graph preview image rendering
//!
//! This crate synthesizes the social-share preview image for a blog post:
//! a fixed 800×430 canvas carrying the post's primary title and its
//! secondary-script title, each auto-scaled and word-wrapped to fit.
//!
//! - [`layout`]: font-size fitting and word wrapping over a [`layout::TextMeasurer`]
//! - [`fonts`]: one-time font registration (monospace default + secondary script)
//! - [`raster`]: tiny-skia canvas, shaped glyph painting, PNG encoding
//! - [`renderer`]: the [`PreviewRenderer`] entry points (data URI / PNG bytes)
//!
//! # Feature Flags
//!
//! - `server` (default): Enables async [`render`] on tokio's blocking pool with a timeout

pub mod color;
pub mod fonts;
pub mod layout;
pub mod raster;
pub mod renderer;

pub use color::{Color, PALETTE};
pub use fonts::{FontRegistry, FontRole, SecondaryFont};
pub use renderer::{
    ImageFormat, PreviewRenderer, RenderError, RenderRequest, RenderedImage,
};

#[cfg(feature = "server")]
pub use renderer::render;
