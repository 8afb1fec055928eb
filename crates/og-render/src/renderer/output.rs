//! Output encodings (PNG bytes, data URI)

use base64::Engine;

/// How a rendered image is handed back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    DataUri,
}

impl ImageFormat {
    /// Content type of a response carrying this output
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::DataUri => "text/plain; charset=utf-8",
        }
    }
}

/// A finished render, produced fresh per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedImage {
    Png(Vec<u8>),
    DataUri(String),
}

impl RenderedImage {
    pub fn encode(png: Vec<u8>, format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => RenderedImage::Png(png),
            ImageFormat::DataUri => RenderedImage::DataUri(to_data_uri(&png)),
        }
    }

    pub fn format(&self) -> ImageFormat {
        match self {
            RenderedImage::Png(_) => ImageFormat::Png,
            RenderedImage::DataUri(_) => ImageFormat::DataUri,
        }
    }

    pub fn into_data_uri(self) -> String {
        match self {
            RenderedImage::Png(bytes) => to_data_uri(&bytes),
            RenderedImage::DataUri(uri) => uri,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            RenderedImage::Png(bytes) => bytes,
            RenderedImage::DataUri(uri) => uri.into_bytes(),
        }
    }
}

/// Prefix of every data URI this crate produces
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Wrap PNG bytes in a base64 data URI
pub fn to_data_uri(png: &[u8]) -> String {
    let engine = base64::engine::general_purpose::STANDARD;
    format!("{}{}", DATA_URI_PREFIX, engine.encode(png))
}

/// Recover PNG bytes from a data URI produced by [`to_data_uri`]
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let engine = base64::engine::general_purpose::STANDARD;
    let payload = uri.strip_prefix(DATA_URI_PREFIX)?;
    engine.decode(payload).ok()
}
