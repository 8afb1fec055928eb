//! Font registration
//!
//! Fonts are registered once, before the renderer serves anything, into an
//! immutable [`FontRegistry`] that every render reads from. The primary title
//! uses the monospace face embedded through `typst-assets`; the secondary title
//! uses a font file supplied at startup. If that file cannot be registered the
//! failure is logged once and the secondary title falls back to the primary
//! face.

use std::borrow::Cow;
use std::path::Path;

use rustybuzz::ttf_parser;

use crate::renderer::RenderError;

/// Family preferred for the primary title
pub const DEFAULT_FAMILY: &str = "DejaVu Sans Mono";

/// Which title block a piece of text belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    Primary,
    Secondary,
}

/// Raw font data plus the face index inside it
#[derive(Debug, Clone)]
pub struct FontSource {
    data: Cow<'static, [u8]>,
    index: u32,
    family: String,
    bold: bool,
    italic: bool,
}

impl FontSource {
    /// Parse face `index` of `data`, returning `None` if it is not a usable font
    pub fn new(data: Cow<'static, [u8]>, index: u32) -> Option<Self> {
        let (family, bold, italic) = {
            let face = ttf_parser::Face::parse(&data, index).ok()?;
            (
                family_name(&face).unwrap_or_default(),
                face.is_bold(),
                face.is_italic() || face.is_oblique(),
            )
        };

        Some(Self {
            data,
            index,
            family,
            bold,
            italic,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Shaping face borrowing this source's data
    pub fn face(&self) -> Option<rustybuzz::Face<'_>> {
        rustybuzz::Face::from_slice(&self.data, self.index)
    }

    /// Every face in a font file or collection
    fn all_in(data: Cow<'static, [u8]>) -> Vec<Self> {
        let count = ttf_parser::fonts_in_collection(&data).unwrap_or(1);
        (0..count)
            .filter_map(|index| Self::new(data.clone(), index))
            .collect()
    }
}

fn family_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == ttf_parser::name_id::FAMILY)
        .find_map(|name| name.to_string())
}

/// Outcome of registering the secondary-script font
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecondaryFont {
    /// The font loaded and is used for the secondary title
    Registered { family: String },
    /// Registration failed or was not requested; the primary face is used
    Fallback { reason: String },
}

/// Fonts available to the renderer, fixed after registration
#[derive(Debug, Clone)]
pub struct FontRegistry {
    primary: FontSource,
    secondary: Option<FontSource>,
    status: SecondaryFont,
}

impl FontRegistry {
    /// Register the embedded default face and, if a path is given, the
    /// secondary-script font.
    ///
    /// A secondary font that cannot be read or parsed is not an error: it is
    /// logged and the registry falls back to the default face. Only a missing
    /// embedded default is reported.
    pub fn register(secondary_path: Option<&Path>) -> Result<Self, RenderError> {
        let Some(path) = secondary_path else {
            return Self::without_secondary("no secondary font configured");
        };

        match load_font_file(path) {
            Ok(source) => Self::with_secondary(source),
            Err(err) => {
                tracing::error!("Failed to register secondary font: {}", err);
                Self::without_secondary(err.to_string())
            }
        }
    }

    /// Register the embedded default face and a secondary font from memory
    #[cfg(test)]
    pub(crate) fn with_secondary_data(data: Vec<u8>) -> Result<Self, RenderError> {
        let source = FontSource::new(Cow::Owned(data), 0).ok_or_else(|| {
            RenderError::FontRegistration {
                path: "<memory>".to_string(),
                reason: "not a valid font".to_string(),
            }
        })?;
        Self::with_secondary(source)
    }

    fn with_secondary(source: FontSource) -> Result<Self, RenderError> {
        let primary = default_font()?;
        tracing::info!(
            "Registered fonts: primary '{}', secondary '{}'",
            primary.family(),
            source.family()
        );

        Ok(Self {
            primary,
            status: SecondaryFont::Registered {
                family: source.family().to_string(),
            },
            secondary: Some(source),
        })
    }

    fn without_secondary(reason: impl Into<String>) -> Result<Self, RenderError> {
        let primary = default_font()?;
        let reason = reason.into();
        tracing::info!(
            "Registered fonts: primary '{}', secondary falls back ({})",
            primary.family(),
            reason
        );

        Ok(Self {
            primary,
            secondary: None,
            status: SecondaryFont::Fallback { reason },
        })
    }

    /// Font used for a title block
    pub fn font(&self, role: FontRole) -> &FontSource {
        match role {
            FontRole::Primary => &self.primary,
            FontRole::Secondary => self.secondary.as_ref().unwrap_or(&self.primary),
        }
    }

    pub fn secondary_status(&self) -> &SecondaryFont {
        &self.status
    }

    /// True when the secondary title is drawn with the default face
    #[cfg(test)]
    pub(crate) fn uses_fallback(&self) -> bool {
        self.secondary.is_none()
    }
}

/// Read and parse a font file from disk
fn load_font_file(path: &Path) -> Result<FontSource, RenderError> {
    let registration_error = |reason: String| RenderError::FontRegistration {
        path: path.display().to_string(),
        reason,
    };

    let data = std::fs::read(path).map_err(|e| registration_error(e.to_string()))?;
    FontSource::new(Cow::Owned(data), 0)
        .ok_or_else(|| registration_error("not a valid font".to_string()))
}

/// Pick the default face among the fonts embedded by `typst-assets`:
/// upright bold DejaVu Sans Mono, then any DejaVu Sans Mono, then anything.
fn default_font() -> Result<FontSource, RenderError> {
    let embedded: Vec<FontSource> = typst_assets::fonts()
        .flat_map(|data| FontSource::all_in(Cow::Borrowed(data)))
        .collect();

    let is_default = |font: &&FontSource| font.family().eq_ignore_ascii_case(DEFAULT_FAMILY);

    embedded
        .iter()
        .filter(is_default)
        .find(|font| font.is_bold() && !font.is_italic())
        .or_else(|| embedded.iter().find(is_default))
        .or_else(|| embedded.first())
        .cloned()
        .ok_or(RenderError::MissingDefaultFont)
}

/// Some embedded face other than the default, standing in for a script font
#[cfg(test)]
pub(crate) fn sample_script_font() -> Vec<u8> {
    typst_assets::fonts()
        .find(|data| {
            FontSource::new(Cow::Borrowed(*data), 0)
                .map(|f| !f.family().eq_ignore_ascii_case(DEFAULT_FAMILY))
                .unwrap_or(false)
        })
        .expect("typst-assets embeds more than one family")
        .to_vec()
}

/// Run `f` under a subscriber that counts error-level events
#[cfg(test)]
pub(crate) fn count_errors<T>(f: impl FnOnce() -> T) -> (T, usize) {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    let errors = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(ErrorCounter(errors.clone()));
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, errors.load(Ordering::SeqCst))
}
