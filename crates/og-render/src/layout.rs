//! Title layout
//!
//! Both title blocks go through the same two steps: shrink the font until the
//! whole (unwrapped) string fits the interior width, then wrap greedily on
//! spaces at that size. The shrink step measures the unwrapped string, so a
//! wrapped block may end up smaller than strictly necessary. This matches the
//! published images and is kept as is.
//!
//! Each block is measured with the same face it is drawn in, for both the
//! shrink and the wrap step.
//!
//! Measurement is abstracted behind [`TextMeasurer`] so the algorithm can be
//! exercised without a rasterization backend.

use crate::fonts::FontRole;

/// Canvas width in pixels
pub const CANVAS_WIDTH: u32 = 800;
/// Canvas height in pixels
pub const CANVAS_HEIGHT: u32 = 430;
/// Left and top inset, also subtracted on the right for the wrap width
pub const PADDING: f32 = 5.0;
/// Extra vertical advance after each line, on top of the font size
pub const LINE_SPACING: f32 = 10.0;
/// Font size every block starts shrinking from
pub const INITIAL_FONT_SIZE: f32 = 50.0;
/// Font size floor for the shrink loop
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Width available to text: canvas width minus padding on both sides
pub fn interior_width() -> f32 {
    CANVAS_WIDTH as f32 - PADDING * 2.0
}

/// Measures the advance width of a run of text
pub trait TextMeasurer {
    /// Width in pixels of `text` set in `font` at `size_px`
    fn measure_width(&self, text: &str, font: FontRole, size_px: f32) -> f32;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure_width(&self, text: &str, font: FontRole, size_px: f32) -> f32 {
        (**self).measure_width(text, font, size_px)
    }
}

/// One positioned line of a title block
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    pub text: String,
    pub font_size_px: f32,
    pub font: FontRole,
    pub x: f32,
    /// Top of the line box
    pub y: f32,
}

/// Result of laying out both title blocks
#[derive(Debug, Clone, PartialEq)]
pub struct TitleLayout {
    pub lines: Vec<LayoutLine>,
    pub primary_font_size: f32,
    /// `None` when the secondary title was empty and nothing was placed
    pub secondary_font_size: Option<f32>,
    /// Vertical cursor after the last placed line
    pub cursor_y: f32,
}

impl TitleLayout {
    #[cfg(test)]
    pub(crate) fn lines_for(&self, font: FontRole) -> impl Iterator<Item = &LayoutLine> {
        self.lines.iter().filter(move |line| line.font == font)
    }
}

/// Shrink from [`INITIAL_FONT_SIZE`] in 1px steps while the unwrapped text is
/// wider than `max_width`, stopping at [`MIN_FONT_SIZE`].
pub fn fit_font_size<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font: FontRole,
    max_width: f32,
) -> f32 {
    let mut size = INITIAL_FONT_SIZE;
    while measurer.measure_width(text, font, size) > max_width && size > MIN_FONT_SIZE {
        size -= 1.0;
    }
    size
}

/// Greedy word wrap on single spaces.
///
/// A word joins the current line only while the joined line stays strictly
/// narrower than `max_width`. Words are never split, so a word wider than the
/// limit occupies its own (overflowing) line. Empty input yields one empty
/// line, and joining the result with `" "` gives back the input.
pub fn wrap_text<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font: FontRole,
    size_px: f32,
    max_width: f32,
) -> Vec<String> {
    let mut words = text.split(' ');
    let mut lines = Vec::new();
    let mut current = words.next().unwrap_or_default().to_string();

    for word in words {
        let candidate = format!("{} {}", current, word);
        if measurer.measure_width(&candidate, font, size_px) < max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    lines.push(current);
    lines
}

/// Fit, wrap and position one block starting at `*cursor_y`, advancing the
/// cursor past every placed line. Returns the chosen font size.
fn place_block<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font: FontRole,
    cursor_y: &mut f32,
    out: &mut Vec<LayoutLine>,
) -> f32 {
    let max_width = interior_width();
    let size = fit_font_size(measurer, text, font, max_width);

    for line in wrap_text(measurer, text, font, size, max_width) {
        out.push(LayoutLine {
            text: line,
            font_size_px: size,
            font,
            x: PADDING,
            y: *cursor_y,
        });
        *cursor_y += size + LINE_SPACING;
    }

    size
}

/// Lay out the primary block, then the secondary block directly beneath it.
///
/// The primary block always produces at least one line. An empty secondary
/// title places nothing and leaves the cursor where the primary block ended.
/// Nothing is clipped against the canvas height.
pub fn layout_titles<M: TextMeasurer + ?Sized>(
    measurer: &M,
    primary: &str,
    secondary: &str,
) -> TitleLayout {
    let mut lines = Vec::new();
    let mut cursor_y = PADDING;

    let primary_font_size =
        place_block(measurer, primary, FontRole::Primary, &mut cursor_y, &mut lines);

    let secondary_font_size = if secondary.is_empty() {
        None
    } else {
        Some(place_block(
            measurer,
            secondary,
            FontRole::Secondary,
            &mut cursor_y,
            &mut lines,
        ))
    };

    tracing::debug!(
        lines = lines.len(),
        primary_font_size,
        ?secondary_font_size,
        cursor_y,
        "Laid out titles"
    );

    TitleLayout {
        lines,
        primary_font_size,
        secondary_font_size,
        cursor_y,
    }
}
