//! Rasterization backend
//!
//! Text is shaped with rustybuzz, so complex scripts get their conjuncts and
//! reordering, and glyph outlines are filled as anti-aliased tiny-skia paths.

use rustybuzz::ttf_parser::{GlyphId, OutlineBuilder};
use rustybuzz::{GlyphBuffer, UnicodeBuffer};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

use crate::color::Color;
use crate::fonts::{FontRegistry, FontRole};
use crate::layout::{LayoutLine, TextMeasurer};
use crate::renderer::RenderError;

/// Alpha of the black layer laid over the background
pub const OVERLAY_ALPHA: f32 = 0.8;

/// Shaping faces for one render, borrowed from the registry
pub struct Typefaces<'a> {
    primary: rustybuzz::Face<'a>,
    secondary: rustybuzz::Face<'a>,
}

impl<'a> Typefaces<'a> {
    pub fn load(fonts: &'a FontRegistry) -> Result<Self, RenderError> {
        let load = |role: FontRole| {
            let source = fonts.font(role);
            source.face().ok_or_else(|| {
                RenderError::Render(format!("font '{}' could not be parsed", source.family()))
            })
        };

        Ok(Self {
            primary: load(FontRole::Primary)?,
            secondary: load(FontRole::Secondary)?,
        })
    }

    fn face(&self, role: FontRole) -> &rustybuzz::Face<'a> {
        match role {
            FontRole::Primary => &self.primary,
            FontRole::Secondary => &self.secondary,
        }
    }

    fn shape(&self, text: &str, role: FontRole) -> GlyphBuffer {
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        rustybuzz::shape(self.face(role), &[], buffer)
    }

    /// Pixels per font unit at `size_px`
    fn scale(&self, role: FontRole, size_px: f32) -> f32 {
        size_px / self.face(role).units_per_em() as f32
    }
}

impl TextMeasurer for Typefaces<'_> {
    fn measure_width(&self, text: &str, font: FontRole, size_px: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let glyphs = self.shape(text, font);
        let advance: i32 = glyphs.glyph_positions().iter().map(|p| p.x_advance).sum();
        advance as f32 * self.scale(font, size_px)
    }
}

/// Collects a glyph outline (font units, y up) into a tiny-skia path
struct GlyphPath(PathBuilder);

impl OutlineBuilder for GlyphPath {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

/// Fixed-size RGBA drawing surface
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::Render(format!("failed to create {}x{} pixmap", width, height))
        })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    #[cfg(test)]
    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Fill the whole canvas with an opaque color
    pub fn fill(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    /// Composite black at `alpha` over the whole canvas
    pub fn darken(&mut self, alpha: f32) -> Result<(), RenderError> {
        let rect = Rect::from_xywh(0.0, 0.0, self.width() as f32, self.height() as f32)
            .ok_or_else(|| RenderError::Render("invalid canvas bounds".to_string()))?;

        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8);
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        Ok(())
    }

    /// Draw one laid-out line in white, its top edge at `line.y`
    pub fn draw_line(&mut self, faces: &Typefaces<'_>, line: &LayoutLine) {
        if line.text.is_empty() {
            return;
        }

        let face = faces.face(line.font);
        let scale = faces.scale(line.font, line.font_size_px);
        let baseline = line.y + face.ascender() as f32 * scale;

        let mut paint = Paint::default();
        paint.set_color_rgba8(255, 255, 255, 255);
        paint.anti_alias = true;

        let glyphs = faces.shape(&line.text, line.font);
        let mut pen_x = line.x;

        for (info, pos) in glyphs.glyph_infos().iter().zip(glyphs.glyph_positions()) {
            let origin_x = pen_x + pos.x_offset as f32 * scale;
            let origin_y = baseline - pos.y_offset as f32 * scale;
            pen_x += pos.x_advance as f32 * scale;

            let Ok(glyph_id) = u16::try_from(info.glyph_id) else {
                continue;
            };
            let mut builder = GlyphPath(PathBuilder::new());
            if face.outline_glyph(GlyphId(glyph_id), &mut builder).is_none() {
                continue;
            }
            let Some(path) = builder.0.finish() else {
                continue;
            };

            // Font units are y-up; flip into canvas space at the glyph origin.
            let transform = Transform::from_row(scale, 0.0, 0.0, -scale, origin_x, origin_y);
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, transform, None);
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Render(format!("PNG encoding failed: {}", e)))
    }
}
