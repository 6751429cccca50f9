//! Serif text measurement and rasterization.
//!
//! Parley resolves the generic system `serif` family and shapes one line at a
//! time (wrapping is done upstream, so layouts here never break); vello_cpu
//! rasterizes the glyph runs into a transparent layer that is composited over
//! the canvas.

use crate::composite;
use crate::error::{StorycardError, StorycardResult};
use crate::text::MeasureText;

/// Straight-alpha RGBA text brush carried through parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Stateful serif shaping engine; reuse across lines to keep the font and
/// layout caches warm.
pub struct SerifFont {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
}

impl Default for SerifFont {
    fn default() -> Self {
        Self::new()
    }
}

impl SerifFont {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape a single pre-wrapped line at `size_px`.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrush,
    ) -> StorycardResult<parley::Layout<TextBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(StorycardError::render("font size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Single(parley::style::FontFamily::Generic(
                parley::style::GenericFamily::Serif,
            )),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Rasterize lines centered on `center_x`, each top-aligned at
    /// `block_top + i * line_height`, and composite them over the canvas.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_lines(
        &mut self,
        canvas: &mut [u8],
        canvas_w: u32,
        canvas_h: u32,
        lines: &[String],
        font_size: f32,
        line_height: f32,
        color: [u8; 3],
        center_x: f64,
        block_top: f64,
    ) -> StorycardResult<()> {
        let w: u16 = canvas_w
            .try_into()
            .map_err(|_| StorycardError::render("canvas width exceeds u16"))?;
        let h: u16 = canvas_h
            .try_into()
            .map_err(|_| StorycardError::render("canvas height exceeds u16"))?;

        let brush = TextBrush {
            r: color[0],
            g: color[1],
            b: color[2],
            a: 255,
        };

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let layout = self.layout_line(line, font_size, brush)?;
            let line_w = f64::from(layout.full_width());
            let x = center_x - line_w / 2.0;
            let y = block_top + f64::from(i as u32) * f64::from(line_height);
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));

            for l in layout.lines() {
                for item in l.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let b = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(b.r, b.g, b.b, b.a));
                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(run.run().font())
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        composite::over_in_place(canvas, pixmap.data_as_u8_slice(), 1.0)
    }
}

impl MeasureText for SerifFont {
    fn measure(&mut self, text: &str, font_size: f32) -> StorycardResult<f32> {
        if text.is_empty() {
            return Ok(0.0);
        }
        Ok(self
            .layout_line(text, font_size, TextBrush::default())?
            .full_width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_measures_zero() {
        let mut font = SerifFont::new();
        assert_eq!(font.measure("", 40.0).unwrap(), 0.0);
    }

    #[test]
    fn longer_text_measures_wider() {
        let mut font = SerifFont::new();
        let short = font.measure("hi", 40.0).unwrap();
        let long = font.measure("hi there, longer line", 40.0).unwrap();
        assert!(long >= short);
    }

    #[test]
    fn measurement_scales_with_font_size() {
        let mut font = SerifFont::new();
        let small = font.measure("sample text", 20.0).unwrap();
        let large = font.measure("sample text", 60.0).unwrap();
        assert!(large >= small);
    }

    #[test]
    fn invalid_size_is_rejected() {
        let mut font = SerifFont::new();
        assert!(font.layout_line("x", 0.0, TextBrush::default()).is_err());
        assert!(font.layout_line("x", f32::NAN, TextBrush::default()).is_err());
    }
}
