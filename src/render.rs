//! End-to-end card generation: validate, decode, analyze, compose, encode.

use anyhow::Context as _;
use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::background;
use crate::blur;
use crate::composite;
use crate::error::{StorycardError, StorycardResult};
use crate::font::SerifFont;
use crate::layout;
use crate::model::{AspectRatio, CardImage, RatioConfig};
use crate::palette;
use crate::panel;
use crate::text::{self, MeasureText as _};

/// Thumbnail drop shadow: black at half opacity, offset down-right.
const SHADOW_ALPHA: f32 = 0.5;
const SHADOW_OFFSET: i64 = 5;

/// Renders quote cards. Owns the font and layout contexts, so reusing one
/// renderer across requests keeps shaping caches warm; rendering itself is
/// stateless and deterministic.
pub struct CardRenderer {
    font: SerifFont,
}

impl Default for CardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CardRenderer {
    pub fn new() -> Self {
        Self {
            font: SerifFont::new(),
        }
    }

    /// Render a card and encode it as PNG.
    pub fn generate(
        &mut self,
        image_bytes: &[u8],
        quote: &str,
        ratio: AspectRatio,
    ) -> StorycardResult<Vec<u8>> {
        let card = self.render(image_bytes, quote, ratio)?;
        encode_png(&card)
    }

    /// Render a card to a raw RGBA frame.
    ///
    /// Validation failures surface as [`StorycardError::MissingQuote`] and
    /// [`StorycardError::MissingImage`]; every processing failure collapses
    /// into a single opaque [`StorycardError::Unprocessable`], with the cause
    /// logged here.
    pub fn render(
        &mut self,
        image_bytes: &[u8],
        quote: &str,
        ratio: AspectRatio,
    ) -> StorycardResult<CardImage> {
        if quote.trim().is_empty() {
            return Err(StorycardError::MissingQuote);
        }
        if image_bytes.is_empty() {
            return Err(StorycardError::MissingImage);
        }

        self.compose(image_bytes, quote, ratio).map_err(|err| {
            if err.is_validation() {
                return err;
            }
            tracing::error!(error = %err, ratio = ratio.as_str(), "card composition failed");
            StorycardError::unprocessable("failed to generate image")
        })
    }

    fn compose(
        &mut self,
        image_bytes: &[u8],
        quote: &str,
        ratio: AspectRatio,
    ) -> StorycardResult<CardImage> {
        let cfg = ratio.config();

        let cover = image::load_from_memory(image_bytes)
            .context("decode cover image")?
            .to_rgba8();
        let (src_w, src_h) = cover.dimensions();
        tracing::debug!(src_w, src_h, ratio = ratio.as_str(), "cover decoded");

        let summary = palette::extract(&cover);
        tracing::debug!(
            swatch = ?summary.swatch,
            luminance = summary.luminance,
            "palette extracted"
        );

        let bg = background::compose(&cover, &cfg)?;
        let plan = layout::plan(ratio, src_w, src_h);

        let fitted = text::fit_font_size(
            quote,
            plan.text_area.width() as f32,
            plan.text_area.height() as f32,
            &mut self.font,
        )?;
        let mut max_line_width = 0.0f64;
        for line in &fitted.lines {
            max_line_width =
                max_line_width.max(f64::from(self.font.measure(line, fitted.font_size as f32)?));
        }
        tracing::debug!(
            font_size = fitted.font_size,
            lines = fitted.lines.len(),
            "quote fitted"
        );

        // The canvas is painted in a fixed order: backdrop+overlay, thumbnail
        // with shadow, panel blur and tint, text.
        let mut canvas = bg.canvas;

        draw_thumbnail(&mut canvas, &cover, &plan.thumbnail, &cfg)?;

        let quote_panel = panel::resolve(
            plan.text_area,
            &fitted,
            max_line_width,
            summary.luminance,
            &bg.blurred,
            bg.width,
            bg.height,
            &cfg,
        );
        panel::render(&mut canvas, &bg.blurred, bg.width, bg.height, &quote_panel, &cfg)?;

        let center_x = (plan.text_area.x0 + plan.text_area.x1) / 2.0;
        let top = panel::block_top(plan.text_area, f64::from(fitted.total_height()));
        self.font.draw_lines(
            &mut canvas,
            bg.width,
            bg.height,
            &fitted.lines,
            fitted.font_size as f32,
            fitted.line_height,
            summary.text_color,
            center_x,
            top,
        )?;

        Ok(CardImage {
            width: bg.width,
            height: bg.height,
            data: canvas,
        })
    }
}

/// Resize the cover into its thumbnail rect and draw it with a soft drop
/// shadow.
fn draw_thumbnail(
    canvas: &mut [u8],
    cover: &RgbaImage,
    rect: &kurbo::Rect,
    cfg: &RatioConfig,
) -> StorycardResult<()> {
    let tw = (rect.width().round() as u32).max(1);
    let th = (rect.height().round() as u32).max(1);
    let tx = rect.x0.round() as i64;
    let ty = rect.y0.round() as i64;

    // Shadow: a filled rect blurred in a padded scratch buffer, offset
    // down-right.
    let pad = cfg.shadow_blur_radius;
    let sw = tw + 2 * pad;
    let sh = th + 2 * pad;
    let mut shadow = vec![0u8; (sw as usize) * (sh as usize) * 4];
    let shadow_px = composite::premul([0, 0, 0], SHADOW_ALPHA);
    for y in pad..pad + th {
        for x in pad..pad + tw {
            let i = ((y as usize) * (sw as usize) + x as usize) * 4;
            shadow[i..i + 4].copy_from_slice(&shadow_px);
        }
    }
    let shadow = blur::blur_rgba8(&shadow, sw, sh, cfg.shadow_blur_radius)?;
    composite::blit_over(
        canvas,
        cfg.canvas_width,
        cfg.canvas_height,
        &shadow,
        sw,
        sh,
        tx - i64::from(pad) + SHADOW_OFFSET,
        ty - i64::from(pad) + SHADOW_OFFSET,
    )?;

    let thumb = imageops::resize(cover, tw, th, FilterType::Lanczos3);
    composite::blit_over(
        canvas,
        cfg.canvas_width,
        cfg.canvas_height,
        thumb.as_raw(),
        tw,
        th,
        tx,
        ty,
    )
}

fn encode_png(card: &CardImage) -> StorycardResult<Vec<u8>> {
    let mut out = std::io::Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut out,
        &card.data,
        card.width,
        card.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .context("encode png")?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_quote_fails_before_decode() {
        let mut r = CardRenderer::new();
        // Intentionally invalid image bytes: validation must win.
        let err = r.render(b"not an image", "   ", AspectRatio::Story).unwrap_err();
        assert!(matches!(err, StorycardError::MissingQuote));
    }

    #[test]
    fn missing_image_fails_fast() {
        let mut r = CardRenderer::new();
        let err = r.render(&[], "a quote", AspectRatio::Story).unwrap_err();
        assert!(matches!(err, StorycardError::MissingImage));
    }

    #[test]
    fn undecodable_image_collapses_to_unprocessable() {
        let mut r = CardRenderer::new();
        let err = r
            .render(b"definitely not an image", "a quote", AspectRatio::Story)
            .unwrap_err();
        assert!(matches!(err, StorycardError::Unprocessable(_)));
    }
}
