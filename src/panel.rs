//! The translucent quote panel: geometry from the fitted text block,
//! adaptive alpha sampled from the blurred backdrop, a locally intensified
//! blur behind a rounded-rect mask, and the tint fill.

use kurbo::{Rect, Shape};

use crate::blur;
use crate::color;
use crate::composite;
use crate::error::{StorycardError, StorycardResult};
use crate::model::RatioConfig;
use crate::text::FittedText;

/// Alpha bounds of the adaptive panel fill.
pub const ALPHA_MIN: f32 = 0.28;
pub const ALPHA_MAX: f32 = 0.78;
/// Fixed alpha applied when backdrop sampling yields nothing.
pub const ALPHA_FALLBACK: f32 = 0.65;

/// A fully resolved panel, ready to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Panel {
    /// Rounded to whole pixels, at least 1x1. May extend past the canvas;
    /// drawing clamps.
    pub rect: Rect,
    pub corner_radius: f64,
    /// Straight-alpha fill color over the re-blurred snapshot.
    pub tint: [u8; 3],
    pub alpha: f32,
}

/// Top edge of the text block: vertically centered in the text area's free
/// space (may go negative when the floor-size text still overflows).
pub fn block_top(text_area: Rect, total_text_height: f64) -> f64 {
    text_area.y0 + (text_area.height() - total_text_height) / 2.0
}

/// Panel rectangle hugging the text block plus padding, centered on the text
/// area's horizontal center.
pub fn panel_rect(
    text_area: Rect,
    fitted: &FittedText,
    max_line_width: f64,
    cfg: &RatioConfig,
) -> Rect {
    let total_h = f64::from(fitted.total_height());
    let width = (max_line_width + cfg.padding_x * 2.0).round().max(1.0);
    let height = (total_h + cfg.padding_y * 2.0).round().max(1.0);
    let center_x = (text_area.x0 + text_area.x1) / 2.0;
    let x = (center_x - width / 2.0).round();
    let y = (block_top(text_area, total_h) - cfg.padding_y).round();
    Rect::new(x, y, x + width, y + height)
}

/// Mean relative luminance of the blurred backdrop within `rect`, or `None`
/// when the clamped region contains no pixels.
pub fn sample_mean_luminance(blurred: &[u8], width: u32, height: u32, rect: Rect) -> Option<f64> {
    let (x0, y0, x1, y1) = clamp_to_canvas(rect, width, height)?;

    let mut sum = 0.0f64;
    let mut n = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            let i = ((y as usize) * (width as usize) + x as usize) * 4;
            sum += color::luminance(blurred[i], blurred[i + 1], blurred[i + 2]);
            n += 1;
        }
    }
    (n > 0).then(|| sum / n as f64)
}

/// Map sampled backdrop luminance to panel alpha: brighter backdrop, lower
/// alpha.
pub fn adaptive_alpha(mean_luminance: f64) -> f32 {
    (0.78 - mean_luminance as f32 * 0.50).clamp(ALPHA_MIN, ALPHA_MAX)
}

/// Resolve the panel for a fitted text block.
pub fn resolve(
    text_area: Rect,
    fitted: &FittedText,
    max_line_width: f64,
    palette_luminance: f64,
    blurred: &[u8],
    canvas_w: u32,
    canvas_h: u32,
    cfg: &RatioConfig,
) -> Panel {
    let rect = panel_rect(text_area, fitted, max_line_width, cfg);
    let alpha = sample_mean_luminance(blurred, canvas_w, canvas_h, rect)
        .map_or(ALPHA_FALLBACK, adaptive_alpha);
    let tint = if palette_luminance > 0.5 {
        [255, 255, 255]
    } else {
        [0, 0, 0]
    };
    Panel {
        rect,
        corner_radius: cfg.corner_radius,
        tint,
        alpha,
    }
}

/// Draw the panel onto the canvas: re-blur the backdrop snapshot under the
/// panel, clip it and the tint through the rounded-rect coverage mask.
pub fn render(
    canvas: &mut [u8],
    blurred: &[u8],
    canvas_w: u32,
    canvas_h: u32,
    panel: &Panel,
    cfg: &RatioConfig,
) -> StorycardResult<()> {
    let expected = (canvas_w as usize) * (canvas_h as usize) * 4;
    if canvas.len() != expected || blurred.len() != expected {
        return Err(StorycardError::render("panel buffers must match the canvas"));
    }

    let Some((x0, y0, x1, y1)) = clamp_to_canvas(panel.rect, canvas_w, canvas_h) else {
        return Ok(());
    };
    let (pw, ph) = (x1 - x0, y1 - y0);

    // Snapshot the pre-overlay blurred backdrop under the panel.
    let mut snapshot = vec![0u8; (pw as usize) * (ph as usize) * 4];
    for y in 0..ph {
        for x in 0..pw {
            let src = (((y0 + y) as usize) * (canvas_w as usize) + (x0 + x) as usize) * 4;
            let dst = ((y as usize) * (pw as usize) + x as usize) * 4;
            snapshot[dst..dst + 4].copy_from_slice(&blurred[src..src + 4]);
        }
    }

    let radius = local_blur_radius(panel.rect, cfg);
    let snapshot = blur::blur_rgba8(&snapshot, pw, ph, radius)?;

    let mask = rounded_rect_coverage(panel.rect, panel.corner_radius, x0, y0, pw, ph)?;
    let tint = composite::premul(panel.tint, panel.alpha);

    for y in 0..ph {
        for x in 0..pw {
            let i = ((y as usize) * (pw as usize) + x as usize) * 4;
            let cover = mask[i + 3];
            if cover == 0 {
                continue;
            }
            let ci = (((y0 + y) as usize) * (canvas_w as usize) + (x0 + x) as usize) * 4;
            let dst = [canvas[ci], canvas[ci + 1], canvas[ci + 2], canvas[ci + 3]];

            let snap = [snapshot[i], snapshot[i + 1], snapshot[i + 2], snapshot[i + 3]];
            let with_snap = composite::over(dst, composite::scale(snap, cover), 1.0);
            let out = composite::over(with_snap, composite::scale(tint, cover), 1.0);
            canvas[ci..ci + 4].copy_from_slice(&out);
        }
    }

    Ok(())
}

/// Rasterize the rounded-rect coverage for the clamped panel window.
///
/// The path is built in full panel coordinates so corners stay correct when
/// the rect pokes past a canvas edge.
fn rounded_rect_coverage(
    rect: Rect,
    radius: f64,
    x0: u32,
    y0: u32,
    pw: u32,
    ph: u32,
) -> StorycardResult<Vec<u8>> {
    let w: u16 = pw
        .try_into()
        .map_err(|_| StorycardError::render("panel width exceeds u16"))?;
    let h: u16 = ph
        .try_into()
        .map_err(|_| StorycardError::render("panel height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        rect.x0 - f64::from(x0),
        rect.y0 - f64::from(y0),
    )));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));

    let rr = kurbo::RoundedRect::new(0.0, 0.0, rect.width(), rect.height(), radius);
    let mut path = vello_cpu::kurbo::BezPath::new();
    for el in rr.path_elements(0.1) {
        path.push(el);
    }
    ctx.fill_path(&path);
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

/// Locally intensified blur radius, scaled to the full panel rect (not the
/// canvas-clamped window).
fn local_blur_radius(rect: Rect, cfg: &RatioConfig) -> u32 {
    let r = (rect.width().max(rect.height()) / 3.0).round() as u32;
    r.clamp(cfg.panel_blur_min, cfg.panel_blur_max)
}

fn clamp_to_canvas(rect: Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let x0 = rect.x0.max(0.0).floor() as i64;
    let y0 = rect.y0.max(0.0).floor() as i64;
    let x1 = (rect.x1.ceil() as i64).min(i64::from(width));
    let y1 = (rect.y1.ceil() as i64).min(i64::from(height));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}
