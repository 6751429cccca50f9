//! Backdrop composition: aspect-ratio-aware crop-to-fill, heavy blur, and a
//! darkening overlay.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::blur;
use crate::composite;
use crate::error::StorycardResult;
use crate::model::RatioConfig;

/// Crop window in source-image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Composed backdrop layers for one canvas.
pub struct Background {
    /// Blurred, resampled cover before the darkening overlay. This is the
    /// sampling source for the panel's snapshot and adaptive alpha.
    pub blurred: Vec<u8>,
    /// `blurred` with the flat dark overlay applied; the canvas starts here.
    pub canvas: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Centered crop window that fills the target frame without letterboxing.
pub fn crop_to_fill(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> CropRect {
    let source_aspect = f64::from(src_w) / f64::from(src_h);
    let target_aspect = f64::from(target_w) / f64::from(target_h);

    if source_aspect > target_aspect {
        // Source is wider: full height, trim the sides.
        let height = f64::from(src_h);
        let width = height * target_aspect;
        CropRect {
            x: (f64::from(src_w) - width) / 2.0,
            y: 0.0,
            width,
            height,
        }
    } else {
        // Source is taller: full width, trim top and bottom.
        let width = f64::from(src_w);
        let height = width / target_aspect;
        CropRect {
            x: 0.0,
            y: (f64::from(src_h) - height) / 2.0,
            width,
            height,
        }
    }
}

/// Crop-to-fill, resample to the canvas, blur, and darken.
pub fn compose(cover: &RgbaImage, cfg: &RatioConfig) -> StorycardResult<Background> {
    let (src_w, src_h) = cover.dimensions();
    let (cw, ch) = (cfg.canvas_width, cfg.canvas_height);

    let crop = crop_to_fill(src_w, src_h, cw, ch);
    let cx = (crop.x.round().max(0.0) as u32).min(src_w.saturating_sub(1));
    let cy = (crop.y.round().max(0.0) as u32).min(src_h.saturating_sub(1));
    let cwidth = (crop.width.round() as u32).clamp(1, src_w - cx);
    let cheight = (crop.height.round() as u32).clamp(1, src_h - cy);

    let cropped = imageops::crop_imm(cover, cx, cy, cwidth, cheight).to_image();
    let resized = imageops::resize(&cropped, cw, ch, FilterType::Lanczos3);

    let blurred = blur::blur_rgba8(resized.as_raw(), cw, ch, cfg.background_blur_radius)?;

    let mut canvas = blurred.clone();
    composite::tint_in_place(&mut canvas, [0, 0, 0], cfg.overlay_alpha)?;

    Ok(Background {
        blurred,
        canvas,
        width: cw,
        height: ch,
    })
}
