//! Dominant-swatch extraction and contrast-aware color selection.
//!
//! A downsampled copy of the cover is quantized into 5-bit-per-channel
//! buckets; buckets are classified by saturation/lightness into vibrant,
//! muted, and dark-muted candidates, and the chain vibrant -> muted ->
//! dark-muted picks the swatch. This is a coarse heuristic tuned for visual
//! parity, not a contrast-ratio computation.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use palette::{Hsl, IntoColor, Srgb};

use crate::color;

/// Palette luminance assumed when no usable swatch exists (treated as dark).
pub const DEFAULT_PALETTE_LUMINANCE: f64 = 0.2;

const TEXT_NEAR_BLACK: [u8; 3] = [40, 40, 40];
const TEXT_NEAR_WHITE: [u8; 3] = [255, 255, 255];

/// Longest side of the downsampled analysis copy.
const SAMPLE_SIZE: u32 = 64;

/// A representative color pulled from the cover.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swatch {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Relative luminance of the swatch, in `[0, 1]`.
    pub luminance: f64,
}

/// Extraction result driving text and panel color choices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteSummary {
    pub swatch: Option<Swatch>,
    /// Swatch luminance, or [`DEFAULT_PALETTE_LUMINANCE`] without a swatch.
    pub luminance: f64,
    /// Quote text color: near-black over light swatches, otherwise white.
    pub text_color: [u8; 3],
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SwatchClass {
    Vibrant,
    Muted,
    DarkMuted,
}

/// Extract a palette summary from a decoded cover image.
///
/// Never fails: images with no classifiable color (all black, all white,
/// fully transparent) yield no swatch and the dark defaults.
pub fn extract(image: &RgbaImage) -> PaletteSummary {
    let swatch = dominant_swatch(image);

    let text_color = match swatch {
        Some(s) if color::is_light(s.r, s.g, s.b) => TEXT_NEAR_BLACK,
        Some(_) => TEXT_NEAR_WHITE,
        None => TEXT_NEAR_WHITE,
    };
    let luminance = swatch.map_or(DEFAULT_PALETTE_LUMINANCE, |s| s.luminance);

    PaletteSummary {
        swatch,
        luminance,
        text_color,
    }
}

fn dominant_swatch(image: &RgbaImage) -> Option<Swatch> {
    let small = downsample(image);

    // 5-bit buckets per channel: 32^3 entries.
    let mut buckets = vec![0u32; 32 * 32 * 32];
    for p in small.pixels() {
        let [r, g, b, a] = p.0;
        if a < 16 {
            continue;
        }
        // Extreme blacks/whites are usually borders or page background.
        let sum = u32::from(r) + u32::from(g) + u32::from(b);
        if sum <= 24 || sum >= 750 {
            continue;
        }
        let idx = ((r >> 3) as usize) << 10 | ((g >> 3) as usize) << 5 | (b >> 3) as usize;
        buckets[idx] = buckets[idx].saturating_add(1);
    }

    let mut best: [Option<(u32, usize)>; 3] = [None; 3];
    for (idx, &count) in buckets.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let (r, g, b) = bucket_center(idx);
        let Some(class) = classify(r, g, b) else {
            continue;
        };
        let slot = &mut best[class as usize];
        if slot.is_none_or(|(c, _)| count > c) {
            *slot = Some((count, idx));
        }
    }

    let pick = best[SwatchClass::Vibrant as usize]
        .or(best[SwatchClass::Muted as usize])
        .or(best[SwatchClass::DarkMuted as usize])?;

    let (r, g, b) = bucket_center(pick.1);
    Some(Swatch {
        r,
        g,
        b,
        luminance: color::luminance(r, g, b),
    })
}

fn downsample(image: &RgbaImage) -> RgbaImage {
    let (w, h) = image.dimensions();
    if w <= SAMPLE_SIZE && h <= SAMPLE_SIZE {
        return image.clone();
    }
    let scale = (SAMPLE_SIZE as f32 / w as f32).min(SAMPLE_SIZE as f32 / h as f32);
    let new_w = ((w as f32) * scale).round().max(1.0) as u32;
    let new_h = ((h as f32) * scale).round().max(1.0) as u32;
    imageops::resize(image, new_w, new_h, FilterType::Triangle)
}

/// Classification bands follow the vibrant/muted/dark-muted targets of the
/// usual dominant-palette algorithms.
fn classify(r: u8, g: u8, b: u8) -> Option<SwatchClass> {
    let hsl: Hsl = Srgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    )
    .into_color();
    let s = hsl.saturation;
    let l = hsl.lightness;

    if (0.3..=0.7).contains(&l) {
        if s >= 0.35 {
            Some(SwatchClass::Vibrant)
        } else {
            Some(SwatchClass::Muted)
        }
    } else if l < 0.3 {
        Some(SwatchClass::DarkMuted)
    } else {
        None
    }
}

fn bucket_center(idx: usize) -> (u8, u8, u8) {
    let to_8 = |v5: u8| (v5 << 3) | (v5 >> 2);
    (
        to_8(((idx >> 10) & 31) as u8),
        to_8(((idx >> 5) & 31) as u8),
        to_8((idx & 31) as u8),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(r: u8, g: u8, b: u8) -> RgbaImage {
        RgbaImage::from_pixel(16, 16, image::Rgba([r, g, b, 255]))
    }

    #[test]
    fn saturated_red_yields_dark_text() {
        let summary = extract(&solid(200, 30, 30));
        let swatch = summary.swatch.expect("saturated color yields a swatch");
        assert!(swatch.r > swatch.g);
        // Pure-ish red is dark in relative luminance, so text stays white.
        assert_eq!(summary.text_color, [255, 255, 255]);
    }

    #[test]
    fn light_swatch_yields_near_black_text() {
        // Classifies vibrant (in the lightness band, saturated) yet reads as
        // light in relative luminance, so the text flips to near-black.
        let summary = extract(&solid(180, 230, 80));
        assert!(summary.swatch.is_some());
        assert_eq!(summary.text_color, [40, 40, 40]);
        assert!(summary.luminance > 0.5);
    }

    #[test]
    fn pale_colors_above_the_lightness_band_yield_no_swatch() {
        // HSL lightness ~0.73 sits above every classification band.
        let summary = extract(&solid(200, 200, 160));
        assert!(summary.swatch.is_none());
        assert_eq!(summary.text_color, [255, 255, 255]);
        assert_eq!(summary.luminance, DEFAULT_PALETTE_LUMINANCE);
    }

    #[test]
    fn black_image_has_no_swatch_and_dark_defaults() {
        let summary = extract(&solid(0, 0, 0));
        assert!(summary.swatch.is_none());
        assert_eq!(summary.luminance, DEFAULT_PALETTE_LUMINANCE);
        assert_eq!(summary.text_color, [255, 255, 255]);
    }

    #[test]
    fn white_image_has_no_swatch() {
        let summary = extract(&solid(255, 255, 255));
        assert!(summary.swatch.is_none());
    }

    #[test]
    fn vibrant_wins_over_muted() {
        // Two halves: a large muted gray region and a smaller vibrant blue
        // one. The vibrant class is preferred regardless of population.
        let mut img = RgbaImage::from_pixel(32, 32, image::Rgba([120, 120, 120, 255]));
        for y in 0..8 {
            for x in 0..32 {
                img.put_pixel(x, y, image::Rgba([30, 60, 220, 255]));
            }
        }
        let summary = extract(&img);
        let swatch = summary.swatch.unwrap();
        assert!(swatch.b > swatch.r, "expected the vibrant blue swatch");
    }

    #[test]
    fn transparent_pixels_are_ignored() {
        let img = RgbaImage::from_pixel(8, 8, image::Rgba([200, 30, 30, 0]));
        assert!(extract(&img).swatch.is_none());
    }
}
