//! Relative luminance and light/dark classification for RGB triples.
//!
//! Uses the ITU-R BT.709 coefficients over gamma-corrected sRGB channels, the
//! same formula WCAG contrast math is built on.

/// Relative luminance of an sRGB color, in `[0, 1]`.
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
}

/// True when the color reads as light (luminance above 0.5).
pub fn is_light(r: u8, g: u8, b: u8) -> bool {
    luminance(r, g, b) > 0.5
}

fn linearize(c: u8) -> f64 {
    let c = f64::from(c) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luminance_extremes() {
        assert!((luminance(255, 255, 255) - 1.0).abs() < 1e-9);
        assert_eq!(luminance(0, 0, 0), 0.0);
    }

    #[test]
    fn luminance_is_bounded() {
        for &(r, g, b) in &[
            (1u8, 2u8, 3u8),
            (40, 40, 40),
            (128, 64, 200),
            (254, 254, 254),
            (255, 0, 0),
            (0, 255, 0),
            (0, 0, 255),
        ] {
            let l = luminance(r, g, b);
            assert!((0.0..=1.0).contains(&l), "luminance({r},{g},{b}) = {l}");
        }
    }

    #[test]
    fn green_dominates_channel_weights() {
        assert!(luminance(0, 255, 0) > luminance(255, 0, 0));
        assert!(luminance(255, 0, 0) > luminance(0, 0, 255));
    }

    #[test]
    fn is_light_classification() {
        assert!(is_light(255, 255, 255));
        assert!(!is_light(0, 0, 0));
        assert!(!is_light(40, 40, 40));
        assert!(is_light(230, 230, 230));
    }
}
