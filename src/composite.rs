//! Premultiplied-alpha RGBA8 compositing primitives.
//!
//! The canvas is opaque everywhere, so straight and premultiplied encodings
//! coincide for it; translucent layers (overlay, shadow, panel, text) are
//! premultiplied before they hit the canvas.

use crate::error::{StorycardError, StorycardResult};

pub type Rgba8 = [u8; 4];

/// Porter-Duff `src over dst` for premultiplied pixels, with an extra opacity.
pub fn over(dst: Rgba8, src: Rgba8, opacity: f32) -> Rgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite an equal-sized layer over `dst` in place.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> StorycardResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(StorycardError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Flat tint: composite a solid straight-alpha color over every pixel.
pub fn tint_in_place(dst: &mut [u8], rgb: [u8; 3], alpha: f32) -> StorycardResult<()> {
    let src = premul(rgb, alpha);
    if !dst.len().is_multiple_of(4) {
        return Err(StorycardError::render("tint_in_place expects rgba8 buffer"));
    }
    for d in dst.chunks_exact_mut(4) {
        let out = over([d[0], d[1], d[2], d[3]], src, 1.0);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite `src` (its own small buffer) over `dst` at offset `(dx, dy)`,
/// clipping whatever falls outside the destination.
#[allow(clippy::too_many_arguments)]
pub fn blit_over(
    dst: &mut [u8],
    dst_w: u32,
    dst_h: u32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    dx: i64,
    dy: i64,
) -> StorycardResult<()> {
    if dst.len() != (dst_w as usize) * (dst_h as usize) * 4
        || src.len() != (src_w as usize) * (src_h as usize) * 4
    {
        return Err(StorycardError::render("blit_over buffer size mismatch"));
    }
    for sy in 0..src_h as i64 {
        let gy = dy + sy;
        if gy < 0 || gy >= dst_h as i64 {
            continue;
        }
        for sx in 0..src_w as i64 {
            let gx = dx + sx;
            if gx < 0 || gx >= dst_w as i64 {
                continue;
            }
            let si = ((sy as usize) * (src_w as usize) + sx as usize) * 4;
            let di = ((gy as usize) * (dst_w as usize) + gx as usize) * 4;
            let out = over(
                [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]],
                [src[si], src[si + 1], src[si + 2], src[si + 3]],
                1.0,
            );
            dst[di..di + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Premultiply a straight-alpha color into an RGBA8 pixel.
pub fn premul(rgb: [u8; 3], alpha: f32) -> Rgba8 {
    let a = ((alpha.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    [
        mul_div255(u16::from(rgb[0]), a),
        mul_div255(u16::from(rgb[1]), a),
        mul_div255(u16::from(rgb[2]), a),
        a as u8,
    ]
}

/// Scale a premultiplied pixel by a coverage value in `[0, 255]`.
pub fn scale(px: Rgba8, coverage: u8) -> Rgba8 {
    let c = u16::from(coverage);
    [
        mul_div255(u16::from(px[0]), c),
        mul_div255(u16::from(px[1]), c),
        mul_div255(u16::from(px[2]), c),
        mul_div255(u16::from(px[3]), c),
    ]
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_opacity_0_is_noop() {
        let dst = [1, 2, 3, 4];
        let src = [200, 200, 200, 200];
        assert_eq!(over(dst, src, 0.0), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let dst = [0, 0, 0, 255];
        let src = [255, 0, 0, 255];
        assert_eq!(over(dst, src, 1.0), src);
    }

    #[test]
    fn over_keeps_opaque_dst_opaque() {
        let dst = [10, 20, 30, 255];
        let src = premul([0, 0, 0], 0.33);
        assert_eq!(over(dst, src, 1.0)[3], 255);
    }

    #[test]
    fn tint_darkens_every_pixel() {
        let mut buf = vec![200u8, 200, 200, 255].repeat(4);
        tint_in_place(&mut buf, [0, 0, 0], 0.5).unwrap();
        for px in buf.chunks_exact(4) {
            assert!(px[0] < 200);
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn blit_clips_out_of_bounds() {
        let mut dst = vec![0u8; 2 * 2 * 4];
        let src = vec![255u8; 2 * 2 * 4];
        blit_over(&mut dst, 2, 2, &src, 2, 2, 1, 1).unwrap();
        // Only the bottom-right destination pixel is covered.
        assert_eq!(&dst[0..4], &[0, 0, 0, 0]);
        assert_eq!(&dst[12..16], &[255, 255, 255, 255]);
    }

    #[test]
    fn scale_by_zero_clears() {
        assert_eq!(scale([100, 100, 100, 255], 0), [0, 0, 0, 0]);
        assert_eq!(scale([100, 100, 100, 255], 255), [100, 100, 100, 255]);
    }
}
