//! Aspect-ratio-specific placement of the cover thumbnail and the text area.

use kurbo::Rect;

use crate::model::AspectRatio;

/// Placement of the two foreground regions, in canvas coordinates.
///
/// The rectangles never overlap and stay within canvas bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutPlan {
    pub thumbnail: Rect,
    pub text_area: Rect,
}

/// Compute the layout for a source image of `src_w x src_h`.
pub fn plan(ratio: AspectRatio, src_w: u32, src_h: u32) -> LayoutPlan {
    let cfg = ratio.config();
    let cw = f64::from(cfg.canvas_width);
    let ch = f64::from(cfg.canvas_height);
    let m = cfg.margin;
    let source_aspect = f64::from(src_w.max(1)) / f64::from(src_h.max(1));

    match ratio {
        AspectRatio::Wide => {
            // Right-hand column holds the thumbnail; text takes the rest.
            let column_w = cw * 0.35;
            let column_x = cw - column_w;

            let mut thumb_w = column_w - 2.0 * m;
            let mut thumb_h = thumb_w / source_aspect;
            let max_h = ch - 2.0 * m;
            if thumb_h > max_h {
                thumb_h = max_h;
                thumb_w = thumb_h * source_aspect;
            }
            let thumb_x = column_x + (column_w - thumb_w) / 2.0;
            let thumb_y = (ch - thumb_h) / 2.0;

            LayoutPlan {
                thumbnail: Rect::new(thumb_x, thumb_y, thumb_x + thumb_w, thumb_y + thumb_h),
                text_area: Rect::new(m, m, column_x - m, ch - m),
            }
        }
        AspectRatio::Story | AspectRatio::Square => {
            // Thumbnail sits bottom-right at a quarter of the canvas height.
            let mut thumb_h = ch * 0.25;
            let mut thumb_w = thumb_h * source_aspect;
            let max_w = cw - 2.0 * m;
            if thumb_w > max_w {
                thumb_w = max_w;
                thumb_h = thumb_w / source_aspect;
            }
            let thumb_x = cw - thumb_w - m;
            let thumb_y = ch - thumb_h - m;

            LayoutPlan {
                thumbnail: Rect::new(thumb_x, thumb_y, thumb_x + thumb_w, thumb_y + thumb_h),
                text_area: Rect::new(m, cfg.text_top_inset, cw - m, thumb_y - m),
            }
        }
    }
}
