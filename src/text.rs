//! Greedy word-wrap and font-size fitting.
//!
//! Wrapping splits on explicit newlines first (blank paragraphs survive as
//! empty lines), then packs whitespace-delimited words greedily against the
//! measured width. Fitting walks the size down from 80 in steps of 2 until
//! the wrapped block fits the box or the floor of 20 is reached; overflow at
//! the floor is accepted rather than failed.

use crate::error::StorycardResult;

/// Nominal starting font size; the fit loop decrements before testing, so the
/// first size actually measured is one step below.
pub const FONT_SIZE_START: u32 = 80;
pub const FONT_SIZE_STEP: u32 = 2;
pub const FONT_SIZE_MIN: u32 = 20;
/// Line height as a multiple of font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.4;

/// Text width measurement at a given font size.
///
/// Implemented by the serif font engine; tests substitute a deterministic
/// fake.
pub trait MeasureText {
    fn measure(&mut self, text: &str, font_size: f32) -> StorycardResult<f32>;
}

/// A wrapped quote at its fitted size.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedText {
    pub font_size: u32,
    pub lines: Vec<String>,
    pub line_height: f32,
}

impl FittedText {
    pub fn total_height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }
}

/// Greedy line-breaking at a fixed font size.
///
/// A word wider than `max_width` is never split; it overflows on its own
/// line.
pub fn wrap_lines(
    text: &str,
    font_size: f32,
    max_width: f32,
    measure: &mut dyn MeasureText,
) -> StorycardResult<Vec<String>> {
    let normalized = text.replace("\r\n", "\n");
    let mut lines = Vec::new();

    for paragraph in normalized.split('\n') {
        let mut words = paragraph.split_whitespace();
        let Some(first) = words.next() else {
            lines.push(String::new());
            continue;
        };

        let mut current = first.to_string();
        for word in words {
            let candidate = format!("{current} {word}");
            if measure.measure(&candidate, font_size)? <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }

    Ok(lines)
}

/// Largest step size from 80 downward whose wrapped block fits `max_height`,
/// floored at 20.
pub fn fit_font_size(
    text: &str,
    max_width: f32,
    max_height: f32,
    measure: &mut dyn MeasureText,
) -> StorycardResult<FittedText> {
    let mut font_size = FONT_SIZE_START;
    loop {
        font_size -= FONT_SIZE_STEP;
        let lines = wrap_lines(text, font_size as f32, max_width, measure)?;
        let line_height = font_size as f32 * LINE_HEIGHT_FACTOR;
        let total_height = lines.len() as f32 * line_height;
        if total_height <= max_height || font_size <= FONT_SIZE_MIN {
            return Ok(FittedText {
                font_size,
                lines,
                line_height,
            });
        }
    }
}
