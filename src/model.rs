//! Boundary types: aspect-ratio variants, their composition constants, and
//! the rendered output frame.

use serde::{Deserialize, Serialize};

/// Supported output aspect ratios.
///
/// Unrecognized selector strings fall back to the 9:16 story format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 9:16 story, 1080x1920.
    #[default]
    #[serde(rename = "9:16")]
    Story,
    /// 1:1 square, 1080x1080.
    #[serde(rename = "1:1")]
    Square,
    /// 2:1 wide, 1920x960.
    #[serde(rename = "2:1")]
    Wide,
}

impl AspectRatio {
    /// Parse a selector, falling back to 9:16 for anything unrecognized.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "1:1" => Self::Square,
            "2:1" => Self::Wide,
            _ => Self::Story,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Story => "9:16",
            Self::Square => "1:1",
            Self::Wide => "2:1",
        }
    }

    /// Canvas dimensions in pixels.
    pub fn canvas(self) -> (u32, u32) {
        match self {
            Self::Story => (1080, 1920),
            Self::Square => (1080, 1080),
            Self::Wide => (1920, 960),
        }
    }

    /// Composition constants for this variant.
    pub fn config(self) -> RatioConfig {
        let (canvas_width, canvas_height) = self.canvas();
        RatioConfig {
            canvas_width,
            canvas_height,
            margin: 80.0,
            overlay_alpha: 0.33,
            text_top_inset: 100.0,
            padding_x: 60.0,
            padding_y: 40.0,
            corner_radius: 15.0,
            background_blur_radius: 40,
            panel_blur_min: 15,
            panel_blur_max: 100,
            shadow_blur_radius: 20,
        }
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Composition constants keyed by aspect-ratio variant.
///
/// Only the canvas dimensions differ between variants today, but every stage
/// reads its constants from here rather than from scattered literals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatioConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Inset from canvas edges for the thumbnail and text area.
    pub margin: f64,
    /// Alpha of the flat dark overlay drawn over the blurred backdrop.
    pub overlay_alpha: f32,
    /// Fixed top inset of the text area in the default layout rule.
    pub text_top_inset: f64,
    /// Horizontal padding between text block and panel edge.
    pub padding_x: f64,
    /// Vertical padding between text block and panel edge.
    pub padding_y: f64,
    /// Panel corner radius.
    pub corner_radius: f64,
    /// Blur radius for the full-canvas backdrop.
    pub background_blur_radius: u32,
    /// Lower bound of the panel's local re-blur radius.
    pub panel_blur_min: u32,
    /// Upper bound of the panel's local re-blur radius.
    pub panel_blur_max: u32,
    /// Blur radius of the thumbnail drop shadow.
    pub shadow_blur_radius: u32,
}

/// A rendered card: straight RGBA8 pixels, fully opaque.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}
