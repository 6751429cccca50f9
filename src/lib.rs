#![forbid(unsafe_code)]

pub mod background;
pub mod blur;
pub mod color;
pub mod composite;
pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod palette;
pub mod panel;
pub mod render;
pub mod text;

pub use error::{StorycardError, StorycardResult};
pub use model::{AspectRatio, CardImage, RatioConfig};
pub use render::CardRenderer;
