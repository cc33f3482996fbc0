pub mod assets;
pub mod presentation;
pub mod render;

pub use assets::ImageLoader;
pub use presentation::Presentation;
pub use render::{RenderStats, SkiaRenderer};
