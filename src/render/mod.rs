//! Sheet rendering module
//!
//! This module contains:
//! - Page geometry in millimetres and output pixels
//! - Image composition using tiny-skia (the default rasterizer)
//! - Text drawing for title, captions and page number

pub mod geometry;
pub mod image;
pub mod text;

pub use self::image::SheetRenderer;
pub use self::text::TextPainter;
