//! Evidence photo sheets: lay out up to four photos on an A4 landscape
//! page with a title, captions and a page number, then export it as PNG.

pub mod capture;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod guide;
pub mod preview;
pub mod render;
pub mod session;

pub use capture::{CaptureArtifact, RasterOptions, Rasterize};
pub use config::SheetConfig;
pub use session::{Notice, NoticeLevel, Session};
