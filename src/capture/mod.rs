//! Capture pipeline
//!
//! This module consolidates:
//! - The rendered sheet and its image elements (target.rs)
//! - The capture state machine (pipeline.rs)
//! - The exported PNG artifact (artifact.rs)
//!
//! Drawing itself sits behind the [`Rasterize`] port so the state machine can
//! run against any renderer.

pub mod artifact;
pub mod pipeline;
pub mod target;

use image::RgbaImage;

pub use artifact::CaptureArtifact;
pub use pipeline::{CapturePipeline, CaptureState, Completion};
pub use target::RenderTarget;

use crate::error::RasterError;

/// Output settings for one rasterization
#[derive(Clone, Debug, PartialEq)]
pub struct RasterOptions {
    /// Device pixels per CSS pixel
    pub pixel_ratio: f32,
    /// Opaque fill behind everything
    pub background: [u8; 4],
    /// Draw absolutely positioned overlays (the page-number footer)
    pub include_overlays: bool,
}

impl RasterOptions {
    pub const DEFAULT_PIXEL_RATIO: f32 = 2.0;
    pub const WHITE: [u8; 4] = [255, 255, 255, 255];
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            pixel_ratio: Self::DEFAULT_PIXEL_RATIO,
            background: Self::WHITE,
            include_overlays: true,
        }
    }
}

/// Flatten a render target into a single opaque image
pub trait Rasterize {
    fn rasterize(
        &self,
        target: &RenderTarget,
        options: &RasterOptions,
    ) -> Result<RgbaImage, RasterError>;
}
