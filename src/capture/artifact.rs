//! The flattened sheet produced by a successful capture

use std::io;

use base64::Engine;
use image::RgbaImage;

use crate::error::RasterError;

/// Rasterized sheet with its PNG encoding
#[derive(Clone, Debug)]
pub struct CaptureArtifact {
    pub image: RgbaImage,
    png: Vec<u8>,
}

impl CaptureArtifact {
    /// Encode a rasterized sheet as PNG
    pub fn encode(image: RgbaImage) -> Result<Self, RasterError> {
        let mut png = Vec::new();
        write_png(&mut png, &image)?;
        log::debug!(
            "Encoded {}x{} capture ({} bytes)",
            image.width(),
            image.height(),
            png.len()
        );
        Ok(Self { image, png })
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `data:` URL of the PNG, for embedding in a print page
    pub fn data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }
}

pub(crate) fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}
