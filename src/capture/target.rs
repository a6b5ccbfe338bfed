//! The rendered sheet that a capture reads from
//!
//! A `RenderTarget` mirrors the current layout: one `ImageElement` per
//! placed image, each with its own load state, plus the title, captions and
//! page number. Elements survive re-syncs so an image decodes only once.

use std::sync::Arc;

use image::RgbaImage;

use crate::domain::{ImageId, ImageSource, LayoutState, Rotation, Scale};
use crate::error::ImageLoadFailed;

/// Decode progress of one image element
#[derive(Clone, Debug, Default)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded(Arc<RgbaImage>),
    /// Decoding finished with an error; the element has no pixels
    Broken(String),
}

/// An image as placed on the rendered sheet
#[derive(Clone, Debug)]
pub struct ImageElement {
    pub id: ImageId,
    pub file_name: String,
    pub source: ImageSource,
    pub rotation: Rotation,
    pub scale: Scale,
    pub note: String,
    pub state: LoadState,
}

impl ImageElement {
    /// Whether loading has finished, successfully or not
    pub fn is_complete(&self) -> bool {
        !matches!(self.state, LoadState::Pending)
    }

    /// Decoded pixel size, zero while pending or when broken
    pub fn natural_size(&self) -> (u32, u32) {
        match &self.state {
            LoadState::Loaded(img) => img.dimensions(),
            LoadState::Pending | LoadState::Broken(_) => (0, 0),
        }
    }

    /// Complete but without usable pixels
    pub fn is_zero_sized(&self) -> bool {
        let (w, h) = self.natural_size();
        self.is_complete() && (w == 0 || h == 0)
    }

    pub fn pixels(&self) -> Option<&RgbaImage> {
        match &self.state {
            LoadState::Loaded(img) => Some(img),
            _ => None,
        }
    }

    /// Decode the source if still pending.
    ///
    /// A decode error marks the element broken and is returned as a warning;
    /// it never fails the caller.
    pub async fn load(&mut self) -> Option<ImageLoadFailed> {
        if self.is_complete() {
            return None;
        }
        // Let sibling loads interleave on the single-threaded runtime
        tokio::task::yield_now().await;

        match image::load_from_memory(self.source.bytes()) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                log::debug!(
                    "Loaded {}: {}x{} pixels",
                    self.file_name,
                    rgba.width(),
                    rgba.height()
                );
                self.state = LoadState::Loaded(Arc::new(rgba));
                None
            }
            Err(err) => {
                log::warn!("Failed to decode {}: {}", self.file_name, err);
                self.state = LoadState::Broken(err.to_string());
                Some(ImageLoadFailed {
                    file_name: self.file_name.clone(),
                    reason: err.to_string(),
                })
            }
        }
    }
}

/// Everything the rasterizer draws
#[derive(Clone, Debug, Default)]
pub struct RenderTarget {
    pub title: String,
    pub page_number: u32,
    pub elements: Vec<ImageElement>,
}

impl RenderTarget {
    pub fn from_layout(layout: &LayoutState) -> Self {
        let mut target = Self::default();
        target.sync(layout);
        target
    }

    /// Bring the target in line with the layout, keeping decoded elements
    pub fn sync(&mut self, layout: &LayoutState) {
        let mut previous = std::mem::take(&mut self.elements);

        self.elements = layout
            .images()
            .iter()
            .map(|image| {
                let note = layout
                    .note_for(image.id)
                    .map(|n| n.text.clone())
                    .unwrap_or_default();
                let state = previous
                    .iter()
                    .position(|el| el.id == image.id)
                    .map(|idx| previous.swap_remove(idx).state)
                    .unwrap_or_default();
                ImageElement {
                    id: image.id,
                    file_name: image.file_name.clone(),
                    source: image.source.clone(),
                    rotation: image.rotation,
                    scale: image.scale,
                    note,
                    state,
                }
            })
            .collect();

        self.title = layout.title.clone();
        self.page_number = layout.page_number.get();
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Ids of the elements in display order
    pub fn element_ids(&self) -> Vec<ImageId> {
        self.elements.iter().map(|el| el.id).collect()
    }

    /// Number of elements that finished loading without pixels
    pub fn zero_sized_count(&self) -> usize {
        self.elements.iter().filter(|el| el.is_zero_sized()).count()
    }

    /// Wait for every pending element, in any order
    pub async fn load_all(&mut self) -> Vec<ImageLoadFailed> {
        let loads = self
            .elements
            .iter_mut()
            .filter(|el| !el.is_complete())
            .map(|el| el.load());
        futures::future::join_all(loads)
            .await
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{ImageEntry, LayoutAction};

    /// Encode a solid PNG for use as upload bytes
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .expect("encode test png");
        out.into_inner()
    }

    fn layout_with(entries: Vec<ImageEntry>) -> LayoutState {
        LayoutState::default().apply(LayoutAction::AddImages(entries))
    }

    #[tokio::test]
    async fn test_load_all_decodes_every_element() {
        let layout = layout_with(vec![
            ImageEntry::new("a.png", ImageSource::new(png_bytes(4, 3))),
            ImageEntry::new("b.png", ImageSource::new(png_bytes(2, 5))),
        ]);
        let mut target = RenderTarget::from_layout(&layout);
        assert!(target.elements.iter().all(|el| !el.is_complete()));

        let warnings = target.load_all().await;
        assert!(warnings.is_empty());
        assert_eq!(target.elements[0].natural_size(), (4, 3));
        assert_eq!(target.elements[1].natural_size(), (2, 5));
        assert_eq!(target.zero_sized_count(), 0);
    }

    #[tokio::test]
    async fn test_broken_image_warns_and_completes() {
        let layout = layout_with(vec![ImageEntry::new(
            "corrupt.jpg",
            ImageSource::new(vec![0xff, 0xd8, 0x00]),
        )]);
        let mut target = RenderTarget::from_layout(&layout);

        let warnings = target.load_all().await;
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].file_name, "corrupt.jpg");
        assert!(target.elements[0].is_complete());
        assert!(target.elements[0].is_zero_sized());
    }

    #[tokio::test]
    async fn test_sync_keeps_loaded_state() {
        let layout = layout_with(vec![
            ImageEntry::new("a.png", ImageSource::new(png_bytes(4, 4))),
            ImageEntry::new("b.png", ImageSource::new(png_bytes(4, 4))),
        ]);
        let mut target = RenderTarget::from_layout(&layout);
        target.load_all().await;

        let removed = layout.images()[0].id;
        let layout = layout
            .apply(LayoutAction::RemoveImage(removed))
            .apply(LayoutAction::SetTitle("Receipts".into()));
        target.sync(&layout);

        assert_eq!(target.element_ids(), layout.image_ids());
        assert!(target.elements[0].is_complete());
        assert_eq!(target.elements[0].rotation, Rotation::Deg90);
        assert_eq!(target.title, "Receipts");
    }

    #[test]
    fn test_target_carries_notes_and_page() {
        let layout = layout_with(vec![ImageEntry::new(
            "slip.png",
            ImageSource::new(png_bytes(1, 1)),
        )])
        .apply(LayoutAction::SetPageNumber(4));
        let target = RenderTarget::from_layout(&layout);
        assert_eq!(target.elements[0].note, "slip");
        assert_eq!(target.page_number, 4);
    }
}
