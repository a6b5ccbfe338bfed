//! Captions tied one-to-one to placed images

use super::image::{ImageEntry, ImageId};

/// User-editable caption shown under an image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteEntry {
    /// Same id as the image this note belongs to
    pub id: ImageId,
    pub text: String,
}

impl NoteEntry {
    /// Default note for a freshly uploaded image: its display name
    pub fn for_image(image: &ImageEntry) -> Self {
        Self {
            id: image.id,
            text: image.display_name.clone(),
        }
    }
}
