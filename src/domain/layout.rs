//! Sheet layout state and the actions that change it
//!
//! `LayoutState::apply` is the only way to mutate a layout. It keeps
//! images and notes in lockstep and re-runs the single-image auto-fit rule
//! after every change to the image sequence.

use std::num::NonZeroU32;

use super::image::{ImageEntry, ImageId, Rotation, Scale};
use super::note::NoteEntry;

/// Maximum number of images on one sheet
pub const MAX_IMAGES: usize = 4;

/// Title shown when the user has not typed one
pub const DEFAULT_TITLE: &str = "证据材料";

/// Transform forced on a lone image so a portrait photo fills the landscape page
pub const SOLO_ROTATION: Rotation = Rotation::Deg90;
pub const SOLO_SCALE: f32 = 1.5;

/// User actions on the layout
#[derive(Clone, Debug)]
pub enum LayoutAction {
    /// Append already-validated entries; anything past [`MAX_IMAGES`] is dropped
    AddImages(Vec<ImageEntry>),
    RemoveImage(ImageId),
    UpdateNote { id: ImageId, text: String },
    SetTitle(String),
    /// Values below 1 are clamped to 1
    SetPageNumber(u32),
    /// Drop every image and note, keep title and page number
    ClearImages,
}

/// Everything printed on the sheet
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutState {
    pub title: String,
    images: Vec<ImageEntry>,
    notes: Vec<NoteEntry>,
    pub page_number: NonZeroU32,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::with_title(DEFAULT_TITLE)
    }
}

impl LayoutState {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            images: Vec::new(),
            notes: Vec::new(),
            page_number: NonZeroU32::MIN,
        }
    }

    pub fn images(&self) -> &[ImageEntry] {
        &self.images
    }

    pub fn notes(&self) -> &[NoteEntry] {
        &self.notes
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn remaining_capacity(&self) -> usize {
        MAX_IMAGES.saturating_sub(self.images.len())
    }

    pub fn note_for(&self, id: ImageId) -> Option<&NoteEntry> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Ids of the current images in display order
    pub fn image_ids(&self) -> Vec<ImageId> {
        self.images.iter().map(|img| img.id).collect()
    }

    /// Apply one action and return the new state
    pub fn apply(mut self, action: LayoutAction) -> Self {
        match action {
            LayoutAction::AddImages(entries) => {
                let room = self.remaining_capacity();
                if entries.len() > room {
                    log::warn!(
                        "Dropping {} image(s) beyond the {} image limit",
                        entries.len() - room,
                        MAX_IMAGES
                    );
                }
                for entry in entries.into_iter().take(room) {
                    self.notes.push(NoteEntry::for_image(&entry));
                    self.images.push(entry);
                }
                auto_fit(&mut self.images);
            }
            LayoutAction::RemoveImage(id) => {
                self.images.retain(|img| img.id != id);
                self.notes.retain(|note| note.id != id);
                auto_fit(&mut self.images);
            }
            LayoutAction::UpdateNote { id, text } => {
                match self.notes.iter_mut().find(|note| note.id == id) {
                    Some(note) => note.text = text,
                    None => log::debug!("Ignoring note update for unknown image {}", id),
                }
            }
            LayoutAction::SetTitle(title) => self.title = title,
            LayoutAction::SetPageNumber(n) => {
                self.page_number = NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN);
            }
            LayoutAction::ClearImages => {
                self.images.clear();
                self.notes.clear();
            }
        }
        self
    }
}

/// Single-image auto-fit rule.
///
/// Exactly one image: rotate 90° and scale 1.5x. More than one: any image
/// still carrying a non-default transform (left over from the single-image
/// state) is reset to 0° / 1.0x.
pub fn auto_fit(images: &mut [ImageEntry]) {
    match images {
        [only] => {
            only.rotation = SOLO_ROTATION;
            only.scale = Scale::new(SOLO_SCALE);
        }
        many if many.len() > 1 => {
            if many.iter().any(|img| !img.has_default_transform()) {
                many.iter_mut().for_each(ImageEntry::reset_transform);
            }
        }
        _ => {}
    }
}
