//! Uploaded image entries and their transform state

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Stable identifier shared by an image and its note
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(Uuid);

impl ImageId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Right-angle rotation applied to an image on the sheet
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Rotation in degrees (clockwise)
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// Display scale of an image, always within [`Scale::MIN`, `Scale::MAX`]
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Scale(f32);

impl Scale {
    pub const MIN: f32 = 0.5;
    pub const MAX: f32 = 2.0;
    pub const IDENTITY: Scale = Scale(1.0);

    /// Clamp a factor into the allowed range. NaN becomes identity.
    pub fn new(factor: f32) -> Self {
        if factor.is_nan() {
            return Self::IDENTITY;
        }
        Self(factor.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Shared bytes of an uploaded file, cheap to clone into render targets
#[derive(Clone, PartialEq, Eq)]
pub struct ImageSource(Arc<[u8]>);

impl ImageSource {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageSource({} bytes)", self.0.len())
    }
}

/// One uploaded image placed on the sheet
#[derive(Clone, Debug, PartialEq)]
pub struct ImageEntry {
    pub id: ImageId,
    pub source: ImageSource,
    /// Original file name, e.g. "receipt.jpg"
    pub file_name: String,
    /// File name without its extension, used as the default note
    pub display_name: String,
    pub rotation: Rotation,
    pub scale: Scale,
}

impl ImageEntry {
    /// Create an entry with a fresh id and the default transform
    pub fn new(file_name: impl Into<String>, source: ImageSource) -> Self {
        let file_name = file_name.into();
        let display_name = strip_extension(&file_name).to_string();
        Self {
            id: ImageId::new(),
            source,
            file_name,
            display_name,
            rotation: Rotation::default(),
            scale: Scale::default(),
        }
    }

    /// Whether rotation and scale are at their defaults
    pub fn has_default_transform(&self) -> bool {
        self.rotation == Rotation::Deg0 && self.scale == Scale::IDENTITY
    }

    pub fn reset_transform(&mut self) {
        self.rotation = Rotation::Deg0;
        self.scale = Scale::IDENTITY;
    }
}

/// Drop the last `.ext` from a file name. Dot-files keep their name.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) if idx + 1 == name.len() => name,
        Some(idx) => &name[..idx],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_last_extension() {
        let entry = ImageEntry::new("scan.final.JPG", ImageSource::new(vec![1, 2, 3]));
        assert_eq!(entry.display_name, "scan.final");
        assert_eq!(entry.file_name, "scan.final.JPG");
    }

    #[test]
    fn test_display_name_without_extension() {
        assert_eq!(strip_extension("receipt"), "receipt");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("trailing."), "trailing.");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ImageEntry::new("a.png", ImageSource::new(Vec::new()));
        let b = ImageEntry::new("a.png", ImageSource::new(Vec::new()));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_scale_is_clamped() {
        assert_eq!(Scale::new(5.0).get(), Scale::MAX);
        assert_eq!(Scale::new(0.1).get(), Scale::MIN);
        assert_eq!(Scale::new(f32::NAN), Scale::IDENTITY);
        assert_eq!(Scale::new(1.5).get(), 1.5);
    }
}
