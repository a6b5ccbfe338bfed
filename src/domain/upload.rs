//! Validation of uploaded file batches
//!
//! Only JPEG and PNG files are accepted, and never more than the sheet
//! has room for. Accepted files become [`ImageEntry`] values; the rest are
//! collected into a single [`UploadRejected`] warning.

use std::path::Path;

use super::image::{ImageEntry, ImageSource};
use super::layout::MAX_IMAGES;
use crate::error::{RejectReason, RejectedFile, UploadRejected};

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";

/// A file offered for upload, as reported by the picker or drop target
#[derive(Clone, Debug)]
pub struct UploadCandidate {
    pub file_name: String,
    /// Declared MIME type
    pub mime: String,
    pub source: ImageSource,
}

impl UploadCandidate {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            source: ImageSource::new(bytes),
        }
    }

    /// Read a file from disk, declaring its type from the extension
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, mime_for_path(path), bytes))
    }

    fn is_supported(&self) -> bool {
        self.mime == MIME_JPEG || self.mime == MIME_PNG
    }
}

/// MIME type a file picker would declare for this path
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => MIME_JPEG,
        "png" => MIME_PNG,
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Result of validating one batch
#[derive(Debug, Default)]
pub struct UploadOutcome {
    pub accepted: Vec<ImageEntry>,
    pub rejected: Option<UploadRejected>,
}

/// Split a batch into accepted entries and one aggregate rejection.
///
/// Files are considered in order; supported files fill the remaining
/// capacity (`MAX_IMAGES - current_count`) and anything after that is
/// rejected as over capacity.
pub fn validate_batch(candidates: Vec<UploadCandidate>, current_count: usize) -> UploadOutcome {
    let mut remaining = MAX_IMAGES.saturating_sub(current_count);
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for candidate in candidates {
        if !candidate.is_supported() {
            rejected.push(RejectedFile {
                file_name: candidate.file_name,
                reason: RejectReason::UnsupportedType(candidate.mime),
            });
            continue;
        }
        if remaining == 0 {
            rejected.push(RejectedFile {
                file_name: candidate.file_name,
                reason: RejectReason::OverCapacity,
            });
            continue;
        }
        remaining -= 1;
        accepted.push(ImageEntry::new(candidate.file_name, candidate.source));
    }

    if !rejected.is_empty() {
        log::debug!(
            "Upload batch: {} accepted, {} rejected",
            accepted.len(),
            rejected.len()
        );
    }

    UploadOutcome {
        accepted,
        rejected: (!rejected.is_empty()).then_some(UploadRejected { files: rejected }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> UploadCandidate {
        UploadCandidate::new(name, MIME_PNG, vec![0u8; 4])
    }

    fn jpg(name: &str) -> UploadCandidate {
        UploadCandidate::new(name, MIME_JPEG, vec![0u8; 4])
    }

    #[test]
    fn test_mixed_batch_keeps_valid_files() {
        let batch = vec![
            png("a.png"),
            png("b.png"),
            UploadCandidate::new("c.gif", "image/gif", vec![1]),
            jpg("d.jpg"),
        ];
        let outcome = validate_batch(batch, 0);

        let names: Vec<_> = outcome.accepted.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png", "d.jpg"]);

        let rejected = outcome.rejected.expect("gif should be rejected");
        assert_eq!(rejected.files.len(), 1);
        assert_eq!(rejected.unsupported_count(), 1);
        assert_eq!(rejected.files[0].file_name, "c.gif");
    }

    #[test]
    fn test_overflow_is_rejected() {
        let batch = (0..5).map(|i| jpg(&format!("{i}.jpg"))).collect();
        let outcome = validate_batch(batch, 0);

        assert_eq!(outcome.accepted.len(), 4);
        let rejected = outcome.rejected.expect("fifth file should be rejected");
        assert_eq!(rejected.over_capacity_count(), 1);
        assert_eq!(rejected.files[0].file_name, "4.jpg");
    }

    #[test]
    fn test_remaining_capacity_respected() {
        let outcome = validate_batch(vec![png("x.png"), png("y.png")], 3);
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.rejected.map(|r| r.over_capacity_count()), Some(1));

        let full = validate_batch(vec![png("z.png")], MAX_IMAGES);
        assert!(full.accepted.is_empty());
    }

    #[test]
    fn test_clean_batch_has_no_warning() {
        let outcome = validate_batch(vec![png("a.png")], 0);
        assert_eq!(outcome.accepted.len(), 1);
        assert!(outcome.rejected.is_none());
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_for_path(Path::new("a/B.JPEG")), MIME_JPEG);
        assert_eq!(mime_for_path(Path::new("b.png")), MIME_PNG);
        assert_eq!(mime_for_path(Path::new("c.gif")), "image/gif");
        assert_eq!(mime_for_path(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_rejection_message_lists_files() {
        let outcome = validate_batch(vec![UploadCandidate::new("x.bmp", "image/bmp", vec![])], 0);
        let message = outcome.rejected.map(|r| r.to_string()).unwrap_or_default();
        assert!(message.contains("x.bmp"));
        assert!(message.starts_with("1 file(s) not added"));
    }
}
