use std::fmt;

use thiserror::Error;

/// Why a single candidate file was turned away
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Declared type is not JPEG or PNG
    UnsupportedType(String),
    /// The sheet was already full when this file came up
    OverCapacity,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnsupportedType(mime) => write!(f, "unsupported type {mime}"),
            RejectReason::OverCapacity => write!(f, "sheet already holds the maximum"),
        }
    }
}

/// A rejected file with the reason it was skipped
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedFile {
    pub file_name: String,
    pub reason: RejectReason,
}

/// Aggregate warning for every file of a batch that was not added
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{} file(s) not added: {}", .files.len(), summarize(.files))]
pub struct UploadRejected {
    pub files: Vec<RejectedFile>,
}

impl UploadRejected {
    pub fn unsupported_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.reason, RejectReason::UnsupportedType(_)))
            .count()
    }

    pub fn over_capacity_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.reason == RejectReason::OverCapacity)
            .count()
    }
}

fn summarize(files: &[RejectedFile]) -> String {
    files
        .iter()
        .map(|f| format!("{} ({})", f.file_name, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Image element that failed to decode; the capture still goes ahead
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("image {file_name} failed to load: {reason}")]
pub struct ImageLoadFailed {
    pub file_name: String,
    pub reason: String,
}

/// Errors from the rasterization port
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("rasterization failed: {0}")]
    Other(String),
}

/// Terminal failure of one capture attempt
#[derive(Error, Debug)]
pub enum CaptureError {
    /// An element finished loading but has no pixels; nothing was rasterized
    #[error("{count} image(s) loaded with zero size, check the files and retry")]
    ImagesNotDecodable { count: usize },

    #[error("generating the preview failed: {0}")]
    CaptureFailed(#[from] RasterError),
}
