//! Pure domain types with minimal dependencies
//!
//! The sheet layout, its images and notes, and upload validation. Nothing
//! here knows about rendering or files on disk beyond reading an upload.

pub mod image;
pub mod layout;
pub mod note;
pub mod upload;

pub use image::{ImageEntry, ImageId, ImageSource, Rotation, Scale};
pub use layout::{LayoutAction, LayoutState};
pub use upload::{UploadCandidate, validate_batch};
