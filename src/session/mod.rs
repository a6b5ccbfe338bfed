//! Editing session: layout, preview and capture in one place
//!
//! Every user action goes through [`Session`]. Problems never abort the
//! session; they are queued as [`Notice`]s for the front end to show.

pub mod notice;

use std::sync::Arc;

pub use notice::{Notice, NoticeLevel};

use crate::capture::{
    CaptureArtifact, CapturePipeline, CaptureState, Completion, RasterOptions, Rasterize,
    RenderTarget,
};
use crate::domain::{ImageId, LayoutAction, LayoutState, UploadCandidate, validate_batch};
use crate::error::CaptureError;
use crate::preview::PreviewZoom;

pub struct Session {
    layout: LayoutState,
    target: RenderTarget,
    pipeline: CapturePipeline,
    rasterizer: Box<dyn Rasterize>,
    options: RasterOptions,
    preview_open: bool,
    zoom: PreviewZoom,
    /// Image ids the current preview was generated from
    captured_ids: Option<Vec<ImageId>>,
    notices: Vec<Notice>,
}

impl Session {
    pub fn new(layout: LayoutState, rasterizer: Box<dyn Rasterize>, options: RasterOptions) -> Self {
        let target = RenderTarget::from_layout(&layout);
        Self {
            layout,
            target,
            pipeline: CapturePipeline::new(),
            rasterizer,
            options,
            preview_open: false,
            zoom: PreviewZoom::default(),
            captured_ids: None,
            notices: Vec::new(),
        }
    }

    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    pub fn capture_state(&self) -> &CaptureState {
        self.pipeline.state()
    }

    /// Artifact to download, print or show inline
    pub fn artifact(&self) -> Option<&Arc<CaptureArtifact>> {
        self.pipeline.artifact()
    }

    pub fn is_preview_open(&self) -> bool {
        self.preview_open
    }

    pub fn zoom(&self) -> PreviewZoom {
        self.zoom
    }

    /// Take every queued notice
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn dispatch(&mut self, action: LayoutAction) {
        let layout = std::mem::take(&mut self.layout);
        self.layout = layout.apply(action);
    }

    /// Validate a batch and add the accepted files. Returns how many were added.
    pub fn upload(&mut self, candidates: Vec<UploadCandidate>) -> usize {
        if candidates.is_empty() {
            return 0;
        }
        let outcome = validate_batch(candidates, self.layout.image_count());
        if let Some(rejected) = outcome.rejected {
            log::warn!(
                "Upload: {} unsupported, {} over capacity",
                rejected.unsupported_count(),
                rejected.over_capacity_count()
            );
            self.notices.push(Notice::warning(rejected));
        }
        let added = outcome.accepted.len();
        if added > 0 {
            self.dispatch(LayoutAction::AddImages(outcome.accepted));
            log::info!("Added {} image(s), {} on sheet", added, self.layout.image_count());
        }
        added
    }

    pub fn remove_image(&mut self, id: ImageId) {
        self.dispatch(LayoutAction::RemoveImage(id));
    }

    pub fn update_note(&mut self, id: ImageId, text: impl Into<String>) {
        self.dispatch(LayoutAction::UpdateNote {
            id,
            text: text.into(),
        });
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.dispatch(LayoutAction::SetTitle(title.into()));
    }

    pub fn set_page_number(&mut self, page: u32) {
        self.dispatch(LayoutAction::SetPageNumber(page));
    }

    /// Open the preview and generate a capture of the current sheet
    pub async fn open_preview(&mut self) {
        self.preview_open = true;
        self.capture().await;
    }

    /// Whether the image set changed since the preview was generated
    pub fn needs_refresh(&self) -> bool {
        self.preview_open && self.captured_ids.as_deref() != Some(self.layout.image_ids().as_slice())
    }

    /// Re-capture if the preview is open and the image set changed
    pub async fn refresh_preview(&mut self) -> bool {
        if !self.needs_refresh() {
            return false;
        }
        self.capture().await;
        true
    }

    /// Close the preview and start over with an empty sheet
    pub fn close_preview(&mut self) {
        self.preview_open = false;
        self.captured_ids = None;
        self.pipeline.reset();
        self.dispatch(LayoutAction::ClearImages);
        self.target.sync(&self.layout);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = self.zoom.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.zoom_out();
    }

    pub fn set_zoom(&mut self, factor: f32) {
        self.zoom = PreviewZoom::new(factor);
    }

    /// Run one capture to completion.
    ///
    /// `&mut self` keeps captures strictly sequential here, so every attempt
    /// holds the newest ticket when it finishes.
    async fn capture(&mut self) {
        self.target.sync(&self.layout);
        self.captured_ids = Some(self.target.element_ids());

        let (completion, warnings) = self
            .pipeline
            .capture(&mut self.target, self.rasterizer.as_ref(), &self.options)
            .await;
        self.notices.extend(warnings.into_iter().map(Notice::warning));

        match completion {
            Completion::Ready => {
                if let Some(artifact) = self.pipeline.artifact() {
                    log::info!("Preview ready: {}x{}", artifact.width(), artifact.height());
                }
            }
            Completion::KeptPrevious(err @ CaptureError::ImagesNotDecodable { .. }) => {
                self.notices.push(Notice::error(err));
            }
            Completion::KeptPrevious(err) => {
                log::debug!("Keeping previous preview after: {}", err);
            }
            Completion::Failed(err) => self.notices.push(Notice::error(err)),
            Completion::Superseded => log::debug!("Capture result superseded"),
        }
    }
}
