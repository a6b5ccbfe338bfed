//! Capture state machine: Idle -> Generating -> Ready | Failed
//!
//! Requests are ticketed. Starting a new capture supersedes any capture still
//! in flight, and a result carrying a superseded ticket is discarded, so the
//! newest request is always the one that lands.

use std::sync::Arc;

use super::artifact::CaptureArtifact;
use super::target::RenderTarget;
use super::{RasterOptions, Rasterize};
use crate::error::{CaptureError, ImageLoadFailed};

/// Identifies one capture request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureTicket(u64);

#[derive(Clone, Debug, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Generating(CaptureTicket),
    Ready(Arc<CaptureArtifact>),
    /// Last attempt failed and there is nothing to show
    Failed(String),
}

/// What a finished attempt did to the pipeline
#[derive(Debug)]
pub enum Completion {
    /// A fresh artifact is stored
    Ready,
    /// The attempt failed; the previous artifact is still current
    KeptPrevious(CaptureError),
    /// The attempt failed and there is no artifact
    Failed(CaptureError),
    /// A newer request started first; the result was dropped
    Superseded,
}

/// Output of one run over a render target
#[derive(Debug)]
pub struct CaptureReport {
    pub result: Result<CaptureArtifact, CaptureError>,
    /// Images that failed to decode but did not stop the capture
    pub warnings: Vec<ImageLoadFailed>,
}

#[derive(Debug, Default)]
pub struct CapturePipeline {
    state: CaptureState,
    artifact: Option<Arc<CaptureArtifact>>,
    next_ticket: u64,
}

impl CapturePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Most recent good artifact, even while a refresh is generating
    pub fn artifact(&self) -> Option<&Arc<CaptureArtifact>> {
        self.artifact.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, CaptureState::Generating(_))
    }

    /// Enter Generating and hand out the ticket for this request
    pub fn begin(&mut self) -> CaptureTicket {
        if let CaptureState::Generating(old) = self.state {
            log::debug!("Capture {:?} superseded", old);
        }
        self.next_ticket += 1;
        let ticket = CaptureTicket(self.next_ticket);
        self.state = CaptureState::Generating(ticket);
        ticket
    }

    /// Record the result of the request identified by `ticket`
    pub fn finish(
        &mut self,
        ticket: CaptureTicket,
        result: Result<CaptureArtifact, CaptureError>,
    ) -> Completion {
        if !matches!(self.state, CaptureState::Generating(current) if current == ticket) {
            log::debug!("Dropping result of superseded capture {:?}", ticket);
            return Completion::Superseded;
        }

        match result {
            Ok(artifact) => {
                let artifact = Arc::new(artifact);
                self.artifact = Some(artifact.clone());
                self.state = CaptureState::Ready(artifact);
                Completion::Ready
            }
            Err(err) => match &self.artifact {
                Some(previous) => {
                    log::warn!("Capture failed, keeping previous preview: {}", err);
                    self.state = CaptureState::Ready(previous.clone());
                    Completion::KeptPrevious(err)
                }
                None => {
                    log::error!("Capture failed: {}", err);
                    self.state = CaptureState::Failed(err.to_string());
                    Completion::Failed(err)
                }
            },
        }
    }

    /// Back to Idle, forgetting any artifact
    pub fn reset(&mut self) {
        self.state = CaptureState::Idle;
        self.artifact = None;
    }

    /// Run a full capture: begin, load, rasterize, finish
    pub async fn capture(
        &mut self,
        target: &mut RenderTarget,
        rasterizer: &dyn Rasterize,
        options: &RasterOptions,
    ) -> (Completion, Vec<ImageLoadFailed>) {
        let ticket = self.begin();
        let report = run(target, rasterizer, options).await;
        let completion = self.finish(ticket, report.result);
        (completion, report.warnings)
    }
}

/// Load every element then rasterize the target.
///
/// Elements that already finished loading with no pixels abort the run before
/// anything is drawn.
pub async fn run(
    target: &mut RenderTarget,
    rasterizer: &dyn Rasterize,
    options: &RasterOptions,
) -> CaptureReport {
    let zero_sized = target.zero_sized_count();
    if zero_sized > 0 {
        return CaptureReport {
            result: Err(CaptureError::ImagesNotDecodable { count: zero_sized }),
            warnings: Vec::new(),
        };
    }

    let warnings = target.load_all().await;

    let result = rasterizer
        .rasterize(target, options)
        .and_then(CaptureArtifact::encode)
        .map_err(CaptureError::from);

    CaptureReport { result, warnings }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use image::RgbaImage;

    use super::*;
    use crate::capture::target::tests::png_bytes;
    use crate::domain::{ImageEntry, ImageSource, LayoutAction, LayoutState};
    use crate::error::RasterError;

    /// Paints a blank canvas sized by the pixel ratio, or fails on demand
    #[derive(Default)]
    struct FakeRasterizer {
        fail: Cell<bool>,
        calls: Cell<usize>,
    }

    impl Rasterize for FakeRasterizer {
        fn rasterize(
            &self,
            target: &RenderTarget,
            options: &RasterOptions,
        ) -> Result<RgbaImage, RasterError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(RasterError::Other("boom".into()));
            }
            let side = (10.0 * options.pixel_ratio) as u32 + target.elements.len() as u32;
            Ok(RgbaImage::from_pixel(side, side, image::Rgba(options.background)))
        }
    }

    fn target_with(bytes: Vec<Vec<u8>>) -> RenderTarget {
        let entries = bytes
            .into_iter()
            .enumerate()
            .map(|(i, b)| ImageEntry::new(format!("{i}.png"), ImageSource::new(b)))
            .collect();
        RenderTarget::from_layout(&LayoutState::default().apply(LayoutAction::AddImages(entries)))
    }

    #[tokio::test]
    async fn test_capture_reaches_ready() {
        let mut pipeline = CapturePipeline::new();
        let mut target = target_with(vec![png_bytes(3, 3), png_bytes(2, 2)]);
        let raster = FakeRasterizer::default();

        let (completion, warnings) = pipeline
            .capture(&mut target, &raster, &RasterOptions::default())
            .await;

        assert!(matches!(completion, Completion::Ready));
        assert!(warnings.is_empty());
        assert!(matches!(pipeline.state(), CaptureState::Ready(_)));
        let artifact = pipeline.artifact().expect("artifact stored");
        assert_eq!(artifact.width(), 22);
        assert!(image::load_from_memory(artifact.png_bytes()).is_ok());
    }

    #[tokio::test]
    async fn test_empty_target_still_captures() {
        let mut pipeline = CapturePipeline::new();
        let mut target = target_with(Vec::new());
        let raster = FakeRasterizer::default();

        let (completion, _) = pipeline
            .capture(&mut target, &raster, &RasterOptions::default())
            .await;
        assert!(matches!(completion, Completion::Ready));
    }

    #[tokio::test]
    async fn test_failure_without_artifact_enters_failed() {
        let mut pipeline = CapturePipeline::new();
        let mut target = target_with(vec![png_bytes(2, 2)]);
        let raster = FakeRasterizer::default();
        raster.fail.set(true);

        let (completion, _) = pipeline
            .capture(&mut target, &raster, &RasterOptions::default())
            .await;
        assert!(matches!(
            completion,
            Completion::Failed(CaptureError::CaptureFailed(_))
        ));
        assert!(matches!(pipeline.state(), CaptureState::Failed(_)));
        assert!(pipeline.artifact().is_none());
    }

    #[tokio::test]
    async fn test_stale_artifact_survives_failed_refresh() {
        let mut pipeline = CapturePipeline::new();
        let mut target = target_with(vec![png_bytes(2, 2)]);
        let raster = FakeRasterizer::default();
        let options = RasterOptions::default();

        pipeline.capture(&mut target, &raster, &options).await;
        let first = pipeline.artifact().cloned().expect("first capture");

        raster.fail.set(true);
        let (completion, _) = pipeline.capture(&mut target, &raster, &options).await;

        assert!(matches!(completion, Completion::KeptPrevious(_)));
        match pipeline.state() {
            CaptureState::Ready(current) => assert!(Arc::ptr_eq(current, &first)),
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_sized_element_skips_rasterization() {
        let mut pipeline = CapturePipeline::new();
        let mut target = target_with(vec![vec![1, 2, 3]]);
        let raster = FakeRasterizer::default();
        let options = RasterOptions::default();

        // First pass: decode error is only a warning
        let (completion, warnings) = pipeline.capture(&mut target, &raster, &options).await;
        assert!(matches!(completion, Completion::Ready));
        assert_eq!(warnings.len(), 1);
        assert_eq!(raster.calls.get(), 1);

        // Second pass: the element is now complete with zero size
        let (completion, warnings) = pipeline.capture(&mut target, &raster, &options).await;
        assert!(matches!(
            completion,
            Completion::KeptPrevious(CaptureError::ImagesNotDecodable { count: 1 })
        ));
        assert!(warnings.is_empty());
        assert_eq!(raster.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_superseded_result_is_dropped() {
        let mut pipeline = CapturePipeline::new();
        let mut target = target_with(vec![png_bytes(2, 2)]);
        let raster = FakeRasterizer::default();
        let options = RasterOptions::default();

        let stale = pipeline.begin();
        let stale_report = run(&mut target, &raster, &options).await;
        let fresh = pipeline.begin();

        assert!(matches!(
            pipeline.finish(stale, stale_report.result),
            Completion::Superseded
        ));
        assert!(pipeline.is_generating());

        let fresh_report = run(&mut target, &raster, &options).await;
        assert!(matches!(
            pipeline.finish(fresh, fresh_report.result),
            Completion::Ready
        ));
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let mut pipeline = CapturePipeline::new();
        let mut target = target_with(Vec::new());
        pipeline
            .capture(&mut target, &FakeRasterizer::default(), &RasterOptions::default())
            .await;
        pipeline.reset();
        assert!(matches!(pipeline.state(), CaptureState::Idle));
        assert!(pipeline.artifact().is_none());
    }
}
