//! Concurrent per-panel image generation.

use crate::{PanelStatusSink, PipelineConfig};
use panelcraft_core::{Genre, ImageRef, ImageStatus, Panel};
use panelcraft_error::{PanelcraftResult, RetryableError, SessionError, SessionErrorKind};
use panelcraft_interface::{PanelImageGenerator, PanelImageRequest};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, error, info, instrument, warn};

/// Outcome of a bulk generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Indices of panels that ended `Ready`
    pub ready: Vec<usize>,
    /// Indices of panels that ended `Failed`
    pub failed: Vec<usize>,
}

/// Renders panel images with one bounded retry per panel.
#[derive(Clone)]
pub struct PanelImagePipeline {
    generator: Arc<dyn PanelImageGenerator>,
    config: PipelineConfig,
}

impl std::fmt::Debug for PanelImagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelImagePipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PanelImagePipeline {
    /// Create a pipeline around an image service.
    pub fn new(generator: Arc<dyn PanelImageGenerator>, config: PipelineConfig) -> Self {
        Self { generator, config }
    }

    /// Pipeline settings.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Whether the image service is bypassed.
    pub fn is_placeholder(&self) -> bool {
        *self.config.placeholder_mode()
    }

    /// Render every panel concurrently.
    ///
    /// Resolves once every panel has reported `Ready` or `Failed`; per-panel
    /// failures are recorded through `sink` and never returned.
    ///
    /// # Errors
    ///
    /// Returns `MissingReference` when not in placeholder mode and no
    /// reference image is supplied. No panel is touched in that case.
    #[instrument(skip_all, fields(panels = panels.len(), placeholder = self.is_placeholder()))]
    pub async fn generate_all(
        &self,
        panels: &[Panel],
        reference: Option<&ImageRef>,
        genre: Genre,
        sink: Arc<dyn PanelStatusSink>,
    ) -> PanelcraftResult<GenerationSummary> {
        if self.is_placeholder() {
            return Ok(self.placeholder_all(panels, sink).await);
        }
        let reference = reference.ok_or_else(|| SessionError::new(SessionErrorKind::MissingReference))?;

        info!("Starting bulk panel image generation");
        let mut tasks = JoinSet::new();
        for panel in panels {
            let generator = self.generator.clone();
            let request = panel_request(panel, reference, genre);
            let sink = sink.clone();
            let backoff = self.config.retry_backoff();
            tasks.spawn(async move {
                let index = *request.panel_index();
                let status = render_panel(generator.as_ref(), &request, backoff, sink.as_ref()).await;
                (index, status)
            });
        }

        let mut summary = GenerationSummary::default();
        let mut settled = BTreeSet::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, status)) => {
                    settled.insert(index);
                    match status {
                        ImageStatus::Ready(_) => summary.ready.push(index),
                        _ => summary.failed.push(index),
                    }
                }
                Err(e) => error!(error = %e, "Panel image task did not complete"),
            }
        }

        // A task that panicked never reported a terminal status.
        for panel in panels {
            let index = *panel.index();
            if !settled.contains(&index) {
                sink.update(index, ImageStatus::Failed("image task aborted".to_string()))
                    .await;
                summary.failed.push(index);
            }
        }

        summary.ready.sort_unstable();
        summary.failed.sort_unstable();
        info!(
            ready = summary.ready.len(),
            failed = summary.failed.len(),
            "Bulk panel image generation settled"
        );
        Ok(summary)
    }

    /// Render one panel again, whatever its current status.
    ///
    /// Always reports `Loading` first, then follows the same two-attempt
    /// protocol as bulk generation. Returns the terminal status.
    ///
    /// # Errors
    ///
    /// Returns `MissingReference` when not in placeholder mode and no
    /// reference image is supplied.
    #[instrument(skip_all, fields(panel = *panel.index()))]
    pub async fn regenerate(
        &self,
        panel: &Panel,
        reference: Option<&ImageRef>,
        genre: Genre,
        sink: Arc<dyn PanelStatusSink>,
    ) -> PanelcraftResult<ImageStatus> {
        if self.is_placeholder() {
            let index = *panel.index();
            sink.update(index, ImageStatus::Loading).await;
            let status = ImageStatus::Ready(self.placeholder_image());
            sink.update(index, status.clone()).await;
            return Ok(status);
        }
        let reference = reference.ok_or_else(|| SessionError::new(SessionErrorKind::MissingReference))?;
        let request = panel_request(panel, reference, genre);
        Ok(render_panel(
            self.generator.as_ref(),
            &request,
            self.config.retry_backoff(),
            sink.as_ref(),
        )
        .await)
    }

    async fn placeholder_all(
        &self,
        panels: &[Panel],
        sink: Arc<dyn PanelStatusSink>,
    ) -> GenerationSummary {
        info!(panels = panels.len(), "Assigning placeholder images");
        let mut summary = GenerationSummary::default();
        for panel in panels {
            let index = *panel.index();
            sink.update(index, ImageStatus::Loading).await;
            sink.update(index, ImageStatus::Ready(self.placeholder_image()))
                .await;
            summary.ready.push(index);
        }
        summary
    }

    fn placeholder_image(&self) -> ImageRef {
        let seed = uuid::Uuid::new_v4().simple().to_string();
        ImageRef::url(format!(
            "{}/seed/{}/{}/{}",
            self.config.placeholder_base_url().trim_end_matches('/'),
            seed,
            self.config.placeholder_width(),
            self.config.placeholder_height()
        ))
    }
}

fn panel_request(panel: &Panel, reference: &ImageRef, genre: Genre) -> PanelImageRequest {
    PanelImageRequest::new(
        *panel.index(),
        reference.clone(),
        panel.image_prompt().clone(),
        panel.panel_text().clone(),
        genre,
    )
}

/// Run the two-attempt protocol for one panel and report each step.
async fn render_panel(
    generator: &dyn PanelImageGenerator,
    request: &PanelImageRequest,
    backoff: Duration,
    sink: &dyn PanelStatusSink,
) -> ImageStatus {
    let index = *request.panel_index();
    sink.update(index, ImageStatus::Loading).await;

    let attempts = AtomicU32::new(0);
    let attempts = &attempts;
    let strategy = FixedInterval::new(backoff).take(1);
    let outcome = Retry::spawn(strategy, move || async move {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(panel = index, attempt, "Requesting panel image");
        match generator.generate_panel(request).await {
            Ok(image) => Ok(image),
            Err(e) => {
                if attempt == 1 {
                    warn!(
                        panel = index,
                        error = %e,
                        retryable = e.is_retryable(),
                        "Panel image failed, retrying once"
                    );
                    sink.update(index, ImageStatus::Retrying).await;
                }
                RetryError::to_transient(e)
            }
        }
    })
    .await;

    let status = match outcome {
        Ok(image) => {
            debug!(panel = index, attempts = attempts.load(Ordering::SeqCst), "Panel image ready");
            ImageStatus::Ready(image)
        }
        Err(e) => {
            error!(panel = index, error = %e, "Panel image failed after retry");
            ImageStatus::Failed(e.to_string())
        }
    };
    sink.update(index, status.clone()).await;
    status
}
