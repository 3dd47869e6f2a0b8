//! Intent dispatch over the session, pipeline and playback.

use crate::{Intent, IntentOutcome, PlaybackController, PlaybackMode, SessionStore};
use futures_util::StreamExt;
use panelcraft_core::{
    ImageStatus, PanelEdit, PanelScript, SessionPhase, StoryRequest, VoiceHandle,
};
use panelcraft_error::{
    ImageError, ImageErrorKind, PanelcraftResult, SessionError, SessionErrorKind,
};
use panelcraft_images::{GenerationSummary, PanelImagePipeline, PipelineConfig};
use panelcraft_interface::{
    ComicExporter, ExportReport, NarrationDevice, NullObserver, PanelScriptReviser,
    PanelImageGenerator, ReferenceImageGenerator, ScriptGenerator, SessionObserver,
    SessionSnapshot,
};
use panelcraft_script::{ScriptReviser, ingest_script};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// External services a controller drives.
#[derive(Clone, derive_builder::Builder)]
#[builder(pattern = "owned")]
pub struct ComicServices {
    /// Streams whole-comic scripts
    scripts: Arc<dyn ScriptGenerator>,
    /// Rewrites single panels
    reviser: Arc<dyn PanelScriptReviser>,
    /// Draws the character reference sheet
    references: Arc<dyn ReferenceImageGenerator>,
    /// Draws panels
    images: Arc<dyn PanelImageGenerator>,
    /// Speaks captions during playback
    narrator: Arc<dyn NarrationDevice>,
    /// Receives every session change
    #[builder(default = "Arc::new(NullObserver) as Arc<dyn SessionObserver>")]
    observer: Arc<dyn SessionObserver>,
    /// Writes finished comics to disk
    #[builder(default, setter(strip_option))]
    exporter: Option<Arc<dyn ComicExporter>>,
}

/// Applies display-layer intents to one comic session.
pub struct ComicController {
    store: SessionStore,
    scripts: Arc<dyn ScriptGenerator>,
    reviser: ScriptReviser,
    references: Arc<dyn ReferenceImageGenerator>,
    pipeline: PanelImagePipeline,
    narrator: Arc<dyn NarrationDevice>,
    playback: PlaybackController,
    exporter: Option<Arc<dyn ComicExporter>>,
}

impl std::fmt::Debug for ComicController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComicController")
            .field("pipeline", &self.pipeline)
            .field("playback", &self.playback)
            .finish_non_exhaustive()
    }
}

impl ComicController {
    /// Wire a controller to its services.
    pub fn new(services: ComicServices, pipeline: PipelineConfig) -> Self {
        let ComicServices {
            scripts,
            reviser,
            references,
            images,
            narrator,
            observer,
            exporter,
        } = services;
        Self {
            store: SessionStore::new(observer),
            scripts,
            reviser: ScriptReviser::new(reviser),
            references,
            pipeline: PanelImagePipeline::new(images, pipeline),
            playback: PlaybackController::new(narrator.clone()),
            narrator,
            exporter,
        }
    }

    /// The shared session state.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The slideshow.
    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// Current session state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.store.snapshot().await
    }

    /// Apply one intent.
    ///
    /// # Errors
    ///
    /// Invalid transitions are rejected without changing state. Service
    /// failures are returned after being recorded on the session where the
    /// session tracks them.
    #[instrument(skip_all, fields(intent = %intent))]
    pub async fn handle(&self, intent: Intent) -> PanelcraftResult<IntentOutcome> {
        match intent {
            Intent::Generate(request) => self.generate(request).await.map(|_| IntentOutcome::Applied),
            Intent::RegenerateScript => self.regenerate_script().await.map(|_| IntentOutcome::Applied),
            Intent::Approve => self.approve().await.map(IntentOutcome::Generated),
            Intent::EditPanel { index, edit } => {
                self.edit_panel(index, edit).await.map(|_| IntentOutcome::Applied)
            }
            Intent::RevisePanel(index) => self.revise_panel(index).await.map(IntentOutcome::Revised),
            Intent::RegenerateImage(index) => {
                self.regenerate_image(index).await.map(IntentOutcome::Regenerated)
            }
            Intent::StartOver => {
                self.start_over().await;
                Ok(IntentOutcome::Applied)
            }
            Intent::DownloadAll(dir) => self.download_all(&dir).await.map(IntentOutcome::Exported),
            Intent::Play => self.play().await.map(|_| IntentOutcome::Applied),
            Intent::Pause => {
                self.playback.pause().await;
                Ok(IntentOutcome::Applied)
            }
            Intent::Seek(index) => {
                let voice = self.voice().await;
                self.playback.seek(index, voice).await?;
                Ok(IntentOutcome::Applied)
            }
            Intent::Next => {
                let voice = self.voice().await;
                self.playback.next(voice).await;
                Ok(IntentOutcome::Applied)
            }
            Intent::SelectVoice(voice) => {
                self.store.mutate(|s| s.select_voice(voice)).await;
                Ok(IntentOutcome::Applied)
            }
        }
    }

    /// Start a comic and stream its script into the session.
    ///
    /// Resolves when the stream ends. The session is in review as soon as
    /// the stream opens, so the display layer sees panels as they arrive.
    #[instrument(skip_all, fields(genre = %request.genre(), panels = request.panel_count().get()))]
    pub async fn generate(&self, request: StoryRequest) -> PanelcraftResult<()> {
        let epoch = self.store.mutate(|s| s.begin(request.clone())).await?;
        self.stream_script(epoch, &request).await
    }

    /// Discard the panels and stream the script again.
    #[instrument(skip(self))]
    pub async fn regenerate_script(&self) -> PanelcraftResult<()> {
        let (epoch, request) = self.store.mutate(|s| s.restart_script()).await?;
        self.stream_script(epoch, &request).await
    }

    async fn stream_script(&self, epoch: u64, request: &StoryRequest) -> PanelcraftResult<()> {
        info!(provider = self.scripts.provider_name(), epoch, "Requesting script");
        let fragments = match self.scripts.stream_script(request).await {
            Ok(fragments) => fragments,
            Err(e) => {
                error!(error = %e, "Script stream could not be opened");
                let message = e.to_string();
                self.store
                    .mutate(|s| {
                        s.stream_opened(epoch);
                        s.record_error(epoch, message);
                    })
                    .await;
                return Err(e);
            }
        };
        self.store.mutate(|s| s.stream_opened(epoch)).await;

        let mut updates = ingest_script(fragments);
        while let Some(update) = updates.next().await {
            let update = match update {
                Ok(update) => update,
                Err(e) => {
                    let message = e.to_string();
                    self.store.mutate(|s| s.record_error(epoch, message)).await;
                    return Err(e);
                }
            };
            let complete = update.complete;
            if !self.store.mutate(|s| s.append_panels(epoch, update.panels)).await {
                debug!(epoch, "Session moved on, abandoning script stream");
                return Ok(());
            }
            if complete {
                self.check_script_length(epoch).await;
            }
        }
        Ok(())
    }

    async fn check_script_length(&self, epoch: u64) {
        self.store
            .mutate(|s| {
                if !s.script_complete() {
                    let shortfall = SessionError::new(SessionErrorKind::ScriptIncomplete {
                        received: s.panels().len(),
                        expected: s.panel_count(),
                    });
                    warn!(error = %shortfall, "Script ended short");
                    s.record_error(epoch, shortfall.to_string());
                }
            })
            .await;
    }

    /// Approve the script and render every panel.
    ///
    /// Resolves when every panel is `Ready` or `Failed`. If the reference
    /// image cannot be produced, no panel is touched and the session
    /// returns to review.
    #[instrument(skip(self))]
    pub async fn approve(&self) -> PanelcraftResult<GenerationSummary> {
        let (epoch, panels, idea, genre) = self
            .store
            .mutate(|s| {
                let (epoch, panels) = s.approve()?;
                Ok::<_, SessionError>((epoch, panels, s.idea().to_string(), s.genre()))
            })
            .await?;

        let reference = if self.pipeline.is_placeholder() {
            None
        } else {
            match self.references.generate_reference(&idea, genre).await {
                Ok(image) => {
                    debug!("Reference image ready");
                    self.store
                        .mutate(|s| s.set_reference(epoch, image.clone()))
                        .await;
                    Some(image)
                }
                Err(e) => {
                    let failure = ImageError::new(ImageErrorKind::Reference(e.to_string()));
                    error!(error = %failure, "Reference image failed");
                    let message = failure.to_string();
                    self.store
                        .mutate(|s| s.abort_generation(epoch, message))
                        .await;
                    return Err(failure.into());
                }
            }
        };

        let sink = self.store.panel_sink(epoch);
        let summary = match self
            .pipeline
            .generate_all(&panels, reference.as_ref(), genre, sink)
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                let message = e.to_string();
                self.store
                    .mutate(|s| s.abort_generation(epoch, message))
                    .await;
                return Err(e);
            }
        };
        self.store.mutate(|s| s.finish_generation(epoch)).await;
        Ok(summary)
    }

    /// Change one panel's script fields by hand.
    pub async fn edit_panel(&self, index: usize, edit: PanelEdit) -> PanelcraftResult<()> {
        self.store.mutate(|s| s.edit_panel(index, edit)).await?;
        Ok(())
    }

    /// Replace one panel's script with a fresh version from the reviser.
    ///
    /// A failed revision leaves the panel as it was.
    #[instrument(skip(self))]
    pub async fn revise_panel(&self, index: usize) -> PanelcraftResult<PanelScript> {
        let (epoch, panel, idea, genre, count) = self
            .store
            .read(|s| {
                let (epoch, panel) = s.revision_target(index)?;
                Ok::<_, SessionError>((epoch, panel, s.idea().to_string(), s.genre(), s.panel_count()))
            })
            .await?;
        let script = self.reviser.revise(&idea, genre, &panel, count).await?;
        self.store
            .mutate(|s| s.replace_script(epoch, index, script.clone()))
            .await?;
        Ok(script)
    }

    /// Render one panel again, showing `Loading` first.
    #[instrument(skip(self))]
    pub async fn regenerate_image(&self, index: usize) -> PanelcraftResult<ImageStatus> {
        let (epoch, panel, reference, genre) = self
            .store
            .read(|s| {
                let (epoch, panel, reference) = s.image_target(index)?;
                Ok::<_, SessionError>((epoch, panel, reference, s.genre()))
            })
            .await?;
        self.pipeline
            .regenerate(&panel, reference.as_ref(), genre, self.store.panel_sink(epoch))
            .await
    }

    /// Silence narration, stop the slideshow and discard the session.
    #[instrument(skip(self))]
    pub async fn start_over(&self) {
        self.narrator.cancel_all();
        self.playback.stop().await;
        self.store.mutate(|s| s.start_over()).await;
    }

    /// Write every ready panel and the script under `dir`.
    #[instrument(skip(self))]
    pub async fn download_all(&self, dir: &Path) -> PanelcraftResult<ExportReport> {
        let exporter = self
            .exporter
            .as_ref()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoExporter))?;
        let snapshot = self.snapshot().await;
        if !snapshot.phase.has_images() {
            return Err(SessionError::new(SessionErrorKind::InvalidTransition {
                phase: snapshot.phase.to_string(),
                intent: Intent::DownloadAll(dir.to_path_buf()).to_string(),
            })
            .into());
        }
        let report = exporter.export(&snapshot, dir).await?;
        info!(
            written = report.written().len(),
            skipped = report.skipped().len(),
            "Comic exported"
        );
        Ok(report)
    }

    /// Start the slideshow, or resume it when paused.
    pub async fn play(&self) -> PanelcraftResult<()> {
        let snapshot = self.snapshot().await;
        if snapshot.phase != SessionPhase::Completed {
            return Err(SessionError::new(SessionErrorKind::InvalidTransition {
                phase: snapshot.phase.to_string(),
                intent: Intent::Play.to_string(),
            })
            .into());
        }
        // Paused shows resume in place; anything else restarts from the
        // first ready panel with the latest images.
        if *self.playback.state().mode() != PlaybackMode::Paused {
            self.playback.load(&snapshot.panels).await;
        }
        self.playback.play(snapshot.voice).await?;
        Ok(())
    }

    async fn voice(&self) -> Option<VoiceHandle> {
        self.store.read(|s| s.voice().clone()).await
    }
}
