//! Narrated slideshow over finished panels.

use panelcraft_core::{ImageRef, Panel, VoiceHandle};
use panelcraft_error::{SessionError, SessionErrorKind};
use panelcraft_interface::NarrationDevice;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// One slide: a ready panel and the caption to speak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct Slide {
    /// 1-based panel index
    index: usize,
    /// Caption spoken while the slide is shown
    text: String,
    /// The panel image
    image: ImageRef,
}

/// Slideshow mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum::Display)]
pub enum PlaybackMode {
    /// Nothing loaded or stopped at the start
    #[default]
    Stopped,
    /// Narrating slides in order
    Playing,
    /// Held on the current slide
    Paused,
    /// Every slide has been narrated
    Finished,
}

/// Observable slideshow state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct PlaybackState {
    /// Slides in panel index order
    slides: Vec<Slide>,
    /// Position in `slides` of the slide shown
    position: usize,
    /// Current mode
    mode: PlaybackMode,
}

impl PlaybackState {
    /// The slide currently shown, if any.
    pub fn current(&self) -> Option<&Slide> {
        match self.mode {
            PlaybackMode::Finished => None,
            _ => self.slides.get(self.position),
        }
    }
}

/// Sequences narration over the ready panels, one slide at a time.
///
/// Only ready panels are shown, in index order. `play` after the last
/// slide restarts from the first one.
pub struct PlaybackController {
    narrator: Arc<dyn NarrationDevice>,
    state: Arc<watch::Sender<PlaybackState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl PlaybackController {
    /// Create a controller narrating through `narrator`.
    pub fn new(narrator: Arc<dyn NarrationDevice>) -> Self {
        let (state, _) = watch::channel(PlaybackState::default());
        Self {
            narrator,
            state: Arc::new(state),
            task: Mutex::new(None),
        }
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state.borrow().clone()
    }

    /// Follow state changes.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }

    /// Replace the slides with the ready panels of `panels`, stopped.
    pub async fn load(&self, panels: &[Panel]) {
        self.halt().await;
        let mut slides: Vec<Slide> = panels
            .iter()
            .filter_map(|panel| {
                panel.image_status().image().map(|image| Slide {
                    index: *panel.index(),
                    text: panel.panel_text().clone(),
                    image: image.clone(),
                })
            })
            .collect();
        slides.sort_by_key(|slide| slide.index);
        debug!(slides = slides.len(), "Slideshow loaded");
        self.state.send_replace(PlaybackState {
            slides,
            position: 0,
            mode: PlaybackMode::Stopped,
        });
    }

    /// Start or resume narration.
    ///
    /// # Errors
    ///
    /// Returns `NothingToPlay` when no slides are loaded.
    #[instrument(skip(self, voice))]
    pub async fn play(&self, voice: Option<VoiceHandle>) -> Result<(), SessionError> {
        if self.state.borrow().slides.is_empty() {
            return Err(SessionError::new(SessionErrorKind::NothingToPlay));
        }
        self.halt().await;
        self.state.send_modify(|state| {
            if state.mode == PlaybackMode::Finished || state.position >= state.slides.len() {
                state.position = 0;
            }
            state.mode = PlaybackMode::Playing;
        });
        info!(from = self.state.borrow().position, "Slideshow playing");
        self.spawn(voice).await;
        Ok(())
    }

    /// Hold on the current slide and silence narration.
    pub async fn pause(&self) {
        self.halt().await;
        self.state.send_modify(|state| {
            if state.mode == PlaybackMode::Playing {
                state.mode = PlaybackMode::Paused;
            }
        });
    }

    /// Jump to the slide of panel `index`, continuing to play if playing.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPanel` when panel `index` has no slide.
    pub async fn seek(&self, index: usize, voice: Option<VoiceHandle>) -> Result<(), SessionError> {
        let position = self
            .state
            .borrow()
            .slides
            .iter()
            .position(|slide| slide.index == index)
            .ok_or_else(|| SessionError::new(SessionErrorKind::UnknownPanel(index)))?;
        self.jump(position, voice).await;
        Ok(())
    }

    /// Advance one slide; past the last slide the show finishes.
    pub async fn next(&self, voice: Option<VoiceHandle>) {
        let position = self.state.borrow().position + 1;
        self.jump(position, voice).await;
    }

    /// Stop and rewind to the first slide.
    pub async fn stop(&self) {
        self.halt().await;
        self.state.send_modify(|state| {
            state.position = 0;
            state.mode = PlaybackMode::Stopped;
        });
    }

    /// Wait until the running show finishes or is halted.
    pub async fn wait(&self) {
        let handle = self.task.lock().await.take();
        let Some(handle) = handle else {
            return;
        };
        match handle.await {
            Err(e) if !e.is_cancelled() => warn!(error = %e, "Slideshow task failed"),
            _ => {}
        }
    }

    async fn jump(&self, position: usize, voice: Option<VoiceHandle>) {
        let playing = self.state.borrow().mode == PlaybackMode::Playing;
        self.halt().await;
        let finished = position >= self.state.borrow().slides.len();
        self.state.send_modify(|state| {
            state.position = position.min(state.slides.len());
            state.mode = match (finished, playing, state.mode) {
                (true, _, _) => PlaybackMode::Finished,
                (false, true, _) => PlaybackMode::Playing,
                (false, false, PlaybackMode::Finished) => PlaybackMode::Paused,
                (false, false, mode) => mode,
            };
        });
        if playing && !finished {
            self.spawn(voice).await;
        }
    }

    /// Abort the narration task and silence the device.
    async fn halt(&self) {
        if let Some(handle) = self.task.lock().await.take() {
            handle.abort();
            self.narrator.cancel_all();
        }
    }

    async fn spawn(&self, voice: Option<VoiceHandle>) {
        let narrator = self.narrator.clone();
        let state = self.state.clone();
        let handle = tokio::spawn(async move {
            loop {
                let slide = {
                    let current = state.borrow();
                    current.slides.get(current.position).cloned()
                };
                let Some(slide) = slide else {
                    state.send_modify(|s| s.mode = PlaybackMode::Finished);
                    info!("Slideshow finished");
                    break;
                };
                debug!(panel = slide.index, "Narrating panel");
                if let Err(e) = narrator.speak(&slide.text, voice.as_ref()).await {
                    warn!(panel = slide.index, error = %e, "Narration failed, moving on");
                }
                state.send_modify(|s| s.position += 1);
            }
        });
        *self.task.lock().await = Some(handle);
    }
}
