//! Test utilities for session tests.
//!
//! Mock services for every collaborator the controller drives.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::StreamExt;
use panelcraft_core::{
    Genre, ImageRef, ImageStatus, Panel, PanelCount, PanelScript, StoryRequest,
    StoryRequestBuilder, VoiceHandle,
};
use panelcraft_error::{
    HttpError, HttpErrorKind, ImageError, ImageErrorKind, PanelcraftResult,
};
use panelcraft_images::{PipelineConfig, PipelineConfigBuilder};
use panelcraft_interface::{
    FragmentStream, NarrationDevice, PanelImageGenerator, PanelImageRequest, PanelScriptReviser,
    ReferenceImageGenerator, RevisionRequest, ScriptGenerator, SessionObserver, SessionSnapshot,
};
use panelcraft_session::{ComicController, ComicServicesBuilder};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// JSON for one panel object in the script wire format.
pub fn panel_json(i: usize) -> String {
    format!(
        r#"{{"index": {i}, "script": "scene {i}", "imagePrompt": "prompt {i}", "panelText": "caption {i}"}}"#
    )
}

/// A complete script array of `count` panels.
pub fn script_json(count: usize) -> String {
    let panels: Vec<String> = (1..=count).map(panel_json).collect();
    format!("[{}]", panels.join(", "))
}

/// Split `text` into fragments of at most `size` bytes.
pub fn chunks(text: &str, size: usize) -> Vec<PanelcraftResult<String>> {
    text.as_bytes()
        .chunks(size)
        .map(|c| Ok(String::from_utf8_lossy(c).into_owned()))
        .collect()
}

/// A story request for `count` panels.
pub fn request(count: u8) -> StoryRequest {
    StoryRequestBuilder::default()
        .idea("a lighthouse keeper befriends a storm")
        .genre(Genre::Fantasy)
        .panel_count(PanelCount::new(count).unwrap())
        .build()
        .unwrap()
}

/// A panel whose image is ready.
pub fn ready_panel(i: usize) -> Panel {
    let mut panel = Panel::pending(
        i,
        PanelScript::new(format!("scene {i}"), format!("prompt {i}"), format!("caption {i}")),
    );
    panel.set_status(ImageStatus::Loading).unwrap();
    panel
        .set_status(ImageStatus::Ready(ImageRef::url(format!("https://img.test/{i}.png"))))
        .unwrap();
    panel
}

/// Script service replaying queued fragment lists, one per request.
#[derive(Default)]
pub struct MockScripts {
    responses: Mutex<VecDeque<Vec<PanelcraftResult<String>>>>,
    pub requests: AtomicUsize,
    refuse: bool,
}

impl MockScripts {
    pub fn new(responses: Vec<Vec<PanelcraftResult<String>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    /// A service whose stream never opens.
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ScriptGenerator for MockScripts {
    async fn stream_script(&self, _request: &StoryRequest) -> PanelcraftResult<FragmentStream> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(HttpError::new(HttpErrorKind::Status {
                status_code: 503,
                message: "unavailable".to_string(),
            })
            .into());
        }
        let fragments = self.responses.lock().unwrap().pop_front().unwrap_or_default();
        Ok(futures::stream::iter(fragments).boxed())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Reviser returning a fixed script, or failing.
pub struct MockReviser {
    pub fail: bool,
}

#[async_trait]
impl PanelScriptReviser for MockReviser {
    async fn revise_panel(&self, request: &RevisionRequest) -> PanelcraftResult<PanelScript> {
        if self.fail {
            return Err(HttpError::new(HttpErrorKind::Timeout).into());
        }
        let i = request.panel_index();
        Ok(PanelScript::new(
            format!("revised scene {i}"),
            format!("revised prompt {i}"),
            format!("revised caption {i}"),
        ))
    }
}

/// Reference image service that succeeds or fails.
#[derive(Default)]
pub struct MockReference {
    pub fail: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ReferenceImageGenerator for MockReference {
    async fn generate_reference(&self, _idea: &str, _genre: Genre) -> PanelcraftResult<ImageRef> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ImageError::new(ImageErrorKind::MissingPayload).into());
        }
        Ok(ImageRef::binary(vec![1, 2, 3], "image/png"))
    }
}

/// Panel image service failing a set number of times per panel.
#[derive(Default)]
pub struct MockImages {
    pub failures: Mutex<HashMap<usize, u32>>,
    pub panics_on: Option<usize>,
}

impl MockImages {
    pub fn failing(panel: usize, times: u32) -> Self {
        let images = Self::default();
        images.failures.lock().unwrap().insert(panel, times);
        images
    }

    pub fn panicking(panel: usize) -> Self {
        Self {
            panics_on: Some(panel),
            ..Self::default()
        }
    }
}

#[async_trait]
impl PanelImageGenerator for MockImages {
    async fn generate_panel(&self, request: &PanelImageRequest) -> PanelcraftResult<ImageRef> {
        let index = *request.panel_index();
        if self.panics_on == Some(index) {
            panic!("image backend crashed on panel {index}");
        }
        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(&index) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Err(ImageError::new(ImageErrorKind::Generation("busy".to_string())).into())
            }
            _ => Ok(ImageRef::url(format!("https://img.test/{index}.png"))),
        }
    }
}

/// Narrator that takes one second per caption and records what it said.
#[derive(Default)]
pub struct MockNarrator {
    pub spoken: Mutex<Vec<(String, Option<VoiceHandle>)>>,
    pub cancels: AtomicUsize,
}

impl MockNarrator {
    pub fn texts(&self) -> Vec<String> {
        self.spoken.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }
}

#[async_trait]
impl NarrationDevice for MockNarrator {
    async fn speak(&self, text: &str, voice: Option<&VoiceHandle>) -> PanelcraftResult<()> {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), voice.cloned()));
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok(())
    }

    fn cancel_all(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

/// Observer keeping every snapshot.
#[derive(Default)]
pub struct RecordingObserver {
    pub snapshots: Mutex<Vec<SessionSnapshot>>,
}

impl RecordingObserver {
    pub fn panel_counts(&self) -> Vec<usize> {
        self.snapshots.lock().unwrap().iter().map(|s| s.panels.len()).collect()
    }
}

impl SessionObserver for RecordingObserver {
    fn render(&self, snapshot: &SessionSnapshot) {
        self.snapshots.lock().unwrap().push(snapshot.clone());
    }
}

/// Mocks wired into one controller.
pub struct Harness {
    pub controller: ComicController,
    pub scripts: Arc<MockScripts>,
    pub reference: Arc<MockReference>,
    pub narrator: Arc<MockNarrator>,
    pub observer: Arc<RecordingObserver>,
}

pub struct HarnessBuilder {
    scripts: MockScripts,
    reviser: MockReviser,
    reference: MockReference,
    images: MockImages,
    pipeline: PipelineConfig,
}

impl HarnessBuilder {
    pub fn new(scripts: MockScripts) -> Self {
        Self {
            scripts,
            reviser: MockReviser { fail: false },
            reference: MockReference::default(),
            images: MockImages::default(),
            pipeline: PipelineConfig::default(),
        }
    }

    pub fn reviser(mut self, reviser: MockReviser) -> Self {
        self.reviser = reviser;
        self
    }

    pub fn reference(mut self, reference: MockReference) -> Self {
        self.reference = reference;
        self
    }

    pub fn images(mut self, images: MockImages) -> Self {
        self.images = images;
        self
    }

    pub fn placeholder(mut self) -> Self {
        self.pipeline = PipelineConfigBuilder::default()
            .placeholder_mode(true)
            .build()
            .unwrap();
        self
    }

    pub fn build(self) -> Harness {
        let scripts = Arc::new(self.scripts);
        let reference = Arc::new(self.reference);
        let narrator = Arc::new(MockNarrator::default());
        let observer = Arc::new(RecordingObserver::default());
        let services = ComicServicesBuilder::default()
            .scripts(scripts.clone())
            .reviser(Arc::new(self.reviser))
            .references(reference.clone())
            .images(Arc::new(self.images))
            .narrator(narrator.clone())
            .observer(observer.clone())
            .build()
            .unwrap();
        Harness {
            controller: ComicController::new(services, self.pipeline),
            scripts,
            reference,
            narrator,
            observer,
        }
    }
}
