//! Script and image generation services.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use panelcraft_core::{Genre, ImageRef, PanelScript, StoryRequest};
use panelcraft_error::PanelcraftResult;

/// Incrementally delivered text of a serialized panel array.
pub type FragmentStream = BoxStream<'static, PanelcraftResult<String>>;

/// Streams the script for a whole comic.
///
/// The returned fragments concatenate to a JSON array of panel objects
/// `{index, script, imagePrompt, panelText}`. Implementations make no
/// promise about where fragments are split.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Open a fragment stream for the given story.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be opened. Failures after the
    /// stream opens are delivered as `Err` items.
    async fn stream_script(&self, request: &StoryRequest) -> PanelcraftResult<FragmentStream>;

    /// Provider name for tracing.
    fn provider_name(&self) -> &'static str;
}

/// Input for revising the script of one panel.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct RevisionRequest {
    /// Story idea of the session
    idea: String,
    /// Genre of the session
    genre: Genre,
    /// 1-based index of the panel being revised
    panel_index: usize,
    /// Total panels in the comic, for narrative placement
    panel_count: usize,
    /// The panel's current script
    prior: PanelScript,
}

/// Produces a replacement script for a single panel, non-streaming.
#[async_trait]
pub trait PanelScriptReviser: Send + Sync {
    /// Request a replacement script, prompt and caption.
    async fn revise_panel(&self, request: &RevisionRequest) -> PanelcraftResult<PanelScript>;
}

/// Produces the character reference image shared by every panel.
#[async_trait]
pub trait ReferenceImageGenerator: Send + Sync {
    /// Render a character design sheet for the story.
    async fn generate_reference(&self, idea: &str, genre: Genre) -> PanelcraftResult<ImageRef>;
}

/// Input for rendering one panel.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_getters::Getters, derive_builder::Builder, derive_new::new,
)]
#[builder(setter(into))]
pub struct PanelImageRequest {
    /// 1-based panel index, for tracing only
    panel_index: usize,
    /// Shared character reference
    reference: ImageRef,
    /// Image instructions for this panel
    image_prompt: String,
    /// Caption to letter into the panel
    panel_text: String,
    /// Genre art direction
    genre: Genre,
}

/// Renders panel images.
#[async_trait]
pub trait PanelImageGenerator: Send + Sync {
    /// Render one panel.
    ///
    /// # Errors
    ///
    /// Any error, including a response without image data, is treated as a
    /// transient failure by the pipeline.
    async fn generate_panel(&self, request: &PanelImageRequest) -> PanelcraftResult<ImageRef>;
}
