//! Data transfer objects for OpenAI-compatible APIs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_builder::Builder;
use derive_getters::Getters;
use panelcraft_core::{ImageRef, PanelScript};
use panelcraft_error::{ImageError, ImageErrorKind, PanelcraftResult, ScriptError, ScriptErrorKind};
use serde::{Deserialize, Serialize};

/// A message in the OpenAI chat format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// A system instruction.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// A user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// OpenAI chat completion request.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation messages
    messages: Vec<ChatMessage>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Enable streaming
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

impl ChatRequest {
    /// Creates a new builder for ChatRequest.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// A choice in a non-streaming response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatMessage,
}

/// Non-streaming chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    /// Text of the first choice.
    pub fn into_text(self) -> Option<String> {
        self.choices.into_iter().next().map(|c| c.message.content)
    }
}

/// Incremental content in one streamed chunk.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ChatDelta {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatChunkChoice {
    #[serde(default)]
    pub delta: ChatDelta,
}

/// One `data:` payload of a streamed chat completion.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatChunk {
    #[serde(default)]
    pub choices: Vec<ChatChunkChoice>,
}

impl ChatChunk {
    /// Text carried by this chunk, if any.
    pub fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.delta.content)
            .filter(|text| !text.is_empty())
    }
}

/// Image generation request.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ImageRequest {
    /// Model identifier
    model: String,
    /// Image description
    prompt: String,
    /// Image size, e.g. `1024x1024`
    size: String,
    /// Number of images
    #[builder(default = "1")]
    n: u8,
    /// `b64_json` or `url`
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<String>,
}

impl ImageRequest {
    /// Creates a new builder for ImageRequest.
    pub fn builder() -> ImageRequestBuilder {
        ImageRequestBuilder::default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ImageDatum {
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Image generation response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ImageResponse {
    #[serde(default)]
    pub data: Vec<ImageDatum>,
}

impl ImageResponse {
    /// The first image, inline or by URL.
    ///
    /// # Errors
    ///
    /// `MissingPayload` when no image is present, `Decode` when inline data
    /// is not valid base64.
    pub fn into_image(self) -> PanelcraftResult<ImageRef> {
        let datum = self
            .data
            .into_iter()
            .find(|d| d.b64_json.is_some() || d.url.is_some())
            .ok_or_else(|| ImageError::new(ImageErrorKind::MissingPayload))?;
        if let Some(encoded) = datum.b64_json {
            let bytes = STANDARD
                .decode(encoded.trim())
                .map_err(|e| ImageError::new(ImageErrorKind::Decode(e.to_string())))?;
            if bytes.is_empty() {
                return Err(ImageError::new(ImageErrorKind::MissingPayload).into());
            }
            return Ok(ImageRef::binary(bytes, "image/png"));
        }
        match datum.url {
            Some(url) if !url.is_empty() => Ok(ImageRef::url(url)),
            _ => Err(ImageError::new(ImageErrorKind::MissingPayload).into()),
        }
    }
}

/// Parse a revised panel from a chat reply that may wrap the object in
/// prose or a code fence.
pub(crate) fn parse_revision(panel: usize, reply: &str) -> PanelcraftResult<PanelScript> {
    let malformed = |message: String| ScriptError::new(ScriptErrorKind::Revision { panel, message });
    let start = reply
        .find('{')
        .ok_or_else(|| malformed("reply contains no JSON object".to_string()))?;
    let end = reply
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| malformed("reply contains no complete JSON object".to_string()))?;
    let script: PanelScript =
        serde_json::from_str(&reply[start..=end]).map_err(|e| malformed(e.to_string()))?;
    Ok(script)
}
