//! Generic client for OpenAI-compatible APIs.

use crate::openai_compat::dto::{ChatChunk, ChatResponse, ImageResponse, parse_revision};
use crate::openai_compat::sse::{SseDecoder, SseEvent};
use crate::openai_compat::{ChatMessage, ChatRequest, ImageRequest, ProviderConfig};
use crate::prompts;
use async_stream::stream;
use async_trait::async_trait;
use futures_util::StreamExt;
use panelcraft_core::{Genre, ImageRef, PanelScript, StoryRequest};
use panelcraft_error::{
    HttpError, HttpErrorKind, JsonError, PanelcraftResult, RetryableError, ScriptError,
    ScriptErrorKind,
};
use panelcraft_interface::{
    FragmentStream, PanelImageGenerator, PanelImageRequest, PanelScriptReviser,
    ReferenceImageGenerator, RevisionRequest, ScriptGenerator,
};
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{debug, error, instrument, warn};

/// Generic client for any OpenAI-compatible API.
///
/// One client serves every generation role: it streams scripts, revises
/// panels and draws images, using the chat and image models named in its
/// [`ProviderConfig`].
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    config: ProviderConfig,
}

impl OpenAICompatibleClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    #[instrument(skip(config), fields(provider = %config.name(), chat_model = %config.chat_model()))]
    pub fn new(config: ProviderConfig) -> PanelcraftResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(HttpError::from)?;
        debug!(url = %config.base_url(), "Created OpenAI-compatible client");
        Ok(Self { client, config })
    }

    /// Connection settings.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url().trim_end_matches('/'), path)
    }

    /// POST a JSON body and fail on non-success statuses.
    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> PanelcraftResult<Response> {
        let response = self
            .client
            .post(self.endpoint(path))
            .bearer_auth(self.config.api_key())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let err = HttpError::from(e);
                error!(provider = %self.config.name(), error = %err, "HTTP request failed");
                err
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let err = HttpError::new(HttpErrorKind::Status {
                status_code: status.as_u16(),
                message,
            });
            error!(
                provider = %self.config.name(),
                status = %status,
                retryable = err.is_retryable(),
                "API error"
            );
            return Err(err.into());
        }
        Ok(response)
    }

    /// Run a non-streaming chat completion and return the reply text.
    #[instrument(skip(self, messages), fields(provider = %self.config.name(), model = %self.config.chat_model()))]
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> PanelcraftResult<String> {
        let request = ChatRequest::builder()
            .model(self.config.chat_model().clone())
            .messages(messages)
            .temperature(Some(0.9))
            .build()
            .map_err(|e| HttpError::new(HttpErrorKind::Request(e.to_string())))?;

        let response: ChatResponse = self
            .post("chat/completions", &request)
            .await?
            .json()
            .await
            .map_err(HttpError::from)?;
        response.into_text().ok_or_else(|| {
            HttpError::new(HttpErrorKind::Decode("No choices in response".to_string())).into()
        })
    }

    /// Run a streaming chat completion and yield its text deltas.
    #[instrument(skip(self, messages), fields(provider = %self.config.name(), model = %self.config.chat_model()))]
    pub async fn chat_stream(&self, messages: Vec<ChatMessage>) -> PanelcraftResult<FragmentStream> {
        let request = ChatRequest::builder()
            .model(self.config.chat_model().clone())
            .messages(messages)
            .temperature(Some(0.9))
            .stream(Some(true))
            .build()
            .map_err(|e| HttpError::new(HttpErrorKind::Request(e.to_string())))?;

        let mut body = self.post("chat/completions", &request).await?.bytes_stream();
        debug!("Chat stream open");

        let fragments = stream! {
            let mut decoder = SseDecoder::default();
            loop {
                let (events, exhausted) = match body.next().await {
                    Some(Ok(chunk)) => (decoder.push(&chunk), false),
                    Some(Err(e)) => {
                        let err = HttpError::from(e);
                        warn!(error = %err, "Chat stream interrupted");
                        yield Err(err.into());
                        return;
                    }
                    None => (decoder.finish().into_iter().collect(), true),
                };
                for event in events {
                    let payload = match event {
                        SseEvent::Done => return,
                        SseEvent::Data(payload) => payload,
                    };
                    match serde_json::from_str::<ChatChunk>(&payload) {
                        Ok(chunk) => {
                            if let Some(text) = chunk.into_text() {
                                yield Ok(text);
                            }
                        }
                        Err(e) => {
                            yield Err(JsonError::from(e).into());
                            return;
                        }
                    }
                }
                if exhausted {
                    return;
                }
            }
        };
        Ok(fragments.boxed())
    }

    /// Generate one image from a text prompt.
    #[instrument(skip(self, prompt), fields(provider = %self.config.name(), model = %self.config.image_model()))]
    pub async fn image(&self, prompt: String) -> PanelcraftResult<ImageRef> {
        let request = ImageRequest::builder()
            .model(self.config.image_model().clone())
            .prompt(prompt)
            .size(self.config.image_size().clone())
            .response_format(self.config.image_response_format().clone())
            .build()
            .map_err(|e| HttpError::new(HttpErrorKind::Request(e.to_string())))?;

        let response: ImageResponse = self
            .post("images/generations", &request)
            .await?
            .json()
            .await
            .map_err(HttpError::from)?;
        response.into_image()
    }
}

#[async_trait]
impl ScriptGenerator for OpenAICompatibleClient {
    async fn stream_script(&self, request: &StoryRequest) -> PanelcraftResult<FragmentStream> {
        let messages = vec![
            ChatMessage::system(prompts::SCRIPT_SYSTEM),
            ChatMessage::user(prompts::script(request)),
        ];
        self.chat_stream(messages).await.map_err(|e| {
            ScriptError::new(ScriptErrorKind::Generation(e.to_string())).into()
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai-compatible"
    }
}

#[async_trait]
impl PanelScriptReviser for OpenAICompatibleClient {
    async fn revise_panel(&self, request: &RevisionRequest) -> PanelcraftResult<PanelScript> {
        let messages = vec![
            ChatMessage::system(prompts::SCRIPT_SYSTEM),
            ChatMessage::user(prompts::revision(request)),
        ];
        let reply = self.chat(messages).await?;
        parse_revision(*request.panel_index(), &reply)
    }
}

#[async_trait]
impl ReferenceImageGenerator for OpenAICompatibleClient {
    async fn generate_reference(&self, idea: &str, genre: Genre) -> PanelcraftResult<ImageRef> {
        self.image(prompts::character_sheet(idea, genre)).await
    }
}

#[async_trait]
impl PanelImageGenerator for OpenAICompatibleClient {
    async fn generate_panel(&self, request: &PanelImageRequest) -> PanelcraftResult<ImageRef> {
        self.image(prompts::panel_image(request)).await
    }
}
