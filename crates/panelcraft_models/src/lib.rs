//! Provider integrations for Panelcraft.
//!
//! [`OpenAICompatibleClient`] speaks the OpenAI chat completions and image
//! generation formats and implements every generation service the session
//! needs: streamed scripts, single-panel revisions, the character reference
//! sheet and panel images. Prompt wording lives in [`prompts`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod openai_compat;
pub mod prompts;

pub use openai_compat::{
    ChatMessage, ChatRequest, ChatRequestBuilder, ImageRequest, ImageRequestBuilder,
    OpenAICompatibleClient, ProviderConfig, ProviderConfigBuilder,
};
