//! Generic OpenAI-compatible API client.
//!
//! Works against any service exposing `/chat/completions` (with
//! server-sent-event streaming) and `/images/generations`.

mod client;
mod config;
mod dto;
mod sse;

pub use client::OpenAICompatibleClient;
pub use config::{ProviderConfig, ProviderConfigBuilder};
pub use dto::{ChatMessage, ChatRequest, ChatRequestBuilder, ImageRequest, ImageRequestBuilder};
