//! Provider connection settings.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where and how to reach an OpenAI-compatible provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name for logs
    name: String,
    /// API root, e.g. `https://api.openai.com/v1`
    base_url: String,
    /// Bearer token
    api_key: String,
    /// Model for script streaming and revisions
    chat_model: String,
    /// Model for reference and panel images
    image_model: String,
    /// Requested image size, e.g. `1024x1024`
    image_size: String,
    /// Sent as `response_format` when set; some image models reject it
    image_response_format: Option<String>,
    /// Transport timeout per request, in seconds
    timeout_secs: u64,
}

impl ProviderConfig {
    /// Transport timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            chat_model: "gpt-4o-mini".to_string(),
            image_model: "gpt-image-1".to_string(),
            image_size: "1024x1024".to_string(),
            image_response_format: None,
            timeout_secs: 120,
        }
    }
}

// The key stays out of logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("chat_model", &self.chat_model)
            .field("image_model", &self.image_model)
            .field("image_size", &self.image_size)
            .field("image_response_format", &self.image_response_format)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
