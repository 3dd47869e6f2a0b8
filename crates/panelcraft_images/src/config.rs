//! Pipeline configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the panel image pipeline.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_builder::Builder,
    derive_setters::Setters,
)]
#[builder(setter(into), default)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct PipelineConfig {
    /// Pause between the first failed attempt and the retry, in milliseconds
    retry_backoff_ms: u64,
    /// Skip the image service and assign stand-in images
    placeholder_mode: bool,
    /// Base URL for stand-in images; `/seed/{seed}/{w}/{h}` is appended
    placeholder_base_url: String,
    /// Stand-in image width in pixels
    placeholder_width: u32,
    /// Stand-in image height in pixels
    placeholder_height: u32,
}

impl PipelineConfig {
    /// Backoff as a `Duration`.
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry_backoff_ms: 1500,
            placeholder_mode: false,
            placeholder_base_url: "https://picsum.photos".to_string(),
            placeholder_width: 768,
            placeholder_height: 512,
        }
    }
}
