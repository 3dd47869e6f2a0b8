//! Destinations for per-panel status changes.

use async_trait::async_trait;
use panelcraft_core::ImageStatus;
use tokio::sync::Mutex;

/// Receives image status changes keyed by panel index.
///
/// Updates for different panels may arrive in any order and concurrently;
/// an implementation must touch only the record of the panel named.
#[async_trait]
pub trait PanelStatusSink: Send + Sync {
    /// Record that panel `index` now has `status`.
    async fn update(&self, index: usize, status: ImageStatus);
}

/// Sink that records every update in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    updates: Mutex<Vec<(usize, ImageStatus)>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All updates received so far.
    pub async fn updates(&self) -> Vec<(usize, ImageStatus)> {
        self.updates.lock().await.clone()
    }

    /// The sequence of statuses one panel went through.
    pub async fn history(&self, index: usize) -> Vec<ImageStatus> {
        self.updates
            .lock()
            .await
            .iter()
            .filter(|(i, _)| *i == index)
            .map(|(_, status)| status.clone())
            .collect()
    }
}

#[async_trait]
impl PanelStatusSink for RecordingSink {
    async fn update(&self, index: usize, status: ImageStatus) {
        self.updates.lock().await.push((index, status));
    }
}
