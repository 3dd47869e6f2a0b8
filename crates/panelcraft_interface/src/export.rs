//! Download-all destination.

use crate::SessionSnapshot;
use async_trait::async_trait;
use panelcraft_error::PanelcraftResult;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What an export wrote and what it left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct ExportReport {
    /// Files written, images first, then the script document
    written: Vec<PathBuf>,
    /// Indices of panels skipped because their image was not ready
    skipped: Vec<usize>,
}

impl ExportReport {
    /// Assemble a report.
    pub fn new(written: Vec<PathBuf>, skipped: Vec<usize>) -> Self {
        Self { written, skipped }
    }
}

/// Saves a finished comic somewhere the user can keep it.
#[async_trait]
pub trait ComicExporter: Send + Sync {
    /// Write every ready panel image and the panel scripts under `dir`.
    async fn export(&self, snapshot: &SessionSnapshot, dir: &Path) -> PanelcraftResult<ExportReport>;
}
