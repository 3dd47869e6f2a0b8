//! Download-all into a local directory.

use async_trait::async_trait;
use panelcraft_core::{Genre, ImageRef, Panel, PanelScript};
use panelcraft_error::{HttpError, IoError, JsonError, PanelcraftResult};
use panelcraft_interface::{ComicExporter, ExportReport, SessionSnapshot};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Name of the script document written next to the images.
pub const SCRIPT_FILE: &str = "script.json";

#[derive(Serialize)]
struct ScriptEntry {
    index: usize,
    #[serde(flatten)]
    script: PanelScript,
}

#[derive(Serialize)]
struct ScriptDocument<'a> {
    idea: &'a str,
    genre: Genre,
    panels: Vec<ScriptEntry>,
}

/// Writes `panel_NN.<ext>` for every ready panel plus `script.json`.
///
/// Remote images are fetched; panels whose image is not ready, or whose
/// remote image cannot be fetched, are skipped and reported.
#[derive(Debug, Clone, Default)]
pub struct DirectoryExporter {
    client: reqwest::Client,
}

impl DirectoryExporter {
    /// Exporter sharing an existing HTTP client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, url: &str) -> PanelcraftResult<Vec<u8>> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(HttpError::from)?
            .bytes()
            .await
            .map_err(HttpError::from)?;
        Ok(bytes.to_vec())
    }

    async fn save_image(&self, panel: &Panel, image: &ImageRef, dir: &Path) -> PanelcraftResult<PathBuf> {
        let path = dir.join(image_file_name(*panel.index(), image));
        match image {
            ImageRef::Binary { data, .. } => write(&path, data.as_slice()).await?,
            ImageRef::Url(url) => {
                let bytes = self.fetch(url).await?;
                write(&path, &bytes).await?;
            }
        }
        debug!(panel = panel.index(), path = %path.display(), "Panel image written");
        Ok(path)
    }
}

/// `panel_03.png` style file name for a panel image.
pub fn image_file_name(index: usize, image: &ImageRef) -> String {
    format!("panel_{index:02}.{}", image.extension())
}

async fn write(path: &Path, bytes: &[u8]) -> PanelcraftResult<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| IoError::new(&e, path).into())
}

#[async_trait]
impl ComicExporter for DirectoryExporter {
    #[instrument(skip(self, snapshot), fields(dir = %dir.display(), panels = snapshot.panels.len()))]
    async fn export(&self, snapshot: &SessionSnapshot, dir: &Path) -> PanelcraftResult<ExportReport> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| IoError::new(&e, dir))?;

        let mut written = Vec::new();
        let mut skipped = Vec::new();
        for panel in &snapshot.panels {
            let Some(image) = panel.image_status().image() else {
                debug!(panel = panel.index(), status = %panel.image_status(), "Panel not ready");
                skipped.push(*panel.index());
                continue;
            };
            match self.save_image(panel, image, dir).await {
                Ok(path) => written.push(path),
                Err(e) => {
                    warn!(panel = panel.index(), error = %e, "Panel image not saved");
                    skipped.push(*panel.index());
                }
            }
        }

        let document = ScriptDocument {
            idea: &snapshot.idea,
            genre: snapshot.genre,
            panels: snapshot
                .panels
                .iter()
                .map(|panel| ScriptEntry {
                    index: *panel.index(),
                    script: panel.to_script(),
                })
                .collect(),
        };
        let json = serde_json::to_vec_pretty(&document).map_err(JsonError::from)?;
        let script_path = dir.join(SCRIPT_FILE);
        write(&script_path, &json).await?;
        written.push(script_path);

        info!(written = written.len(), skipped = skipped.len(), "Comic exported");
        Ok(ExportReport::new(written, skipped))
    }
}
