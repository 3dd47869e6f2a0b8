//! Single-panel script revision.

use panelcraft_core::{Genre, Panel, PanelScript};
use panelcraft_error::{PanelcraftResult, ScriptError, ScriptErrorKind};
use panelcraft_interface::{PanelScriptReviser, RevisionRequestBuilder};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Regenerates the script of one panel, independently of the others.
///
/// The reviser never touches session state; callers apply the returned
/// script only on success, so a failed revision leaves the panel's
/// last-known-good content in place.
#[derive(Clone)]
pub struct ScriptReviser {
    service: Arc<dyn PanelScriptReviser>,
}

impl ScriptReviser {
    /// Wrap a revision service.
    pub fn new(service: Arc<dyn PanelScriptReviser>) -> Self {
        Self { service }
    }

    /// Request a replacement script for `panel`.
    ///
    /// # Errors
    ///
    /// Returns a `Revision` script error if the service fails or answers
    /// with an empty script.
    #[instrument(skip(self, idea, panel), fields(panel = *panel.index()))]
    pub async fn revise(
        &self,
        idea: &str,
        genre: Genre,
        panel: &Panel,
        panel_count: usize,
    ) -> PanelcraftResult<PanelScript> {
        let index = *panel.index();
        let request = RevisionRequestBuilder::default()
            .idea(idea)
            .genre(genre)
            .panel_index(index)
            .panel_count(panel_count)
            .prior(panel.to_script())
            .build()
            .map_err(|e| revision_error(index, e.to_string()))?;

        let revised = self.service.revise_panel(&request).await.map_err(|e| {
            warn!(error = %e, "Panel revision failed");
            revision_error(index, e.to_string())
        })?;

        if revised.script().trim().is_empty() {
            warn!("Panel revision returned an empty script");
            return Err(revision_error(index, "service returned an empty script".to_string()));
        }

        debug!("Panel revision received");
        Ok(revised)
    }
}

impl std::fmt::Debug for ScriptReviser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptReviser").finish_non_exhaustive()
    }
}

#[track_caller]
fn revision_error(panel: usize, message: String) -> panelcraft_error::PanelcraftError {
    ScriptError::new(ScriptErrorKind::Revision { panel, message }).into()
}
