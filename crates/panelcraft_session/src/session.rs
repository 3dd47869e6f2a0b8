//! The comic session and its phase machine.

use panelcraft_core::{
    Genre, ImageRef, ImageStatus, Panel, PanelEdit, PanelScript, SessionPhase, StoryRequest,
    VoiceHandle,
};
use panelcraft_error::{SessionError, SessionErrorKind};
use panelcraft_interface::SessionSnapshot;
use tracing::{debug, info, warn};

/// State of one comic from idea to finished panels.
///
/// Every method that takes an `epoch` is fed by an asynchronous producer
/// (script stream, image pipeline, reviser). Those calls are ignored when
/// the epoch no longer matches, so results from a discarded panel set can
/// never leak into the current one.
#[derive(Debug, Clone, Default, derive_getters::Getters)]
pub struct ComicSession {
    /// Incarnation of the panel set
    epoch: u64,
    /// Current phase
    phase: SessionPhase,
    /// The request that started the session; `None` while idle
    request: Option<StoryRequest>,
    /// Panels in index order
    panels: Vec<Panel>,
    /// Character reference shared by every panel image
    reference: Option<ImageRef>,
    /// Selected narration voice; survives start over
    voice: Option<VoiceHandle>,
    /// Last session-level error message
    last_error: Option<String>,
}

#[track_caller]
fn invalid(phase: SessionPhase, intent: &str) -> SessionError {
    SessionError::new(SessionErrorKind::InvalidTransition {
        phase: phase.to_string(),
        intent: intent.to_string(),
    })
}

impl ComicSession {
    /// An idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested panel count, zero while idle.
    pub fn panel_count(&self) -> usize {
        self.request
            .as_ref()
            .map(|r| r.panel_count().get())
            .unwrap_or_default()
    }

    /// Genre of the session, the default genre while idle.
    pub fn genre(&self) -> Genre {
        self.request.as_ref().map(|r| *r.genre()).unwrap_or_default()
    }

    /// Story idea, empty while idle.
    pub fn idea(&self) -> &str {
        self.request.as_ref().map(|r| r.idea().as_str()).unwrap_or_default()
    }

    /// Whether every requested panel has been scripted.
    pub fn script_complete(&self) -> bool {
        self.request.is_some() && self.panels.len() == self.panel_count()
    }

    /// Look up a panel by its 1-based index.
    pub fn panel(&self, index: usize) -> Result<&Panel, SessionError> {
        index
            .checked_sub(1)
            .and_then(|i| self.panels.get(i))
            .ok_or_else(|| SessionError::new(SessionErrorKind::UnknownPanel(index)))
    }

    fn panel_mut(&mut self, index: usize) -> Result<&mut Panel, SessionError> {
        index
            .checked_sub(1)
            .and_then(|i| self.panels.get_mut(i))
            .ok_or_else(|| SessionError::new(SessionErrorKind::UnknownPanel(index)))
    }

    /// Immutable copy for the display layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            epoch: self.epoch,
            phase: self.phase,
            idea: self.idea().to_string(),
            genre: self.genre(),
            panel_count: self.panel_count(),
            panels: self.panels.clone(),
            voice: self.voice.clone(),
            error: self.last_error.clone(),
        }
    }

    /// Start a new comic. `Idle -> ScriptStreaming`.
    ///
    /// Returns the epoch the script stream must be tagged with.
    pub fn begin(&mut self, request: StoryRequest) -> Result<u64, SessionError> {
        if self.phase != SessionPhase::Idle {
            return Err(invalid(self.phase, "generate"));
        }
        info!(
            genre = %request.genre(),
            panel_count = request.panel_count().get(),
            "Starting comic session"
        );
        self.request = Some(request);
        self.discard_panels();
        self.phase = SessionPhase::ScriptStreaming;
        Ok(self.epoch)
    }

    /// Discard every panel and stream the script again.
    /// `ScriptReview -> ScriptStreaming`.
    pub fn restart_script(&mut self) -> Result<(u64, StoryRequest), SessionError> {
        let request = match (&self.phase, &self.request) {
            (SessionPhase::ScriptReview, Some(request)) => request.clone(),
            _ => return Err(invalid(self.phase, "regenerate_script")),
        };
        info!(discarded = self.panels.len(), "Regenerating full script");
        self.discard_panels();
        self.phase = SessionPhase::ScriptStreaming;
        Ok((self.epoch, request))
    }

    /// The script stream opened. `ScriptStreaming -> ScriptReview`.
    ///
    /// Returns false when `epoch` is stale.
    pub fn stream_opened(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch || self.phase != SessionPhase::ScriptStreaming {
            return false;
        }
        debug!("Script stream open, entering review");
        self.phase = SessionPhase::ScriptReview;
        true
    }

    /// Append newly streamed panels.
    ///
    /// `panels` is the parser's full list so far; only the tail beyond the
    /// panels already held is appended, so user edits to earlier panels
    /// survive. Panels beyond the requested count are dropped. Returns
    /// false when `epoch` is stale.
    pub fn append_panels(&mut self, epoch: u64, panels: Vec<Panel>) -> bool {
        if epoch != self.epoch || !self.phase_accepts_script() {
            return false;
        }
        let limit = self.panel_count();
        if panels.len() > limit {
            warn!(received = panels.len(), expected = limit, "Script produced extra panels, truncating");
        }
        let held = self.panels.len();
        self.panels
            .extend(panels.into_iter().take(limit).skip(held));
        if self.panels.len() > held {
            debug!(panels = self.panels.len(), expected = limit, "Panels appended");
        }
        true
    }

    fn phase_accepts_script(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::ScriptStreaming | SessionPhase::ScriptReview
        )
    }

    /// Record a session-level error. Ignored when `epoch` is stale.
    pub fn record_error(&mut self, epoch: u64, message: impl Into<String>) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.last_error = Some(message.into());
        true
    }

    /// Freeze the script and begin image generation.
    /// `ScriptReview -> ImageGenerating`.
    ///
    /// Returns the epoch and the panels to render.
    pub fn approve(&mut self) -> Result<(u64, Vec<Panel>), SessionError> {
        if self.phase != SessionPhase::ScriptReview {
            return Err(invalid(self.phase, "approve"));
        }
        if !self.script_complete() {
            return Err(SessionError::new(SessionErrorKind::ScriptIncomplete {
                received: self.panels.len(),
                expected: self.panel_count(),
            }));
        }
        info!(panels = self.panels.len(), "Script approved");
        self.phase = SessionPhase::ImageGenerating;
        self.last_error = None;
        Ok((self.epoch, self.panels.clone()))
    }

    /// Store the reference image for this epoch.
    pub fn set_reference(&mut self, epoch: u64, reference: ImageRef) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.reference = Some(reference);
        true
    }

    /// Abandon bulk generation before any panel was touched.
    /// `ImageGenerating -> ScriptReview`.
    pub fn abort_generation(&mut self, epoch: u64, message: impl Into<String>) -> bool {
        if epoch != self.epoch || self.phase != SessionPhase::ImageGenerating {
            return false;
        }
        let message = message.into();
        warn!(error = %message, "Image generation aborted, returning to review");
        self.phase = SessionPhase::ScriptReview;
        self.last_error = Some(message);
        true
    }

    /// Apply one panel image status change.
    ///
    /// Returns `Ok(false)` when `epoch` is stale.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPanel` or `IllegalStatusChange`; the panel is left
    /// unchanged.
    pub fn apply_status(
        &mut self,
        epoch: u64,
        index: usize,
        status: ImageStatus,
    ) -> Result<bool, SessionError> {
        if epoch != self.epoch {
            debug!(panel = index, stale = epoch, current = self.epoch, "Dropping stale image status");
            return Ok(false);
        }
        self.panel_mut(index)?.set_status(status)?;
        Ok(true)
    }

    /// Bulk generation settled. `ImageGenerating -> Completed`.
    pub fn finish_generation(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch || self.phase != SessionPhase::ImageGenerating {
            return false;
        }
        info!("Comic complete");
        self.phase = SessionPhase::Completed;
        true
    }

    /// Apply a user edit to one panel's script fields.
    pub fn edit_panel(&mut self, index: usize, edit: PanelEdit) -> Result<(), SessionError> {
        if !self.has_script() {
            return Err(invalid(self.phase, "edit_panel"));
        }
        self.panel_mut(index)?.apply_edit(edit);
        Ok(())
    }

    /// Replace one panel's script with a revision, keeping its image.
    ///
    /// Returns `Ok(false)` when `epoch` is stale.
    pub fn replace_script(
        &mut self,
        epoch: u64,
        index: usize,
        script: PanelScript,
    ) -> Result<bool, SessionError> {
        if epoch != self.epoch {
            return Ok(false);
        }
        self.panel_mut(index)?.replace_script(script);
        Ok(true)
    }

    /// Context for revising panel `index`: the epoch and a copy of the panel.
    pub fn revision_target(&self, index: usize) -> Result<(u64, Panel), SessionError> {
        if !self.has_script() {
            return Err(invalid(self.phase, "revise_panel"));
        }
        Ok((self.epoch, self.panel(index)?.clone()))
    }

    /// Context for rendering panel `index` again: the epoch, a copy of the
    /// panel and the reference image.
    ///
    /// # Errors
    ///
    /// Rejected before approval, while the panel's image is in flight, and
    /// while bulk generation has yet to pick the panel up.
    pub fn image_target(
        &self,
        index: usize,
    ) -> Result<(u64, Panel, Option<ImageRef>), SessionError> {
        if !self.phase.has_images() {
            return Err(invalid(self.phase, "regenerate_image"));
        }
        let panel = self.panel(index)?;
        let queued = self.phase == SessionPhase::ImageGenerating
            && panel.image_status() == &ImageStatus::Pending;
        if panel.image_status().is_in_flight() || queued {
            return Err(SessionError::new(SessionErrorKind::PanelBusy(index)));
        }
        Ok((self.epoch, panel.clone(), self.reference.clone()))
    }

    /// Whether panels exist that the user may edit or revise.
    pub fn has_script(&self) -> bool {
        self.phase != SessionPhase::Idle && self.phase != SessionPhase::ScriptStreaming
    }

    /// Select the narration voice.
    pub fn select_voice(&mut self, voice: Option<VoiceHandle>) {
        self.voice = voice;
    }

    /// Discard the whole session. Any phase `-> Idle`.
    pub fn start_over(&mut self) {
        info!(phase = %self.phase, "Starting over");
        self.request = None;
        self.discard_panels();
        self.phase = SessionPhase::Idle;
    }

    fn discard_panels(&mut self) {
        self.epoch += 1;
        self.panels.clear();
        self.reference = None;
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelcraft_core::{PanelCount, StoryRequestBuilder};

    fn request(count: u8) -> StoryRequest {
        StoryRequestBuilder::default()
            .idea("a cat who runs a bakery")
            .genre(Genre::Comedy)
            .panel_count(PanelCount::new(count).unwrap())
            .build()
            .unwrap()
    }

    fn scripted(count: usize) -> Vec<Panel> {
        (1..=count)
            .map(|i| Panel::pending(i, PanelScript::new(format!("s{i}"), format!("p{i}"), format!("t{i}"))))
            .collect()
    }

    fn in_review(count: u8) -> (ComicSession, u64) {
        let mut session = ComicSession::new();
        let epoch = session.begin(request(count)).unwrap();
        assert!(session.stream_opened(epoch));
        (session, epoch)
    }

    #[test]
    fn begin_requires_idle() {
        let (mut session, _) = in_review(5);
        let err = session.begin(request(5)).unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::InvalidTransition { .. }));
        assert_eq!(session.phase(), &SessionPhase::ScriptReview);
    }

    #[test]
    fn panels_grow_monotonically_and_stop_at_count() {
        let (mut session, epoch) = in_review(5);
        session.append_panels(epoch, scripted(2));
        session.append_panels(epoch, scripted(1));
        assert_eq!(session.panels().len(), 2);
        session.append_panels(epoch, scripted(7));
        assert_eq!(session.panels().len(), 5);
        assert!(session.script_complete());
    }

    #[test]
    fn appending_keeps_earlier_edits() {
        let (mut session, epoch) = in_review(5);
        session.append_panels(epoch, scripted(2));
        session
            .edit_panel(1, PanelEdit::default().with_panel_text("edited"))
            .unwrap();
        session.append_panels(epoch, scripted(3));
        assert_eq!(session.panel(1).unwrap().panel_text(), "edited");
        assert_eq!(session.panels().len(), 3);
    }

    #[test]
    fn approve_waits_for_every_panel() {
        let (mut session, epoch) = in_review(5);
        session.append_panels(epoch, scripted(4));
        let err = session.approve().unwrap_err();
        assert_eq!(
            err.kind(),
            &SessionErrorKind::ScriptIncomplete {
                received: 4,
                expected: 5
            }
        );
        assert_eq!(session.phase(), &SessionPhase::ScriptReview);

        session.append_panels(epoch, scripted(5));
        let (approved_epoch, panels) = session.approve().unwrap();
        assert_eq!(approved_epoch, epoch);
        assert_eq!(panels.len(), 5);
        assert_eq!(session.phase(), &SessionPhase::ImageGenerating);
    }

    #[test]
    fn restart_script_discards_panels_and_bumps_epoch() {
        let (mut session, epoch) = in_review(5);
        session.append_panels(epoch, scripted(5));
        let (next, _) = session.restart_script().unwrap();
        assert!(next > epoch);
        assert!(session.panels().is_empty());
        assert_eq!(session.phase(), &SessionPhase::ScriptStreaming);

        assert!(!session.append_panels(epoch, scripted(5)));
        assert!(session.panels().is_empty());
    }

    #[test]
    fn stale_status_updates_are_dropped() {
        let (mut session, epoch) = in_review(5);
        session.append_panels(epoch, scripted(5));
        session.approve().unwrap();
        session.start_over();

        assert!(!session.apply_status(epoch, 1, ImageStatus::Loading).unwrap());
        assert!(!session.finish_generation(epoch));
        assert_eq!(session.phase(), &SessionPhase::Idle);
        assert!(session.panels().is_empty());
    }

    #[test]
    fn illegal_status_step_leaves_panel_unchanged() {
        let (mut session, epoch) = in_review(5);
        session.append_panels(epoch, scripted(5));
        session.approve().unwrap();
        let err = session
            .apply_status(epoch, 2, ImageStatus::Ready(ImageRef::url("u")))
            .unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::IllegalStatusChange { panel: 2, .. }));
        assert_eq!(session.panel(2).unwrap().image_status(), &ImageStatus::Pending);
        assert!(matches!(
            session.apply_status(epoch, 9, ImageStatus::Loading).unwrap_err().kind(),
            SessionErrorKind::UnknownPanel(9)
        ));
    }

    #[test]
    fn aborted_generation_returns_to_review_with_error() {
        let (mut session, epoch) = in_review(5);
        session.append_panels(epoch, scripted(5));
        session.approve().unwrap();
        assert!(session.abort_generation(epoch, "reference failed"));
        assert_eq!(session.phase(), &SessionPhase::ScriptReview);
        assert_eq!(session.last_error().as_deref(), Some("reference failed"));
        assert!(session.approve().is_ok());
    }

    #[test]
    fn start_over_is_allowed_from_any_phase_and_keeps_voice() {
        let mut session = ComicSession::new();
        session.select_voice(Some(VoiceHandle::from("narrator")));
        session.start_over();
        assert_eq!(session.phase(), &SessionPhase::Idle);

        let (mut session, _) = in_review(6);
        session.select_voice(Some(VoiceHandle::from("narrator")));
        session.start_over();
        assert_eq!(session.phase(), &SessionPhase::Idle);
        assert_eq!(session.panel_count(), 0);
        assert_eq!(session.voice(), &Some(VoiceHandle::from("narrator")));
    }

    #[test]
    fn image_regeneration_needs_images_and_a_settled_panel() {
        let (mut session, epoch) = in_review(5);
        session.append_panels(epoch, scripted(5));
        assert!(session.image_target(1).is_err());

        session.approve().unwrap();
        session.apply_status(epoch, 1, ImageStatus::Loading).unwrap();
        assert_eq!(
            session.image_target(1).unwrap_err().kind(),
            &SessionErrorKind::PanelBusy(1)
        );
        // Not yet picked up by bulk generation.
        assert_eq!(
            session.image_target(2).unwrap_err().kind(),
            &SessionErrorKind::PanelBusy(2)
        );
        session.apply_status(epoch, 2, ImageStatus::Loading).unwrap();
        session
            .apply_status(epoch, 2, ImageStatus::Failed("busy".into()))
            .unwrap();
        let (target_epoch, panel, reference) = session.image_target(2).unwrap();
        assert_eq!(target_epoch, epoch);
        assert_eq!(*panel.index(), 2);
        assert!(reference.is_none());
    }

    #[test]
    fn edits_are_rejected_while_idle() {
        let mut session = ComicSession::new();
        let err = session.edit_panel(1, PanelEdit::default()).unwrap_err();
        assert!(matches!(err.kind(), SessionErrorKind::InvalidTransition { .. }));
    }
}
