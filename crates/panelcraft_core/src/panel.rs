//! Panels: one script, caption and image unit of the comic.

use crate::ImageRef;
use panelcraft_error::{SessionError, SessionErrorKind};
use serde::{Deserialize, Serialize};

/// Script content of a panel as produced by the script generator.
///
/// Field names follow the camelCase wire format the generator is asked to
/// emit. Missing fields deserialize to empty strings.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_new::new,
)]
#[serde(rename_all = "camelCase")]
pub struct PanelScript {
    /// Visual and action description
    #[serde(default)]
    #[new(into)]
    script: String,
    /// Instructions passed to the image generator
    #[serde(default)]
    #[new(into)]
    image_prompt: String,
    /// Dialogue or caption, rendered into the image and narrated
    #[serde(default)]
    #[new(into)]
    panel_text: String,
}

/// Generation status of a panel image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum ImageStatus {
    /// Script known, image not yet requested
    #[display("pending")]
    Pending,
    /// First attempt in flight
    #[display("loading")]
    Loading,
    /// First attempt failed, second attempt in flight
    #[display("retrying")]
    Retrying,
    /// Image rendered
    #[display("ready")]
    Ready(ImageRef),
    /// Both attempts failed; carries the last failure for diagnostics
    #[display("failed")]
    Failed(String),
}

impl ImageStatus {
    /// Whether the status is `Ready` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImageStatus::Ready(_) | ImageStatus::Failed(_))
    }

    /// Whether a request is in flight.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, ImageStatus::Loading | ImageStatus::Retrying)
    }

    /// The rendered image, if any.
    pub fn image(&self) -> Option<&ImageRef> {
        match self {
            ImageStatus::Ready(image) => Some(image),
            _ => None,
        }
    }

    /// Whether moving from `self` to `next` is a legal step.
    ///
    /// `Loading` is reachable from anywhere (initial request or explicit
    /// regenerate); `Pending` is never re-entered. A request that dies
    /// without answering may fail straight from `Loading`.
    pub fn can_transition_to(&self, next: &ImageStatus) -> bool {
        match (self, next) {
            (_, ImageStatus::Pending) => false,
            (_, ImageStatus::Loading) => true,
            (ImageStatus::Loading, ImageStatus::Retrying) => true,
            (ImageStatus::Loading | ImageStatus::Retrying, ImageStatus::Ready(_)) => true,
            (ImageStatus::Loading | ImageStatus::Retrying, ImageStatus::Failed(_)) => true,
            _ => false,
        }
    }
}

/// A user edit to a panel's script fields. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_setters::Setters)]
#[setters(prefix = "with_", strip_option, into)]
pub struct PanelEdit {
    /// Replacement visual description
    pub script: Option<String>,
    /// Replacement image prompt
    pub image_prompt: Option<String>,
    /// Replacement caption
    pub panel_text: Option<String>,
}

impl PanelEdit {
    /// Whether the edit changes nothing.
    pub fn is_empty(&self) -> bool {
        self.script.is_none() && self.image_prompt.is_none() && self.panel_text.is_none()
    }
}

/// One comic panel: script content plus image status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Panel {
    /// 1-based position in the comic
    index: usize,
    /// Visual and action description
    script: String,
    /// Instructions passed to the image generator
    image_prompt: String,
    /// Dialogue or caption
    panel_text: String,
    /// Image generation status
    image_status: ImageStatus,
}

impl Panel {
    /// A freshly scripted panel whose image has not been requested.
    pub fn pending(index: usize, script: PanelScript) -> Self {
        Self {
            index,
            script: script.script,
            image_prompt: script.image_prompt,
            panel_text: script.panel_text,
            image_status: ImageStatus::Pending,
        }
    }

    /// The panel's script fields as a standalone value.
    pub fn to_script(&self) -> PanelScript {
        PanelScript::new(&self.script, &self.image_prompt, &self.panel_text)
    }

    /// Replace the script fields, keeping the image status.
    pub fn replace_script(&mut self, script: PanelScript) {
        self.script = script.script;
        self.image_prompt = script.image_prompt;
        self.panel_text = script.panel_text;
    }

    /// Apply a partial user edit, keeping the image status.
    pub fn apply_edit(&mut self, edit: PanelEdit) {
        if let Some(script) = edit.script {
            self.script = script;
        }
        if let Some(image_prompt) = edit.image_prompt {
            self.image_prompt = image_prompt;
        }
        if let Some(panel_text) = edit.panel_text {
            self.panel_text = panel_text;
        }
    }

    /// Move the image status to `next`.
    ///
    /// # Errors
    ///
    /// Returns `IllegalStatusChange` when the step is not allowed by
    /// [`ImageStatus::can_transition_to`]; the status is left unchanged.
    #[track_caller]
    pub fn set_status(&mut self, next: ImageStatus) -> Result<(), SessionError> {
        if !self.image_status.can_transition_to(&next) {
            return Err(SessionError::new(SessionErrorKind::IllegalStatusChange {
                panel: self.index,
                from: self.image_status.to_string(),
                to: next.to_string(),
            }));
        }
        tracing::trace!(panel = self.index, from = %self.image_status, to = %next, "Panel status change");
        self.image_status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Panel {
        Panel::pending(1, PanelScript::new("a hero", "hero on a roof", "At last!"))
    }

    #[test]
    fn script_deserializes_from_camel_case_with_missing_fields() {
        let script: PanelScript =
            serde_json::from_str(r#"{"index": 4, "script": "s", "panelText": "t"}"#).unwrap();
        assert_eq!(script.script(), "s");
        assert_eq!(script.image_prompt(), "");
        assert_eq!(script.panel_text(), "t");
    }

    #[test]
    fn happy_path_and_retry_path_are_legal() {
        let mut p = panel();
        p.set_status(ImageStatus::Loading).unwrap();
        p.set_status(ImageStatus::Retrying).unwrap();
        p.set_status(ImageStatus::Failed("boom".into())).unwrap();
        p.set_status(ImageStatus::Loading).unwrap();
        p.set_status(ImageStatus::Ready(ImageRef::url("u"))).unwrap();
        assert!(p.image_status().is_terminal());
    }

    #[test]
    fn aborted_request_fails_from_loading() {
        let mut p = panel();
        p.set_status(ImageStatus::Loading).unwrap();
        p.set_status(ImageStatus::Failed("aborted".into())).unwrap();
        assert!(p.image_status().is_terminal());
    }

    #[test]
    fn terminal_states_never_return_to_pending() {
        let mut p = panel();
        p.set_status(ImageStatus::Loading).unwrap();
        p.set_status(ImageStatus::Ready(ImageRef::url("u"))).unwrap();
        assert!(p.set_status(ImageStatus::Pending).is_err());
        assert!(p.set_status(ImageStatus::Retrying).is_err());
        assert_eq!(p.image_status(), &ImageStatus::Ready(ImageRef::url("u")));
    }

    #[test]
    fn ready_requires_a_request_in_flight() {
        let mut p = panel();
        assert!(p.set_status(ImageStatus::Ready(ImageRef::url("u"))).is_err());
        assert!(p.set_status(ImageStatus::Failed("x".into())).is_err());
    }

    #[test]
    fn edits_leave_status_alone() {
        let mut p = panel();
        p.set_status(ImageStatus::Loading).unwrap();
        p.apply_edit(PanelEdit::default().with_panel_text("Finally!"));
        assert_eq!(p.panel_text(), "Finally!");
        assert_eq!(p.script(), "a hero");
        assert_eq!(p.image_status(), &ImageStatus::Loading);

        p.replace_script(PanelScript::new("b", "c", "d"));
        assert_eq!(p.to_script(), PanelScript::new("b", "c", "d"));
        assert_eq!(p.image_status(), &ImageStatus::Loading);
    }
}
