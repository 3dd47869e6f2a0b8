//! Tests for single-panel script revision.

use async_trait::async_trait;
use panelcraft_core::{Genre, Panel, PanelScript};
use panelcraft_error::{
    HttpError, HttpErrorKind, PanelcraftErrorKind, PanelcraftResult, ScriptErrorKind,
};
use panelcraft_interface::{PanelScriptReviser, RevisionRequest};
use panelcraft_script::ScriptReviser;
use std::sync::{Arc, Mutex};

/// Mock reviser that records requests and answers with a canned result.
struct MockReviser {
    answer: PanelcraftResult<PanelScript>,
    seen: Arc<Mutex<Vec<RevisionRequest>>>,
}

#[async_trait]
impl PanelScriptReviser for MockReviser {
    async fn revise_panel(&self, request: &RevisionRequest) -> PanelcraftResult<PanelScript> {
        self.seen.lock().unwrap().push(request.clone());
        self.answer.clone()
    }
}

fn panel() -> Panel {
    Panel::pending(3, PanelScript::new("old script", "old prompt", "old text"))
}

#[tokio::test]
async fn test_revision_passes_context_and_returns_script() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let reviser = ScriptReviser::new(Arc::new(MockReviser {
        answer: Ok(PanelScript::new("new script", "new prompt", "new text")),
        seen: seen.clone(),
    }));

    let revised = reviser
        .revise("A robot paints", Genre::SciFi, &panel(), 6)
        .await
        .expect("revision succeeds");

    assert_eq!(revised, PanelScript::new("new script", "new prompt", "new text"));
    let requests = seen.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].idea(), "A robot paints");
    assert_eq!(requests[0].genre(), &Genre::SciFi);
    assert_eq!(*requests[0].panel_index(), 3);
    assert_eq!(*requests[0].panel_count(), 6);
    assert_eq!(requests[0].prior().script(), "old script");
}

#[tokio::test]
async fn test_service_failure_becomes_revision_error() {
    let reviser = ScriptReviser::new(Arc::new(MockReviser {
        answer: Err(HttpError::new(HttpErrorKind::Timeout).into()),
        seen: Arc::new(Mutex::new(Vec::new())),
    }));

    let err = reviser
        .revise("idea", Genre::Drama, &panel(), 5)
        .await
        .unwrap_err();

    match err.kind() {
        PanelcraftErrorKind::Script(e) => {
            assert!(matches!(e.kind(), ScriptErrorKind::Revision { panel: 3, .. }));
        }
        other => panic!("unexpected error kind: {other}"),
    }
}

#[tokio::test]
async fn test_empty_script_is_rejected() {
    let reviser = ScriptReviser::new(Arc::new(MockReviser {
        answer: Ok(PanelScript::new("  ", "p", "t")),
        seen: Arc::new(Mutex::new(Vec::new())),
    }));

    assert!(reviser.revise("idea", Genre::Drama, &panel(), 5).await.is_err());
}
