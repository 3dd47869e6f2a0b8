//! Tests for the narrated slideshow.

mod test_utils;

use panelcraft_core::{ImageStatus, Panel, PanelScript, VoiceHandle};
use panelcraft_error::SessionErrorKind;
use panelcraft_session::{PlaybackController, PlaybackMode};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use test_utils::*;

fn failed_panel(i: usize) -> Panel {
    let mut panel = Panel::pending(i, PanelScript::new("s", "p", format!("caption {i}")));
    panel.set_status(ImageStatus::Loading).unwrap();
    panel.set_status(ImageStatus::Retrying).unwrap();
    panel.set_status(ImageStatus::Failed("gone".into())).unwrap();
    panel
}

fn show() -> (PlaybackController, Arc<MockNarrator>) {
    let narrator = Arc::new(MockNarrator::default());
    (PlaybackController::new(narrator.clone()), narrator)
}

#[tokio::test(start_paused = true)]
async fn plays_ready_panels_in_index_order() {
    let (playback, narrator) = show();
    let panels = vec![ready_panel(3), failed_panel(2), ready_panel(1), ready_panel(4)];
    playback.load(&panels).await;

    playback.play(Some(VoiceHandle::from("alto"))).await.unwrap();
    playback.wait().await;

    assert_eq!(narrator.texts(), vec!["caption 1", "caption 3", "caption 4"]);
    assert!(
        narrator
            .spoken
            .lock()
            .unwrap()
            .iter()
            .all(|(_, voice)| voice == &Some(VoiceHandle::from("alto")))
    );
    assert_eq!(playback.state().mode(), &PlaybackMode::Finished);
    assert!(playback.state().current().is_none());
}

#[tokio::test(start_paused = true)]
async fn play_after_completion_restarts_from_first_panel() {
    let (playback, narrator) = show();
    playback.load(&[ready_panel(1), ready_panel(2)]).await;
    playback.play(None).await.unwrap();
    playback.wait().await;

    playback.play(None).await.unwrap();
    playback.wait().await;

    assert_eq!(
        narrator.texts(),
        vec!["caption 1", "caption 2", "caption 1", "caption 2"]
    );
}

#[tokio::test(start_paused = true)]
async fn pause_holds_the_current_slide_and_resume_continues() {
    let (playback, narrator) = show();
    playback
        .load(&[ready_panel(1), ready_panel(2), ready_panel(3)])
        .await;
    playback.play(None).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    playback.pause().await;

    let state = playback.state();
    assert_eq!(state.mode(), &PlaybackMode::Paused);
    assert_eq!(state.current().map(|s| *s.index()), Some(2));
    assert_eq!(narrator.cancels.load(Ordering::SeqCst), 1);

    playback.play(None).await.unwrap();
    playback.wait().await;
    assert_eq!(
        narrator.texts(),
        vec!["caption 1", "caption 2", "caption 2", "caption 3"]
    );
}

#[tokio::test(start_paused = true)]
async fn seek_and_next_move_between_slides() {
    let (playback, narrator) = show();
    playback
        .load(&[ready_panel(1), ready_panel(2), ready_panel(3)])
        .await;

    playback.seek(3, None).await.unwrap();
    assert_eq!(playback.state().current().map(|s| *s.index()), Some(3));
    assert!(narrator.texts().is_empty());

    playback.next(None).await;
    assert_eq!(playback.state().mode(), &PlaybackMode::Finished);

    let err = playback.seek(7, None).await.unwrap_err();
    assert_eq!(err.kind(), &SessionErrorKind::UnknownPanel(7));

    playback.seek(2, None).await.unwrap();
    playback.play(None).await.unwrap();
    playback.wait().await;
    assert_eq!(narrator.texts(), vec!["caption 2", "caption 3"]);
}

#[tokio::test]
async fn nothing_to_play_without_ready_panels() {
    let (playback, _) = show();
    playback.load(&[failed_panel(1)]).await;
    let err = playback.play(None).await.unwrap_err();
    assert_eq!(err.kind(), &SessionErrorKind::NothingToPlay);
}
