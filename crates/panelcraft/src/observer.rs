//! Progress reporting through the log.

use panelcraft_core::SessionPhase;
use panelcraft_interface::{SessionObserver, SessionSnapshot};
use std::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct Seen {
    epoch: u64,
    phase: SessionPhase,
    panels: usize,
    statuses: Vec<String>,
    error: Option<String>,
}

/// Logs what changed between consecutive snapshots.
#[derive(Debug, Default)]
pub struct LoggingObserver {
    seen: Mutex<Seen>,
}

impl LoggingObserver {
    /// Observer with nothing seen yet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionObserver for LoggingObserver {
    fn render(&self, snapshot: &SessionSnapshot) {
        let Ok(mut seen) = self.seen.lock() else {
            return;
        };
        if seen.epoch != snapshot.epoch {
            *seen = Seen {
                epoch: snapshot.epoch,
                ..Seen::default()
            };
        }
        if seen.phase != snapshot.phase {
            info!(phase = %snapshot.phase, epoch = snapshot.epoch, "Session phase");
            seen.phase = snapshot.phase;
        }
        for panel in snapshot.panels.iter().skip(seen.panels) {
            info!(
                panel = panel.index(),
                of = snapshot.panel_count,
                caption = %panel.panel_text(),
                "Panel scripted"
            );
        }
        seen.panels = snapshot.panels.len();

        let statuses: Vec<String> = snapshot
            .panels
            .iter()
            .map(|panel| panel.image_status().to_string())
            .collect();
        for (position, (panel, status)) in snapshot.panels.iter().zip(&statuses).enumerate() {
            let before = seen.statuses.get(position);
            if before.is_some_and(|before| before != status) {
                info!(panel = panel.index(), status = %status, "Panel image");
            }
        }
        seen.statuses = statuses;

        if let Some(error) = &snapshot.error {
            if seen.error.as_ref() != Some(error) {
                warn!(error = %error, "Session error");
            }
        }
        seen.error = snapshot.error.clone();
    }
}
