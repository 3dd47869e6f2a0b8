//! Shared session state with change notification.

use crate::ComicSession;
use async_trait::async_trait;
use panelcraft_core::ImageStatus;
use panelcraft_images::PanelStatusSink;
use panelcraft_interface::{SessionObserver, SessionSnapshot};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

/// The session behind an async lock, rendered after every mutation.
#[derive(Clone)]
pub struct SessionStore {
    session: Arc<Mutex<ComicSession>>,
    observer: Arc<dyn SessionObserver>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Wrap an idle session.
    pub fn new(observer: Arc<dyn SessionObserver>) -> Self {
        Self {
            session: Arc::new(Mutex::new(ComicSession::new())),
            observer,
        }
    }

    /// Apply `change` under the lock, then render the result.
    pub async fn mutate<T>(&self, change: impl FnOnce(&mut ComicSession) -> T) -> T {
        let mut session = self.session.lock().await;
        let outcome = change(&mut session);
        self.observer.render(&session.snapshot());
        outcome
    }

    /// Read the session without rendering.
    pub async fn read<T>(&self, view: impl FnOnce(&ComicSession) -> T) -> T {
        let session = self.session.lock().await;
        view(&session)
    }

    /// Current state as the display layer sees it.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.read(ComicSession::snapshot).await
    }

    /// Status sink whose updates apply only while `epoch` is current.
    pub fn panel_sink(&self, epoch: u64) -> Arc<dyn PanelStatusSink> {
        Arc::new(EpochSink {
            store: self.clone(),
            epoch,
        })
    }
}

struct EpochSink {
    store: SessionStore,
    epoch: u64,
}

#[async_trait]
impl PanelStatusSink for EpochSink {
    async fn update(&self, index: usize, status: ImageStatus) {
        let epoch = self.epoch;
        let applied = self
            .store
            .mutate(|session| session.apply_status(epoch, index, status))
            .await;
        if let Err(e) = applied {
            error!(panel = index, error = %e, "Rejected panel status update");
        }
    }
}
