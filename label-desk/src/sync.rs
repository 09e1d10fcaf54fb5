//! Periodic refresh of the session from the label store.
//!
//! One tick at a time: the next sleep starts only after the previous fetch
//! finished, so refreshes never overlap. Failed fetches are logged and the
//! loop keeps going.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::RecordSource;
use crate::session::Session;

/// Shortest pause between two fetches, whatever interval is requested.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(10);

pub fn lock_session(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fetches once and applies the result. Returns whether the session changed.
pub async fn refresh_once<S, F>(source: &S, session: &Mutex<Session>, on_refresh: &mut F) -> bool
where
    S: RecordSource + ?Sized,
    F: FnMut(&Session),
{
    match source.fetch_records().await {
        Ok(records) => {
            let mut guard = lock_session(session);
            guard.apply_refresh(records);
            on_refresh(&guard);
            true
        }
        Err(err) => {
            warn!(error = %err, "label refresh failed; keeping previous list");
            false
        }
    }
}

/// Running refresh loop. Dropping the handle stops the loop after its current
/// tick; [`shutdown`](Self::shutdown) also waits for it.
pub struct RefreshHandle {
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    pub async fn shutdown(mut self) {
        let _ = self.stop.send(true);
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!("refresh loop ended abnormally: {e}");
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        let _ = self.stop.send(true);
    }
}

pub fn spawn_refresh_loop<S, F>(
    source: Arc<S>,
    session: Arc<Mutex<Session>>,
    interval: Duration,
    mut on_refresh: F,
) -> RefreshHandle
where
    S: RecordSource,
    F: FnMut(&Session) + Send + 'static,
{
    let interval = interval.max(MIN_REFRESH_INTERVAL);
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let task = tokio::spawn(async move {
        loop {
            if *stop_rx.borrow() {
                break;
            }
            refresh_once(source.as_ref(), &session, &mut on_refresh).await;
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = stop_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        debug!("refresh loop stopped");
    });
    RefreshHandle {
        stop: stop_tx,
        task: Some(task),
    }
}
