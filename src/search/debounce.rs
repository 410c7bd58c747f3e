use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default quiet period before a typed query triggers a search
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Runs the most recently scheduled task once input has been quiet for
/// `delay`.
///
/// Only the timer is cancellable. Once the delay elapses the task is handed
/// to its own tokio task, so a later `schedule` or `cancel` never aborts a
/// request that is already in flight.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Schedule `task`, replacing any timer still waiting
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        });

        if let Some(previous) = self.pending().replace(timer) {
            if !previous.is_finished() {
                debug!("Debounced task superseded");
            }
            previous.abort();
        }
    }

    /// Drop the waiting timer, if any
    pub fn cancel(&self) {
        if let Some(timer) = self.pending().take() {
            timer.abort();
        }
    }

    /// Whether a timer is still waiting to fire
    pub fn is_pending(&self) -> bool {
        self.pending()
            .as_ref()
            .map(|timer| !timer.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
