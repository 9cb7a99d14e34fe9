//! Cancellable per-view fetch tasks

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Fetch running on behalf of one view instance.
///
/// The result is applied to the view only while the task is still relevant:
/// once [`cancel`](Self::cancel) is called or the handle is dropped (view torn
/// down), a late result is discarded without touching the view.
#[derive(Debug)]
pub struct ViewTask {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ViewTask {
    /// Runs `fetch` on the runtime and hands its output to `apply`
    pub fn spawn<V, T, Fut>(view: Arc<Mutex<V>>, fetch: Fut, apply: fn(&mut V, T)) -> Self
    where
        V: Send + 'static,
        T: Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let token = CancellationToken::new();
        let relevant = token.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = relevant.cancelled() => {
                    tracing::debug!("View fetch cancelled");
                }
                output = fetch => {
                    let mut view = lock(&view);
                    if relevant.is_cancelled() {
                        tracing::debug!("Discarding result for a closed view");
                        return;
                    }
                    apply(&mut view, output);
                }
            }
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    /// Marks the view as gone; any pending result is dropped
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Waits until the fetch has been applied or discarded
    pub async fn join(mut self) {
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            tracing::warn!("View task failed: {}", e);
        }
    }
}

/// Locks a view, recovering from a poisoned lock
pub(crate) fn lock<V>(view: &Mutex<V>) -> MutexGuard<'_, V> {
    match view.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl Drop for ViewTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
