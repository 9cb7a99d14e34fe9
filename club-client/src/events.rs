//! Events view

use std::sync::{Arc, Mutex};

use shared::Event;

use crate::backend::BackendClient;
use crate::error::ClientResult;
use crate::remote::Remote;
use crate::task::{ViewTask, lock};

/// Events list state
///
/// `loading` stays true until the first fetch resolves; an empty list after
/// that simply means there are no events.
#[derive(Debug)]
pub struct EventsView {
    events: Vec<Event>,
    loading: bool,
    error: Option<String>,
}

impl Default for EventsView {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

impl EventsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts fetching every event for a freshly shown view
    pub fn mount<R: Remote + 'static>(
        view: &Arc<Mutex<EventsView>>,
        backend: Arc<BackendClient<R>>,
    ) -> ViewTask {
        lock(view).loading = true;
        ViewTask::spawn(
            Arc::clone(view),
            async move { backend.list_events().await },
            EventsView::apply,
        )
    }

    /// Stores a finished fetch, keeping backend order
    pub fn apply(&mut self, result: ClientResult<Vec<Event>>) {
        self.loading = false;
        match result {
            Ok(events) => {
                self.events = events;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("Events fetch failed: {}", e);
                self.error = Some(e.user_message());
            }
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
