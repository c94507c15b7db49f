use std::sync::Arc;

use crate::api::{Event, EventId, EventsApi};
use crate::reconciler::{LoadState, OptimisticList, ToggleOutcome};

/// The event listing, with a bookmark toggle on every event.
pub struct EventsPage {
    api: Arc<dyn EventsApi>,
    events: OptimisticList<Event>,
}

impl EventsPage {
    pub fn new(api: Arc<dyn EventsApi>) -> Self {
        Self {
            api,
            events: OptimisticList::new("events"),
        }
    }

    pub fn events(&self) -> &OptimisticList<Event> {
        &self.events
    }

    pub async fn mount(&self) -> LoadState {
        let api = self.api.clone();
        self.events.load(|| async move { api.list_events().await }).await
    }

    /// Flips the bookmark right away, then bookmarks or unbookmarks on the
    /// backend depending on the state before the flip.
    pub async fn toggle_bookmark(&self, event_id: EventId) -> ToggleOutcome {
        let api = self.api.clone();
        self.events
            .toggle(&event_id, move |was_bookmarked| async move {
                if was_bookmarked {
                    api.unbookmark(event_id).await
                } else {
                    api.bookmark(event_id).await
                }
            })
            .await
    }
}
