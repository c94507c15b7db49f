use std::sync::Arc;

use crate::api::{Event, EventId, EventsApi};
use crate::reconciler::{LoadState, OptimisticList, RemoveOutcome};

/// The current user's bookmarked events. Unbookmarking removes the event
/// from this page.
pub struct BookmarksPage {
    api: Arc<dyn EventsApi>,
    bookmarks: OptimisticList<Event>,
}

impl BookmarksPage {
    pub fn new(api: Arc<dyn EventsApi>) -> Self {
        Self {
            api,
            bookmarks: OptimisticList::new("bookmarks"),
        }
    }

    pub fn bookmarks(&self) -> &OptimisticList<Event> {
        &self.bookmarks
    }

    /// Everything on this page is bookmarked, whatever flag the backend
    /// sent along.
    pub async fn mount(&self) -> LoadState {
        let api = self.api.clone();
        self.bookmarks
            .load(|| async move {
                let mut events = api.list_bookmarks().await?;
                for event in events.iter_mut() {
                    event.is_bookmarked = true;
                }
                Ok(events)
            })
            .await
    }

    pub async fn remove(&self, event_id: EventId) -> RemoveOutcome {
        let api = self.api.clone();
        self.bookmarks
            .remove(&event_id, move || async move { api.unbookmark(event_id).await })
            .await
    }
}
