//! Page view-models.
//!
//! Each page owns the collection it displays, fetches it on mount and
//! routes user mutations through the reconciler.

mod auth;
mod bookmarks;
mod events;
mod notifications;

#[cfg(test)]
pub(crate) mod fake;

pub use auth::{AuthForm, AuthMode, AuthPage, MIN_PASSWORD_LENGTH};
pub use bookmarks::BookmarksPage;
pub use events::EventsPage;
pub use notifications::NotificationsPage;

use crate::api::{Event, EventId, Notification, NotificationId};
use crate::reconciler::{Flagged, Keyed};

impl Keyed for Event {
    type Key = EventId;

    fn key(&self) -> EventId {
        self.id
    }
}

impl Flagged for Event {
    fn flag(&self) -> bool {
        self.is_bookmarked
    }

    fn set_flag(&mut self, value: bool) {
        self.is_bookmarked = value;
    }
}

impl Keyed for Notification {
    type Key = NotificationId;

    fn key(&self) -> NotificationId {
        self.id
    }
}
