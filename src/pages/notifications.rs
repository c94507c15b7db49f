use std::sync::Arc;

use crate::api::{EventsApi, Notification, NotificationId};
use crate::reconciler::{LoadState, OptimisticList, RefreshOutcome};

/// Notifications about bookmarked events.
///
/// Marking one as read is deliberately not optimistic: the list is only
/// re-fetched once the backend accepted the write.
pub struct NotificationsPage {
    api: Arc<dyn EventsApi>,
    notifications: OptimisticList<Notification>,
}

impl NotificationsPage {
    pub fn new(api: Arc<dyn EventsApi>) -> Self {
        Self {
            api,
            notifications: OptimisticList::new("notifications"),
        }
    }

    pub fn notifications(&self) -> &OptimisticList<Notification> {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications
            .items()
            .iter()
            .filter(|n| !n.is_read)
            .count()
    }

    pub async fn mount(&self) -> LoadState {
        let api = self.api.clone();
        self.notifications
            .load(|| async move { api.list_notifications().await })
            .await
    }

    pub async fn mark_read(&self, notification_id: NotificationId) -> RefreshOutcome {
        let write_api = self.api.clone();
        let read_api = self.api.clone();
        self.notifications
            .write_then_refresh(
                &notification_id,
                move || async move { write_api.mark_notification_read(notification_id).await },
                move || async move { read_api.list_notifications().await },
            )
            .await
    }
}
