//! In-memory backend shared by the page and app unit tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashSet;
use std::sync::Mutex;

use crate::api::{ApiError, Event, EventId, EventsApi, Notification, NotificationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListEvents,
    ListBookmarks,
    Bookmark,
    Unbookmark,
    ListNotifications,
    MarkRead,
}

#[derive(Default)]
pub struct FakeEventsApi {
    pub events: Mutex<Vec<Event>>,
    pub bookmarks: Mutex<HashSet<EventId>>,
    pub notifications: Mutex<Vec<Notification>>,
    failing: Mutex<HashSet<Op>>,
    unauthorized: Mutex<bool>,
    pub calls: Mutex<Vec<String>>,
}

pub fn event(id: EventId, name: &str) -> Event {
    Event {
        id,
        name: name.to_string(),
        description: format!("{} description", name),
        location: Some("Main Hall".to_string()),
        start_time: Utc.with_ymd_and_hms(2026, 11, 2, 18, 0, 0).unwrap(),
        end_time: Utc.with_ymd_and_hms(2026, 11, 2, 21, 0, 0).unwrap(),
        is_bookmarked: false,
    }
}

pub fn notification(id: NotificationId, message: &str, is_read: bool) -> Notification {
    Notification {
        id,
        message: message.to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap(),
        is_read,
        event_id: None,
    }
}

impl FakeEventsApi {
    pub fn with_events(events: Vec<Event>, bookmarked: &[EventId]) -> Self {
        let api = Self::default();
        *api.events.lock().unwrap() = events;
        api.bookmarks.lock().unwrap().extend(bookmarked.iter().copied());
        api
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.failing.lock().unwrap().remove(&op);
    }

    /// Every call from now on answers 401.
    pub fn expire_session(&self) {
        *self.unauthorized.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, op: Op, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if *self.unauthorized.lock().unwrap() {
            return Err(ApiError::with_status(401, "Session expired"));
        }
        if self.failing.lock().unwrap().contains(&op) {
            return Err(ApiError::with_status(500, "Internal server error"));
        }
        Ok(())
    }

    fn decorated_events(&self, only_bookmarked: bool) -> Vec<Event> {
        let bookmarks = self.bookmarks.lock().unwrap();
        let events = self.events.lock().unwrap();
        let decorated = events
            .iter()
            .filter(|e| !only_bookmarked || bookmarks.contains(&e.id))
            .map(|e| Event {
                is_bookmarked: bookmarks.contains(&e.id),
                ..e.clone()
            })
            .collect();
        decorated
    }
}

#[async_trait]
impl EventsApi for FakeEventsApi {
    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        self.enter(Op::ListEvents, "GET /events".to_string())?;
        Ok(self.decorated_events(false))
    }

    async fn list_bookmarks(&self) -> Result<Vec<Event>, ApiError> {
        self.enter(Op::ListBookmarks, "GET /events/my-bookmarks".to_string())?;
        Ok(self.decorated_events(true))
    }

    async fn bookmark(&self, event_id: EventId) -> Result<(), ApiError> {
        self.enter(Op::Bookmark, format!("POST /events/{}/bookmark", event_id))?;
        self.bookmarks.lock().unwrap().insert(event_id);
        Ok(())
    }

    async fn unbookmark(&self, event_id: EventId) -> Result<(), ApiError> {
        self.enter(Op::Unbookmark, format!("DELETE /events/{}/bookmark", event_id))?;
        self.bookmarks.lock().unwrap().remove(&event_id);
        Ok(())
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.enter(Op::ListNotifications, "GET /events/notifications".to_string())?;
        Ok(self.notifications.lock().unwrap().clone())
    }

    async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
    ) -> Result<(), ApiError> {
        self.enter(
            Op::MarkRead,
            format!("PUT /events/notifications/{}/read", notification_id),
        )?;
        let mut notifications = self.notifications.lock().unwrap();
        let Some(n) = notifications.iter_mut().find(|n| n.id == notification_id) else {
            return Err(ApiError::with_status(404, "Notification not found"));
        };
        n.is_read = true;
        Ok(())
    }
}
