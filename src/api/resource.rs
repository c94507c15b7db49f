use super::models::{EventId, NotificationId};

/// Every backend resource the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    AuthCheck,
    AuthLogin,
    AuthRegister,
    AuthLogout,
    Events,
    MyBookmarks,
    Bookmark(EventId),
    Notifications,
    NotificationRead(NotificationId),
}

impl Resource {
    /// Path relative to the configured base URL.
    pub fn path(&self) -> String {
        match self {
            Resource::AuthCheck => "/auth/check".to_string(),
            Resource::AuthLogin => "/auth/login".to_string(),
            Resource::AuthRegister => "/auth/register".to_string(),
            Resource::AuthLogout => "/auth/logout".to_string(),
            Resource::Events => "/events".to_string(),
            Resource::MyBookmarks => "/events/my-bookmarks".to_string(),
            Resource::Bookmark(id) => format!("/events/{}/bookmark", id),
            Resource::Notifications => "/events/notifications".to_string(),
            Resource::NotificationRead(id) => format!("/events/notifications/{}/read", id),
        }
    }
}
