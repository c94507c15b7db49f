//! Remote access to the events backend.
//!
//! `ApiClient` is the only production implementation of the two seam
//! traits below; pages and the session store only ever see the traits.

mod client;
mod error;
mod logging;
mod models;
mod resource;

pub use client::ApiClient;
pub use error::{ApiError, ApiErrorKind, TRANSPORT_ERROR_MESSAGE};
pub use logging::RequestsLoggingLevel;
pub use models::{Credentials, Event, EventId, Identity, Notification, NotificationId};
pub use resource::Resource;

use async_trait::async_trait;

/// Session endpoints.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Asks the backend who owns the current session cookie.
    async fn check_session(&self) -> Result<Identity, ApiError>;

    async fn login(&self, credentials: &Credentials) -> Result<Identity, ApiError>;

    async fn register(&self, credentials: &Credentials) -> Result<Identity, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;
}

/// Event, bookmark and notification endpoints.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait EventsApi: Send + Sync {
    async fn list_events(&self) -> Result<Vec<Event>, ApiError>;

    async fn list_bookmarks(&self) -> Result<Vec<Event>, ApiError>;

    async fn bookmark(&self, event_id: EventId) -> Result<(), ApiError>;

    async fn unbookmark(&self, event_id: EventId) -> Result<(), ApiError>;

    async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError>;

    async fn mark_notification_read(&self, notification_id: NotificationId)
        -> Result<(), ApiError>;
}
