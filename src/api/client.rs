//! HTTP client for the events backend.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::error::ApiError;
use super::logging::{log_request, log_response, log_response_body, RequestsLoggingLevel};
use super::models::{Credentials, Event, EventId, Identity, Notification, NotificationId};
use super::resource::Resource;
use super::{AuthApi, EventsApi};

/// Cookie-carrying HTTP client bound to one backend base URL.
///
/// The session cookie set by login/register is stored by the underlying
/// client and sent back on every later call.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    logging_level: RequestsLoggingLevel,
}

/// Auth endpoints either answer with the identity itself or wrap it.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdentityEnvelope {
    Wrapped { user: Identity },
    Bare(Identity),
}

impl From<IdentityEnvelope> for Identity {
    fn from(envelope: IdentityEnvelope) -> Self {
        match envelope {
            IdentityEnvelope::Wrapped { user } => user,
            IdentityEnvelope::Bare(identity) => identity,
        }
    }
}

impl ApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the backend API (e.g., "http://localhost:5000/api")
    /// * `timeout_sec` - Request timeout in seconds
    /// * `logging_level` - How much of each request to log
    pub fn new(
        base_url: String,
        timeout_sec: u64,
        logging_level: RequestsLoggingLevel,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            logging_level,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource: Resource) -> String {
        format!("{}{}", self.base_url, resource.path())
    }

    /// GET a single resource.
    pub async fn fetch<T: DeserializeOwned>(&self, resource: Resource) -> Result<T, ApiError> {
        let (status, body) = self.send(Method::GET, resource, None).await?;
        decode(status, &body)
    }

    /// GET a collection, in the order the server returns it.
    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        resource: Resource,
    ) -> Result<Vec<T>, ApiError> {
        self.fetch(resource).await
    }

    /// POST to a resource, optionally with a JSON body.
    pub async fn create<B, T>(&self, resource: Resource, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let body = body.map(encode).transpose()?;
        let (status, text) = self.send(Method::POST, resource, body).await?;
        decode(status, &text)
    }

    /// PUT to a resource without a body.
    pub async fn update<T: DeserializeOwned>(&self, resource: Resource) -> Result<T, ApiError> {
        let (status, body) = self.send(Method::PUT, resource, None).await?;
        decode(status, &body)
    }

    pub async fn delete<T: DeserializeOwned>(&self, resource: Resource) -> Result<T, ApiError> {
        let (status, body) = self.send(Method::DELETE, resource, None).await?;
        decode(status, &body)
    }

    async fn send(
        &self,
        method: Method,
        resource: Resource,
        body: Option<serde_json::Value>,
    ) -> Result<(u16, String), ApiError> {
        let url = self.url(resource);
        let body_text = body.as_ref().map(|b| b.to_string());
        log_request(&self.logging_level, &method, &url, body_text.as_deref());

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let start = Instant::now();
        let response = request.send().await.map_err(|err| {
            warn!("{} {} failed: {}", method, url, err);
            ApiError::from(err)
        })?;

        let status = response.status();
        log_response(
            &self.logging_level,
            &method,
            &url,
            status,
            response.headers(),
            start.elapsed(),
        );

        let text = response.text().await.map_err(|err| {
            warn!("Failed to read response body of {} {}: {}", method, url, err);
            ApiError::from(err)
        })?;
        log_response_body(&self.logging_level, &text);

        if !status.is_success() {
            let err = ApiError::from_response_body(status.as_u16(), &text);
            debug!("{} {} rejected: {} ({:?})", method, url, err, err.kind());
            return Err(err);
        }

        Ok((status.as_u16(), text))
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|err| ApiError::unexpected(None, format!("Could not encode request: {}", err)))
}

/// An empty body is decoded as JSON `null`, so void calls can ask for
/// `IgnoredAny` or `()`.
fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|err| {
        ApiError::unexpected(
            Some(status),
            format!("Invalid response from server: {}", err),
        )
    })
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn check_session(&self) -> Result<Identity, ApiError> {
        self.fetch::<IdentityEnvelope>(Resource::AuthCheck)
            .await
            .map(Identity::from)
    }

    async fn login(&self, credentials: &Credentials) -> Result<Identity, ApiError> {
        self.create::<_, IdentityEnvelope>(Resource::AuthLogin, Some(credentials))
            .await
            .map(Identity::from)
    }

    async fn register(&self, credentials: &Credentials) -> Result<Identity, ApiError> {
        self.create::<_, IdentityEnvelope>(Resource::AuthRegister, Some(credentials))
            .await
            .map(Identity::from)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.create::<(), IgnoredAny>(Resource::AuthLogout, None)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl EventsApi for ApiClient {
    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        self.fetch_list(Resource::Events).await
    }

    async fn list_bookmarks(&self) -> Result<Vec<Event>, ApiError> {
        self.fetch_list(Resource::MyBookmarks).await
    }

    async fn bookmark(&self, event_id: EventId) -> Result<(), ApiError> {
        self.create::<(), IgnoredAny>(Resource::Bookmark(event_id), None)
            .await
            .map(|_| ())
    }

    async fn unbookmark(&self, event_id: EventId) -> Result<(), ApiError> {
        self.delete::<IgnoredAny>(Resource::Bookmark(event_id))
            .await
            .map(|_| ())
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.fetch_list(Resource::Notifications).await
    }

    async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
    ) -> Result<(), ApiError> {
        self.update::<IgnoredAny>(Resource::NotificationRead(notification_id))
            .await
            .map(|_| ())
    }
}
