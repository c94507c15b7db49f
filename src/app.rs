//! Top-level application state: the session plus every page, and the
//! gating that decides which of them may be shown.

use std::sync::Arc;
use tracing::{debug, info};

use crate::api::{ApiClient, ApiError, AuthApi, EventId, EventsApi, Identity, NotificationId};
use crate::pages::{AuthForm, AuthMode, AuthPage, BookmarksPage, EventsPage, NotificationsPage};
use crate::reconciler::{LoadState, RefreshOutcome, RemoveOutcome, ToggleOutcome};
use crate::session::{SessionState, SessionStore};

/// Pages reachable from the navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Events,
    Bookmarks,
    Notifications,
}

/// What may actually be displayed for a requested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The initial session check is still running.
    Loading,
    SignIn,
    Page(Page),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavHeader {
    pub username: Option<String>,
    pub unread: usize,
}

pub struct App {
    session: Arc<SessionStore>,
    auth: AuthPage,
    events: EventsPage,
    bookmarks: BookmarksPage,
    notifications: NotificationsPage,
}

impl App {
    pub fn new(auth_api: Arc<dyn AuthApi>, events_api: Arc<dyn EventsApi>) -> Self {
        let session = Arc::new(SessionStore::new(auth_api));
        Self {
            auth: AuthPage::new(session.clone()),
            events: EventsPage::new(events_api.clone()),
            bookmarks: BookmarksPage::new(events_api.clone()),
            notifications: NotificationsPage::new(events_api),
            session,
        }
    }

    /// Wires every component to the same client, hence the same cookie jar.
    pub fn with_client(client: Arc<ApiClient>) -> Self {
        Self::new(client.clone(), client)
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn auth(&self) -> &AuthPage {
        &self.auth
    }

    pub fn events(&self) -> &EventsPage {
        &self.events
    }

    pub fn bookmarks(&self) -> &BookmarksPage {
        &self.bookmarks
    }

    pub fn notifications(&self) -> &NotificationsPage {
        &self.notifications
    }

    /// Runs the initial session check. Until it resolves every page is
    /// gated behind [`Screen::Loading`].
    pub async fn start(&self) -> SessionState {
        let state = self.session.check().await;
        if state.is_authenticated() {
            self.mount_all().await;
        }
        state
    }

    pub fn screen(&self, requested: Page) -> Screen {
        match self.session.current() {
            SessionState::Unknown => Screen::Loading,
            SessionState::Anonymous => Screen::SignIn,
            SessionState::Authenticated(_) => Screen::Page(requested),
        }
    }

    pub fn nav(&self) -> NavHeader {
        match self.session.identity() {
            Some(identity) => NavHeader {
                username: Some(identity.username),
                unread: self.notifications.unread_count(),
            },
            None => NavHeader {
                username: None,
                unread: 0,
            },
        }
    }

    /// Submits the auth form in the given mode. Pages are loaded for the new
    /// user on success.
    pub async fn sign_in(&mut self, mode: AuthMode, form: &AuthForm) -> Option<Identity> {
        self.auth.set_mode(mode);
        let identity = self.auth.submit(form).await?;
        self.mount_all().await;
        Some(identity)
    }

    pub async fn sign_out(&self) {
        self.session.logout().await;
        self.clear_pages();
    }

    /// Loads all pages concurrently, e.g. right after signing in.
    pub async fn mount_all(&self) {
        let (events, bookmarks, notifications) = futures::join!(
            self.events.mount(),
            self.bookmarks.mount(),
            self.notifications.mount()
        );
        for state in [events, bookmarks, notifications] {
            self.observe_load(&state);
        }
    }

    /// Navigates to `page`, re-fetching its data. Returns `None` when the
    /// page is gated.
    pub async fn open(&self, page: Page) -> Option<LoadState> {
        if self.screen(page) != Screen::Page(page) {
            debug!("{:?} gated, session is {:?}", page, self.session.current());
            return None;
        }
        let state = match page {
            Page::Events => self.events.mount().await,
            Page::Bookmarks => self.bookmarks.mount().await,
            Page::Notifications => self.notifications.mount().await,
        };
        self.observe_load(&state);
        Some(state)
    }

    pub async fn toggle_bookmark(&self, event_id: EventId) -> ToggleOutcome {
        let outcome = self.events.toggle_bookmark(event_id).await;
        if let ToggleOutcome::RolledBack { error, .. } = &outcome {
            self.observe(error);
        }
        outcome
    }

    pub async fn remove_bookmark(&self, event_id: EventId) -> RemoveOutcome {
        let outcome = self.bookmarks.remove(event_id).await;
        if let RemoveOutcome::RolledBack(error) = &outcome {
            self.observe(error);
        }
        outcome
    }

    pub async fn mark_read(&self, notification_id: NotificationId) -> RefreshOutcome {
        let outcome = self.notifications.mark_read(notification_id).await;
        match &outcome {
            RefreshOutcome::WriteFailed(error) | RefreshOutcome::RefreshFailed(error) => {
                self.observe(error)
            }
            _ => {}
        }
        outcome
    }

    fn observe_load(&self, state: &LoadState) {
        if let LoadState::Failed(error) = state {
            self.observe(error);
        }
    }

    /// A rejected session on any call signs the user out locally.
    fn observe(&self, error: &ApiError) {
        if error.is_unauthorized() && self.session.current().is_authenticated() {
            info!("Backend rejected the session: {}", error);
            self.session.expire();
            self.clear_pages();
        }
    }

    fn clear_pages(&self) {
        self.events.events().clear();
        self.bookmarks.bookmarks().clear();
        self.notifications.notifications().clear();
    }
}
