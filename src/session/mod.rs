//! Session store: the single owner of "who is signed in".
//!
//! The state lives in a watch channel. The store is its only writer; every
//! other component either reads the current value or subscribes to
//! changes, so there is exactly one copy of the identity.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{ApiError, AuthApi, Credentials, Identity};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// The initial session check has not resolved yet.
    Unknown,
    Authenticated(Identity),
    Anonymous,
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self { api, state }
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    /// True while the initial check is in flight; nothing that depends on
    /// the session should be rendered meanwhile.
    pub fn is_loading(&self) -> bool {
        matches!(*self.state.borrow(), SessionState::Unknown)
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn set(&self, next: SessionState) {
        let previous = self.state.send_replace(next.clone());
        if previous != next {
            debug!("Session state {:?} -> {:?}", previous, next);
        }
    }

    /// Asks the backend whether the session cookie still belongs to someone.
    /// Any failure, not only a 401, ends up anonymous.
    pub async fn check(&self) -> SessionState {
        let next = match self.api.check_session().await {
            Ok(identity) => {
                info!("Session restored for {}", identity.username);
                SessionState::Authenticated(identity)
            }
            Err(err) if err.is_unauthorized() => {
                debug!("No active session: {}", err);
                SessionState::Anonymous
            }
            Err(err) => {
                warn!("Session check failed: {}", err);
                SessionState::Anonymous
            }
        };
        self.set(next.clone());
        next
    }

    /// On failure the state is left as it was and the error is returned so
    /// it can be shown next to the form.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, ApiError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let identity = self.api.login(&credentials).await.inspect_err(|err| {
            debug!("Login for {} rejected: {}", username, err);
        })?;
        info!("Logged in as {}", identity.username);
        self.set(SessionState::Authenticated(identity.clone()));
        Ok(identity)
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<Identity, ApiError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let identity = self.api.register(&credentials).await.inspect_err(|err| {
            debug!("Registration for {} rejected: {}", username, err);
        })?;
        info!("Registered and logged in as {}", identity.username);
        self.set(SessionState::Authenticated(identity.clone()));
        Ok(identity)
    }

    /// Always ends anonymous. A failed remote logout is only logged: the
    /// user asked to leave and the local view must reflect that.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            warn!("Remote logout failed: {}", err);
        }
        info!("Logged out");
        self.set(SessionState::Anonymous);
    }

    /// Called when some other call reported the session as no longer valid.
    pub fn expire(&self) {
        if self.state.borrow().is_authenticated() {
            info!("Session expired");
        }
        self.set(SessionState::Anonymous);
    }
}
