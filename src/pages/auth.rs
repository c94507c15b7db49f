use std::sync::Arc;
use tracing::debug;

use crate::api::{ApiErrorKind, Identity};
use crate::session::SessionStore;

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub username: String,
    pub password: String,
    /// Only checked in register mode.
    pub confirm_password: Option<String>,
}

impl AuthForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            confirm_password: None,
        }
    }

    pub fn confirmed(mut self, confirm_password: impl Into<String>) -> Self {
        self.confirm_password = Some(confirm_password.into());
        self
    }
}

/// Login/register form state. Errors are kept inline on the page rather
/// than raised.
pub struct AuthPage {
    session: Arc<SessionStore>,
    mode: AuthMode,
    error: Option<String>,
}

impl AuthPage {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            mode: AuthMode::Login,
            error: None,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AuthMode) {
        if self.mode != mode {
            self.mode = mode;
            self.error = None;
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Checks the form without talking to the backend.
    pub fn validate(&self, form: &AuthForm) -> Result<(), String> {
        if form.username.trim().is_empty() {
            return Err("Username is required".to_string());
        }
        if form.password.is_empty() {
            return Err("Password is required".to_string());
        }
        if self.mode == AuthMode::Register {
            if form.password.chars().count() < MIN_PASSWORD_LENGTH {
                return Err(format!(
                    "Password must be at least {} characters",
                    MIN_PASSWORD_LENGTH
                ));
            }
            if let Some(confirm) = &form.confirm_password {
                if confirm != &form.password {
                    return Err("Passwords do not match".to_string());
                }
            }
        }
        Ok(())
    }

    /// Returns the new identity, or `None` with the reason left in
    /// [`AuthPage::error`].
    pub async fn submit(&mut self, form: &AuthForm) -> Option<Identity> {
        if let Err(message) = self.validate(form) {
            self.error = Some(message);
            return None;
        }

        let username = form.username.trim();
        let result = match self.mode {
            AuthMode::Login => self.session.login(username, &form.password).await,
            AuthMode::Register => self.session.register(username, &form.password).await,
        };

        match result {
            Ok(identity) => {
                self.error = None;
                Some(identity)
            }
            Err(err) => {
                debug!("{:?} failed ({:?}): {}", self.mode, err.kind(), err);
                let message = match (self.mode, err.kind()) {
                    (AuthMode::Login, ApiErrorKind::Unauthorized) if err.status == Some(401) => {
                        if !err.has_server_message() {
                            "Invalid username or password".to_string()
                        } else {
                            err.message
                        }
                    }
                    _ => err.message,
                };
                self.error = Some(message);
                None
            }
        }
    }
}
