//! EventDesk: a terminal client for an event discovery backend.
//!
//! The library exposes the client core (API client, session store, optimistic
//! list reconciler, page view-models) for the binary and the e2e tests.

pub mod api;
pub mod app;
pub mod cli_style;
pub mod config;
pub mod pages;
pub mod reconciler;
pub mod repl;
pub mod session;
pub mod view;

// Re-export commonly used types for convenience
pub use api::{ApiClient, ApiError, RequestsLoggingLevel};
pub use app::{App, Page, Screen};
pub use reconciler::{LoadState, OptimisticList};
pub use session::{SessionState, SessionStore};
