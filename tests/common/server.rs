//! Stub backend lifecycle management
//!
//! Each test gets an isolated in-memory backend speaking the same REST
//! surface as the real one, with cookie sessions and per-route failure
//! injection.

use super::constants::*;
use super::fixtures::{seed_bookmarks, seed_events, seed_notifications};
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use eventdesk::api::{Event, EventId, Notification, NotificationId};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::net::TcpListener;

struct StubUser {
    id: u64,
    password: String,
}

#[derive(Default)]
struct BackendState {
    users: HashMap<String, StubUser>,
    /// token -> username
    sessions: HashMap<String, String>,
    next_id: u64,
    events: Vec<Event>,
    /// In the order the user bookmarked them
    bookmarks: HashMap<String, Vec<EventId>>,
    notifications: HashMap<String, Vec<Notification>>,
    /// "METHOD /path" -> status to answer with
    failures: HashMap<String, u16>,
    requests: Vec<String>,
}

/// In-memory backend state, shared between the HTTP handlers and the test.
#[derive(Default)]
pub struct StubBackend {
    state: Mutex<BackendState>,
}

impl StubBackend {
    fn seeded() -> Self {
        let backend = Self::default();
        {
            let mut state = backend.lock();
            for (name, password) in [(TEST_USER, TEST_PASS), (OTHER_USER, OTHER_PASS)] {
                state.next_id += 1;
                let id = state.next_id;
                state.users.insert(
                    name.to_string(),
                    StubUser {
                        id,
                        password: password.to_string(),
                    },
                );
            }
            state.events = seed_events();
            state
                .bookmarks
                .insert(TEST_USER.to_string(), seed_bookmarks());
            state
                .notifications
                .insert(TEST_USER.to_string(), seed_notifications());
        }
        backend
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap()
    }

    /// Makes every request to `route` ("METHOD /path") answer `status`.
    pub fn fail(&self, route: &str, status: u16) {
        self.lock().failures.insert(route.to_string(), status);
    }

    pub fn recover(&self, route: &str) {
        self.lock().failures.remove(route);
    }

    /// Every request received so far, as "METHOD /path".
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    /// Forgets all sessions, as if they expired server side.
    pub fn revoke_sessions(&self) {
        self.lock().sessions.clear();
    }

    pub fn bookmarks_of(&self, username: &str) -> Vec<EventId> {
        self.lock()
            .bookmarks
            .get(username)
            .cloned()
            .unwrap_or_default()
    }

    pub fn notifications_of(&self, username: &str) -> Vec<Notification> {
        self.lock()
            .notifications
            .get(username)
            .cloned()
            .unwrap_or_default()
    }
}

type SharedBackend = Arc<StubBackend>;

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn user_json(state: &BackendState, username: &str) -> serde_json::Value {
    let id = state.users.get(username).map(|u| u.id);
    json!({
        "id": id,
        "username": username,
        "email": format!("{}@example.com", username),
    })
}

/// Resolves the session cookie to a username.
fn current_user(state: &BackendState, jar: &CookieJar) -> Result<String, Response> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| state.sessions.get(c.value()))
        .cloned()
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "Not authenticated"))
}

fn open_session(state: &mut BackendState, jar: CookieJar, username: &str) -> CookieJar {
    state.next_id += 1;
    let token = format!("token-{}", state.next_id);
    state.sessions.insert(token.clone(), username.to_string());
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    jar.add(cookie)
}

async fn record_and_inject(
    State(backend): State<SharedBackend>,
    request: Request,
    next: Next,
) -> Response {
    let route = format!("{} {}", request.method(), request.uri().path());
    if route != "GET /health" {
        let failure = {
            let mut state = backend.lock();
            state.requests.push(route.clone());
            state.failures.get(&route).copied()
        };
        if let Some(status) = failure {
            let status = StatusCode::from_u16(status).unwrap();
            return error_response(status, "Injected failure");
        }
    }
    next.run(request).await
}

#[derive(Deserialize)]
struct CredentialsBody {
    username: String,
    password: String,
}

async fn check(State(backend): State<SharedBackend>, jar: CookieJar) -> Response {
    let state = backend.lock();
    match current_user(&state, &jar) {
        Ok(username) => Json(json!({ "user": user_json(&state, &username) })).into_response(),
        Err(response) => response,
    }
}

async fn login(
    State(backend): State<SharedBackend>,
    jar: CookieJar,
    Json(body): Json<CredentialsBody>,
) -> Response {
    let mut state = backend.lock();
    let valid = state
        .users
        .get(&body.username)
        .is_some_and(|u| u.password == body.password);
    if !valid {
        return error_response(StatusCode::UNAUTHORIZED, "Invalid username or password");
    }
    let jar = open_session(&mut state, jar, &body.username);
    let user = user_json(&state, &body.username);
    (StatusCode::OK, jar, Json(json!({ "user": user }))).into_response()
}

async fn register(
    State(backend): State<SharedBackend>,
    jar: CookieJar,
    Json(body): Json<CredentialsBody>,
) -> Response {
    let mut state = backend.lock();
    if state.users.contains_key(&body.username) {
        return error_response(StatusCode::BAD_REQUEST, "Username already exists");
    }
    state.next_id += 1;
    let id = state.next_id;
    state.users.insert(
        body.username.clone(),
        StubUser {
            id,
            password: body.password,
        },
    );
    let jar = open_session(&mut state, jar, &body.username);
    // Bare identity, without the "user" envelope.
    let user = user_json(&state, &body.username);
    (StatusCode::CREATED, jar, Json(user)).into_response()
}

async fn logout(State(backend): State<SharedBackend>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        backend.lock().sessions.remove(cookie.value());
    }
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    (
        StatusCode::OK,
        jar.remove(removal),
        Json(json!({ "message": "Logged out" })),
    )
        .into_response()
}

fn events_for(state: &BackendState, username: &str, only_bookmarked: bool) -> Vec<Event> {
    let bookmarks = state.bookmarks.get(username).cloned().unwrap_or_default();
    let decorate = |e: &Event| Event {
        is_bookmarked: bookmarks.contains(&e.id),
        ..e.clone()
    };
    if only_bookmarked {
        bookmarks
            .iter()
            .filter_map(|id| state.events.iter().find(|e| e.id == *id))
            .map(decorate)
            .collect()
    } else {
        state.events.iter().map(decorate).collect()
    }
}

async fn list_events(State(backend): State<SharedBackend>, jar: CookieJar) -> Response {
    let state = backend.lock();
    match current_user(&state, &jar) {
        Ok(username) => Json(events_for(&state, &username, false)).into_response(),
        Err(response) => response,
    }
}

async fn list_bookmarks(State(backend): State<SharedBackend>, jar: CookieJar) -> Response {
    let state = backend.lock();
    match current_user(&state, &jar) {
        Ok(username) => Json(events_for(&state, &username, true)).into_response(),
        Err(response) => response,
    }
}

async fn add_bookmark(
    State(backend): State<SharedBackend>,
    jar: CookieJar,
    Path(event_id): Path<EventId>,
) -> Response {
    let mut state = backend.lock();
    let username = match current_user(&state, &jar) {
        Ok(username) => username,
        Err(response) => return response,
    };
    if !state.events.iter().any(|e| e.id == event_id) {
        return error_response(StatusCode::NOT_FOUND, "Event not found");
    }
    let bookmarks = state.bookmarks.entry(username).or_default();
    if bookmarks.contains(&event_id) {
        return error_response(StatusCode::BAD_REQUEST, "Event already bookmarked");
    }
    bookmarks.push(event_id);
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Event bookmarked" })),
    )
        .into_response()
}

async fn remove_bookmark(
    State(backend): State<SharedBackend>,
    jar: CookieJar,
    Path(event_id): Path<EventId>,
) -> Response {
    let mut state = backend.lock();
    let username = match current_user(&state, &jar) {
        Ok(username) => username,
        Err(response) => return response,
    };
    let bookmarks = state.bookmarks.entry(username).or_default();
    let Some(index) = bookmarks.iter().position(|id| *id == event_id) else {
        return error_response(StatusCode::NOT_FOUND, "Bookmark not found");
    };
    bookmarks.remove(index);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_notifications(State(backend): State<SharedBackend>, jar: CookieJar) -> Response {
    let state = backend.lock();
    match current_user(&state, &jar) {
        Ok(username) => {
            let mut notifications = state
                .notifications
                .get(&username)
                .cloned()
                .unwrap_or_default();
            notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Json(notifications).into_response()
        }
        Err(response) => response,
    }
}

async fn mark_read(
    State(backend): State<SharedBackend>,
    jar: CookieJar,
    Path(notification_id): Path<NotificationId>,
) -> Response {
    let mut state = backend.lock();
    let username = match current_user(&state, &jar) {
        Ok(username) => username,
        Err(response) => return response,
    };
    let notifications = state.notifications.entry(username).or_default();
    let Some(notification) = notifications.iter_mut().find(|n| n.id == notification_id) else {
        return error_response(StatusCode::NOT_FOUND, "Notification not found");
    };
    notification.is_read = true;
    Json(json!({ "message": "Notification marked as read" })).into_response()
}

fn make_app(backend: SharedBackend) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/auth/check", get(check))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/events", get(list_events))
        .route("/events/my-bookmarks", get(list_bookmarks))
        .route(
            "/events/{id}/bookmark",
            post(add_bookmark).delete(remove_bookmark),
        )
        .route("/events/notifications", get(list_notifications))
        .route("/events/notifications/{id}/read", put(mark_read))
        .layer(middleware::from_fn_with_state(
            backend.clone(),
            record_and_inject,
        ))
        .with_state(backend)
}

/// Stub backend instance on a random local port
///
/// When dropped, the server gracefully shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Backend state, for failure injection and assertions
    pub backend: Arc<StubBackend>,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a seeded stub backend on a random port and waits until it
    /// answers.
    ///
    /// # Panics
    ///
    /// Panics if binding fails or the server doesn't become ready within
    /// the timeout.
    pub async fn spawn() -> Self {
        let backend = Arc::new(StubBackend::seeded());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let app = make_app(backend.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            backend,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling /health
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/health", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
