//! Shared constants for end-to-end tests
//!
//! When seed data changes (user credentials, event ids, etc.),
//! update only this file.

// ============================================================================
// Test Timeouts
// ============================================================================

/// Maximum time to wait for the stub backend to accept requests
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for each client request
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Interval between readiness polls
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

// ============================================================================
// Test User Credentials
// ============================================================================

/// Seeded user, has bookmarks and notifications
pub const TEST_USER: &str = "testuser";

pub const TEST_PASS: &str = "testpass123";

/// Seeded user with no data at all
pub const OTHER_USER: &str = "otheruser";

pub const OTHER_PASS: &str = "otherpass123";

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

// ============================================================================
// Seeded Events
// ============================================================================

pub const EVENT_MEETUP_ID: u64 = 1;
pub const EVENT_MEETUP_NAME: &str = "Rust Meetup";

/// Bookmarked by TEST_USER at seed time
pub const EVENT_JAZZ_ID: u64 = 2;
pub const EVENT_JAZZ_NAME: &str = "Jazz Night";

pub const EVENT_CINEMA_ID: u64 = 3;
pub const EVENT_CINEMA_NAME: &str = "Open Air Cinema";

/// Bookmarked by TEST_USER at seed time
pub const EVENT_MARKET_ID: u64 = 4;
pub const EVENT_MARKET_NAME: &str = "Night Market";

/// Not a seeded event
pub const UNKNOWN_EVENT_ID: u64 = 999;

// ============================================================================
// Seeded Notifications (all for TEST_USER)
// ============================================================================

/// Unread
pub const NOTIFICATION_REMINDER_ID: u64 = 10;

/// Unread
pub const NOTIFICATION_VENUE_ID: u64 = 11;

/// Already read
pub const NOTIFICATION_WELCOME_ID: u64 = 12;
