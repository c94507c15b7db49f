//! Seed data for the stub backend

use super::constants::*;
use chrono::{TimeZone, Utc};
use eventdesk::api::{Event, Notification};

fn seed_event(id: u64, name: &str, day: u32, location: Option<&str>) -> Event {
    Event {
        id,
        name: name.to_string(),
        description: format!("{} in town", name),
        location: location.map(String::from),
        start_time: Utc.with_ymd_and_hms(2026, 11, day, 19, 0, 0).unwrap(),
        end_time: Utc.with_ymd_and_hms(2026, 11, day, 22, 0, 0).unwrap(),
        is_bookmarked: false,
    }
}

/// Events in the order the backend lists them.
pub fn seed_events() -> Vec<Event> {
    vec![
        seed_event(EVENT_MEETUP_ID, EVENT_MEETUP_NAME, 3, Some("Hacker Space")),
        seed_event(EVENT_JAZZ_ID, EVENT_JAZZ_NAME, 5, Some("Blue Note")),
        seed_event(EVENT_CINEMA_ID, EVENT_CINEMA_NAME, 7, None),
        seed_event(EVENT_MARKET_ID, EVENT_MARKET_NAME, 9, Some("Harbour")),
    ]
}

pub fn seed_bookmarks() -> Vec<u64> {
    vec![EVENT_JAZZ_ID, EVENT_MARKET_ID]
}

pub fn seed_notifications() -> Vec<Notification> {
    let at = |hour| Utc.with_ymd_and_hms(2026, 10, 15, hour, 0, 0).unwrap();
    vec![
        Notification {
            id: NOTIFICATION_REMINDER_ID,
            message: format!("{} starts in two days", EVENT_JAZZ_NAME),
            created_at: at(9),
            is_read: false,
            event_id: Some(EVENT_JAZZ_ID),
        },
        Notification {
            id: NOTIFICATION_VENUE_ID,
            message: format!("{} moved to the pier", EVENT_MARKET_NAME),
            created_at: at(10),
            is_read: false,
            event_id: Some(EVENT_MARKET_ID),
        },
        Notification {
            id: NOTIFICATION_WELCOME_ID,
            message: "Welcome to EventDesk".to_string(),
            created_at: at(8),
            is_read: true,
            event_id: None,
        },
    ]
}
