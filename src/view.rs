//! Terminal rendering of pages and mutation outcomes.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::api::{Event, EventId, Notification, NotificationId};
use crate::app::NavHeader;
use crate::cli_style::{
    self, print_empty_list, print_error, print_key_value, print_section_footer,
    print_section_header, print_success, print_warning, TableBuilder,
};
use crate::reconciler::{LoadState, RefreshOutcome, Refusal, RemoveOutcome, ToggleOutcome};

/// One line of feedback after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn print(&self) {
        match self {
            Notice::Success(message) => print_success(message),
            Notice::Warning(message) => print_warning(message),
            Notice::Error(message) => print_error(message),
        }
    }
}

/// "Mon 02 Nov 2026, 18:00-21:00" when both ends fall on the same day,
/// otherwise both full timestamps.
pub fn format_schedule<Tz>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if start.date_naive() == end.date_naive() {
        format!(
            "{}-{}",
            start.format("%a %d %b %Y, %H:%M"),
            end.format("%H:%M")
        )
    } else {
        format!(
            "{} - {}",
            start.format("%a %d %b %Y, %H:%M"),
            end.format("%a %d %b %Y, %H:%M")
        )
    }
}

pub fn bookmark_marker(bookmarked: bool) -> &'static str {
    if bookmarked {
        cli_style::box_chars::STAR
    } else {
        cli_style::box_chars::STAR_EMPTY
    }
}

fn refusal_message(refusal: Refusal, what: &str, id: u64) -> Notice {
    match refusal {
        Refusal::NotFound => Notice::Error(format!("No {} with id {} on this page", what, id)),
        Refusal::Busy => Notice::Warning(format!(
            "{} {} is still being updated, try again in a moment",
            capitalize(what),
            id
        )),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn toggle_notice(event_id: EventId, outcome: &ToggleOutcome) -> Notice {
    match outcome {
        ToggleOutcome::Confirmed { active: true } => {
            Notice::Success(format!("Event {} bookmarked", event_id))
        }
        ToggleOutcome::Confirmed { active: false } => {
            Notice::Success(format!("Event {} removed from bookmarks", event_id))
        }
        ToggleOutcome::RolledBack { error, .. } => {
            Notice::Error(format!("Could not update bookmark: {}", error))
        }
        ToggleOutcome::Refused(refusal) => refusal_message(*refusal, "event", event_id),
    }
}

pub fn remove_notice(event_id: EventId, outcome: &RemoveOutcome) -> Notice {
    match outcome {
        RemoveOutcome::Confirmed => {
            Notice::Success(format!("Event {} removed from bookmarks", event_id))
        }
        RemoveOutcome::RolledBack(error) => {
            Notice::Error(format!("Could not remove bookmark: {}", error))
        }
        RemoveOutcome::Refused(refusal) => refusal_message(*refusal, "bookmark", event_id),
    }
}

pub fn mark_read_notice(notification_id: NotificationId, outcome: &RefreshOutcome) -> Notice {
    match outcome {
        RefreshOutcome::Refreshed => {
            Notice::Success(format!("Notification {} marked as read", notification_id))
        }
        RefreshOutcome::WriteFailed(error) => {
            Notice::Error(format!("Could not mark notification as read: {}", error))
        }
        RefreshOutcome::RefreshFailed(error) => Notice::Warning(format!(
            "Notification {} marked as read, but the list could not be refreshed: {}",
            notification_id, error
        )),
        RefreshOutcome::Refused(refusal) => {
            refusal_message(*refusal, "notification", notification_id)
        }
    }
}

pub fn nav_line(nav: &NavHeader) -> String {
    match &nav.username {
        Some(username) if nav.unread > 0 => {
            format!("Signed in as {} | {} unread", username, nav.unread)
        }
        Some(username) => format!("Signed in as {}", username),
        None => "Not signed in".to_string(),
    }
}

pub fn render_nav(nav: &NavHeader) {
    print_key_value("Session", &nav_line(nav));
}

/// Prints the failure banner for a page whose fetch failed. Returns true if
/// there was one.
fn render_load_failure(state: &LoadState) -> bool {
    if let LoadState::Failed(error) = state {
        print_error(&format!("Could not load: {}", error));
        true
    } else {
        false
    }
}

pub fn render_events(title: &str, events: &[Event], state: &LoadState) {
    print_section_header(title);
    if !render_load_failure(state) {
        if events.is_empty() {
            print_empty_list("No events");
        } else {
            let mut table = TableBuilder::new(vec!["", "Id", "Event", "When", "Where"]);
            for event in events {
                let schedule = format_schedule(&event.start_time, &event.end_time);
                let id = event.id.to_string();
                table.add_row(vec![
                    bookmark_marker(event.is_bookmarked),
                    id.as_str(),
                    event.name.as_str(),
                    schedule.as_str(),
                    event.location.as_deref().unwrap_or("-"),
                ]);
            }
            table.print();
        }
    }
    print_section_footer();
}

pub fn render_notifications(notifications: &[Notification], state: &LoadState) {
    print_section_header("Notifications");
    if !render_load_failure(state) {
        if notifications.is_empty() {
            print_empty_list("Nothing new");
        }
        for n in notifications {
            let marker = if n.is_read {
                cli_style::box_chars::BULLET_EMPTY
            } else {
                cli_style::box_chars::BULLET
            };
            cli_style::print_list_item(
                &format!(
                    "{} [{}] {}  ({})",
                    marker,
                    n.id,
                    n.message,
                    n.created_at.format("%d %b %H:%M")
                ),
                0,
            );
        }
    }
    print_section_footer();
}

pub fn render_identity(username: &str, id: Option<u64>) {
    print_section_header("Who am I");
    print_key_value("Username", username);
    if let Some(id) = id {
        print_key_value("Id", &id.to_string());
    }
    print_section_footer();
}
