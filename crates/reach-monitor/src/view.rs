//! Display-ready projection of a status snapshot.
//!
//! Everything here is plain text. Sinks decide how to style it; none of the
//! server-supplied strings are ever treated as markup.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use reach_api_models::{LEVEL_ERROR, LogEntry, StatusSnapshot};

/// Text written to every counter when a cycle fails.
pub const COUNTER_ERROR: &str = "Error";

const TIME_LABEL_FORMAT: &str = "%H:%M:%S";

/// Text for the four counter targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counters {
    /// `total-users` target.
    pub total_users: String,
    /// `followed-count` target.
    pub followed: String,
    /// `unfollowed-count` target.
    pub unfollowed: String,
    /// `disqualified-count` target.
    pub disqualified: String,
}

impl Counters {
    /// Render each counter field as decimal text.
    #[must_use]
    pub fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        Self {
            total_users: snapshot.total_users.to_string(),
            followed: snapshot.followed_count.to_string(),
            unfollowed: snapshot.unfollowed_count.to_string(),
            disqualified: snapshot.disqualified_count.to_string(),
        }
    }

    /// All four counters showing the failure marker.
    #[must_use]
    pub fn error() -> Self {
        Self {
            total_users: COUNTER_ERROR.to_string(),
            followed: COUNTER_ERROR.to_string(),
            unfollowed: COUNTER_ERROR.to_string(),
            disqualified: COUNTER_ERROR.to_string(),
        }
    }

    /// Counter values in display order, paired with their target ids.
    #[must_use]
    pub fn labelled(&self) -> [(&'static str, &str); 4] {
        [
            ("total-users", self.total_users.as_str()),
            ("followed-count", self.followed.as_str()),
            ("unfollowed-count", self.unfollowed.as_str()),
            ("disqualified-count", self.disqualified.as_str()),
        ]
    }
}

/// One node of the log list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Styling class; the entry's level, or `ERROR` for failure markers.
    pub class: String,
    /// Local wall-clock label. Absent on failure markers.
    pub time: Option<String>,
    /// Level label. Absent on failure markers.
    pub level: Option<String>,
    /// Message text, unescaped.
    pub text: String,
}

impl LogLine {
    /// Project a server log entry.
    #[must_use]
    pub fn from_entry(entry: &LogEntry) -> Self {
        Self {
            class: entry.level.clone(),
            time: Some(local_time_label(&entry.timestamp)),
            level: Some(entry.level.clone()),
            text: entry.message.clone(),
        }
    }

    /// Single entry reporting a failed cycle.
    #[must_use]
    pub fn marker(text: impl Into<String>) -> Self {
        Self {
            class: LEVEL_ERROR.to_string(),
            time: None,
            level: None,
            text: text.into(),
        }
    }

    /// Everything a reader sees in the node, space separated.
    #[must_use]
    pub fn visible_text(&self) -> String {
        [self.time.as_deref(), self.level.as_deref(), Some(self.text.as_str())]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Project every entry of a snapshot, keeping server order.
#[must_use]
pub fn log_lines(snapshot: &StatusSnapshot) -> Vec<LogLine> {
    snapshot.recent_logs.iter().map(LogLine::from_entry).collect()
}

/// Format a serialised instant as local `HH:MM:SS`.
///
/// Accepts RFC 3339 and offset-less ISO-8601 (read as UTC). Anything else is
/// returned unchanged.
#[must_use]
pub fn local_time_label(raw: &str) -> String {
    parse_instant(raw).map_or_else(
        || raw.to_string(),
        |instant| {
            instant
                .with_timezone(&Local)
                .format(TIME_LABEL_FORMAT)
                .to_string()
        },
    )
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Make untrusted text safe for plain-text surfaces such as a terminal.
///
/// Line breaks and tabs become spaces; every other control character is
/// dropped, which removes escape sequences.
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter_map(|ch| match ch {
            '\n' | '\r' | '\t' => Some(' '),
            ch if ch.is_control() => None,
            ch => Some(ch),
        })
        .collect()
}
