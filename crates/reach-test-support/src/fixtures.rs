//! Snapshot fixtures mirroring what the dashboard backend returns.

use reach_api_models::{LogEntry, StatusSnapshot, TargetedUser};
use serde_json::{Value, json};

/// Build a log entry from its three fields.
#[must_use]
pub fn log_entry(timestamp: &str, level: &str, message: &str) -> LogEntry {
    LogEntry {
        timestamp: timestamp.to_string(),
        level: level.to_string(),
        message: message.to_string(),
    }
}

/// Targeted user with the given identity and score; other columns unset.
#[must_use]
pub fn targeted_user(id: i64, username: &str, score: f64) -> TargetedUser {
    TargetedUser {
        id,
        username: username.to_string(),
        github_id: id * 1_000,
        profile_url: Some(format!("https://github.com/{username}")),
        score,
        status: "Strong Target".to_string(),
        last_scanned_at: Some("2024-03-01T12:00:00".to_string()),
        followed_at: None,
        unfollowed_at: None,
        followers_count: 0,
        following_count: 0,
        public_repos_count: 0,
        total_contributions: 0,
        account_created_at: None,
        profile_updated_at: None,
        last_activity_at: None,
        is_organization: false,
        bio_content: None,
        blog_url: None,
        score_audit_log: None,
    }
}

/// Snapshot with counters 10/4/1/0 and a single `INFO` entry reading `started`.
#[must_use]
pub fn started_snapshot() -> StatusSnapshot {
    StatusSnapshot {
        total_users: 10,
        followed_count: 4,
        unfollowed_count: 1,
        disqualified_count: 0,
        targeted_count: 5,
        current_bot_phase: "Idle".to_string(),
        top_targeted_users: Vec::new(),
        recent_logs: vec![log_entry("2024-01-01T00:00:00Z", "INFO", "started")],
    }
}

/// Snapshot carrying `count` log entries alternating between `INFO` and `ERROR`.
#[must_use]
pub fn busy_snapshot(count: usize) -> StatusSnapshot {
    let recent_logs = (0..count)
        .map(|index| {
            let level = if index % 2 == 0 { "INFO" } else { "ERROR" };
            log_entry(
                &format!("2024-03-0{}T12:00:00", index % 9 + 1),
                level,
                &format!("entry {index}"),
            )
        })
        .collect();
    StatusSnapshot {
        total_users: 250,
        followed_count: 120,
        unfollowed_count: 30,
        disqualified_count: 17,
        targeted_count: 40,
        current_bot_phase: "Following".to_string(),
        top_targeted_users: vec![targeted_user(7, "octo", 91.0)],
        recent_logs,
    }
}

/// Raw JSON payload equivalent to [`started_snapshot`] without the
/// supplementary fields, as an older backend would send it.
#[must_use]
pub fn started_payload() -> Value {
    json!({
        "total_users": 10,
        "followed_count": 4,
        "unfollowed_count": 1,
        "disqualified_count": 0,
        "recent_logs": [
            {"timestamp": "2024-01-01T00:00:00Z", "level": "INFO", "message": "started"}
        ]
    })
}

/// Raw JSON error body.
#[must_use]
pub fn error_payload(message: &str) -> Value {
    json!({ "error": message })
}
