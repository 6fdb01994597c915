#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the Reach status API.
//!
//! The backend serialises these types and both dashboard frontends decode them,
//! so the `/api/data` contract has exactly one definition.

use serde::{Deserialize, Serialize};

/// Path of the status endpoint polled by the dashboard.
pub const STATUS_PATH: &str = "/api/data";

/// Styling class applied to marker entries that report a failed refresh.
pub const LEVEL_ERROR: &str = "ERROR";

/// Phase reported when the backend has no bot status row.
pub const UNKNOWN_PHASE: &str = "Unknown";

/// Full status payload returned by one poll of [`STATUS_PATH`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusSnapshot {
    /// Number of users tracked by the bot.
    pub total_users: u64,
    /// Users currently followed.
    pub followed_count: u64,
    /// Users that were unfollowed.
    pub unfollowed_count: u64,
    /// Users rejected by the scoring rules.
    pub disqualified_count: u64,
    /// Users scored as follow targets but not yet followed.
    #[serde(default)]
    pub targeted_count: u64,
    /// Phase the bot last reported.
    #[serde(default = "unknown_phase")]
    pub current_bot_phase: String,
    /// Highest-scoring targeted users, best first.
    #[serde(default)]
    pub top_targeted_users: Vec<TargetedUser>,
    /// Most recent log records, in the order the server chose.
    pub recent_logs: Vec<LogEntry>,
}

fn unknown_phase() -> String {
    UNKNOWN_PHASE.to_string()
}

/// One bot log record as exposed by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    /// Serialised instant (ISO-8601, with or without an offset).
    pub timestamp: String,
    /// Level label such as `INFO` or `ERROR`; doubles as the styling class.
    pub level: String,
    /// Raw log message. Untrusted text.
    pub message: String,
}

/// A scored user the bot plans to follow, as stored in the `users` table.
///
/// Instants are ISO-8601 strings; absent columns serialise as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetedUser {
    /// Row id.
    pub id: i64,
    /// GitHub login.
    pub username: String,
    /// Numeric GitHub account id.
    pub github_id: i64,
    /// Profile page URL.
    pub profile_url: Option<String>,
    /// Score assigned by the scoring rules.
    pub score: f64,
    /// Target tier such as `Perfect Target`.
    pub status: String,
    /// When the profile was last scanned.
    pub last_scanned_at: Option<String>,
    /// When the bot followed the user.
    pub followed_at: Option<String>,
    /// When the bot unfollowed the user.
    pub unfollowed_at: Option<String>,
    /// Follower count at scan time.
    pub followers_count: u64,
    /// Following count at scan time.
    pub following_count: u64,
    /// Public repository count at scan time.
    pub public_repos_count: u64,
    /// Contributions in the last year.
    pub total_contributions: u64,
    /// Account creation instant.
    pub account_created_at: Option<String>,
    /// Last profile update instant.
    pub profile_updated_at: Option<String>,
    /// Last observed public activity.
    pub last_activity_at: Option<String>,
    /// Whether the account is an organisation.
    pub is_organization: bool,
    /// Profile bio. Untrusted text.
    pub bio_content: Option<String>,
    /// Blog or homepage URL.
    pub blog_url: Option<String>,
    /// JSON-encoded breakdown of the score.
    pub score_audit_log: Option<String>,
}

/// Body returned alongside a non-success status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    /// Human-readable failure description.
    pub error: String,
}

impl ApiErrorBody {
    /// Build an error body from any displayable message.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
