//! Dashboard queries over the bot database.

use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike, Utc};
use reach_api_models::{LogEntry, StatusSnapshot, TargetedUser, UNKNOWN_PHASE};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};
use tracing::{debug, info};

use crate::error::{DataError, Result};

/// Number of log rows included in a snapshot.
pub const RECENT_LOG_LIMIT: i64 = 20;

/// Number of targeted users included in a snapshot.
pub const TOP_TARGET_LIMIT: i64 = 20;

/// User statuses counted as scheduled targets.
pub const TARGETED_STATUSES: [&str; 6] = [
    "Perfect Target",
    "Urgent High Value",
    "Strong Target",
    "Good Target",
    "Moderate Target",
    "Low Priority",
];

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Layout the bot uses when writing `DATETIME` columns.
const STORED_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const COUNTS_QUERY: &str = r"
    SELECT COUNT(*) AS total_users,
           COALESCE(SUM(status = 'followed'), 0) AS followed_count,
           COALESCE(SUM(status = 'unfollowed'), 0) AS unfollowed_count,
           COALESCE(SUM(status = 'Disqualified'), 0) AS disqualified_count,
           COALESCE(SUM(status IN (
               'Perfect Target',
               'Urgent High Value',
               'Strong Target',
               'Good Target',
               'Moderate Target',
               'Low Priority'
           )), 0) AS targeted_count
    FROM users
";

const PHASE_QUERY: &str = r"
    SELECT current_phase FROM bot_status ORDER BY id LIMIT 1
";

const TOP_TARGETS_QUERY: &str = r"
    SELECT id, username, github_id, profile_url, score, status,
           last_scanned_at, followed_at, unfollowed_at,
           followers_count, following_count, public_repos_count, total_contributions,
           account_created_at, profile_updated_at, last_activity_at,
           is_organization, bio_content, blog_url, score_audit_log
    FROM users
    WHERE status IN (
        'Perfect Target',
        'Urgent High Value',
        'Strong Target',
        'Good Target',
        'Moderate Target',
        'Low Priority'
    )
    ORDER BY score DESC, id
    LIMIT ?1
";

const RECENT_LOGS_QUERY: &str = r"
    SELECT timestamp, level, message
    FROM logs
    ORDER BY timestamp DESC, id DESC
    LIMIT ?1
";

const INSERT_LOG: &str = r"
    INSERT INTO logs (timestamp, level, message) VALUES (?1, ?2, ?3)
";

const UPSERT_PHASE: &str = r"
    INSERT INTO bot_status (id, current_phase, last_update) VALUES (1, ?1, ?2)
    ON CONFLICT (id) DO UPDATE
    SET current_phase = excluded.current_phase,
        last_update = excluded.last_update
";

/// Read model answering the dashboard's status query.
#[derive(Clone)]
pub struct StatusRepository {
    pool: SqlitePool,
}

impl StatusRepository {
    /// Open a pool against `url` (for example `sqlite://reach.db?mode=rwc`).
    ///
    /// In-memory databases are limited to one long-lived connection so every
    /// query sees the same data.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::ConnectFailed`] when the URL is invalid or the
    /// database cannot be opened.
    pub async fn connect(url: &str) -> Result<Self> {
        let connect_failed = |source: sqlx::Error| DataError::ConnectFailed {
            url: url.to_string(),
            source,
        };
        let options = SqliteConnectOptions::from_str(url).map_err(connect_failed)?;
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(DEFAULT_MAX_CONNECTIONS)
        };
        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(connect_failed)?;
        info!(url, "status database opened");
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Access the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create any missing tables and seed the bot status row.
    ///
    /// Tables the bot already created are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MigrationFailed`] if the schema cannot be applied.
    pub async fn ensure_schema(&self) -> Result<()> {
        let mut migrator = sqlx::migrate!("./migrations");
        migrator.set_ignore_missing(true);
        migrator
            .run(&self.pool)
            .await
            .map_err(|source| DataError::MigrationFailed { source })
    }

    /// Build the dashboard snapshot from one read transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::QueryFailed`] naming the query that failed.
    pub async fn dashboard_snapshot(&self) -> Result<StatusSnapshot> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(DataError::query("begin snapshot"))?;

        let counts = sqlx::query(COUNTS_QUERY)
            .fetch_one(&mut *tx)
            .await
            .map_err(DataError::query("count users"))?;
        let current_bot_phase = current_phase(&mut tx).await?;
        let top_targeted_users = sqlx::query(TOP_TARGETS_QUERY)
            .bind(TOP_TARGET_LIMIT)
            .fetch_all(&mut *tx)
            .await
            .map_err(DataError::query("top targets"))?
            .iter()
            .map(decode_user)
            .collect::<Result<Vec<_>>>()?;
        let recent_logs = sqlx::query(RECENT_LOGS_QUERY)
            .bind(RECENT_LOG_LIMIT)
            .fetch_all(&mut *tx)
            .await
            .map_err(DataError::query("recent logs"))?
            .iter()
            .map(decode_log)
            .collect::<Result<Vec<_>>>()?;

        tx.commit()
            .await
            .map_err(DataError::query("end snapshot"))?;

        let snapshot = StatusSnapshot {
            total_users: count(&counts, "total_users")?,
            followed_count: count(&counts, "followed_count")?,
            unfollowed_count: count(&counts, "unfollowed_count")?,
            disqualified_count: count(&counts, "disqualified_count")?,
            targeted_count: count(&counts, "targeted_count")?,
            current_bot_phase,
            top_targeted_users,
            recent_logs,
        };
        debug!(
            total_users = snapshot.total_users,
            targets = snapshot.top_targeted_users.len(),
            logs = snapshot.recent_logs.len(),
            "dashboard snapshot built"
        );
        Ok(snapshot)
    }

    /// Append a log row stamped with the current UTC time.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::QueryFailed`] if the insert fails.
    pub async fn record_log(&self, level: &str, message: &str) -> Result<()> {
        sqlx::query(INSERT_LOG)
            .bind(stored_now())
            .bind(level)
            .bind(message)
            .execute(&self.pool)
            .await
            .map_err(DataError::query("record log"))?;
        Ok(())
    }

    /// Record the bot's current phase.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::QueryFailed`] if the upsert fails.
    pub async fn set_bot_phase(&self, phase: &str) -> Result<()> {
        sqlx::query(UPSERT_PHASE)
            .bind(phase)
            .bind(stored_now())
            .execute(&self.pool)
            .await
            .map_err(DataError::query("set bot phase"))?;
        Ok(())
    }
}

async fn current_phase(tx: &mut Transaction<'_, Sqlite>) -> Result<String> {
    let phase = sqlx::query(PHASE_QUERY)
        .fetch_optional(&mut **tx)
        .await
        .map_err(DataError::query("bot phase"))?
        .map(|row| row.try_get::<Option<String>, _>("current_phase"))
        .transpose()
        .map_err(DataError::query("bot phase"))?
        .flatten();
    Ok(phase.unwrap_or_else(|| UNKNOWN_PHASE.to_string()))
}

fn count(row: &SqliteRow, column: &'static str) -> Result<u64> {
    let value = row
        .try_get::<i64, _>(column)
        .map_err(DataError::query("count users"))?;
    Ok(u64::try_from(value).unwrap_or_default())
}

fn decode_log(row: &SqliteRow) -> Result<LogEntry> {
    let timestamp = row
        .try_get::<Option<String>, _>("timestamp")
        .map_err(DataError::query("recent logs"))?;
    let level = row
        .try_get::<String, _>("level")
        .map_err(DataError::query("recent logs"))?;
    let message = row
        .try_get::<String, _>("message")
        .map_err(DataError::query("recent logs"))?;
    Ok(LogEntry {
        timestamp: timestamp.as_deref().map(iso_timestamp).unwrap_or_default(),
        level,
        message,
    })
}

fn decode_user(row: &SqliteRow) -> Result<TargetedUser> {
    let text = |column: &'static str| {
        row.try_get::<Option<String>, _>(column)
            .map_err(DataError::query("top targets"))
    };
    let instant = |column: &'static str| -> Result<Option<String>> {
        Ok(text(column)?.as_deref().map(iso_timestamp))
    };
    let tally = |column: &'static str| {
        row.try_get::<Option<i64>, _>(column)
            .map(|value| value.and_then(|value| u64::try_from(value).ok()).unwrap_or_default())
            .map_err(DataError::query("top targets"))
    };

    Ok(TargetedUser {
        id: row.try_get("id").map_err(DataError::query("top targets"))?,
        username: row
            .try_get("username")
            .map_err(DataError::query("top targets"))?,
        github_id: row
            .try_get("github_id")
            .map_err(DataError::query("top targets"))?,
        profile_url: text("profile_url")?,
        score: row
            .try_get::<Option<f64>, _>("score")
            .map_err(DataError::query("top targets"))?
            .unwrap_or_default(),
        status: text("status")?.unwrap_or_default(),
        last_scanned_at: instant("last_scanned_at")?,
        followed_at: instant("followed_at")?,
        unfollowed_at: instant("unfollowed_at")?,
        followers_count: tally("followers_count")?,
        following_count: tally("following_count")?,
        public_repos_count: tally("public_repos_count")?,
        total_contributions: tally("total_contributions")?,
        account_created_at: instant("account_created_at")?,
        profile_updated_at: instant("profile_updated_at")?,
        last_activity_at: instant("last_activity_at")?,
        is_organization: row
            .try_get::<Option<bool>, _>("is_organization")
            .map_err(DataError::query("top targets"))?
            .unwrap_or_default(),
        bio_content: text("bio_content")?,
        blog_url: text("blog_url")?,
        score_audit_log: text("score_audit_log")?,
    })
}

/// Rewrite a stored timestamp as ISO-8601 (`T` separator, microseconds only
/// when non-zero). Values in any other layout pass through unchanged.
pub(crate) fn iso_timestamp(stored: &str) -> String {
    NaiveDateTime::parse_from_str(stored, STORED_TIMESTAMP_FORMAT)
        .or_else(|_| stored.parse::<NaiveDateTime>())
        .map_or_else(
            |_| stored.to_string(),
            |instant| {
                let layout = if instant.nanosecond() == 0 {
                    "%Y-%m-%dT%H:%M:%S"
                } else {
                    "%Y-%m-%dT%H:%M:%S%.6f"
                };
                instant.format(layout).to_string()
            },
        )
}

fn stored_now() -> String {
    Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;

    async fn repository() -> Result<StatusRepository> {
        let repo = StatusRepository::connect("sqlite::memory:").await?;
        repo.ensure_schema().await?;
        Ok(repo)
    }

    async fn insert_user(repo: &StatusRepository, id: i64, status: &str) -> Result<()> {
        sqlx::query("INSERT INTO users (username, github_id, status) VALUES (?1, ?2, ?3)")
            .bind(format!("user-{id}"))
            .bind(id)
            .bind(status)
            .execute(repo.pool())
            .await?;
        Ok(())
    }

    async fn insert_scored_user(
        repo: &StatusRepository,
        id: i64,
        status: &str,
        score: f64,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (username, github_id, status, score, last_scanned_at) \
             VALUES (?1, ?2, ?3, ?4, '2024-05-01 09:30:00.000000')",
        )
        .bind(format!("user-{id}"))
        .bind(id)
        .bind(status)
        .bind(score)
        .execute(repo.pool())
        .await?;
        Ok(())
    }

    async fn insert_log(repo: &StatusRepository, stored: &str, message: &str) -> Result<()> {
        sqlx::query("INSERT INTO logs (timestamp, level, message) VALUES (?1, 'INFO', ?2)")
            .bind(stored)
            .bind(message)
            .execute(repo.pool())
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn fresh_database_reports_idle_and_zero_counts() -> Result<()> {
        let repo = repository().await?;
        let snapshot = repo.dashboard_snapshot().await?;
        assert_eq!(snapshot.total_users, 0);
        assert_eq!(snapshot.targeted_count, 0);
        assert_eq!(snapshot.current_bot_phase, "Idle");
        assert!(snapshot.recent_logs.is_empty());
        assert!(snapshot.top_targeted_users.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() -> Result<()> {
        let repo = repository().await?;
        repo.set_bot_phase("Scanning").await?;
        repo.ensure_schema().await?;
        assert_eq!(repo.dashboard_snapshot().await?.current_bot_phase, "Scanning");
        Ok(())
    }

    #[tokio::test]
    async fn counts_follow_user_status() -> Result<()> {
        let repo = repository().await?;
        let statuses = [
            "followed",
            "followed",
            "unfollowed",
            "Disqualified",
            "disqualified",
            "Perfect Target",
            "Low Priority",
            "skipped",
        ];
        for (id, status) in (1..).zip(statuses) {
            insert_user(&repo, id, status).await?;
        }

        let snapshot = repo.dashboard_snapshot().await?;
        assert_eq!(snapshot.total_users, 8);
        assert_eq!(snapshot.followed_count, 2);
        assert_eq!(snapshot.unfollowed_count, 1);
        assert_eq!(snapshot.disqualified_count, 1);
        assert_eq!(snapshot.targeted_count, 2);
        Ok(())
    }

    #[tokio::test]
    async fn every_targeted_status_is_counted() -> Result<()> {
        let repo = repository().await?;
        for (id, status) in (1..).zip(TARGETED_STATUSES) {
            insert_user(&repo, id, status).await?;
        }
        let snapshot = repo.dashboard_snapshot().await?;
        assert_eq!(snapshot.targeted_count, 6);
        Ok(())
    }

    #[tokio::test]
    async fn missing_status_row_reports_unknown_phase() -> Result<()> {
        let repo = repository().await?;
        sqlx::query("DELETE FROM bot_status")
            .execute(repo.pool())
            .await?;
        assert_eq!(repo.dashboard_snapshot().await?.current_bot_phase, UNKNOWN_PHASE);
        Ok(())
    }

    #[tokio::test]
    async fn recent_logs_are_newest_first_and_capped() -> Result<()> {
        let repo = repository().await?;
        for minute in 0..25 {
            insert_log(
                &repo,
                &format!("2024-05-01 10:{minute:02}:00.000000"),
                &format!("entry {minute}"),
            )
            .await?;
        }

        let logs = repo.dashboard_snapshot().await?.recent_logs;
        assert_eq!(logs.len(), 20);
        assert_eq!(logs[0].message, "entry 24");
        assert_eq!(logs[0].timestamp, "2024-05-01T10:24:00");
        assert_eq!(logs[19].message, "entry 5");
        Ok(())
    }

    #[tokio::test]
    async fn top_targets_are_best_scored_and_capped() -> Result<()> {
        let repo = repository().await?;
        for id in 1..=25 {
            let status = TARGETED_STATUSES[usize::try_from(id)? % TARGETED_STATUSES.len()];
            insert_scored_user(&repo, id, status, f64::from(u32::try_from(id)?)).await?;
        }
        insert_scored_user(&repo, 100, "followed", 500.0).await?;
        insert_scored_user(&repo, 101, "Disqualified", 400.0).await?;

        let targets = repo.dashboard_snapshot().await?.top_targeted_users;
        assert_eq!(targets.len(), 20);
        assert_eq!(targets[0].username, "user-25");
        assert_eq!(targets[19].username, "user-6");
        assert!(targets.windows(2).all(|pair| pair[0].score >= pair[1].score));
        assert!(targets.iter().all(|user| TARGETED_STATUSES.contains(&user.status.as_str())));
        assert_eq!(targets[0].last_scanned_at.as_deref(), Some("2024-05-01T09:30:00"));
        assert_eq!(targets[0].followed_at, None);
        assert!(!targets[0].is_organization);
        Ok(())
    }

    #[tokio::test]
    async fn record_log_appears_in_snapshot() -> Result<()> {
        let repo = repository().await?;
        repo.record_log("WARN", "rate limit reached").await?;

        let logs = repo.dashboard_snapshot().await?.recent_logs;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, "WARN");
        assert_eq!(logs[0].message, "rate limit reached");
        assert!(logs[0].timestamp.contains('T'));
        Ok(())
    }

    #[test]
    fn stored_timestamps_become_iso() {
        assert_eq!(
            iso_timestamp("2024-01-01 12:00:00.250000"),
            "2024-01-01T12:00:00.250000"
        );
        assert_eq!(iso_timestamp("2024-01-01 12:00:00"), "2024-01-01T12:00:00");
        assert_eq!(iso_timestamp("2024-01-01T08:30:00"), "2024-01-01T08:30:00");
        assert_eq!(iso_timestamp("garbage"), "garbage");
    }
}
