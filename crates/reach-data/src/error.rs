//! Error types for the status read model.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Result alias for data layer operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors raised by the status read model.
#[derive(Debug)]
pub enum DataError {
    /// The database could not be opened.
    ConnectFailed {
        /// Connection string with credentials removed.
        url: String,
        /// Underlying SQL error.
        source: sqlx::Error,
    },
    /// Schema migration failed.
    MigrationFailed {
        /// Underlying migration error.
        source: sqlx::migrate::MigrateError,
    },
    /// A database operation failed.
    QueryFailed {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying SQL error.
        source: sqlx::Error,
    },
}

impl DataError {
    pub(crate) fn query(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::QueryFailed { operation, source }
    }
}

impl Display for DataError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed { .. } => formatter.write_str("database connection failed"),
            Self::MigrationFailed { .. } => formatter.write_str("migration failed"),
            Self::QueryFailed { .. } => formatter.write_str("database operation failed"),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ConnectFailed { source, .. } | Self::QueryFailed { source, .. } => Some(source),
            Self::MigrationFailed { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_error_display_and_source() {
        let connect = DataError::ConnectFailed {
            url: "sqlite://reach.db".to_string(),
            source: sqlx::Error::PoolTimedOut,
        };
        assert_eq!(connect.to_string(), "database connection failed");
        assert!(connect.source().is_some());

        let migration = DataError::MigrationFailed {
            source: sqlx::migrate::MigrateError::VersionMissing(1),
        };
        assert_eq!(migration.to_string(), "migration failed");
        assert!(migration.source().is_some());

        let query = DataError::query("count users")(sqlx::Error::RowNotFound);
        assert_eq!(query.to_string(), "database operation failed");
        assert!(matches!(
            query,
            DataError::QueryFailed {
                operation: "count users",
                ..
            }
        ));
    }
}
