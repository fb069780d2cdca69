//! Store errors
//!
//! Repositories return [`DatabaseError`]; raw `sqlx` errors stop here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Could not open or reach the database file
    #[error("Database connection failed: {0}")]
    ConnectionError(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    /// Foreign key, unique or CHECK constraint rejected the write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A row did not map onto its model
    #[error("Row decode error: {0}")]
    DecodeError(String),

    #[error("Migration failed: {0}")]
    MigrationError(String),

    #[error("Transaction failed: {0}")]
    TransactionError(String),

    #[error("Query error: {0}")]
    QueryError(String),
}

/// Result type for store operations
pub type DbResult<T> = std::result::Result<T, DatabaseError>;

impl DatabaseError {
    pub fn not_found(what: impl Into<String>) -> Self {
        DatabaseError::NotFound(what.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DatabaseError::ConstraintViolation(_))
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationError(err.to_string())
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::not_found("no matching row"),
            sqlx::Error::Database(db_err)
                if db_err.is_foreign_key_violation()
                    || db_err.is_unique_violation()
                    || db_err.is_check_violation() =>
            {
                DatabaseError::ConstraintViolation(db_err.message().to_string())
            }
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => DatabaseError::DecodeError(err.to_string()),
            sqlx::Error::Configuration(_)
            | sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => DatabaseError::ConnectionError(err.to_string()),
            sqlx::Error::Migrate(migrate) => DatabaseError::MigrationError(migrate.to_string()),
            other => DatabaseError::QueryError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DatabaseError = sqlx::Error::RowNotFound.into();
        assert!(err.is_not_found());
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn test_closed_pool_is_a_connection_error() {
        let err: DatabaseError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, DatabaseError::ConnectionError(_)));
    }

    #[test]
    fn test_display_names_the_record() {
        let err = DatabaseError::not_found("task 42");
        assert_eq!(err.to_string(), "Record not found: task 42");
    }
}
