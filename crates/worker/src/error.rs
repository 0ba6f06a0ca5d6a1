use medchain_core::error::CoreError;

/// Errors raised while running the inventory monitor.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A domain-level error from `medchain_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store cannot be reached at all.
    #[error("Inventory store unavailable: {0}")]
    Unavailable(String),
}

impl MonitorError {
    /// Whether the error means the store itself is unreachable.
    ///
    /// Fatal errors abort the whole run. Anything else is scoped to the
    /// medicine being written and the run moves on to the next record.
    pub fn is_fatal(&self) -> bool {
        match self {
            MonitorError::Unavailable(_) => true,
            MonitorError::Database(err) => matches!(
                err,
                sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::Protocol(_)
                    | sqlx::Error::Configuration(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
            ),
            MonitorError::Core(_) => false,
        }
    }

    /// Whether the error is a uniqueness violation, i.e. another writer
    /// inserted the same open row first.
    pub fn is_duplicate(&self) -> bool {
        match self {
            // PostgreSQL unique constraint violation: error code 23505
            MonitorError::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some("23505")
            }
            MonitorError::Core(CoreError::Conflict(_)) => true,
            _ => false,
        }
    }
}
