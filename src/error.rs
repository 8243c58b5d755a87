use thiserror::Error;

/// Errors surfaced by [`ConnectionHolder`](crate::ConnectionHolder).
///
/// Close failures never show up here; they are logged and dropped.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database Connection Failed: {source}")]
    ConnectFailed {
        target: String,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    /// Connection target (`user@host...`) the failed attempt was aimed at.
    pub fn target(&self) -> &str {
        match self {
            DbError::ConnectFailed { target, .. } => target,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}
