//! Single MySQL connection holder with idle-timeout reconnection.
//!
//! A [`ConnectionHolder`] opens one connection lazily, hands it out on every
//! [`acquire`](ConnectionHolder::acquire), replaces it once it has been idle
//! past the configured timeout and discards it when the holder goes away.

pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use db::{
    ConnectionGuard, ConnectionHolder, ConnectionSettings, ConnectionState, ConnectionStatus,
    Connector, ExpiryMode, MySqlConnector, DEFAULT_IDLE_TIMEOUT,
};
pub use error::{ConfigError, DbError};
