mod holder;
mod mysql;
mod settings;

pub use holder::{
    ConnectionGuard, ConnectionHolder, ConnectionState, ConnectionStatus, ExpiryMode,
    DEFAULT_IDLE_TIMEOUT,
};
pub use mysql::MySqlConnector;
pub use settings::ConnectionSettings;

use async_trait::async_trait;

/// Opens and closes the connections a [`ConnectionHolder`] hands out.
///
/// Dropping a connection without going through [`close`](Connector::close)
/// must still free it: a holder dropped outside a tokio runtime cannot call
/// `close` and falls back to dropping the connection.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Connection: Send + 'static;

    async fn open(&self, settings: &ConnectionSettings) -> Result<Self::Connection, sqlx::Error>;

    async fn close(&self, connection: Self::Connection) -> Result<(), sqlx::Error>;
}
