use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};

use super::{ConnectionSettings, Connector};

/// Opens plain (unpooled) MySQL connections through sqlx.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

impl MySqlConnector {
    pub fn connect_options(settings: &ConnectionSettings) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new()
            .host(&settings.host)
            .username(&settings.username)
            .password(&settings.password);

        if let Some(port) = settings.port {
            options = options.port(port);
        }
        if let Some(socket) = &settings.socket {
            options = options.socket(socket);
        }
        if let Some(database) = &settings.database {
            options = options.database(database);
        }

        // Statements are the caller's business; keep sqlx quiet about them.
        options.disable_statement_logging()
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    type Connection = MySqlConnection;

    async fn open(&self, settings: &ConnectionSettings) -> Result<MySqlConnection, sqlx::Error> {
        Self::connect_options(settings).connect().await
    }

    async fn close(&self, connection: MySqlConnection) -> Result<(), sqlx::Error> {
        connection.close().await
    }
}
