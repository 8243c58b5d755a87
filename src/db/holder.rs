// Single-connection holder with idle-timeout reconnection.
//
// States: Disconnected (slot empty) and Connected (slot holds the live
// connection together with its timestamps). The slot sits behind one async
// mutex, so every acquire/release runs as a single critical section.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{ConnectionSettings, Connector, MySqlConnector};
use crate::error::DbError;

/// Idle time after which a held connection is replaced on the next acquire.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Exclusive access to the live connection.
///
/// The holder stays locked while this guard is alive; drop it before calling
/// [`ConnectionHolder::release`] from the same task.
pub type ConnectionGuard<'a, T> = MappedMutexGuard<'a, T>;

/// What the idle timeout is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryMode {
    /// Measured from the moment the connection was opened; reuse does not
    /// extend its life.
    #[default]
    SinceOpen,
    /// Measured from the most recent successful acquire.
    SinceLastAcquire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Point-in-time view of a holder, suitable for logging.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    pub connected_since: Option<DateTime<Utc>>,
    /// Seconds counted toward the idle timeout so far.
    pub idle_secs: Option<u64>,
    pub idle_timeout_secs: u64,
}

struct Live<T> {
    connection: T,
    connected_at: DateTime<Utc>,
    last_used: Instant,
}

/// Owns at most one live connection and hands it out on demand.
pub struct ConnectionHolder<C: Connector = MySqlConnector> {
    settings: ConnectionSettings,
    connector: Arc<C>,
    idle_timeout: Duration,
    expiry: ExpiryMode,
    slot: Mutex<Option<Live<C::Connection>>>,
}

impl ConnectionHolder<MySqlConnector> {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self::with_connector(settings, MySqlConnector)
    }
}

impl<C: Connector> ConnectionHolder<C> {
    pub fn with_connector(settings: ConnectionSettings, connector: C) -> Self {
        Self {
            settings,
            connector: Arc::new(connector),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            expiry: ExpiryMode::default(),
            slot: Mutex::new(None),
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn with_expiry_mode(mut self, expiry: ExpiryMode) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn expiry_mode(&self) -> ExpiryMode {
        self.expiry
    }

    /// Returns the live connection, opening it first if there is none or the
    /// held one has been idle longer than the timeout.
    ///
    /// A failed open leaves the holder disconnected; the next call tries again.
    pub async fn acquire(&self) -> Result<ConnectionGuard<'_, C::Connection>, DbError> {
        let mut slot = self.slot.lock().await;
        let now = Instant::now();

        let live = match slot.take() {
            Some(mut live) if !self.is_expired(&live, now) => {
                if self.expiry == ExpiryMode::SinceLastAcquire {
                    live.last_used = now;
                }
                debug!("Reusing database connection");
                live
            }
            stale => {
                if let Some(live) = stale {
                    info!(
                        idle_secs = now.saturating_duration_since(live.last_used).as_secs(),
                        "Database connection idle timeout exceeded, reconnecting"
                    );
                    self.discard(live).await;
                }
                self.open().await?
            }
        };

        Ok(MutexGuard::map(slot, |slot| &mut slot.insert(live).connection))
    }

    /// Closes the live connection, if any. Close errors are logged and dropped.
    pub async fn release(&self) {
        let live = self.slot.lock().await.take();
        if let Some(live) = live {
            self.discard(live).await;
            info!(db = %self.settings.target(), "Database connection released");
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    pub async fn status(&self) -> ConnectionStatus {
        let slot = self.slot.lock().await;
        let idle_timeout_secs = self.idle_timeout.as_secs();

        match slot.as_ref() {
            Some(live) => ConnectionStatus {
                state: ConnectionState::Connected,
                connected_since: Some(live.connected_at),
                idle_secs: Some(Instant::now().saturating_duration_since(live.last_used).as_secs()),
                idle_timeout_secs,
            },
            None => ConnectionStatus {
                state: ConnectionState::Disconnected,
                connected_since: None,
                idle_secs: None,
                idle_timeout_secs,
            },
        }
    }

    fn is_expired(&self, live: &Live<C::Connection>, now: Instant) -> bool {
        now.saturating_duration_since(live.last_used) > self.idle_timeout
    }

    async fn open(&self) -> Result<Live<C::Connection>, DbError> {
        let target = self.settings.target();

        let connection = self
            .connector
            .open(&self.settings)
            .await
            .map_err(|source| {
                warn!(db = %target, error = %source, "Database connection failed");
                DbError::ConnectFailed {
                    target: target.clone(),
                    source,
                }
            })?;

        info!(db = %target, "Database connected");
        Ok(Live {
            connection,
            connected_at: Utc::now(),
            last_used: Instant::now(),
        })
    }

    async fn discard(&self, live: Live<C::Connection>) {
        if let Err(e) = self.connector.close(live.connection).await {
            warn!(error = %e, "Ignoring error while closing database connection");
        }
    }
}

impl<C: Connector> Drop for ConnectionHolder<C> {
    // Inside a runtime the close is handed to a background task; otherwise
    // (or if that task never runs) the connection is simply dropped.
    fn drop(&mut self) {
        let Some(live) = self.slot.get_mut().take() else {
            return;
        };

        match Handle::try_current() {
            Ok(handle) => {
                let connector = Arc::clone(&self.connector);
                handle.spawn(async move {
                    if let Err(e) = connector.close(live.connection).await {
                        warn!(error = %e, "Ignoring error while closing database connection");
                    }
                    debug!("Database connection closed with its holder");
                });
            }
            Err(_) => {
                drop(live);
                debug!("Database connection dropped with its holder");
            }
        }
    }
}
