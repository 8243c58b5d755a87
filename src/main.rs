use std::path::Path;
use std::time::{Duration, SystemTime};

use mysql_conn_holder::{Config, ConnectionHolder};
use sqlx::Connection;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_DIR: &str = "logs";
const LOG_RETENTION_DAYS: u64 = 7;

/// Removes log files older than `max_age_days`.
fn cleanup_old_logs(log_dir: &str, max_age_days: u64) {
    let Ok(entries) = std::fs::read_dir(Path::new(log_dir)) else {
        return;
    };

    let max_age = Duration::from_secs(max_age_days * 24 * 60 * 60);
    let now = SystemTime::now();

    for entry in entries.flatten() {
        let expired = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age > max_age);
        if expired {
            let _ = std::fs::remove_file(entry.path());
        }
    }
}

/// Console + daily rolling file. The returned guard flushes the file writer on drop.
fn init_tracing(log_level: &str) -> WorkerGuard {
    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "conn-holder.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    cleanup_old_logs(LOG_DIR, LOG_RETENTION_DAYS);
    let _log_guard = init_tracing(&config.log_level);

    let holder = ConnectionHolder::new(config.settings.clone())
        .with_idle_timeout(config.idle_timeout);
    info!("Connecting to database {}...", holder.settings().target());

    // Fail fast: a connection that cannot be opened ends the process.
    match holder.acquire().await {
        Ok(mut conn) => conn.ping().await?,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    }

    let status = holder.status().await;
    info!(status = %serde_json::to_string(&status)?, "Database connected successfully");

    holder.release().await;
    Ok(())
}
