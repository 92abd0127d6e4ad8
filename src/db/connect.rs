use crate::config::{Backend, Config};
use crate::db::storage::HotelStorage;
use crate::error::HotelError;
use backon::{ExponentialBuilder, Retryable};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{info, warn};

/// Opens the configured backend and probes it. Transient connection
/// failures are retried with exponential backoff up to `connect_retries`.
pub async fn connect(cfg: &Config) -> Result<HotelStorage, HotelError> {
    let backend = cfg.backend()?;
    let database_url = cfg.database_url.as_str();

    let storage = (|| open(backend, database_url))
        .retry(ExponentialBuilder::default().with_max_times(cfg.connect_retries))
        .when(HotelError::is_transient)
        .notify(|err: &HotelError, dur| {
            warn!(error = %err, retry_in = ?dur, "database connection failed; retrying");
        })
        .await?;

    storage.ping().await?;
    info!(
        backend = ?backend,
        database_url = %cfg.redacted_database_url(),
        "connected to database"
    );
    Ok(storage)
}

async fn open(backend: Backend, database_url: &str) -> Result<HotelStorage, HotelError> {
    match backend {
        Backend::Sqlite => {
            let options = SqliteConnectOptions::from_str(database_url)
                .map_err(HotelError::Connect)?
                .create_if_missing(true)
                .foreign_keys(true);
            if !options.get_filename().exists() {
                info!(
                    path = %options.get_filename().display(),
                    "database file not found; creating"
                );
            }
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await
                .map_err(HotelError::Connect)?;
            Ok(HotelStorage::Sqlite(pool))
        }
        Backend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(1)
                .connect(database_url)
                .await
                .map_err(HotelError::Connect)?;
            Ok(HotelStorage::Postgres(pool))
        }
    }
}
