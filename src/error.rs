use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum HotelError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Unsupported database backend: {0}")]
    UnsupportedBackend(String),

    #[error("Connection failed: {0}")]
    Connect(#[source] SqlxError),

    #[error("Liveness probe failed: {0}")]
    Ping(#[source] SqlxError),

    #[error("Migration failed: {0}")]
    Migration(#[source] SqlxError),

    #[error("Query failed: {0}")]
    Query(#[source] SqlxError),

    #[error("Row decoding failed: {0}")]
    Decode(#[source] SqlxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for HotelError {
    fn from(e: figment::Error) -> Self {
        HotelError::Config(Box::new(e))
    }
}

impl HotelError {
    /// Wraps a sqlx error raised while running a read query. Row-scan
    /// failures are reported as `Decode`, everything else as `Query`.
    pub fn query(e: SqlxError) -> Self {
        match e {
            SqlxError::ColumnDecode { .. }
            | SqlxError::Decode(_)
            | SqlxError::ColumnNotFound(_)
            | SqlxError::ColumnIndexOutOfBounds { .. }
            | SqlxError::TypeNotFound { .. } => HotelError::Decode(e),
            other => HotelError::Query(other),
        }
    }

    /// Short name of the stage that failed, used in the fatal log line.
    pub fn stage(&self) -> &'static str {
        match self {
            HotelError::Config(_) | HotelError::UrlParse(_) | HotelError::UnsupportedBackend(_) => {
                "config"
            }
            HotelError::Connect(_) => "connect",
            HotelError::Ping(_) => "ping",
            HotelError::Migration(_) => "migration",
            HotelError::Query(_) => "query",
            HotelError::Decode(_) => "decode",
            HotelError::Io(_) | HotelError::Json(_) => "output",
        }
    }

    /// Transient faults are worth retrying: lost sockets and pool timeouts.
    /// Schema and constraint errors never are.
    pub fn is_transient(&self) -> bool {
        match self {
            HotelError::Connect(e) | HotelError::Ping(e) | HotelError::Query(e) => matches!(
                e,
                SqlxError::Io(_) | SqlxError::PoolTimedOut | SqlxError::WorkerCrashed
            ),
            _ => false,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        match self {
            HotelError::Migration(SqlxError::Database(db))
            | HotelError::Query(SqlxError::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failures_are_classified_separately() {
        let err = HotelError::query(SqlxError::ColumnNotFound("total_rooms".into()));
        assert!(matches!(err, HotelError::Decode(_)));
        assert_eq!(err.stage(), "decode");

        let err = HotelError::query(SqlxError::RowNotFound);
        assert!(matches!(err, HotelError::Query(_)));
        assert_eq!(err.stage(), "query");
    }

    #[test]
    fn io_failures_are_transient() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(HotelError::Connect(SqlxError::Io(io)).is_transient());
        assert!(HotelError::Connect(SqlxError::PoolTimedOut).is_transient());
        assert!(!HotelError::Migration(SqlxError::RowNotFound).is_transient());
        assert!(!HotelError::UnsupportedBackend("mysql".into()).is_transient());
    }
}
