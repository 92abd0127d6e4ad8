use crate::config::Backend;
use crate::db::models::{
    Category, CategoryId, CategoryOccupancy, CategoryTally, Citizen, Placement, Room,
};
use crate::db::schema::{
    POSTGRES_DROP, POSTGRES_INIT, SCHEMA_VERSION, SCHEMA_VERSION_INIT, SEED, SQLITE_DROP,
    SQLITE_INIT, statements,
};
use crate::error::HotelError;
use chrono::Utc;
use sqlx::{Connection, PgPool, Pool, Sqlite};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub type SqlitePool = Pool<Sqlite>;

/// Runs `$body` against whichever pool the storage wraps. Each arm is
/// type-checked separately, so generic sqlx calls resolve per backend.
macro_rules! with_pool {
    ($storage:expr, $pool:ident => $body:expr) => {
        match $storage {
            HotelStorage::Sqlite($pool) => $body,
            HotelStorage::Postgres($pool) => $body,
        }
    };
}

const FREE_ROOM_COUNT: &str = r#"
SELECT COUNT(r.id)
FROM rooms r
WHERE NOT EXISTS (
    SELECT 1 FROM placements p WHERE p.room_id = r.id
)
"#;

const FREE_ROOMS: &str = r#"
SELECT r.id, r.category_id, r.room_number, r.capacity
FROM rooms r
WHERE NOT EXISTS (
    SELECT 1 FROM placements p WHERE p.room_id = r.id
)
ORDER BY r.room_number
"#;

/// Distinct counts so a room with several placements is counted once.
/// Uncategorized rooms never join a category row.
const CATEGORY_OCCUPANCY: &str = r#"
SELECT c.id AS category_id,
       c.name AS name,
       COUNT(DISTINCT r.id) AS total_rooms,
       COUNT(DISTINCT p.room_id) AS occupied_rooms
FROM categories c
LEFT JOIN rooms r ON r.category_id = c.id
LEFT JOIN placements p ON p.room_id = r.id
GROUP BY c.id, c.name
ORDER BY c.id
"#;

const CURRENT_VERSION: &str = "SELECT MAX(version) FROM schema_version";

#[derive(Clone, Debug)]
pub enum HotelStorage {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

impl HotelStorage {
    pub fn backend(&self) -> Backend {
        match self {
            HotelStorage::Sqlite(_) => Backend::Sqlite,
            HotelStorage::Postgres(_) => Backend::Postgres,
        }
    }

    /// Round-trip on a pooled connection.
    pub async fn ping(&self) -> Result<(), HotelError> {
        with_pool!(self, pool => {
            let mut conn = pool.acquire().await.map_err(HotelError::Ping)?;
            conn.ping().await.map_err(HotelError::Ping)
        })
    }

    /// Creates the four tables and inserts the seed rows, in one transaction.
    /// On PostgreSQL existing tables are dropped first. On SQLite nothing is
    /// dropped, so running this against a seeded file fails on the unique
    /// `room_number` constraint.
    pub async fn apply_migration(&self) -> Result<(), HotelError> {
        self.migrate(false, None).await
    }

    /// Seeds the store unless the current schema version is already recorded.
    /// Returns whether a migration was applied.
    pub async fn ensure_schema(&self, reseed: bool) -> Result<bool, HotelError> {
        with_pool!(self, pool => {
            sqlx::query(SCHEMA_VERSION_INIT).execute(pool).await.map(|_| ())
        })
        .map_err(HotelError::Migration)?;

        if !reseed {
            let current = self.schema_version().await?;
            if current.is_some_and(|v| v >= SCHEMA_VERSION) {
                info!(version = ?current, "schema already present; skipping migration");
                return Ok(false);
            }
        }

        self.migrate(reseed, Some(SCHEMA_VERSION)).await?;
        info!(version = SCHEMA_VERSION, reseed, "migration applied");
        Ok(true)
    }

    pub async fn schema_version(&self) -> Result<Option<i32>, HotelError> {
        with_pool!(self, pool => {
            sqlx::query_scalar::<_, Option<i32>>(CURRENT_VERSION)
                .fetch_one(pool)
                .await
        })
        .map_err(HotelError::Migration)
    }

    async fn migrate(&self, reset: bool, record: Option<i32>) -> Result<(), HotelError> {
        let script = self.migration_script(reset);
        let marker_sql = match self {
            HotelStorage::Sqlite(_) => {
                "INSERT INTO schema_version (version, applied_at) VALUES (?, ?)"
            }
            HotelStorage::Postgres(_) => {
                "INSERT INTO schema_version (version, applied_at) VALUES ($1, $2)"
            }
        };

        with_pool!(self, pool => {
            let mut tx = pool.begin().await.map_err(HotelError::Migration)?;
            for stmt in &script {
                debug!(statement = %stmt, "executing migration statement");
                sqlx::query(stmt)
                    .execute(&mut *tx)
                    .await
                    .map_err(HotelError::Migration)?;
            }
            if let Some(version) = record {
                sqlx::query(marker_sql)
                    .bind(version)
                    .bind(Utc::now().to_rfc3339())
                    .execute(&mut *tx)
                    .await
                    .map_err(HotelError::Migration)?;
            }
            tx.commit().await.map_err(HotelError::Migration)
        })
    }

    fn migration_script(&self, reset: bool) -> Vec<&'static str> {
        let mut script = Vec::new();
        match self {
            HotelStorage::Sqlite(_) => {
                if reset {
                    script.extend(statements(SQLITE_DROP));
                }
                script.extend(statements(SQLITE_INIT));
            }
            HotelStorage::Postgres(_) => {
                script.extend(statements(POSTGRES_DROP));
                script.extend(statements(POSTGRES_INIT));
            }
        }
        if reset {
            script.push("DELETE FROM schema_version");
        }
        script.extend(statements(SEED));
        script
    }

    /// Number of rooms no placement references.
    pub async fn count_free_rooms(&self) -> Result<i64, HotelError> {
        with_pool!(self, pool => {
            sqlx::query_scalar::<_, i64>(FREE_ROOM_COUNT)
                .fetch_one(pool)
                .await
        })
        .map_err(HotelError::query)
    }

    pub async fn free_rooms(&self) -> Result<Vec<Room>, HotelError> {
        with_pool!(self, pool => sqlx::query_as::<_, Room>(FREE_ROOMS).fetch_all(pool).await)
            .map_err(HotelError::query)
    }

    /// Occupancy per category, keyed by category id so that duplicate
    /// names stay distinct.
    pub async fn category_occupancy(
        &self,
    ) -> Result<BTreeMap<CategoryId, CategoryOccupancy>, HotelError> {
        let tallies = with_pool!(self, pool => {
            sqlx::query_as::<_, CategoryTally>(CATEGORY_OCCUPANCY)
                .fetch_all(pool)
                .await
        })
        .map_err(HotelError::query)?;

        Ok(tallies
            .into_iter()
            .map(|t| (t.category_id, CategoryOccupancy::from(t)))
            .collect())
    }

    pub async fn categories(&self) -> Result<Vec<Category>, HotelError> {
        with_pool!(self, pool => {
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(pool)
                .await
        })
        .map_err(HotelError::query)
    }

    pub async fn rooms(&self) -> Result<Vec<Room>, HotelError> {
        with_pool!(self, pool => {
            sqlx::query_as::<_, Room>(
                "SELECT id, category_id, room_number, capacity FROM rooms ORDER BY id",
            )
            .fetch_all(pool)
            .await
        })
        .map_err(HotelError::query)
    }

    pub async fn citizens(&self) -> Result<Vec<Citizen>, HotelError> {
        with_pool!(self, pool => {
            sqlx::query_as::<_, Citizen>(
                "SELECT id, full_name, passport_number FROM citizens ORDER BY id",
            )
            .fetch_all(pool)
            .await
        })
        .map_err(HotelError::query)
    }

    pub async fn placements(&self) -> Result<Vec<Placement>, HotelError> {
        with_pool!(self, pool => {
            sqlx::query_as::<_, Placement>(
                r#"SELECT id, citizen_id, room_id, start_date, duration_days
                   FROM placements ORDER BY id"#,
            )
            .fetch_all(pool)
            .await
        })
        .map_err(HotelError::query)
    }

    /// Closes the pool and waits for connections to be released.
    pub async fn close(&self) {
        with_pool!(self, pool => pool.close().await)
    }
}
