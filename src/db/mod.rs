//! Database module: models, schema and backend-agnostic storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and the occupancy math
//! - `schema.rs`: DDL per backend plus the portable seed script
//! - `storage.rs`: `HotelStorage`, dispatching over SQLite and PostgreSQL pools
//! - `connect.rs`: opens and probes the configured backend

pub mod connect;
pub mod models;
pub mod schema;
pub mod storage;

pub use connect::connect;
pub use models::{Category, CategoryId, CategoryOccupancy, Citizen, Placement, Room};
pub use schema::SCHEMA_VERSION;
pub use storage::{HotelStorage, SqlitePool};
