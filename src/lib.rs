pub mod config;
pub mod error;
pub mod db;
pub mod service;

pub use config::Config;
pub use db::HotelStorage;
pub use error::HotelError;
pub use service::OccupancyReport;
