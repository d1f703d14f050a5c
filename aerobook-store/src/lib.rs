pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod error;
pub mod flight_repo;
pub mod user_repo;

pub use booking_repo::PgBookingRepository;
pub use sqlx::PgPool;
pub use database::DbClient;
pub use error::StoreError;
pub use flight_repo::PgFlightRepository;
pub use user_repo::PgUserRepository;
