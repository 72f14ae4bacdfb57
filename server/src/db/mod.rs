// server/src/db/mod.rs

pub mod postgres;
pub mod seed;

pub use postgres::PgStore;
pub use seed::seed_catalog;
