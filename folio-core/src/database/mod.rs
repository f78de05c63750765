//! PostgreSQL-backed persistence for the catalog.

pub mod postgres;
pub mod repositories;

pub use postgres::PostgresCatalog;
pub use repositories::books::PostgresBookRepository;
