use crate::{
    database::repositories::books::PostgresBookRepository,
    error::{CatalogError, Result},
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::fmt;
use tracing::info;

/// Connection pool plus the repositories built on top of it.
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
    max_connections: u32,
    min_connections: u32,
    books: PostgresBookRepository,
}

impl fmt::Debug for PostgresCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresCatalog")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .finish()
    }
}

impl PostgresCatalog {
    pub async fn new(connection_string: &str) -> Result<Self> {
        // Pool sizing from environment, with defaults tuned for a
        // read-only query workload.
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(num_cpus::get() as u32);

        let min_connections = std::env::var("DB_MIN_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(2);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .max_lifetime(std::time::Duration::from_secs(1800))
            .idle_timeout(std::time::Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(connection_string)
            .await
            .map_err(|e| {
                CatalogError::Database(format!("database connection failed: {}", e))
            })?;

        info!(
            "Database pool initialized with max_connections={}, min_connections={}",
            max_connections, min_connections
        );

        let books = PostgresBookRepository::new(pool.clone());

        Ok(Self {
            pool,
            max_connections,
            min_connections,
            books,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn books(&self) -> &PostgresBookRepository {
        &self.books
    }

    /// Cheap reachability probe for health reporting.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| CatalogError::Database(format!("health probe failed: {}", e)))?;
        Ok(())
    }
}
