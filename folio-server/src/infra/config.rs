//! Environment-first configuration.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file in the working directory. A missing `.env` is fine; a
//! malformed one is a startup error.

use anyhow::{Context, anyhow};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub env_file_loaded: bool,
}

pub fn load() -> anyhow::Result<ConfigLoad> {
    let env_file_loaded = dotenvy::dotenv().map(|_| true).or_else(|err| match err {
        dotenvy::Error::Io(_) => Ok(false),
        _ => Err(err),
    })?;

    let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = match std::env::var("SERVER_PORT") {
        Ok(raw) => raw
            .parse::<u16>()
            .with_context(|| format!("invalid SERVER_PORT value `{raw}`"))?,
        Err(_) => 8080,
    };

    let url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be provided for PostgreSQL connections")?;
    validate_database_url(&url)?;

    Ok(ConfigLoad {
        config: Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig { url },
        },
        env_file_loaded,
    })
}

fn validate_database_url(url: &str) -> anyhow::Result<()> {
    if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
        return Err(anyhow!(
            "Invalid database URL: must start with postgres:// or postgresql://"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_postgres_urls_are_accepted() {
        assert!(validate_database_url("postgres://folio@localhost/folio").is_ok());
        assert!(validate_database_url("postgresql://folio@localhost/folio").is_ok());
        assert!(validate_database_url("mysql://folio@localhost/folio").is_err());
        assert!(validate_database_url("localhost/folio").is_err());
    }
}
