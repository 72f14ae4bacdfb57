// server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use eterna::{HashCost, DEFAULT_WRITE_RETRIES};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `None` runs the server on the in-memory store.
  pub database_url: Option<String>,
  pub database_max_connections: u32,

  /// Attempts for a cart or order write that keeps hitting a concurrent change.
  pub cart_write_retries: usize,
  pub hash_cost: HashCost,

  // Optional: for seeding a demo catalog on startup
  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source. `from_env` passes the process environment.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let defaults = HashCost::default();

    let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_or(&lookup, "SERVER_PORT", 8080u16)?;
    let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
    let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10u32)?;
    let cart_write_retries = parse_or(&lookup, "CART_WRITE_RETRIES", DEFAULT_WRITE_RETRIES)?;
    if cart_write_retries == 0 {
      return Err(AppError::Config("CART_WRITE_RETRIES must be at least 1".to_string()));
    }
    let hash_cost = HashCost {
      memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", defaults.memory_kib)?,
      iterations: parse_or(&lookup, "ARGON2_ITERATIONS", defaults.iterations)?,
      parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", defaults.parallelism)?,
    };
    let seed_db = parse_or(&lookup, "SEED_DB", false)?;

    tracing::info!("Application configuration loaded successfully.");
    // Avoid logging secrets in production directly, or use redacted logging.

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      cart_write_retries,
      hash_cost,
      seed_db,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_or<F, T>(lookup: &F, var_name: &str, default: T) -> Result<T>
where
  F: Fn(&str) -> Option<String>,
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match lookup(var_name) {
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e))),
    None => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    AppConfig::from_lookup(|name| vars.get(name).cloned())
  }

  #[test]
  fn defaults_apply_when_unset() {
    let config = config_from(&[]).unwrap();
    assert_eq!(config.bind_address(), "127.0.0.1:8080");
    assert_eq!(config.database_url, None);
    assert_eq!(config.cart_write_retries, DEFAULT_WRITE_RETRIES);
    assert_eq!(config.hash_cost, HashCost::default());
    assert!(!config.seed_db);
  }

  #[test]
  fn values_are_parsed() {
    let config = config_from(&[
      ("SERVER_HOST", "0.0.0.0"),
      ("SERVER_PORT", "9000"),
      ("DATABASE_URL", "postgres://localhost/eterna"),
      ("CART_WRITE_RETRIES", "5"),
      ("ARGON2_ITERATIONS", "3"),
      ("SEED_DB", "true"),
    ])
    .unwrap();
    assert_eq!(config.bind_address(), "0.0.0.0:9000");
    assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/eterna"));
    assert_eq!(config.cart_write_retries, 5);
    assert_eq!(config.hash_cost.iterations, 3);
    assert!(config.seed_db);
  }

  #[test]
  fn blank_database_url_means_in_memory() {
    let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
    assert_eq!(config.database_url, None);
  }

  #[test]
  fn invalid_values_are_config_errors() {
    assert!(matches!(config_from(&[("SERVER_PORT", "eighty")]), Err(AppError::Config(_))));
    assert!(matches!(config_from(&[("SEED_DB", "maybe")]), Err(AppError::Config(_))));
    assert!(matches!(config_from(&[("CART_WRITE_RETRIES", "0")]), Err(AppError::Config(_))));
  }
}
