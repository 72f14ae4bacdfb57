// server/src/lib.rs

//! HTTP JSON front end for the eterna storefront.

pub mod config;
pub mod db;
pub mod errors;
pub mod state;
pub mod web;

use std::sync::Arc;

use eterna::{Argon2Hasher, CredentialHasher, MemoryStore, Services, Store};
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::db::PgStore;
use crate::errors::Result;
use crate::state::AppState;

/// Picks the store, runs migrations and optional seeding, and wires the services.
pub async fn build_state(config: AppConfig) -> Result<AppState> {
  let store: Arc<dyn Store> = match config.database_url.as_deref() {
    Some(url) => {
      let pg_store = PgStore::connect(url, config.database_max_connections)
        .await
        .map_err(|e| {
          error!(error = %e, "Failed to connect to the database.");
          e
        })?;
      info!("Successfully connected to the database.");
      pg_store.migrate().await?;
      info!("Database migrations applied.");
      Arc::new(pg_store)
    }
    None => {
      warn!("DATABASE_URL not set, using the in-memory store. Data is lost on restart.");
      Arc::new(MemoryStore::new())
    }
  };

  let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher::new(config.hash_cost)?);
  let services = Services::new(store, hasher, config.cart_write_retries);

  if config.seed_db {
    if let Err(e) = db::seed_catalog(&services).await {
      error!(error = %e, "Failed to seed database.");
      return Err(e.into());
    }
  }

  Ok(AppState::new(services))
}
