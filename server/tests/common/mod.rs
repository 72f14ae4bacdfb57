// tests/common/mod.rs
#![allow(dead_code, unused_macros)] // Not every test binary uses every helper

use chrono::NaiveDate;
use eterna::models::{NewProduct, NewUser, Product};
use eterna::{Argon2Hasher, HashCost, MemoryStore, Services, Store};
use eterna_server::config::AppConfig;
use eterna_server::state::AppState;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

pub const PASSWORD: &str = "correct horse battery staple";

/// Mounts the API routes over `$state` and returns the initialised test service.
macro_rules! init_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state.clone()))
        .configure(eterna_server::web::configure_app_routes),
    )
    .await
  };
}

/// Application state over a fresh in-memory store.
pub fn test_state() -> AppState {
  setup_tracing();
  let config = AppConfig::from_lookup(|_| None).unwrap();
  let hasher = Argon2Hasher::new(HashCost {
    memory_kib: 1024,
    iterations: 1,
    parallelism: 1,
  })
  .unwrap();
  let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
  let services = Services::new(store, Arc::new(hasher), config.cart_write_retries);
  AppState::new(services)
}

pub async fn add_product(state: &AppState, name: &str, cents: i64) -> Product {
  state
    .services
    .catalog
    .add_product(NewProduct {
      name: name.to_string(),
      price: Decimal::new(cents, 2),
      image: format!("/images/{}.jpg", name.to_lowercase()),
      description: format!("A fine {}", name),
    })
    .await
    .unwrap()
}

pub async fn register(state: &AppState, email: &str) -> Uuid {
  state
    .services
    .accounts
    .register(NewUser {
      email: email.to_string(),
      password: PASSWORD.to_string(),
      name: "Jane".to_string(),
      surname: "Doe".to_string(),
      address: "1 Main St, Springfield".to_string(),
      birthdate: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
    })
    .await
    .unwrap()
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
