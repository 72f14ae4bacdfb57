// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use chrono::NaiveDate;
use eterna::models::{NewProduct, NewUser, Product};
use eterna::{Argon2Hasher, HashCost, MemoryStore, Services, Store};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

pub const PASSWORD: &str = "correct horse battery staple";

/// A service bundle over a fresh in-memory store.
pub struct TestShop {
  pub store: Arc<MemoryStore>,
  pub services: Services,
}

impl TestShop {
  pub fn new() -> Self {
    Self::with_retries(eterna::DEFAULT_WRITE_RETRIES)
  }

  pub fn with_retries(write_retries: usize) -> Self {
    setup_tracing();
    let store = Arc::new(MemoryStore::new());
    let services = Services::new(store.clone() as Arc<dyn Store>, Arc::new(cheap_hasher()), write_retries);
    Self { store, services }
  }

  pub async fn product(&self, name: &str, price: Decimal) -> Product {
    self
      .services
      .catalog
      .add_product(NewProduct {
        name: name.to_string(),
        price,
        image: format!("/images/{}.jpg", name.to_lowercase()),
        description: format!("A fine {}", name),
      })
      .await
      .unwrap()
  }

  pub async fn user(&self, email: &str) -> Uuid {
    self.services.accounts.register(new_user(email)).await.unwrap()
  }
}

pub fn new_user(email: &str) -> NewUser {
  NewUser {
    email: email.to_string(),
    password: PASSWORD.to_string(),
    name: "Jane".to_string(),
    surname: "Doe".to_string(),
    address: "1 Main St, Springfield".to_string(),
    birthdate: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
  }
}

/// Argon2 at its minimum cost so tests stay fast.
pub fn cheap_hasher() -> Argon2Hasher {
  Argon2Hasher::new(HashCost {
    memory_kib: 1024,
    iterations: 1,
    parallelism: 1,
  })
  .unwrap()
}

pub fn price(cents: i64) -> Decimal {
  Decimal::new(cents, 2)
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
