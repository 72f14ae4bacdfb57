// src/lib.rs

//! Eterna: cart, order and credential logic for a small storefront.
//!
//! The crate covers:
//!  - Cart mutations (add, replace quantity, remove) with optimistic
//!    concurrency on the owning user document.
//!  - Order creation that snapshots cart prices and clears the cart in one
//!    atomic store write.
//!  - Registration and credential checks through a pluggable password hasher.
//!  - Catalog, profile and order read accessors.
//!
//! Storage is abstracted behind [`Store`]; [`MemoryStore`] ships here and a
//! PostgreSQL implementation lives in the server crate.

pub mod error;
pub mod hashing;
pub mod models;
pub mod services;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::error::{ShopError, ShopResult, StoreError, StoreResult};
pub use crate::hashing::{Argon2Hasher, CredentialHasher, HashCost};
pub use crate::services::{AccountService, CartService, CatalogService, OrderService, Services, DEFAULT_WRITE_RETRIES};
pub use crate::store::{CatalogStore, MemoryStore, OrderStore, Store, UserStore};

/*
    Typical wiring:
    1. Build a store (`MemoryStore::new()` or a database-backed one) and wrap it in `Arc<dyn Store>`.
    2. Build a hasher (`Argon2Hasher::new(cost)`) and wrap it in `Arc<dyn CredentialHasher>`.
    3. `Services::new(store, hasher, DEFAULT_WRITE_RETRIES)` once at startup.
    4. Clone `Services` into each request handler.
*/
