// core/src/services/mod.rs

//! Request-level operations of the storefront.
//!
//! Each service owns an `Arc<dyn Store>` handed in at startup; nothing here
//! reaches for a global connection.

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod orders;

use crate::error::{ShopError, ShopResult, StoreError};
use crate::hashing::CredentialHasher;
use crate::store::Store;

use std::future::Future;
use std::sync::Arc;
use tracing::{event, warn, Level};
use uuid::Uuid;

pub use accounts::AccountService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use orders::OrderService;

/// Attempts made for a cart or order write before giving up on a busy user.
pub const DEFAULT_WRITE_RETRIES: usize = 3;

/// All services sharing one store.
#[derive(Clone)]
pub struct Services {
  pub catalog: CatalogService,
  pub accounts: AccountService,
  pub carts: CartService,
  pub orders: OrderService,
}

impl Services {
  pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn CredentialHasher>, write_retries: usize) -> Self {
    Self {
      catalog: CatalogService::new(store.clone()),
      accounts: AccountService::new(store.clone(), hasher),
      carts: CartService::new(store.clone(), write_retries),
      orders: OrderService::new(store, write_retries),
    }
  }
}

/// Runs a load/mutate/save closure, reloading and trying again while the
/// store reports a stale user version.
pub(crate) async fn retry_on_version_conflict<T, F, Fut>(user_id: Uuid, attempts: usize, mut op: F) -> ShopResult<T>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = ShopResult<T>>,
{
  let attempts = attempts.max(1);
  for attempt in 1..=attempts {
    match op().await {
      Err(ShopError::Store {
        source: StoreError::VersionConflict { .. },
      }) => {
        event!(Level::DEBUG, %user_id, attempt, "User document changed underneath us, retrying.");
      }
      other => return other,
    }
  }
  warn!(%user_id, attempts, "Giving up after repeated version conflicts.");
  Err(ShopError::Contention { user_id, attempts })
}
