// core/src/error.rs
use anyhow::Error as AnyhowError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
  /// The user document changed between load and save.
  #[error("Version conflict on user {user_id} (expected version {expected})")]
  VersionConflict { user_id: Uuid, expected: i64 },

  #[error("A user with email '{email}' already exists")]
  DuplicateEmail { email: String },

  #[error("Storage backend failure. Source: {source}")]
  Backend {
    #[source]
    source: AnyhowError,
  },
}

// Backends bubble up driver errors (sqlx, io, ...) through anyhow.
impl From<AnyhowError> for StoreError {
  fn from(err: AnyhowError) -> Self {
    StoreError::Backend { source: err }
  }
}

#[derive(Debug, Error)]
pub enum ShopError {
  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: Uuid },

  /// Registration with an email that is already in use.
  #[error("Email is already registered")]
  EmailTaken,

  #[error("Cart is empty")]
  EmptyCart,

  #[error("Invalid quantity: {0}")]
  InvalidQuantity(i64),

  /// Negative, or finer than a cent.
  #[error("Invalid price: {0}")]
  InvalidPrice(Decimal),

  #[error("Order total overflows")]
  TotalOverflow,

  /// Optimistic concurrency retries were exhausted.
  #[error("Cart for user {user_id} is being modified concurrently, gave up after {attempts} attempts")]
  Contention { user_id: Uuid, attempts: usize },

  #[error("Password hashing failed: {0}")]
  Hashing(String),

  #[error("Store error: {source}")]
  Store {
    #[from]
    source: StoreError,
  },
}

impl ShopError {
  pub(crate) fn user_not_found(id: Uuid) -> Self {
    ShopError::NotFound { entity: "User", id }
  }

  pub(crate) fn product_not_found(id: Uuid) -> Self {
    ShopError::NotFound { entity: "Product", id }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, ShopError::NotFound { .. })
  }
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
pub type ShopResult<T, E = ShopError> = std::result::Result<T, E>;
