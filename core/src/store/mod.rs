// core/src/store/mod.rs

//! Storage boundary for users, products and orders.
//!
//! Services only talk to the [`Store`] trait object they were handed at
//! construction time. Joins between carts/orders and the catalog happen here,
//! at the storage boundary, so that the service code never walks references
//! by hand.

pub mod memory;

use crate::error::{StoreError, StoreResult};
use crate::models::{CartItem, CartLine, Order, OrderDetails, OrderLine, Product, User, UserProfile};

use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

pub use memory::MemoryStore;

#[async_trait]
pub trait CatalogStore: Send + Sync {
  /// All products, ordered by name.
  async fn list_products(&self) -> StoreResult<Vec<Product>>;

  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>>;

  /// Products for the given ids. Unknown ids are skipped; order is unspecified.
  async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>>;

  async fn insert_product(&self, product: &Product) -> StoreResult<()>;

  /// Joins cart entries with their products, keeping cart order.
  /// Entries whose product no longer exists are dropped.
  async fn resolve_cart(&self, items: &[CartItem]) -> StoreResult<Vec<CartLine>> {
    let ids: Vec<Uuid> = items.iter().map(|item| item.product_id).collect();
    let products = index_by_id(self.find_products(&ids).await?);
    Ok(
      items
        .iter()
        .filter_map(|item| {
          products.get(&item.product_id).map(|product| CartLine {
            product: product.clone(),
            quantity: item.quantity,
          })
        })
        .collect(),
    )
  }

  /// Joins an order's items with the current catalog. Snapshot prices are kept.
  /// An order whose total overflows is a backend error.
  async fn resolve_order(&self, order: Order) -> StoreResult<OrderDetails> {
    let order_id = order.id;
    let ids: Vec<Uuid> = order.items.iter().map(|item| item.product_id).collect();
    let products = index_by_id(self.find_products(&ids).await?);
    let lines = order
      .items
      .iter()
      .map(|item| OrderLine {
        product: products.get(&item.product_id).cloned(),
        quantity: item.quantity,
        price: item.price,
      })
      .collect();
    OrderDetails::new(order, lines)
      .ok_or_else(|| StoreError::from(anyhow::anyhow!("total of stored order {} overflows", order_id)))
  }
}

#[async_trait]
pub trait UserStore: Send + Sync {
  async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

  /// `email` must already be normalized.
  async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

  /// Public profiles for the given ids. Unknown ids are skipped.
  async fn find_profiles(&self, ids: &[Uuid]) -> StoreResult<Vec<UserProfile>>;

  /// Fails with `StoreError::DuplicateEmail` if the email is taken.
  async fn insert_user(&self, user: &User) -> StoreResult<()>;

  /// Replaces the user's cart if the stored version still equals
  /// `expected_version`, and returns the new version.
  /// Fails with `StoreError::VersionConflict` otherwise.
  async fn save_cart(&self, user_id: Uuid, expected_version: i64, items: &[CartItem]) -> StoreResult<i64>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Atomically inserts `order`, empties the owner's cart, appends the order
  /// to the owner's order list and bumps the owner's version.
  /// Fails with `StoreError::VersionConflict` if the owner's version moved.
  async fn place_order(&self, order: &Order, expected_version: i64) -> StoreResult<()>;

  async fn find_order(&self, id: Uuid) -> StoreResult<Option<Order>>;

  /// Orders of one user, oldest first.
  async fn orders_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>>;

  /// Every order, oldest first.
  async fn list_orders(&self) -> StoreResult<Vec<Order>>;
}

/// Everything the services need from a backend.
pub trait Store: CatalogStore + UserStore + OrderStore {}

impl<T> Store for T where T: CatalogStore + UserStore + OrderStore {}

fn index_by_id(products: Vec<Product>) -> HashMap<Uuid, Product> {
  products.into_iter().map(|product| (product.id, product)).collect()
}
