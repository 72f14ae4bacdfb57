// core/src/store/memory.rs

//! In-process [`Store`](super::Store) backed by hash maps.
//!
//! Lock guards are blocking and are never held across an `.await`.

use super::{CatalogStore, OrderStore, UserStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{CartItem, Order, Product, User, UserProfile};

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{event, Level};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
  products: HashMap<Uuid, Product>,
  users: HashMap<Uuid, User>,
  user_ids_by_email: HashMap<String, Uuid>,
  orders: HashMap<Uuid, Order>,
  // Insertion order of `orders`.
  order_sequence: Vec<Uuid>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl CatalogStore for MemoryStore {
  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    let mut products: Vec<Product> = self.tables.read().products.values().cloned().collect();
    products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    Ok(products)
  }

  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
    Ok(self.tables.read().products.get(&id).cloned())
  }

  async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>> {
    let tables = self.tables.read();
    Ok(ids.iter().filter_map(|id| tables.products.get(id).cloned()).collect())
  }

  async fn insert_product(&self, product: &Product) -> StoreResult<()> {
    self.tables.write().products.insert(product.id, product.clone());
    Ok(())
  }
}

#[async_trait]
impl UserStore for MemoryStore {
  async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
    Ok(self.tables.read().users.get(&id).cloned())
  }

  async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
    let tables = self.tables.read();
    Ok(
      tables
        .user_ids_by_email
        .get(email)
        .and_then(|id| tables.users.get(id))
        .cloned(),
    )
  }

  async fn find_profiles(&self, ids: &[Uuid]) -> StoreResult<Vec<UserProfile>> {
    let tables = self.tables.read();
    Ok(ids.iter().filter_map(|id| tables.users.get(id)).map(User::profile).collect())
  }

  async fn insert_user(&self, user: &User) -> StoreResult<()> {
    let mut tables = self.tables.write();
    if tables.user_ids_by_email.contains_key(&user.email) {
      return Err(StoreError::DuplicateEmail {
        email: user.email.clone(),
      });
    }
    tables.user_ids_by_email.insert(user.email.clone(), user.id);
    tables.users.insert(user.id, user.clone());
    Ok(())
  }

  async fn save_cart(&self, user_id: Uuid, expected_version: i64, items: &[CartItem]) -> StoreResult<i64> {
    let mut tables = self.tables.write();
    let user = tables
      .users
      .get_mut(&user_id)
      .ok_or_else(|| anyhow::anyhow!("user {} vanished while saving cart", user_id))?;
    if user.version != expected_version {
      event!(Level::DEBUG, %user_id, expected_version, actual_version = user.version, "Rejecting stale cart save.");
      return Err(StoreError::VersionConflict {
        user_id,
        expected: expected_version,
      });
    }
    user.cart_items = items.to_vec();
    user.version += 1;
    Ok(user.version)
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn place_order(&self, order: &Order, expected_version: i64) -> StoreResult<()> {
    let mut tables = self.tables.write();
    let user = tables
      .users
      .get_mut(&order.user_id)
      .ok_or_else(|| anyhow::anyhow!("user {} vanished while placing order", order.user_id))?;
    if user.version != expected_version {
      return Err(StoreError::VersionConflict {
        user_id: order.user_id,
        expected: expected_version,
      });
    }
    user.cart_items.clear();
    user.orders.push(order.id);
    user.version += 1;
    tables.orders.insert(order.id, order.clone());
    tables.order_sequence.push(order.id);
    Ok(())
  }

  async fn find_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
    Ok(self.tables.read().orders.get(&id).cloned())
  }

  async fn orders_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
    let tables = self.tables.read();
    let Some(user) = tables.users.get(&user_id) else {
      return Ok(Vec::new());
    };
    Ok(user.orders.iter().filter_map(|id| tables.orders.get(id)).cloned().collect())
  }

  async fn list_orders(&self) -> StoreResult<Vec<Order>> {
    let tables = self.tables.read();
    Ok(
      tables
        .order_sequence
        .iter()
        .filter_map(|id| tables.orders.get(id))
        .cloned()
        .collect(),
    )
  }
}
