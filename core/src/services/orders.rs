// core/src/services/orders.rs

use super::retry_on_version_conflict;
use crate::error::{ShopError, ShopResult};
use crate::models::{CheckoutDetails, Order, OrderDetails, OrderItem, OrderWithOwner};
use crate::store::Store;

use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Turns carts into orders and reads orders back.
#[derive(Clone)]
pub struct OrderService {
  store: Arc<dyn Store>,
  write_retries: usize,
}

impl OrderService {
  pub fn new(store: Arc<dyn Store>, write_retries: usize) -> Self {
    Self { store, write_retries }
  }

  /// Snapshots the user's cart into a new order and empties the cart.
  ///
  /// Prices are copied from the catalog at this instant. The order insert and
  /// the cart reset are one atomic store write.
  #[instrument(name = "order_service::create_order", skip(self, details), err(Display))]
  pub async fn create_order(&self, user_id: Uuid, details: CheckoutDetails) -> ShopResult<Uuid> {
    let details = &details;
    let order_id = retry_on_version_conflict(user_id, self.write_retries, move || async move {
      let user = self
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ShopError::user_not_found(user_id))?;
      if user.cart_items.is_empty() {
        return Err(ShopError::EmptyCart);
      }

      let lines = self.store.resolve_cart(&user.cart_items).await?;
      if lines.len() != user.cart_items.len() {
        warn!(
          %user_id,
          dropped = user.cart_items.len() - lines.len(),
          "Cart references products that no longer exist; leaving them out of the order."
        );
      }
      if lines.is_empty() {
        return Err(ShopError::EmptyCart);
      }

      let order = Order {
        id: Uuid::new_v4(),
        user_id,
        items: lines
          .iter()
          .map(|line| OrderItem {
            product_id: line.product.id,
            quantity: line.quantity,
            price: line.product.price,
          })
          .collect(),
        address: details.address.clone(),
        card_holder: details.card_holder.clone(),
        card_last4: details.card_last4(),
        created_at: Utc::now(),
      };
      if order.total().is_none() {
        warn!(%user_id, "Rejecting order whose total overflows.");
        return Err(ShopError::TotalOverflow);
      }

      self.store.place_order(&order, user.version).await?;
      Ok::<_, ShopError>(order.id)
    })
    .await?;

    info!(%user_id, %order_id, "Order placed.");
    Ok(order_id)
  }

  /// Any order by id.
  #[instrument(name = "order_service::order", skip(self), err(Display))]
  pub async fn order(&self, order_id: Uuid) -> ShopResult<Option<OrderDetails>> {
    match self.store.find_order(order_id).await? {
      Some(order) => Ok(Some(self.store.resolve_order(order).await?)),
      None => Ok(None),
    }
  }

  /// An order by id, only if it belongs to `user_id`.
  #[instrument(name = "order_service::order_for_user", skip(self), err(Display))]
  pub async fn order_for_user(&self, order_id: Uuid, user_id: Uuid) -> ShopResult<Option<OrderDetails>> {
    match self.store.find_order(order_id).await? {
      Some(order) if order.user_id == user_id => Ok(Some(self.store.resolve_order(order).await?)),
      _ => Ok(None),
    }
  }

  /// The user's orders, oldest first. `None` for an unknown user.
  #[instrument(name = "order_service::user_orders", skip(self), err(Display))]
  pub async fn user_orders(&self, user_id: Uuid) -> ShopResult<Option<Vec<OrderDetails>>> {
    if self.store.find_user(user_id).await?.is_none() {
      return Ok(None);
    }
    let mut resolved = Vec::new();
    for order in self.store.orders_for_user(user_id).await? {
      resolved.push(self.store.resolve_order(order).await?);
    }
    Ok(Some(resolved))
  }

  /// Every order with its owner's profile, oldest first.
  #[instrument(name = "order_service::all_orders", skip(self), err(Display))]
  pub async fn all_orders(&self) -> ShopResult<Vec<OrderWithOwner>> {
    let orders = self.store.list_orders().await?;
    let owner_ids: Vec<Uuid> = orders
      .iter()
      .map(|order| order.user_id)
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect();
    let owners: HashMap<Uuid, _> = self
      .store
      .find_profiles(&owner_ids)
      .await?
      .into_iter()
      .map(|profile| (profile.id, profile))
      .collect();

    let mut resolved = Vec::with_capacity(orders.len());
    for order in orders {
      let owner = owners.get(&order.user_id).cloned();
      resolved.push(OrderWithOwner {
        order: self.store.resolve_order(order).await?,
        owner,
      });
    }
    Ok(resolved)
  }
}
