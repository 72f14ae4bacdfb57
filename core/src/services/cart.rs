// core/src/services/cart.rs

use super::retry_on_version_conflict;
use crate::error::{ShopError, ShopResult};
use crate::models::{CartItem, CartLine, CartUpdate};
use crate::store::Store;

use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Add, replace and remove entries of a user's cart.
///
/// Every mutation loads the user, edits the cart in memory and saves it back
/// with the version it was loaded at.
#[derive(Clone)]
pub struct CartService {
  store: Arc<dyn Store>,
  write_retries: usize,
}

impl CartService {
  pub fn new(store: Arc<dyn Store>, write_retries: usize) -> Self {
    Self { store, write_retries }
  }

  /// The user's cart joined with product details, or `None` for an unknown user.
  #[instrument(name = "cart_service::cart", skip(self), err(Display))]
  pub async fn cart(&self, user_id: Uuid) -> ShopResult<Option<Vec<CartLine>>> {
    let Some(user) = self.store.find_user(user_id).await? else {
      return Ok(None);
    };
    Ok(Some(self.store.resolve_cart(&user.cart_items).await?))
  }

  /// Adds `quantity` of a product. A product already in the cart has its
  /// quantity increased instead of getting a second entry.
  #[instrument(name = "cart_service::add_product", skip(self), err(Display))]
  pub async fn add_product(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> ShopResult<Vec<CartItem>> {
    ensure_positive(quantity)?;
    self.ensure_product(product_id).await?;

    let items = retry_on_version_conflict(user_id, self.write_retries, move || async move {
      let mut user = self
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ShopError::user_not_found(user_id))?;

      match user.cart_entry_mut(product_id) {
        Some(entry) => {
          entry.quantity = entry
            .quantity
            .checked_add(quantity)
            .ok_or(ShopError::InvalidQuantity(i64::from(entry.quantity) + i64::from(quantity)))?;
        }
        None => user.cart_items.push(CartItem::new(product_id, quantity)),
      }

      self.store.save_cart(user.id, user.version, &user.cart_items).await?;
      Ok::<_, ShopError>(user.cart_items)
    })
    .await?;

    info!(%user_id, %product_id, entries = items.len(), "Product added to cart.");
    Ok(items)
  }

  /// Sets the quantity of a product in the cart, appending the entry if it
  /// is missing. The outcome reports whether an entry was created.
  #[instrument(name = "cart_service::update_item", skip(self), err(Display))]
  pub async fn update_item(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> ShopResult<CartUpdate> {
    ensure_positive(quantity)?;
    self.ensure_product(product_id).await?;

    let (items, created) = retry_on_version_conflict(user_id, self.write_retries, move || async move {
      let mut user = self
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ShopError::user_not_found(user_id))?;

      let created = match user.cart_entry_mut(product_id) {
        Some(entry) => {
          entry.quantity = quantity;
          false
        }
        None => {
          user.cart_items.push(CartItem::new(product_id, quantity));
          true
        }
      };

      self.store.save_cart(user.id, user.version, &user.cart_items).await?;
      Ok::<_, ShopError>((user.cart_items, created))
    })
    .await?;

    info!(%user_id, %product_id, quantity, created, "Cart entry updated.");
    let cart = self.store.resolve_cart(&items).await?;
    Ok(CartUpdate { cart, created })
  }

  /// Removes a product from the cart. Removing a product that is not in the
  /// cart leaves the cart untouched and is not an error.
  #[instrument(name = "cart_service::remove_item", skip(self), err(Display))]
  pub async fn remove_item(&self, user_id: Uuid, product_id: Uuid) -> ShopResult<Vec<CartLine>> {
    let items = retry_on_version_conflict(user_id, self.write_retries, move || async move {
      let mut user = self
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ShopError::user_not_found(user_id))?;

      let before = user.cart_items.len();
      user.cart_items.retain(|item| item.product_id != product_id);
      if user.cart_items.len() != before {
        self.store.save_cart(user.id, user.version, &user.cart_items).await?;
      }
      Ok::<_, ShopError>(user.cart_items)
    })
    .await?;

    Ok(self.store.resolve_cart(&items).await?)
  }

  async fn ensure_product(&self, product_id: Uuid) -> ShopResult<()> {
    match self.store.find_product(product_id).await? {
      Some(_) => Ok(()),
      None => Err(ShopError::product_not_found(product_id)),
    }
  }
}

fn ensure_positive(quantity: i32) -> ShopResult<()> {
  if quantity <= 0 {
    return Err(ShopError::InvalidQuantity(i64::from(quantity)));
  }
  Ok(())
}
