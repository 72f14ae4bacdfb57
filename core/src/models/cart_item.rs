// core/src/models/cart_item.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::Product;

/// One entry of a user's cart. `product_id` is unique within a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
  pub product_id: Uuid,
  pub quantity: i32,
}

impl CartItem {
  pub fn new(product_id: Uuid, quantity: i32) -> Self {
    Self { product_id, quantity }
  }
}

/// A cart entry joined with the product it references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
  pub product: Product,
  pub quantity: i32,
}

/// Result of replacing a cart entry's quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartUpdate {
  pub cart: Vec<CartLine>,
  /// True when no entry existed for the product and one was appended.
  pub created: bool,
}
