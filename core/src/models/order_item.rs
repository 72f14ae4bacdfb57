// core/src/models/order_item.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::Product;

/// Line item of an order. `price` is the product price at purchase time and
/// does not follow later catalog changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
  pub product_id: Uuid,
  pub quantity: i32,
  pub price: Decimal,
}

/// An order item joined with the current catalog entry, if it still exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
  pub product: Option<Product>,
  pub quantity: i32,
  pub price: Decimal,
}
