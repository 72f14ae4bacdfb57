// core/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order_item::{OrderItem, OrderLine};
use super::user::UserProfile;

/// A placed order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub items: Vec<OrderItem>,
  pub address: String,
  pub card_holder: String,
  /// Last four digits of the card. The full number is never stored.
  pub card_last4: String,
  pub created_at: DateTime<Utc>,
}

impl Order {
  /// Sum of snapshot price times quantity. `None` if the sum overflows.
  pub fn total(&self) -> Option<Decimal> {
    self.items.iter().try_fold(Decimal::ZERO, |total, item| {
      item
        .price
        .checked_mul(Decimal::from(item.quantity))
        .and_then(|line_total| total.checked_add(line_total))
    })
  }
}

/// Payment and shipping data supplied when placing an order.
#[derive(Clone, Deserialize)]
pub struct CheckoutDetails {
  pub address: String,
  pub card_holder: String,
  pub card_number: String,
}

impl CheckoutDetails {
  /// Keeps only the last four digits of the card number.
  pub fn card_last4(&self) -> String {
    let digits: Vec<char> = self.card_number.chars().filter(|c| c.is_ascii_digit()).collect();
    let start = digits.len().saturating_sub(4);
    digits[start..].iter().collect()
  }
}

impl std::fmt::Debug for CheckoutDetails {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CheckoutDetails")
      .field("address", &self.address)
      .field("card_holder", &self.card_holder)
      .field("card_number", &format_args!("**** {}", self.card_last4()))
      .finish()
  }
}

/// An order with its line items resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetails {
  pub id: Uuid,
  pub user_id: Uuid,
  pub lines: Vec<OrderLine>,
  pub total: Decimal,
  pub address: String,
  pub card_holder: String,
  pub card_last4: String,
  pub created_at: DateTime<Utc>,
}

impl OrderDetails {
  /// `None` if the order total overflows.
  pub fn new(order: Order, lines: Vec<OrderLine>) -> Option<Self> {
    let total = order.total()?;
    Some(Self {
      id: order.id,
      user_id: order.user_id,
      lines,
      total,
      address: order.address,
      card_holder: order.card_holder,
      card_last4: order.card_last4,
      created_at: order.created_at,
    })
  }
}

/// Back-office view: an order together with its owner's profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderWithOwner {
  pub order: OrderDetails,
  pub owner: Option<UserProfile>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn details(card_number: &str) -> CheckoutDetails {
    CheckoutDetails {
      address: "1 Main St".to_string(),
      card_holder: "Jane Doe".to_string(),
      card_number: card_number.to_string(),
    }
  }

  #[test]
  fn card_last4_ignores_separators() {
    assert_eq!(details("4242 4242-4242 1234").card_last4(), "1234");
  }

  #[test]
  fn card_last4_handles_short_numbers() {
    assert_eq!(details("12").card_last4(), "12");
    assert_eq!(details("").card_last4(), "");
  }

  #[test]
  fn debug_output_masks_card_number() {
    let rendered = format!("{:?}", details("4000123412341234"));
    assert!(!rendered.contains("4000123412341234"));
    assert!(rendered.contains("**** 1234"));
  }

  #[test]
  fn total_multiplies_snapshot_prices() {
    let order = Order {
      id: Uuid::new_v4(),
      user_id: Uuid::new_v4(),
      items: vec![
        OrderItem {
          product_id: Uuid::new_v4(),
          quantity: 2,
          price: Decimal::new(1050, 2),
        },
        OrderItem {
          product_id: Uuid::new_v4(),
          quantity: 1,
          price: Decimal::new(399, 2),
        },
      ],
      address: "1 Main St".to_string(),
      card_holder: "Jane Doe".to_string(),
      card_last4: "1234".to_string(),
      created_at: Utc::now(),
    };
    assert_eq!(order.total(), Some(Decimal::new(2499, 2)));
  }

  #[test]
  fn total_overflow_is_reported() {
    let order = Order {
      id: Uuid::new_v4(),
      user_id: Uuid::new_v4(),
      items: vec![OrderItem {
        product_id: Uuid::new_v4(),
        quantity: 2,
        price: Decimal::MAX,
      }],
      address: "1 Main St".to_string(),
      card_holder: "Jane Doe".to_string(),
      card_last4: "1234".to_string(),
      created_at: Utc::now(),
    };
    assert_eq!(order.total(), None);
    assert!(OrderDetails::new(order, Vec::new()).is_none());
  }
}
