// core/src/models/product.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub price: Decimal,
  pub image: String,
  pub description: String,
}

/// Catalog entry before it is assigned an id.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
  pub name: String,
  pub price: Decimal,
  pub image: String,
  pub description: String,
}

impl NewProduct {
  pub fn into_product(self, id: Uuid) -> Product {
    Product {
      id,
      name: self.name,
      price: self.price,
      image: self.image,
      description: self.description,
    }
  }
}
