// core/src/models/user.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cart_item::CartItem;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id: Uuid,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub name: String,
  pub surname: String,
  pub address: String,
  pub birthdate: NaiveDate,
  pub cart_items: Vec<CartItem>,
  pub orders: Vec<Uuid>,
  /// Bumped by every cart or order write. Saves carrying a stale value are rejected.
  pub version: i64,
  pub created_at: DateTime<Utc>,
}

impl User {
  pub fn cart_entry_mut(&mut self, product_id: Uuid) -> Option<&mut CartItem> {
    self.cart_items.iter_mut().find(|item| item.product_id == product_id)
  }

  pub fn profile(&self) -> UserProfile {
    UserProfile {
      id: self.id,
      email: self.email.clone(),
      name: self.name.clone(),
      surname: self.surname.clone(),
      address: self.address.clone(),
      birthdate: self.birthdate,
    }
  }
}

/// The fields of a user that may be shown back to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  pub id: Uuid,
  pub email: String,
  pub name: String,
  pub surname: String,
  pub address: String,
  pub birthdate: NaiveDate,
}

/// Registration input. `password` is plaintext and is hashed before storage.
#[derive(Clone, Deserialize)]
pub struct NewUser {
  pub email: String,
  pub password: String,
  pub name: String,
  pub surname: String,
  pub address: String,
  pub birthdate: NaiveDate,
}

impl std::fmt::Debug for NewUser {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NewUser")
      .field("email", &self.email)
      .field("password", &"[REDACTED]")
      .field("name", &self.name)
      .field("surname", &self.surname)
      .field("address", &self.address)
      .field("birthdate", &self.birthdate)
      .finish()
  }
}

/// Emails are unique regardless of case and surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}
