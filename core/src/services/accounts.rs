// core/src/services/accounts.rs

use crate::error::{ShopError, ShopResult, StoreError};
use crate::hashing::CredentialHasher;
use crate::models::{normalize_email, NewUser, User, UserProfile};
use crate::store::Store;

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Registration, profiles and credential checks.
#[derive(Clone)]
pub struct AccountService {
  store: Arc<dyn Store>,
  hasher: Arc<dyn CredentialHasher>,
}

impl AccountService {
  pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn CredentialHasher>) -> Self {
    Self { store, hasher }
  }

  /// Creates a user with an empty cart. Fails with [`ShopError::EmailTaken`]
  /// if the email is already registered, in which case nothing is written.
  #[instrument(name = "account_service::register", skip(self, new_user), fields(email = %new_user.email), err(Display))]
  pub async fn register(&self, new_user: NewUser) -> ShopResult<Uuid> {
    let email = normalize_email(&new_user.email);
    if self.store.find_user_by_email(&email).await?.is_some() {
      warn!("Registration rejected: email already in use.");
      return Err(ShopError::EmailTaken);
    }

    let user = User {
      id: Uuid::new_v4(),
      email,
      password_hash: self.hasher.hash(&new_user.password)?,
      name: new_user.name,
      surname: new_user.surname,
      address: new_user.address,
      birthdate: new_user.birthdate,
      cart_items: Vec::new(),
      orders: Vec::new(),
      version: 0,
      created_at: Utc::now(),
    };

    match self.store.insert_user(&user).await {
      Ok(()) => {
        info!(user_id = %user.id, "User registered.");
        Ok(user.id)
      }
      // Lost a race with a concurrent registration for the same email.
      Err(StoreError::DuplicateEmail { .. }) => Err(ShopError::EmailTaken),
      Err(e) => Err(e.into()),
    }
  }

  #[instrument(name = "account_service::profile", skip(self), err(Display))]
  pub async fn profile(&self, user_id: Uuid) -> ShopResult<Option<UserProfile>> {
    Ok(self.store.find_user(user_id).await?.map(|user| user.profile()))
  }

  /// Returns the user's id when `password` matches the stored digest for
  /// `email`, `None` otherwise. Issues no session or token.
  #[instrument(name = "account_service::check_credentials", skip(self, password), err(Display))]
  pub async fn check_credentials(&self, email: &str, password: &str) -> ShopResult<Option<Uuid>> {
    let Some(user) = self.store.find_user_by_email(&normalize_email(email)).await? else {
      debug!("No user registered with this email.");
      return Ok(None);
    };

    if self.hasher.verify(password, &user.password_hash)? {
      Ok(Some(user.id))
    } else {
      debug!(user_id = %user.id, "Password mismatch.");
      Ok(None)
    }
  }
}
