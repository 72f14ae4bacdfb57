// server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use eterna::{ShopError, StoreError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  /// Sign-in with an unknown email or a wrong password.
  #[error("Wrong e-mail or password")]
  WrongCredentials,

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Email is already registered")]
  EmailTaken,

  #[error("Cart is empty")]
  EmptyCart,

  #[error("Concurrent modification: {0}")]
  Contention(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Database Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("Internal Server Error: {0}")]
  Internal(String), // For miscellaneous errors
}

impl AppError {
  /// Machine readable code sent in the `error` field of the response body.
  pub fn code(&self) -> &'static str {
    match self {
      AppError::Validation(_) => "VALIDATION_ERROR",
      AppError::Auth(_) => "UNAUTHENTICATED",
      AppError::WrongCredentials => "WRONG_CREDENTIALS",
      AppError::NotFound(_) => "NOT_FOUND",
      AppError::EmailTaken => "EMAIL_TAKEN",
      AppError::EmptyCart => "EMPTY_CART",
      AppError::Contention(_) => "CONCURRENT_MODIFICATION",
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Migrate(_) | AppError::Internal(_) => "INTERNAL_ERROR",
    }
  }
}

impl From<ShopError> for AppError {
  fn from(err: ShopError) -> Self {
    match err {
      ShopError::NotFound { .. } => AppError::NotFound(err.to_string()),
      ShopError::EmailTaken => AppError::EmailTaken,
      ShopError::EmptyCart => AppError::EmptyCart,
      ShopError::InvalidQuantity(_) | ShopError::InvalidPrice(_) | ShopError::TotalOverflow => {
        AppError::Validation(err.to_string())
      }
      ShopError::Contention { .. } => AppError::Contention(err.to_string()),
      ShopError::Hashing(message) => AppError::Internal(message),
      ShopError::Store {
        source: StoreError::VersionConflict { .. },
      } => AppError::Contention(err.to_string()),
      ShopError::Store { source } => AppError::Internal(source.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) | AppError::WrongCredentials => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::EmailTaken | AppError::Contention(_) => StatusCode::CONFLICT,
      AppError::EmptyCart => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Migrate(_) | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      // Log the full error, but keep internals out of the response body
      tracing::error!(application_error = %self, "Responding with error");
      return HttpResponse::build(status).json(json!({
        "error": self.code(),
        "message": "An internal error occurred",
      }));
    }
    tracing::warn!(application_error = %self, "Responding with error");
    HttpResponse::build(status).json(json!({
      "error": self.code(),
      "message": self.to_string(),
    }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use uuid::Uuid;

  #[test]
  fn shop_errors_map_to_http_statuses() {
    let not_found: AppError = ShopError::NotFound {
      entity: "Product",
      id: Uuid::nil(),
    }
    .into();
    assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

    let taken: AppError = ShopError::EmailTaken.into();
    assert_eq!(taken.status_code(), StatusCode::CONFLICT);
    assert_eq!(taken.code(), "EMAIL_TAKEN");

    let empty: AppError = ShopError::EmptyCart.into();
    assert_eq!(empty.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let quantity: AppError = ShopError::InvalidQuantity(0).into();
    assert_eq!(quantity.status_code(), StatusCode::BAD_REQUEST);

    let price: AppError = ShopError::InvalidPrice(rust_decimal::Decimal::new(1, 3)).into();
    assert_eq!(price.status_code(), StatusCode::BAD_REQUEST);

    let overflow: AppError = ShopError::TotalOverflow.into();
    assert_eq!(overflow.code(), "VALIDATION_ERROR");

    let busy: AppError = ShopError::Contention {
      user_id: Uuid::nil(),
      attempts: 3,
    }
    .into();
    assert_eq!(busy.status_code(), StatusCode::CONFLICT);
  }

  #[test]
  fn store_failures_are_internal() {
    let err: AppError = ShopError::from(StoreError::from(anyhow::anyhow!("connection reset"))).into();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.code(), "INTERNAL_ERROR");
  }

  #[test]
  fn wrong_credentials_keeps_its_code() {
    assert_eq!(AppError::WrongCredentials.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::WrongCredentials.code(), "WRONG_CREDENTIALS");
  }
}
