// server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use eterna::models::CheckoutDetails;

fn validate_checkout(details: &CheckoutDetails) -> Result<(), AppError> {
  if details.address.trim().is_empty() || details.card_holder.trim().is_empty() {
    return Err(AppError::Validation("Address and card holder are required.".to_string()));
  }
  if details.card_last4().len() < 4 {
    return Err(AppError::Validation("Card number must contain at least four digits.".to_string()));
  }
  Ok(())
}

#[instrument(name = "handler::create_order", skip(app_state, req_payload, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutDetails>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let details = req_payload.into_inner();
  validate_checkout(&details)?;

  let order_id = app_state.services.orders.create_order(auth_user.user_id, details).await?;
  info!(%order_id, "Order created.");

  Ok(HttpResponse::Created().json(json!({
      "message": "Order placed successfully.",
      "order_id": order_id,
  })))
}

#[instrument(name = "handler::list_user_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_user_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state
    .services
    .orders
    .user_orders(auth_user.user_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found.", auth_user.user_id)))?;
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(
    name = "handler::get_user_order",
    skip(app_state, path, auth_user),
    fields(user_id = %auth_user.user_id, order_id = %path.as_ref())
)]
pub async fn get_user_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  match app_state.services.orders.order_for_user(order_id, auth_user.user_id).await? {
    Some(order) => Ok(HttpResponse::Ok().json(order)),
    None => {
      // Someone else's order looks the same as a missing one.
      warn!("Order {} not found for caller.", order_id);
      Err(AppError::NotFound(format!("Order with ID {} not found.", order_id)))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn details(card_number: &str) -> CheckoutDetails {
    CheckoutDetails {
      address: "1 Main St".to_string(),
      card_holder: "Ada Lovelace".to_string(),
      card_number: card_number.to_string(),
    }
  }

  #[test]
  fn checkout_needs_enough_card_digits() {
    assert!(validate_checkout(&details("4111 1111 1111 1111")).is_ok());
    assert!(matches!(validate_checkout(&details("12")), Err(AppError::Validation(_))));
    assert!(matches!(validate_checkout(&details("abcd-efgh")), Err(AppError::Validation(_))));
  }

  #[test]
  fn checkout_needs_address() {
    let mut input = details("4111111111111111");
    input.address = "  ".to_string();
    assert!(matches!(validate_checkout(&input), Err(AppError::Validation(_))));
  }
}
