// server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use eterna::models::NewUser;

// --- Request DTOs ---
#[derive(Deserialize)]
pub struct SignupRequestPayload {
  pub email: String,
  pub password: String,
  pub name: String,
  pub surname: String,
  pub address: String,
  pub birthdate: NaiveDate,
}

impl From<SignupRequestPayload> for NewUser {
  fn from(payload: SignupRequestPayload) -> Self {
    NewUser {
      email: payload.email,
      password: payload.password,
      name: payload.name,
      surname: payload.surname,
      address: payload.address,
      birthdate: payload.birthdate,
    }
  }
}

#[derive(Deserialize)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

fn validate_signup(payload: &SignupRequestPayload) -> Result<(), AppError> {
  let email = payload.email.trim();
  if email.is_empty() || !email.contains('@') {
    return Err(AppError::Validation("A valid email address is required.".to_string()));
  }
  if payload.password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }
  if payload.name.trim().is_empty() || payload.surname.trim().is_empty() {
    return Err(AppError::Validation("Name and surname are required.".to_string()));
  }
  Ok(())
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::signup",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignupRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  validate_signup(&payload)?;

  let user_id = app_state.services.accounts.register(payload.into()).await?;
  info!(%user_id, "Signup successful.");

  Ok(HttpResponse::Created().json(json!({
      "message": "User created successfully.",
      "user_id": user_id,
  })))
}

#[instrument(
    name = "handler::signin",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  match app_state
    .services
    .accounts
    .check_credentials(&req_payload.email, &req_payload.password)
    .await?
  {
    Some(user_id) => {
      info!(%user_id, "Signin successful.");
      Ok(HttpResponse::Ok().json(json!({ "user_id": user_id })))
    }
    None => {
      warn!("Signin rejected.");
      Err(AppError::WrongCredentials)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn payload(email: &str, password: &str) -> SignupRequestPayload {
    SignupRequestPayload {
      email: email.to_string(),
      password: password.to_string(),
      name: "Ada".to_string(),
      surname: "Lovelace".to_string(),
      address: "12 Analytical Row".to_string(),
      birthdate: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
    }
  }

  #[test]
  fn signup_validation_rejects_bad_input() {
    assert!(validate_signup(&payload("ada@example.com", "pw")).is_ok());
    assert!(matches!(validate_signup(&payload("  ", "pw")), Err(AppError::Validation(_))));
    assert!(matches!(validate_signup(&payload("ada.example.com", "pw")), Err(AppError::Validation(_))));
    assert!(matches!(validate_signup(&payload("ada@example.com", "")), Err(AppError::Validation(_))));
  }
}
