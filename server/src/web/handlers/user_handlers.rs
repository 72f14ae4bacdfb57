// server/src/web/handlers/user_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::current_user", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn current_user_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let profile = app_state
    .services
    .accounts
    .profile(auth_user.user_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found.", auth_user.user_id)))?;
  Ok(HttpResponse::Ok().json(profile))
}
