// server/src/state.rs
use eterna::Services;

/// Shared with every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
  pub services: Services,
}

impl AppState {
  pub fn new(services: Services) -> Self {
    Self { services }
  }
}
