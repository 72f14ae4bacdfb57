// tests/config_tests.rs

use eterna_server::config::AppConfig;
use eterna_server::errors::AppError;
use serial_test::serial;
use std::env;

const VARS: [&str; 5] = ["SERVER_HOST", "SERVER_PORT", "DATABASE_URL", "CART_WRITE_RETRIES", "SEED_DB"];

fn clear_vars() {
  for var in VARS {
    env::remove_var(var);
  }
}

#[test]
#[serial]
fn from_env_reads_process_environment() {
  clear_vars();
  env::set_var("SERVER_HOST", "0.0.0.0");
  env::set_var("SERVER_PORT", "9090");
  env::set_var("CART_WRITE_RETRIES", "7");
  env::set_var("SEED_DB", "true");

  let config = AppConfig::from_env().unwrap();
  clear_vars();

  assert_eq!(config.bind_address(), "0.0.0.0:9090");
  assert_eq!(config.cart_write_retries, 7);
  assert!(config.seed_db);
}

#[test]
#[serial]
fn from_env_rejects_malformed_port() {
  clear_vars();
  env::set_var("SERVER_PORT", "not-a-port");

  let result = AppConfig::from_env();
  clear_vars();

  assert!(matches!(result, Err(AppError::Config(_))));
}
