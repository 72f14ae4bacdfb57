// core/src/hashing.rs

//! Password hashing collaborator used for registration and credential checks.

use crate::error::ShopError;
use argon2::{
  password_hash::{
    rand_core::OsRng, // For generating random salts
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
    SaltString,
  },
  Algorithm, Argon2, Params, Version,
};
use tracing::{debug, error, instrument};

/// Turns plaintext passwords into digests and compares them later.
pub trait CredentialHasher: Send + Sync {
  fn hash(&self, plaintext: &str) -> Result<String, ShopError>;

  /// `Ok(false)` on mismatch. Errors are reserved for unusable digests.
  fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, ShopError>;
}

/// Cost settings for [`Argon2Hasher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
  pub memory_kib: u32,
  pub iterations: u32,
  pub parallelism: u32,
}

impl Default for HashCost {
  fn default() -> Self {
    Self {
      memory_kib: Params::DEFAULT_M_COST,
      iterations: Params::DEFAULT_T_COST,
      parallelism: Params::DEFAULT_P_COST,
    }
  }
}

#[derive(Debug, Clone)]
pub struct Argon2Hasher {
  params: Params,
}

impl Argon2Hasher {
  pub fn new(cost: HashCost) -> Result<Self, ShopError> {
    let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
      .map_err(|e| ShopError::Hashing(format!("Invalid Argon2 cost {:?}: {}", cost, e)))?;
    Ok(Self { params })
  }

  fn argon2(&self) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
  }
}

impl Default for Argon2Hasher {
  fn default() -> Self {
    Self {
      params: Params::default(),
    }
  }
}

impl CredentialHasher for Argon2Hasher {
  #[instrument(name = "hashing::hash", skip_all, err(Display))]
  fn hash(&self, plaintext: &str) -> Result<String, ShopError> {
    if plaintext.is_empty() {
      error!("Password hashing failed: Password cannot be empty.");
      return Err(ShopError::Hashing("Password cannot be empty.".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let digest = self
      .argon2()
      .hash_password(plaintext.as_bytes(), &salt)
      .map_err(|e| ShopError::Hashing(e.to_string()))?;
    debug!("Password hashed successfully.");
    Ok(digest.to_string())
  }

  #[instrument(name = "hashing::verify", skip_all, fields(digest_len = digest.len()), err(Display))]
  fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, ShopError> {
    let parsed = PasswordHash::new(digest).map_err(|e| {
      error!(error = %e, "Failed to parse stored password digest.");
      ShopError::Hashing(format!("Invalid stored password digest: {}", e))
    })?;

    // Parameters are read from the digest itself, so older cost settings still verify.
    match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
      Ok(()) => Ok(true),
      Err(argon2::password_hash::Error::Password) => {
        debug!("Password verification failed: Passwords do not match.");
        Ok(false)
      }
      Err(e) => Err(ShopError::Hashing(e.to_string())),
    }
  }
}
