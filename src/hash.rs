//! Password hashing with bcrypt.
//!
//! Hashing is deliberately slow, so the async wrappers move the work onto
//! tokio's blocking pool instead of stalling the request executor.

use crate::auth::AuthError;

/// bcrypt work factor used when none is configured.
pub const DEFAULT_COST: u32 = 10;

/// bcrypt reads at most this many bytes of a secret. Longer secrets are refused.
pub const MAX_SECRET_BYTES: usize = 72;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// One-way salted hashing and verification of secrets.
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    cost: u32,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl CredentialHasher {
    /// `cost` must be within bcrypt's accepted range (4..=31).
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(AuthError::Internal(format!("Invalid bcrypt cost: {}", cost)));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a secret with a fresh random salt.
    pub fn hash(&self, secret: &str) -> Result<String, AuthError> {
        if secret.len() > MAX_SECRET_BYTES {
            return Err(AuthError::OversizedCredential {
                max_bytes: MAX_SECRET_BYTES,
            });
        }
        bcrypt::hash(secret, self.cost)
            .map_err(|e| AuthError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Check a secret against a stored hash.
    ///
    /// `Ok(false)` means the secret does not match. A hash that cannot be
    /// parsed is an internal error, never a credential failure. A secret too
    /// long to ever have been hashed never matches.
    pub fn verify(&self, secret: &str, hashed: &str) -> Result<bool, AuthError> {
        if secret.len() > MAX_SECRET_BYTES {
            return Ok(false);
        }
        bcrypt::verify(secret, hashed)
            .map_err(|e| AuthError::Internal(format!("Stored password hash is unusable: {}", e)))
    }

    pub async fn hash_async(&self, secret: String) -> Result<String, AuthError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
    }

    pub async fn verify_async(&self, secret: String, hashed: String) -> Result<bool, AuthError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&secret, &hashed))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
    }
}
