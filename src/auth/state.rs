//! Authentication state trait.

use crate::jwt::JwtConfig;

/// Trait for router state types that can verify bearer tokens.
pub trait HasAuthBackend {
    fn jwt(&self) -> &JwtConfig;
}
