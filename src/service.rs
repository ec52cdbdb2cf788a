//! Register / login use cases and user management.
//!
//! Both services are generic over a [`UserStore`] and hold only immutable
//! configuration, so one instance is shared by every request.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::auth::{AuthContext, AuthError};
use crate::hash::{CredentialHasher, MAX_SECRET_BYTES};
use crate::jwt::{JwtConfig, TokenClaims};
use crate::store::{NewUser, PublicUser, StoreError, User, UserStore, UserUpdate};

/// Minimum password length applied when none is configured.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Role given to newly registered users when none is configured.
pub const DEFAULT_ROLE: &str = "user";

/// Password rules checked at registration.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl PasswordPolicy {
    pub fn check(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.min_length {
            return Err(AuthError::WeakCredential {
                min_length: self.min_length,
            });
        }
        if password.len() > MAX_SECRET_BYTES {
            return Err(AuthError::OversizedCredential {
                max_bytes: MAX_SECRET_BYTES,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub tokens: AuthTokens,
}

/// Registration, login and token verification.
pub struct AuthService<S> {
    store: S,
    hasher: CredentialHasher,
    /// Verified against when the email is unknown so both login failures
    /// cost one hash verification.
    dummy_hash: String,
    jwt: Arc<JwtConfig>,
    policy: PasswordPolicy,
    default_role: String,
}

impl<S: UserStore> AuthService<S> {
    pub fn new(
        store: S,
        hasher: CredentialHasher,
        jwt: Arc<JwtConfig>,
        policy: PasswordPolicy,
        default_role: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hasher.hash("authgate-absent-user")?;
        Ok(Self {
            store,
            hasher,
            dummy_hash,
            jwt,
            policy,
            default_role: default_role.into(),
        })
    }

    /// Create a new account and issue its first token.
    pub async fn register(&self, req: RegisterRequest, now: u64) -> Result<AuthResponse, AuthError> {
        if self.store.find_by_email(&req.email).await?.is_some() {
            return Err(AuthError::DuplicateCredential);
        }

        self.policy.check(&req.password)?;

        let password_hash = self.hasher.hash_async(req.password).await?;

        let user = self
            .store
            .create(NewUser {
                email: req.email,
                password_hash,
                first_name: req.first_name,
                last_name: req.last_name,
                role: self.default_role.clone(),
                status: true,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration for the same email
                StoreError::Conflict => AuthError::DuplicateCredential,
                other => AuthError::Store(other),
            })?;

        info!(user_id = %user.id, "User registered");
        self.respond(user, now)
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password produce the same error after the same
    /// amount of hashing work.
    pub async fn login(&self, email: &str, password: &str, now: u64) -> Result<AuthResponse, AuthError> {
        let Some(user) = self.store.find_by_email(email).await? else {
            let _ = self
                .hasher
                .verify_async(password.to_string(), self.dummy_hash.clone())
                .await;
            warn!("Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        let valid = self
            .hasher
            .verify_async(password.to_string(), user.password_hash.clone())
            .await?;
        if !valid {
            warn!("Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.status {
            warn!(user_id = %user.id, "Login refused for blocked account");
            return Err(AuthError::Forbidden("Account is blocked"));
        }

        info!(user_id = %user.id, "User logged in");
        self.respond(user, now)
    }

    /// Verify a token presented outside the Authorization header.
    pub fn verify_token(&self, token: &str, now: u64) -> Result<TokenClaims, AuthError> {
        self.jwt.verify(token, now)
    }

    /// Load the current state of the authenticated caller.
    pub async fn current_user(&self, ctx: &AuthContext) -> Result<PublicUser, AuthError> {
        self.store
            .find_by_id(&ctx.user_id)
            .await?
            .map(PublicUser::from)
            .ok_or(AuthError::NotFound("User not found"))
    }

    fn respond(&self, user: User, now: u64) -> Result<AuthResponse, AuthError> {
        let access_token = self
            .jwt
            .issue(&user.id, &user.email, Some(&user.role), now)?;
        Ok(AuthResponse {
            user: PublicUser::from(user),
            tokens: AuthTokens { access_token },
        })
    }
}

/// User management behind the authorization gates.
pub struct UserService<S> {
    store: S,
}

impl<S: UserStore> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<PublicUser>, AuthError> {
        let users = self.store.list().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    pub async fn get(&self, id: &str) -> Result<PublicUser, AuthError> {
        self.store
            .find_by_id(id)
            .await?
            .map(PublicUser::from)
            .ok_or(AuthError::NotFound("User not found"))
    }

    /// Block (`false`) or unblock (`true`) an account.
    pub async fn set_status(&self, id: &str, status: bool) -> Result<PublicUser, AuthError> {
        let update = UserUpdate {
            status: Some(status),
            ..Default::default()
        };
        match self.store.update(id, update).await {
            Ok(user) => {
                info!(user_id = %id, status, "User status changed");
                Ok(PublicUser::from(user))
            }
            Err(StoreError::NotFound) => Err(AuthError::NotFound("User not found")),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), AuthError> {
        match self.store.delete(id).await {
            Ok(()) => {
                info!(user_id = %id, "User deleted");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(AuthError::NotFound("User not found")),
            Err(e) => Err(e.into()),
        }
    }
}
