//! User-store capability consumed by the auth use cases.
//!
//! The core never talks to SQLite directly; it only sees this trait. The
//! production implementation lives in [`crate::db`].

use std::future::Future;

use serde::Serialize;

/// A stored user record, including the password hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    /// `true` = active, `false` = blocked.
    pub status: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// User as exposed over the API. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub status: bool,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            status: user.status,
        }
    }
}

/// Data for a new user row. `password_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub status: bool,
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a user with this email already exists")]
    Conflict,
    #[error("user not found")]
    NotFound,
    #[error("database error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Persistence contract for user records.
///
/// Errors are returned as-is; callers do not retry.
pub trait UserStore: Send + Sync {
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    fn find_by_id(&self, id: &str) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    fn list(&self) -> impl Future<Output = Result<Vec<User>, StoreError>> + Send;

    fn create(&self, data: NewUser) -> impl Future<Output = Result<User, StoreError>> + Send;

    fn update(
        &self,
        id: &str,
        data: UserUpdate,
    ) -> impl Future<Output = Result<User, StoreError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}
