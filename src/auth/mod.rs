//! Bearer-token authentication with role and ownership checks.
//!
//! Pipeline: the [`Auth`] extractor verifies the token and yields an
//! [`AuthContext`]; handlers pass that context to a [`RoleAuthorizer`] or
//! [`OwnershipAuthorizer`] before touching the resource.

mod authorize;
mod bearer;
mod errors;
mod extractors;
mod state;
mod types;

pub use authorize::{ADMIN_ROLE, OwnershipAuthorizer, RoleAuthorizer};
pub use bearer::{BEARER_SCHEME, bearer_token};
pub use errors::AuthError;
pub use extractors::{Auth, authenticate};
pub use state::HasAuthBackend;
pub use types::AuthContext;
