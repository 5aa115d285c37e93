//! Identity and admin checks.
//!
//! The moderation endpoints only need `verify_token` and `admin_role`; the
//! remaining operations back the `/api/auth` routes.

use serde::Serialize;
use thiserror::Error;

use crate::models::{session::AuthSession, user::Identity};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryAuthGate;
pub use postgres::PgAuthGate;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("User already registered")]
    EmailTaken,

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignedIn {
    pub user: Identity,
    pub session: AuthSession,
}

#[rocket::async_trait]
pub trait AuthGate: Send + Sync {
    async fn sign_up(&self, request: SignUp) -> Result<SignedIn, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AuthError>;

    /// Revokes the session. Unknown tokens are not an error.
    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;

    async fn verify_token(&self, token: &str) -> Result<Identity, AuthError>;

    /// The caller's row in the admin allow-list, if any.
    async fn admin_role(&self, user_id: &str) -> Result<Option<String>, AuthError>;

    async fn is_admin(&self, identity: &Identity) -> bool {
        matches!(self.admin_role(&identity.id).await, Ok(Some(_)))
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(error: argon2::password_hash::Error) -> Self {
        AuthError::PasswordHash(error.to_string())
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
