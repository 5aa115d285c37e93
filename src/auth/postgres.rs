use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    auth::{AuthError, AuthGate, SignUp, SignedIn, normalize_email},
    delete_resource_where_fields, find_one_resource_where_fields, insert_resource,
    models::{
        admin_user::AdminUser,
        session::Session,
        user::{Identity, User, default_display_name},
    },
    utils::{
        passwords::{hash_password, verify_password},
        sessions::validate_session,
    },
};

/// Accounts, sessions and the admin allow-list kept in PostgreSQL.
pub struct PgAuthGate {
    pool: PgPool,
    session_ttl: Duration,
}

impl PgAuthGate {
    pub fn new(pool: PgPool, session_ttl: Duration) -> Self {
        Self { pool, session_ttl }
    }

    async fn start_session(&self, user: &User) -> Result<Session, AuthError> {
        let params = vec![
            ("user_id", user.id.clone().into()),
            ("session_token", Uuid::new_v4().to_string().into()),
            (
                "expires_at",
                (OffsetDateTime::now_utc() + self.session_ttl).into(),
            ),
        ];
        Ok(insert_resource!(&self.pool, Session, params).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        match find_one_resource_where_fields!(&self.pool, User, vec![("email", email.into())]).await
        {
            Ok(user) => Ok(Some(user)),
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn purge_session(&self, token: &str) {
        let params = vec![("session_token", token.into())];
        if let Err(e) = delete_resource_where_fields!(&self.pool, Session, params).await {
            tracing::warn!("[PgAuthGate::purge_session] Failed to delete session: {:?}", e);
        }
    }
}

#[rocket::async_trait]
impl AuthGate for PgAuthGate {
    async fn sign_up(&self, request: SignUp) -> Result<SignedIn, AuthError> {
        let email = normalize_email(&request.email);
        if self.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let display_name = request
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| default_display_name(&email));
        let params = vec![
            ("email", email.clone().into()),
            ("display_name", display_name.into()),
            ("password_hash", hash_password(&request.password)?.into()),
        ];
        let user = match insert_resource!(&self.pool, User, params).await {
            Ok(user) => user,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(AuthError::EmailTaken);
            }
            Err(e) => return Err(e.into()),
        };

        let session = self.start_session(&user).await?;
        tracing::info!("[PgAuthGate::sign_up] Registered user {}", user.id);
        Ok(SignedIn {
            user: user.identity(),
            session: session.issued(),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        let user = self
            .find_user_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.start_session(&user).await?;
        Ok(SignedIn {
            user: user.identity(),
            session: session.issued(),
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let params = vec![("session_token", token.into())];
        let deleted = delete_resource_where_fields!(&self.pool, Session, params).await?;
        tracing::debug!("[PgAuthGate::sign_out] Deleted {} session(s)", deleted);
        Ok(())
    }

    async fn verify_token(&self, token: &str) -> Result<Identity, AuthError> {
        let params = vec![("session_token", token.into())];
        let session = match find_one_resource_where_fields!(&self.pool, Session, params).await {
            Ok(session) => Some(session),
            Err(sqlx::Error::RowNotFound) => None,
            Err(e) => return Err(e.into()),
        };

        let session = match validate_session(session) {
            Ok(session) => session,
            Err(reason) => {
                tracing::debug!("[PgAuthGate::verify_token] Rejected token: {}", reason);
                self.purge_session(token).await;
                return Err(AuthError::InvalidToken);
            }
        };

        match find_one_resource_where_fields!(
            &self.pool,
            User,
            vec![("id", session.user_id.into())]
        )
        .await
        {
            Ok(user) => Ok(user.identity()),
            Err(sqlx::Error::RowNotFound) => Err(AuthError::InvalidToken),
            Err(e) => Err(e.into()),
        }
    }

    async fn admin_role(&self, user_id: &str) -> Result<Option<String>, AuthError> {
        match find_one_resource_where_fields!(&self.pool, AdminUser, vec![("id", user_id.into())])
            .await
        {
            Ok(admin) => {
                tracing::debug!("[PgAuthGate::admin_role] {} is {}", admin.id, admin.role);
                Ok(Some(admin.role))
            }
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
