use std::collections::HashSet;

use dashmap::{DashMap, mapref::entry::Entry};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    auth::{AuthError, AuthGate, SignUp, SignedIn, normalize_email},
    models::{
        session::Session,
        user::{Identity, User, default_display_name},
    },
    utils::{
        passwords::{hash_password, verify_password},
        sessions::validate_session,
    },
};

/// In-memory implementation of [`AuthGate`].
///
/// Accounts created with an email listed in `admin_emails` are added to the
/// admin allow-list on signup, which is the only way to get an admin without
/// a database.
pub struct InMemoryAuthGate {
    users: DashMap<String, User>,
    /// email -> user id
    emails: DashMap<String, String>,
    /// token -> session
    sessions: DashMap<String, Session>,
    /// user id -> role
    admins: DashMap<String, String>,
    admin_emails: HashSet<String>,
    session_ttl: Duration,
}

impl InMemoryAuthGate {
    pub fn new(session_ttl: Duration, admin_emails: &[String]) -> Self {
        Self {
            users: DashMap::new(),
            emails: DashMap::new(),
            sessions: DashMap::new(),
            admins: DashMap::new(),
            admin_emails: admin_emails.iter().map(|e| normalize_email(e)).collect(),
            session_ttl,
        }
    }

    pub fn grant_admin(&self, user_id: &str, role: &str) {
        self.admins.insert(user_id.to_string(), role.to_string());
    }

    fn start_session(&self, user: &User) -> Session {
        let now = OffsetDateTime::now_utc();
        let session = Session {
            session_token: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            expires_at: now + self.session_ttl,
        };
        self.sessions
            .insert(session.session_token.clone(), session.clone());
        session
    }
}

#[rocket::async_trait]
impl AuthGate for InMemoryAuthGate {
    async fn sign_up(&self, request: SignUp) -> Result<SignedIn, AuthError> {
        let email = normalize_email(&request.email);
        let id = Uuid::new_v4().to_string();
        let password_hash = hash_password(&request.password)?;

        match self.emails.entry(email.clone()) {
            Entry::Occupied(_) => return Err(AuthError::EmailTaken),
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        let display_name = request
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| default_display_name(&email));
        let user = User::new(id.clone(), email.clone(), password_hash, display_name);
        self.users.insert(id.clone(), user.clone());

        if self.admin_emails.contains(&email) {
            tracing::info!("[InMemoryAuthGate::sign_up] Granting admin to {}", email);
            self.grant_admin(&id, "admin");
        }

        let session = self.start_session(&user);
        Ok(SignedIn {
            user: user.identity(),
            session: session.issued(),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        let user = self
            .emails
            .get(&normalize_email(email))
            .and_then(|id| self.users.get(id.value()).map(|user| user.clone()))
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.start_session(&user);
        Ok(SignedIn {
            user: user.identity(),
            session: session.issued(),
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.remove(token);
        Ok(())
    }

    async fn verify_token(&self, token: &str) -> Result<Identity, AuthError> {
        let session = self.sessions.get(token).map(|entry| entry.clone());
        let session = match validate_session(session) {
            Ok(session) => session,
            Err(reason) => {
                tracing::debug!("[InMemoryAuthGate::verify_token] Rejected token: {}", reason);
                self.sessions.remove(token);
                return Err(AuthError::InvalidToken);
            }
        };

        self.users
            .get(&session.user_id)
            .map(|user| user.identity())
            .ok_or(AuthError::InvalidToken)
    }

    async fn admin_role(&self, user_id: &str) -> Result<Option<String>, AuthError> {
        Ok(self.admins.get(user_id).map(|role| role.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> InMemoryAuthGate {
        InMemoryAuthGate::new(Duration::days(30), &["Admin@Example.com".to_string()])
    }

    fn sign_up(email: &str) -> SignUp {
        SignUp {
            email: email.to_string(),
            password: "secret1".to_string(),
            name: None,
        }
    }

    #[tokio::test]
    async fn signup_issues_a_verifiable_session() {
        let gate = gate();
        let signed_in = gate.sign_up(sign_up("reader@example.com")).await.unwrap();
        assert_eq!(signed_in.user.name.as_deref(), Some("reader"));
        assert_eq!(signed_in.session.token_type, "bearer");

        let identity = gate
            .verify_token(&signed_in.session.access_token)
            .await
            .unwrap();
        assert_eq!(identity.id, signed_in.user.id);
        assert!(!gate.is_admin(&identity).await);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let gate = gate();
        gate.sign_up(sign_up("reader@example.com")).await.unwrap();
        let again = gate.sign_up(sign_up(" Reader@Example.com ")).await;
        assert!(matches!(again, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn sign_in_checks_password() {
        let gate = gate();
        gate.sign_up(sign_up("reader@example.com")).await.unwrap();

        assert!(gate.sign_in("reader@example.com", "secret1").await.is_ok());
        assert!(matches!(
            gate.sign_in("reader@example.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            gate.sign_in("nobody@example.com", "secret1").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn sign_out_revokes_the_token() {
        let gate = gate();
        let token = gate
            .sign_up(sign_up("reader@example.com"))
            .await
            .unwrap()
            .session
            .access_token;

        gate.sign_out(&token).await.unwrap();
        assert!(matches!(
            gate.verify_token(&token).await,
            Err(AuthError::InvalidToken)
        ));
        gate.sign_out(&token).await.unwrap();
    }

    #[tokio::test]
    async fn expired_sessions_fail_verification() {
        let gate = InMemoryAuthGate::new(Duration::seconds(-1), &[]);
        let token = gate
            .sign_up(sign_up("reader@example.com"))
            .await
            .unwrap()
            .session
            .access_token;
        assert!(matches!(
            gate.verify_token(&token).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn configured_admin_emails_are_granted_on_signup() {
        let gate = gate();
        let admin = gate.sign_up(sign_up("admin@example.com")).await.unwrap();
        assert_eq!(
            gate.admin_role(&admin.user.id).await.unwrap().as_deref(),
            Some("admin")
        );
        assert!(gate.is_admin(&admin.user).await);
    }
}
