use serde::{Deserialize, Serialize};
use sqlx::{Error, Row, postgres::PgRow};
use time::OffsetDateTime;

use crate::{
    database::traits::DatabaseResource,
    utils::time::{deserialize_offset_date_time, serialize_offset_date_time},
};

/// An account row. Never serialized as is; callers see [`Identity`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn new(id: String, email: String, password_hash: String, display_name: String) -> Self {
        Self {
            id,
            email,
            display_name,
            password_hash,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            name: Some(self.display_name.clone()),
            created_at: self.created_at,
        }
    }
}

/// The verified caller, as reported by the auth gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,

    #[serde(
        serialize_with = "serialize_offset_date_time",
        deserialize_with = "deserialize_offset_date_time"
    )]
    pub created_at: OffsetDateTime,
}

impl Identity {
    /// The label stored as `submitted_by`: email, then display name, then
    /// "Anonymous".
    pub fn submitter_label(&self) -> String {
        [&self.email, &self.name]
            .into_iter()
            .flatten()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .unwrap_or("Anonymous")
            .to_string()
    }
}

/// Display name used when signup does not provide one: the local part of
/// the email address.
pub fn default_display_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

impl DatabaseResource for User {
    fn from_row(row: &PgRow) -> Result<Self, Error> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            display_name: row.try_get("display_name")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn has_id() -> bool {
        true
    }

    fn is_creatable() -> bool {
        true
    }

    fn is_updatable() -> bool {
        true
    }

    fn is_expirable() -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::passwords::{hash_password, verify_password};

    fn identity(email: Option<&str>, name: Option<&str>) -> Identity {
        Identity {
            id: "u-1".into(),
            email: email.map(str::to_string),
            name: name.map(str::to_string),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn submitter_label_prefers_email_then_name() {
        assert_eq!(
            identity(Some("a@example.com"), Some("Asha")).submitter_label(),
            "a@example.com"
        );
        assert_eq!(identity(None, Some("Asha")).submitter_label(), "Asha");
        assert_eq!(identity(Some(""), Some("  ")).submitter_label(), "Anonymous");
        assert_eq!(identity(None, None).submitter_label(), "Anonymous");
    }

    #[test]
    fn new_user_stores_a_hash() {
        let hash = hash_password("secret1").unwrap();
        let user = User::new("u-1".into(), "a@example.com".into(), hash, "Asha".into());
        assert_ne!(user.password_hash, "secret1");
        assert!(verify_password("secret1", &user.password_hash));
        assert_eq!(user.identity().name.as_deref(), Some("Asha"));
    }

    #[test]
    fn display_name_defaults_to_local_part() {
        assert_eq!(default_display_name("asha@example.com"), "asha");
        assert_eq!(default_display_name("no-at-sign"), "no-at-sign");
    }
}
