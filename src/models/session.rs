use serde::{Deserialize, Serialize};
use sqlx::{Error, Row, postgres::PgRow};
use time::OffsetDateTime;

use crate::{
    database::traits::DatabaseResource,
    utils::{
        sessions::Expiring,
        time::{deserialize_offset_date_time, serialize_offset_date_time},
    },
};

#[derive(Debug, Clone)]
pub struct Session {
    pub session_token: String,
    pub user_id: String,
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// The part of the session handed back to the client.
    pub fn issued(&self) -> AuthSession {
        AuthSession {
            access_token: self.session_token.clone(),
            token_type: "bearer".to_string(),
            user_id: self.user_id.clone(),
            expires_at: self.expires_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: String,
    pub user_id: String,

    #[serde(
        serialize_with = "serialize_offset_date_time",
        deserialize_with = "deserialize_offset_date_time"
    )]
    pub expires_at: OffsetDateTime,
}

impl DatabaseResource for Session {
    fn from_row(row: &PgRow) -> Result<Self, Error> {
        Ok(Session {
            session_token: row.try_get("session_token")?,
            user_id: row.try_get("user_id")?,
            expires_at: row.try_get("expires_at")?,
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
        true
    }
}

impl Expiring for Session {
    fn expires_at(&self) -> OffsetDateTime {
        self.expires_at
    }
}
