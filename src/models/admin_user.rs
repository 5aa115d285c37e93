use sqlx::{Error, Row, postgres::PgRow};

use crate::database::traits::DatabaseResource;

/// A row of the admin allow-list, keyed by user id.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: String,
    pub role: String,
}

impl DatabaseResource for AdminUser {
    fn from_row(row: &PgRow) -> Result<Self, Error> {
        Ok(AdminUser {
            id: row.try_get("id")?,
            role: row.try_get("role")?,
        })
    }

    fn has_id() -> bool {
        false
    }

    fn is_creatable() -> bool {
        false
    }

    fn is_updatable() -> bool {
        false
    }

    fn is_expirable() -> bool {
        false
    }
}
