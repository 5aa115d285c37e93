//! Database Value Types
//!
//! `DatabaseValue` is the single bind type used by the query macros. Every
//! variant is sent to PostgreSQL as text; the SQL placeholder carries the cast
//! that turns it into the column type.

use sqlx::postgres::PgArgumentBuffer;
use sqlx::{Encode, Postgres, Type, encode::IsNull, error::BoxDynError};
use std::fmt::{self, Display};
use time::OffsetDateTime;

use crate::utils::time::to_rfc3339;

/// A value bound into a generated statement.
///
/// # Variants
///
/// - `None` - SQL NULL
/// - `String(String)` - VARCHAR or TEXT column value
/// - `DateTime(String)` - RFC 3339 timestamp, cast to TIMESTAMPTZ
/// - `Json(String)` - serialized JSON document, cast to JSONB
///
/// # Examples
///
/// ```rust
/// let value: DatabaseValue = "Pending".into();
/// let value: DatabaseValue = OffsetDateTime::now_utc().into();
/// let value: DatabaseValue = serde_json::json!([12.97, 77.59]).into();
/// let value: DatabaseValue = Option::<String>::None.into();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseValue {
    None,
    String(String),
    DateTime(String),
    Json(String),
}

impl DatabaseValue {
    /// Renders the placeholder for the `index`th bind parameter, including
    /// the cast required by this variant.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            DatabaseValue::None | DatabaseValue::String(_) => format!("${}", index),
            DatabaseValue::DateTime(_) => format!("CAST(${} AS TIMESTAMPTZ)", index),
            DatabaseValue::Json(_) => format!("CAST(${} AS JSONB)", index),
        }
    }
}

impl Display for DatabaseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl<'q> Encode<'q, Postgres> for DatabaseValue {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        match self {
            DatabaseValue::None => Ok(IsNull::Yes),
            DatabaseValue::String(s)
            | DatabaseValue::DateTime(s)
            | DatabaseValue::Json(s) => Encode::<Postgres>::encode_by_ref(s, buf),
        }
    }
}

impl Type<Postgres> for DatabaseValue {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("text")
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        let text_oids = [25, 1043, 1042, 19];
        ty.oid()
            .map(|oid| text_oids.contains(&oid.0))
            .unwrap_or(false)
    }
}

impl From<Option<String>> for DatabaseValue {
    fn from(s: Option<String>) -> Self {
        s.map(DatabaseValue::String).unwrap_or(DatabaseValue::None)
    }
}

impl From<&str> for DatabaseValue {
    fn from(s: &str) -> Self {
        DatabaseValue::String(s.to_string())
    }
}

impl From<String> for DatabaseValue {
    fn from(s: String) -> Self {
        DatabaseValue::String(s)
    }
}

impl From<&'_ String> for DatabaseValue {
    fn from(s: &'_ String) -> Self {
        DatabaseValue::String(s.clone())
    }
}

impl From<OffsetDateTime> for DatabaseValue {
    fn from(dt: OffsetDateTime) -> Self {
        DatabaseValue::DateTime(to_rfc3339(dt))
    }
}

impl From<serde_json::Value> for DatabaseValue {
    fn from(value: serde_json::Value) -> Self {
        DatabaseValue::Json(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn placeholders_carry_casts() {
        assert_eq!(DatabaseValue::from("x").placeholder(1), "$1");
        assert_eq!(DatabaseValue::None.placeholder(2), "$2");
        assert_eq!(
            DatabaseValue::from(datetime!(2025-01-01 0:00 UTC)).placeholder(3),
            "CAST($3 AS TIMESTAMPTZ)"
        );
        assert_eq!(DatabaseValue::from(json!([])).placeholder(4), "CAST($4 AS JSONB)");
    }

    #[test]
    fn missing_option_is_null() {
        assert_eq!(DatabaseValue::from(Option::<String>::None), DatabaseValue::None);
        assert_eq!(
            DatabaseValue::from(Some("open late".to_string())),
            DatabaseValue::String("open late".into())
        );
    }

    #[test]
    fn timestamps_and_json_are_serialized() {
        assert_eq!(
            DatabaseValue::from(datetime!(2025-01-01 8:30 UTC)),
            DatabaseValue::DateTime("2025-01-01T08:30:00Z".into())
        );
        assert_eq!(
            DatabaseValue::from(json!(["wifi", "ac"])),
            DatabaseValue::Json(r#"["wifi","ac"]"#.into())
        );
    }
}
