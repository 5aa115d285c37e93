//! Insert Macros for Database Operations
//!
//! Creates new resources. Bookkeeping columns are filled in according to the
//! `DatabaseResource` implementation of the target type.

/// Creates a new resource in the database and returns the stored row.
///
/// Automatically handled fields:
/// - `id`: UUID v4 if `has_id()` returns true
/// - `created_at`: now, if `is_creatable()` returns true (overrides input)
/// - `updated_at`: now, if `is_updatable()` returns true (overrides input)
/// - `expires_at`: 30 days from now if `is_expirable()` returns true and the
///   caller did not supply one
///
/// # Arguments
/// * `$pool` - `&PgPool` to run the statement on
/// * `$resource` - The resource type (must implement DatabaseResource)
/// * `$params` - Vector of `(&str, DatabaseValue)` tuples for field values
///
/// # Returns
/// `Result<Resource, sqlx::Error>`
///
/// # Example
/// ```rust
/// let params = vec![
///     ("user_id", user.id.clone().into()),
///     ("session_token", token.into()),
/// ];
/// let session = insert_resource!(&pool, Session, params).await?;
/// ```
///
/// ## Generated SQL
/// ```sql
/// INSERT INTO sessions (user_id, session_token, id, created_at, updated_at, expires_at)
/// VALUES ($1, $2, $3, CAST($4 AS TIMESTAMPTZ), CAST($5 AS TIMESTAMPTZ), CAST($6 AS TIMESTAMPTZ))
/// RETURNING *
/// ```
#[macro_export]
macro_rules! insert_resource {
    ($pool:expr, $resource:ty, $params:expr) => {{
        use crate::database::{
            clauses::push_values, traits::DatabaseResource, values::DatabaseValue,
        };
        use crate::utils::strings::table_name;
        use time::{Duration, OffsetDateTime};
        use uuid::Uuid;

        let pool: &sqlx::PgPool = $pool;
        let input_params: Vec<(&str, DatabaseValue)> = $params;
        async move {
            let now = OffsetDateTime::now_utc();

            let mut params: Vec<(String, DatabaseValue)> = input_params
                .into_iter()
                .map(|(field, value)| (field.to_string(), value))
                .collect();

            {
                let mut set = |field: &str, value: DatabaseValue, overwrite: bool| {
                    match params.iter().position(|(name, _)| name == field) {
                        Some(idx) if overwrite => params[idx].1 = value,
                        Some(_) => (),
                        None => params.push((field.to_string(), value)),
                    }
                };

                if <$resource as DatabaseResource>::has_id() {
                    set("id", Uuid::new_v4().to_string().into(), true);
                }
                if <$resource as DatabaseResource>::is_creatable() {
                    set("created_at", now.into(), true);
                }
                if <$resource as DatabaseResource>::is_updatable() {
                    set("updated_at", now.into(), true);
                }
                if <$resource as DatabaseResource>::is_expirable() {
                    set("expires_at", (now + Duration::days(30)).into(), false);
                }
            }

            let mut query = format!("INSERT INTO {} ", table_name(stringify!($resource)));
            let mut binds: Vec<DatabaseValue> = Vec::new();
            push_values(&mut query, &params, &mut binds);
            query.push_str(" RETURNING *");

            let mut query = sqlx::query(&query);
            for value in binds.iter() {
                query = query.bind(value);
            }

            match query.fetch_one(pool).await {
                Ok(row) => <$resource as DatabaseResource>::from_row(&row),
                Err(e) => {
                    tracing::error!("[insert_resource] Failed to insert row: {:?}", e);
                    Err(e)
                }
            }
        }
    }};
}
