//! Delete Macros for Database Operations

/// Deletes the resources matching the specified field conditions.
///
/// # Arguments
/// * `$pool` - `&PgPool` to run the statement on
/// * `$resource` - The resource type (must implement DatabaseResource)
/// * `$params` - Vector of `(&str, DatabaseValue)` tuples for field conditions;
///   must not be empty
///
/// # Returns
/// `Result<u64, sqlx::Error>` - number of deleted rows
///
/// # Example
/// ```rust
/// let params = vec![("session_token", token.into())];
/// delete_resource_where_fields!(&pool, Session, params).await?;
/// ```
///
/// ## Generated SQL
/// ```sql
/// DELETE FROM sessions WHERE session_token = $1
/// ```
#[macro_export]
macro_rules! delete_resource_where_fields {
    ($pool:expr, $resource:ty, $params:expr) => {{
        use crate::database::{clauses::push_conditions, values::DatabaseValue};
        use crate::utils::strings::table_name;

        let pool: &sqlx::PgPool = $pool;
        let params: Vec<(&str, DatabaseValue)> = $params;
        async move {
            if params.is_empty() {
                return Err(sqlx::Error::Protocol(
                    "refusing to delete without conditions".to_string(),
                ));
            }

            let mut query = format!("DELETE FROM {} WHERE ", table_name(stringify!($resource)));
            let mut binds: Vec<DatabaseValue> = Vec::new();
            push_conditions(&mut query, &params, &mut binds);

            let mut query = sqlx::query(&query);
            for value in binds.iter() {
                query = query.bind(value);
            }

            match query.execute(pool).await {
                Ok(result) => Ok(result.rows_affected()),
                Err(e) => Err(e),
            }
        }
    }};
}
