//! Update Macros for Database Operations
//!
//! Updates run as a single `UPDATE ... WHERE ... RETURNING *` statement, so
//! the conditions are checked and the row written atomically.

/// Updates the resources matching `$conditions` and returns the first updated
/// row.
///
/// Because the conditions are part of the same statement, this doubles as a
/// compare-and-set: including the expected current value of a column (for
/// example `("status", "Pending".into())`) means at most one of several racing
/// callers can match.
///
/// - Sets `updated_at` to now if `is_updatable()` returns true
///
/// # Arguments
/// * `$pool` - `&PgPool` to run the statement on
/// * `$resource` - The resource type (must implement DatabaseResource)
/// * `$params` - Vector of `(&str, DatabaseValue)` tuples to assign
/// * `$conditions` - Vector of `(&str, DatabaseValue)` tuples the row must match
///
/// # Returns
/// `Result<Resource, sqlx::Error>`; `sqlx::Error::RowNotFound` when no row
/// matched the conditions.
///
/// # Example
/// ```rust
/// let resource = update_resource_where_fields!(
///     &pool,
///     Resource,
///     vec![("status", "Approved".into())],
///     vec![("id", id.into()), ("status", "Pending".into())]
/// )
/// .await?;
/// ```
///
/// ## Generated SQL
/// ```sql
/// UPDATE resources SET status = $1, updated_at = CAST($2 AS TIMESTAMPTZ)
/// WHERE id = $3 AND status = $4
/// RETURNING *
/// ```
#[macro_export]
macro_rules! update_resource_where_fields {
    ($pool:expr, $resource:ty, $params:expr, $conditions:expr) => {{
        use crate::database::{
            clauses::{stamp_updated_at, update_statement},
            traits::DatabaseResource,
            values::DatabaseValue,
        };
        use crate::utils::strings::table_name;
        use time::OffsetDateTime;

        let pool: &sqlx::PgPool = $pool;
        let mut params: Vec<(&str, DatabaseValue)> = $params;
        let conditions: Vec<(&str, DatabaseValue)> = $conditions;
        async move {
            if <$resource as DatabaseResource>::is_updatable() {
                stamp_updated_at(&mut params, OffsetDateTime::now_utc());
            }

            let (query, binds) =
                update_statement(&table_name(stringify!($resource)), &params, &conditions);

            let mut query = sqlx::query(&query);
            for value in binds.iter() {
                query = query.bind(value);
            }

            match query.fetch_one(pool).await {
                Ok(row) => <$resource as DatabaseResource>::from_row(&row),
                Err(e) => Err(e),
            }
        }
    }};
}
