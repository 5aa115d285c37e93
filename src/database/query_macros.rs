//! Query Macros for Database Operations
//!
//! Macros for finding and retrieving resources. All of them take the pool as
//! their first argument and work with any struct implementing
//! `DatabaseResource`; the table name is derived from the type name.

/// Finds all resources matching the specified field conditions.
///
/// Creatable resources are returned newest first.
///
/// # Arguments
/// * `$pool` - `&PgPool` to run the query on
/// * `$resource` - The resource type (must implement DatabaseResource)
/// * `$params` - Vector of `(&str, DatabaseValue)` tuples for field conditions
///
/// # Returns
/// `Result<Vec<Resource>, sqlx::Error>`
///
/// # Example
/// ```rust
/// let params = vec![("status", "Pending".into())];
/// let pending = find_all_resources_where_fields!(&pool, Resource, params).await?;
/// ```
#[macro_export]
macro_rules! find_all_resources_where_fields {
    ($pool:expr, $resource:ty, $params:expr) => {{
        use crate::database::{
            clauses::push_conditions, traits::DatabaseResource, values::DatabaseValue,
        };
        use crate::utils::strings::table_name;

        let pool: &sqlx::PgPool = $pool;
        let params: Vec<(&str, DatabaseValue)> = $params;
        async move {
            let mut query = format!("SELECT * FROM {}", table_name(stringify!($resource)));
            let mut binds: Vec<DatabaseValue> = Vec::new();
            if !params.is_empty() {
                query.push_str(" WHERE ");
                push_conditions(&mut query, &params, &mut binds);
            }
            if <$resource as DatabaseResource>::is_creatable() {
                query.push_str(" ORDER BY created_at DESC");
            }

            let mut query = sqlx::query(&query);
            for value in binds.iter() {
                query = query.bind(value);
            }

            match query.fetch_all(pool).await {
                Ok(rows) => rows
                    .iter()
                    .map(|row| <$resource as DatabaseResource>::from_row(row))
                    .collect::<Result<Vec<$resource>, sqlx::Error>>(),
                Err(e) => Err(e),
            }
        }
    }};
}

/// Finds all resources matching the field conditions whose `$like_fields`
/// contain the search term, case-insensitively.
///
/// The term is escaped, so `%` and `_` typed by a user match literally.
///
/// # Arguments
/// * `$pool` - `&PgPool` to run the query on
/// * `$resource` - The resource type (must implement DatabaseResource)
/// * `$params` - Vector of `(&str, DatabaseValue)` tuples for equality conditions
/// * `$like_fields` - Vector of column names, any of which may match
/// * `$search_term` - The substring to look for
///
/// # Example
/// ```rust
/// let params = vec![("status", "Approved".into())];
/// let results = find_all_resources_where_fields_like!(
///     &pool, Resource, params, vec!["name", "address"], "library"
/// ).await?;
/// ```
///
/// ## Generated SQL
/// ```sql
/// SELECT * FROM resources
/// WHERE status = $1 AND (name ILIKE $2 OR address ILIKE $2)
/// ORDER BY created_at DESC
/// ```
#[macro_export]
macro_rules! find_all_resources_where_fields_like {
    ($pool:expr, $resource:ty, $params:expr, $like_fields:expr, $search_term:expr) => {{
        use crate::database::{
            clauses::{push_conditions, push_like_any},
            traits::DatabaseResource,
            values::DatabaseValue,
        };
        use crate::utils::strings::{escape_like, table_name};

        let pool: &sqlx::PgPool = $pool;
        let params: Vec<(&str, DatabaseValue)> = $params;
        let like_fields: Vec<&str> = $like_fields;
        let pattern = format!("%{}%", escape_like($search_term));
        async move {
            let mut query = format!(
                "SELECT * FROM {} WHERE ",
                table_name(stringify!($resource))
            );
            let mut binds: Vec<DatabaseValue> = Vec::new();
            if !params.is_empty() {
                push_conditions(&mut query, &params, &mut binds);
                query.push_str(" AND ");
            }
            push_like_any(&mut query, &like_fields, pattern, &mut binds);
            if <$resource as DatabaseResource>::is_creatable() {
                query.push_str(" ORDER BY created_at DESC");
            }

            let mut query = sqlx::query(&query);
            for value in binds.iter() {
                query = query.bind(value);
            }

            match query.fetch_all(pool).await {
                Ok(rows) => rows
                    .iter()
                    .map(|row| <$resource as DatabaseResource>::from_row(row))
                    .collect::<Result<Vec<$resource>, sqlx::Error>>(),
                Err(e) => Err(e),
            }
        }
    }};
}

/// Finds a single resource matching the specified field conditions.
///
/// # Returns
/// `Result<Resource, sqlx::Error>`; `sqlx::Error::RowNotFound` when nothing
/// matches.
///
/// # Example
/// ```rust
/// let params = vec![("email", "reader@example.com".into())];
/// let user = find_one_resource_where_fields!(&pool, User, params).await?;
/// ```
#[macro_export]
macro_rules! find_one_resource_where_fields {
    ($pool:expr, $resource:ty, $params:expr) => {{
        use crate::database::{
            clauses::push_conditions, traits::DatabaseResource, values::DatabaseValue,
        };
        use crate::utils::strings::table_name;

        let pool: &sqlx::PgPool = $pool;
        let params: Vec<(&str, DatabaseValue)> = $params;
        async move {
            let mut query = format!("SELECT * FROM {}", table_name(stringify!($resource)));
            let mut binds: Vec<DatabaseValue> = Vec::new();
            if !params.is_empty() {
                query.push_str(" WHERE ");
                push_conditions(&mut query, &params, &mut binds);
            }
            query.push_str(" LIMIT 1");

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
