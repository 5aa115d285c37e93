//! Database Resource Traits
//!
//! Every model handled by the query macros implements `DatabaseResource`.
//! The flags tell the macros which bookkeeping columns to fill in.

use sqlx::{Error, postgres::PgRow};

/// Trait that must be implemented by any struct used with database macros.
///
/// # Example Implementation
///
/// ```rust
/// impl DatabaseResource for AdminUser {
///     fn from_row(row: &PgRow) -> Result<Self, Error> {
///         Ok(AdminUser {
///             id: row.try_get("id")?,
///             role: row.try_get("role")?,
///         })
///     }
///
///     fn has_id() -> bool { false }
///     fn is_creatable() -> bool { false }
///     fn is_updatable() -> bool { false }
///     fn is_expirable() -> bool { false }
/// }
/// ```
pub trait DatabaseResource {
    /// Converts a database row to the implementing struct.
    fn from_row(row: &PgRow) -> Result<Self, Error>
    where
        Self: Sized;

    /// Whether inserts generate a UUID v4 `id`.
    fn has_id() -> bool;

    /// Whether inserts set `created_at`. Listings of creatable resources are
    /// returned newest first.
    fn is_creatable() -> bool;

    /// Whether inserts and updates set `updated_at`.
    fn is_updatable() -> bool;

    /// Whether inserts set `expires_at` when the caller did not supply one.
    /// The default lifetime is 30 days.
    fn is_expirable() -> bool;
}
