//! Resource storage.
//!
//! `ResourceStore` is the seam between the HTTP handlers and the table that
//! holds submissions. Two implementations exist: PostgreSQL for deployments
//! and an in-memory map used when no database is configured (and by tests).

use thiserror::Error;

use crate::models::resource::{NewResource, Resource, ResourceStatus};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryResourceStore;
pub use postgres::PgResourceStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched. For transitions this also covers rows that exist but
    /// are no longer in the expected state.
    #[error("resource not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row filters for listings. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceFilter {
    pub status: Option<ResourceStatus>,
    pub category: Option<String>,
    pub pincode: Option<String>,
    /// Case-insensitive substring of name or address.
    pub search: Option<String>,
}

impl ResourceFilter {
    pub fn with_status(status: ResourceStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        if self.status.is_some_and(|status| status != resource.status) {
            return false;
        }
        if let Some(category) = &self.category {
            if resource.category.as_str() != category {
                return false;
            }
        }
        if let Some(pincode) = &self.pincode {
            if resource.pincode.as_deref() != Some(pincode.as_str()) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !resource.name.to_lowercase().contains(&needle)
                && !resource.address.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

#[rocket::async_trait]
pub trait ResourceStore: Send + Sync {
    /// All rows matching the filter, newest first.
    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, StoreError>;

    async fn get(&self, id: &str) -> Result<Resource, StoreError>;

    /// Stores a submission with status `Pending` and returns the stored row.
    async fn insert(&self, resource: NewResource) -> Result<Resource, StoreError>;

    /// Atomically moves the resource from `from` to `to`. Returns
    /// [`StoreError::NotFound`] when the id is unknown or the row is not in
    /// state `from` at the time of the write.
    async fn transition(
        &self,
        id: &str,
        from: ResourceStatus,
        to: ResourceStatus,
    ) -> Result<Resource, StoreError>;
}
