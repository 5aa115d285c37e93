use serde_json::json;
use sqlx::PgPool;

use crate::{
    database::values::DatabaseValue,
    find_all_resources_where_fields, find_all_resources_where_fields_like,
    find_one_resource_where_fields, insert_resource,
    models::resource::{NewResource, Resource, ResourceStatus},
    store::{ResourceFilter, ResourceStore, StoreError},
    update_resource_where_fields,
};

/// Resources kept in the `resources` table.
pub struct PgResourceStore {
    pool: PgPool,
}

impl PgResourceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn not_found_or(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        e => StoreError::Database(e),
    }
}

type Fields = Vec<(&'static str, DatabaseValue)>;

/// Assignments and conditions for moving `id` from `from` to `to`. The
/// expected status is a condition of the same statement.
fn transition_fields(id: &str, from: ResourceStatus, to: ResourceStatus) -> (Fields, Fields) {
    (
        vec![("status", to.as_str().into())],
        vec![("id", id.into()), ("status", from.as_str().into())],
    )
}

#[rocket::async_trait]
impl ResourceStore for PgResourceStore {
    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, StoreError> {
        let mut params: Vec<(&str, DatabaseValue)> = Vec::new();
        if let Some(status) = filter.status {
            params.push(("status", status.as_str().into()));
        }
        if let Some(category) = &filter.category {
            params.push(("category", category.into()));
        }
        if let Some(pincode) = &filter.pincode {
            params.push(("pincode", pincode.into()));
        }

        let resources = match &filter.search {
            Some(search) => {
                find_all_resources_where_fields_like!(
                    &self.pool,
                    Resource,
                    params,
                    vec!["name", "address"],
                    search
                )
                .await?
            }
            None => find_all_resources_where_fields!(&self.pool, Resource, params).await?,
        };
        Ok(resources)
    }

    async fn get(&self, id: &str) -> Result<Resource, StoreError> {
        find_one_resource_where_fields!(&self.pool, Resource, vec![("id", id.into())])
            .await
            .map_err(not_found_or)
    }

    async fn insert(&self, resource: NewResource) -> Result<Resource, StoreError> {
        let params: Vec<(&str, DatabaseValue)> = vec![
            ("name", resource.name.into()),
            ("category", resource.category.as_str().into()),
            ("address", resource.address.into()),
            ("pincode", resource.pincode.into()),
            (
                "coordinates",
                json!([resource.coordinates.latitude(), resource.coordinates.longitude()])
                    .into(),
            ),
            ("hours", resource.hours.into()),
            ("facilities", json!(resource.facilities).into()),
            ("cost", resource.cost.as_str().into()),
            ("contact", resource.contact.into()),
            ("description", resource.description.into()),
            ("status", ResourceStatus::Pending.as_str().into()),
            ("user_id", resource.user_id.into()),
            ("submitted_by", resource.submitted_by.into()),
        ];

        let resource = insert_resource!(&self.pool, Resource, params).await?;
        tracing::info!(
            "[PgResourceStore::insert] Stored resource {} from {}",
            resource.id,
            resource.user_id
        );
        Ok(resource)
    }

    async fn transition(
        &self,
        id: &str,
        from: ResourceStatus,
        to: ResourceStatus,
    ) -> Result<Resource, StoreError> {
        let (params, conditions) = transition_fields(id, from, to);
        update_resource_where_fields!(&self.pool, Resource, params, conditions)
        .await
        .map_err(not_found_or)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        database::clauses::{stamp_updated_at, update_statement},
        utils::strings::table_name,
    };
    use time::macros::datetime;

    #[test]
    fn transition_is_one_conditional_update() {
        let (mut params, conditions) =
            transition_fields("r-1", ResourceStatus::Pending, ResourceStatus::Approved);
        stamp_updated_at(&mut params, datetime!(2025-01-01 8:30 UTC));
        let (query, binds) = update_statement(&table_name("Resource"), &params, &conditions);
        assert_eq!(
            query,
            "UPDATE resources SET status = $1, updated_at = CAST($2 AS TIMESTAMPTZ) \
             WHERE id = $3 AND status = $4 RETURNING *"
        );
        assert_eq!(
            binds,
            vec![
                DatabaseValue::from("Approved"),
                DatabaseValue::DateTime("2025-01-01T08:30:00Z".into()),
                DatabaseValue::from("r-1"),
                DatabaseValue::from("Pending"),
            ]
        );
    }
}
