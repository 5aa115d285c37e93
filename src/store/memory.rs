use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    models::resource::{NewResource, Resource, ResourceStatus},
    store::{ResourceFilter, ResourceStore, StoreError},
};

#[derive(Clone, Debug)]
struct StoredResource {
    /// Insertion order, breaks ties between equal `created_at` values.
    seq: u64,
    resource: Resource,
}

/// In-memory implementation of [`ResourceStore`].
///
/// Transitions take the entry's write lock for the check and the write, so
/// concurrent moderation of one id behaves like the conditional UPDATE of
/// the PostgreSQL store.
#[derive(Default)]
pub struct InMemoryResourceStore {
    rows: DashMap<String, StoredResource>,
    next_seq: AtomicU64,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[rocket::async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, StoreError> {
        let mut rows = self
            .rows
            .iter()
            .filter(|entry| filter.matches(&entry.resource))
            .map(|entry| entry.value().clone())
            .collect::<Vec<StoredResource>>();

        rows.sort_by(|a, b| {
            b.resource
                .created_at
                .cmp(&a.resource.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(rows.into_iter().map(|row| row.resource).collect())
    }

    async fn get(&self, id: &str) -> Result<Resource, StoreError> {
        self.rows
            .get(id)
            .map(|entry| entry.resource.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, resource: NewResource) -> Result<Resource, StoreError> {
        let id = Uuid::new_v4().to_string();
        let resource = resource.into_resource(id.clone(), OffsetDateTime::now_utc());
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);

        self.rows.insert(
            id,
            StoredResource {
                seq,
                resource: resource.clone(),
            },
        );
        tracing::debug!("[InMemoryResourceStore::insert] Stored resource {}", resource.id);
        Ok(resource)
    }

    async fn transition(
        &self,
        id: &str,
        from: ResourceStatus,
        to: ResourceStatus,
    ) -> Result<Resource, StoreError> {
        match self.rows.get_mut(id) {
            Some(mut entry) if entry.resource.status == from => {
                entry.resource.status = to;
                entry.resource.updated_at = OffsetDateTime::now_utc();
                Ok(entry.resource.clone())
            }
            _ => Err(StoreError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::resource::{Category, Coordinates, Cost};

    fn submission(name: &str, category: Category, pincode: Option<&str>) -> NewResource {
        NewResource {
            name: name.to_string(),
            category,
            address: format!("{} Street", name),
            pincode: pincode.map(str::to_string),
            coordinates: Coordinates(12.9, 77.6),
            hours: None,
            facilities: Vec::new(),
            cost: Cost::Free,
            contact: None,
            description: None,
            user_id: "u-1".to_string(),
            submitted_by: "reader@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn inserted_rows_are_pending_and_listed_newest_first() {
        let store = InMemoryResourceStore::new();
        let first = store
            .insert(submission("First", Category::Libraries, None))
            .await
            .unwrap();
        let second = store
            .insert(submission("Second", Category::Libraries, None))
            .await
            .unwrap();
        assert_eq!(first.status, ResourceStatus::Pending);

        let pending = store
            .list(&ResourceFilter::with_status(ResourceStatus::Pending))
            .await
            .unwrap();
        let ids = pending.iter().map(|r| r.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    }

    #[tokio::test]
    async fn filters_combine() {
        let store = InMemoryResourceStore::new();
        for (name, category, pincode) in [
            ("Central Library", Category::Libraries, Some("560001")),
            ("Lakeside Library", Category::Libraries, Some("560002")),
            ("Hotspot", Category::PublicWifi, Some("560001")),
        ] {
            let resource = store
                .insert(submission(name, category, pincode))
                .await
                .unwrap();
            store
                .transition(&resource.id, ResourceStatus::Pending, ResourceStatus::Approved)
                .await
                .unwrap();
        }

        let filter = ResourceFilter {
            status: Some(ResourceStatus::Approved),
            category: Some("Libraries".into()),
            pincode: Some("560001".into()),
            search: None,
        };
        let found = store.list(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Central Library");

        let filter = ResourceFilter {
            status: Some(ResourceStatus::Approved),
            search: Some("LIBRARY".into()),
            ..Default::default()
        };
        assert_eq!(store.list(&filter).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn transition_only_applies_from_expected_state() {
        let store = InMemoryResourceStore::new();
        let resource = store
            .insert(submission("Reading Room", Category::Libraries, None))
            .await
            .unwrap();

        let rejected = store
            .transition(&resource.id, ResourceStatus::Pending, ResourceStatus::Rejected)
            .await
            .unwrap();
        assert_eq!(rejected.status, ResourceStatus::Rejected);

        let again = store
            .transition(&resource.id, ResourceStatus::Pending, ResourceStatus::Approved)
            .await;
        assert!(matches!(again, Err(StoreError::NotFound)));
        assert_eq!(
            store.get(&resource.id).await.unwrap().status,
            ResourceStatus::Rejected
        );

        let missing = store
            .transition("no-such-id", ResourceStatus::Pending, ResourceStatus::Approved)
            .await;
        assert!(matches!(missing, Err(StoreError::NotFound)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_moderators_have_exactly_one_winner() {
        let store = Arc::new(InMemoryResourceStore::new());
        for _ in 0..50 {
            let resource = store
                .insert(submission("Contested", Category::BookBanks, None))
                .await
                .unwrap();

            let approve = {
                let store = store.clone();
                let id = resource.id.clone();
                tokio::spawn(async move {
                    store
                        .transition(&id, ResourceStatus::Pending, ResourceStatus::Approved)
                        .await
                })
            };
            let reject = {
                let store = store.clone();
                let id = resource.id.clone();
                tokio::spawn(async move {
                    store
                        .transition(&id, ResourceStatus::Pending, ResourceStatus::Rejected)
                        .await
                })
            };

            let (approve, reject) = (approve.await.unwrap(), reject.await.unwrap());
            let winner = match (approve, reject) {
                (Ok(won), Err(StoreError::NotFound)) | (Err(StoreError::NotFound), Ok(won)) => {
                    won.status
                }
                other => panic!("expected exactly one winner, got {:?}", other),
            };
            assert_eq!(store.get(&resource.id).await.unwrap().status, winner);
        }
    }
}
