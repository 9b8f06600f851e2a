//! Entry store that resolves the owning category before every write.
//!
//! The backing store cannot join entries with categories, so an entry must be
//! sent with its category embedded. The category is always fetched again from
//! `category_id` (the cached copy on the entry is never trusted), and the write
//! only starts once that lookup succeeded.

use std::future::Future;

use api_types::{Category, Entry, ResourceId};

use crate::{
    error::ClientError,
    filter::select_by_month_year,
    resource::{ResourceClient, ResourceStore},
    transport::Transport,
};

/// Awaits `dependency`, then hands its value to `act`.
///
/// A failed dependency is returned as is and `act` never runs.
pub async fn resolve_then<D, R, E, Dep, Act, Fut>(dependency: Dep, act: Act) -> Result<R, E>
where
    Dep: Future<Output = Result<D, E>>,
    Act: FnOnce(D) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let resolved = dependency.await?;
    act(resolved).await
}

#[derive(Clone, Debug)]
pub struct EntryService<A> {
    entries: ResourceClient<Entry, A>,
    categories: ResourceClient<Category, A>,
}

impl<A: Transport> EntryService<A> {
    pub fn new(transport: A) -> Self {
        Self {
            entries: ResourceClient::for_resource(transport.clone()),
            categories: ResourceClient::for_resource(transport),
        }
    }

    pub async fn list(&self) -> Result<Vec<Entry>, ClientError> {
        self.entries.list().await
    }

    pub async fn get_by_id(&self, id: ResourceId) -> Result<Entry, ClientError> {
        self.entries.get_by_id(id).await
    }

    pub async fn create(&self, entry: Entry) -> Result<Entry, ClientError> {
        resolve_then(self.category(entry.category_id), |category| async move {
            let entry = Entry {
                category: Some(category),
                ..entry
            };
            self.entries.create(&entry).await
        })
        .await
    }

    pub async fn update(&self, entry: Entry) -> Result<Entry, ClientError> {
        if entry.id.is_none() {
            return Err(ClientError::MissingReference { field: "id" });
        }
        resolve_then(self.category(entry.category_id), |category| async move {
            let entry = Entry {
                category: Some(category),
                ..entry
            };
            self.entries.update(entry).await
        })
        .await
    }

    pub async fn delete(&self, id: ResourceId) -> Result<(), ClientError> {
        self.entries.delete(id).await
    }

    /// All entries dated within `month` (1-12) of `year`.
    pub async fn get_by_month_and_year(
        &self,
        month: u32,
        year: i32,
    ) -> Result<Vec<Entry>, ClientError> {
        let entries = self.entries.list().await?;
        Ok(select_by_month_year(&entries, month, year))
    }

    async fn category(&self, category_id: Option<ResourceId>) -> Result<Category, ClientError> {
        let category_id = category_id.ok_or(ClientError::MissingReference {
            field: "categoryId",
        })?;
        self.categories.get_by_id(category_id).await.inspect_err(|err| {
            tracing::warn!("category {category_id} lookup failed, entry not written: {err}");
        })
    }
}

impl<A: Transport> ResourceStore<Entry> for EntryService<A> {
    async fn get_by_id(&self, id: ResourceId) -> Result<Entry, ClientError> {
        EntryService::get_by_id(self, id).await
    }

    async fn create(&self, resource: Entry) -> Result<Entry, ClientError> {
        EntryService::create(self, resource).await
    }

    async fn update(&self, resource: Entry) -> Result<Entry, ClientError> {
        EntryService::update(self, resource).await
    }

    async fn delete(&self, id: ResourceId) -> Result<(), ClientError> {
        EntryService::delete(self, id).await
    }
}
