//! Generic CRUD client for one resource collection.
//!
//! Every call issues exactly one request and settles exactly once. Nothing is
//! cached or deduplicated between calls.

use std::future::Future;

use api_types::{Resource, ResourceId};
use serde_json::Value;

use crate::{
    error::{ClientError, Operation, TransportError},
    transport::Transport,
};

/// The write side a form needs from a store, whether the store is a plain
/// [`ResourceClient`] or one that enriches the resource before writing.
pub trait ResourceStore<T: Resource>: Send + Sync {
    fn get_by_id(&self, id: ResourceId) -> impl Future<Output = Result<T, ClientError>> + Send;

    fn create(&self, resource: T) -> impl Future<Output = Result<T, ClientError>> + Send;

    fn update(&self, resource: T) -> impl Future<Output = Result<T, ClientError>> + Send;

    fn delete(&self, id: ResourceId) -> impl Future<Output = Result<(), ClientError>> + Send;
}

#[derive(Clone, Debug)]
pub struct ResourceClient<T, A> {
    transport: A,
    path: String,
    from_json: fn(&Value) -> T,
}

impl<T: Resource, A: Transport> ResourceClient<T, A> {
    pub fn new(transport: A, path: impl Into<String>, from_json: fn(&Value) -> T) -> Self {
        Self {
            transport,
            path: path.into(),
            from_json,
        }
    }

    /// Client on `T`'s own collection, hydrating with `T::from_json`.
    pub fn for_resource(transport: A) -> Self {
        Self::new(transport, T::COLLECTION, T::from_json)
    }

    fn member_path(&self, id: ResourceId) -> String {
        format!("{}/{id}", self.path.trim_end_matches('/'))
    }

    /// Every element of the collection, in the order the server sent them.
    pub async fn list(&self) -> Result<Vec<T>, ClientError> {
        let body = self
            .transport
            .get(&self.path)
            .await
            .map_err(|err| ClientError::classify(err, Operation::List, &self.path))?;

        let Value::Array(items) = body else {
            return Err(ClientError::RequestFailed(TransportError::Decode(format!(
                "expected an array from {}",
                self.path
            ))));
        };

        Ok(items.iter().map(|item| (self.from_json)(item)).collect())
    }

    pub async fn get_by_id(&self, id: ResourceId) -> Result<T, ClientError> {
        let path = self.member_path(id);
        let body = self
            .transport
            .get(&path)
            .await
            .map_err(|err| ClientError::classify(err, Operation::Get, &path))?;

        Ok((self.from_json)(&body))
    }

    /// The returned resource is the server's answer, so it carries the
    /// assigned id.
    pub async fn create(&self, resource: &T) -> Result<T, ClientError> {
        tracing::debug!("creating {} on {}", T::LABEL, self.path);
        let body = self
            .transport
            .post(&self.path, &resource.to_json())
            .await
            .map_err(|err| ClientError::classify(err, Operation::Create, &self.path))?;

        Ok((self.from_json)(&body))
    }

    /// Resolves with `resource` itself: the store only acknowledges updates,
    /// so server-side changes made during the update are not seen here.
    pub async fn update(&self, resource: T) -> Result<T, ClientError> {
        let id = resource
            .id()
            .ok_or(ClientError::MissingReference { field: "id" })?;
        let path = self.member_path(id);

        tracing::debug!("updating {} {id}", T::LABEL);
        self.transport
            .put(&path, &resource.to_json())
            .await
            .map_err(|err| ClientError::classify(err, Operation::Update, &path))?;

        Ok(resource)
    }

    pub async fn delete(&self, id: ResourceId) -> Result<(), ClientError> {
        let path = self.member_path(id);

        tracing::debug!("deleting {} {id}", T::LABEL);
        self.transport
            .delete(&path)
            .await
            .map_err(|err| ClientError::classify(err, Operation::Delete, &path))
    }
}

impl<T: Resource, A: Transport> ResourceStore<T> for ResourceClient<T, A> {
    async fn get_by_id(&self, id: ResourceId) -> Result<T, ClientError> {
        ResourceClient::get_by_id(self, id).await
    }

    async fn create(&self, resource: T) -> Result<T, ClientError> {
        ResourceClient::create(self, &resource).await
    }

    async fn update(&self, resource: T) -> Result<T, ClientError> {
        ResourceClient::update(self, resource).await
    }

    async fn delete(&self, id: ResourceId) -> Result<(), ClientError> {
        ResourceClient::delete(self, id).await
    }
}
