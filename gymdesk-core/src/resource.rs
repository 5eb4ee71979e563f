//! Generic CRUD over `/api/<collection>[/<id>]`.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinSet;

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::models::Validate;

/// A record type owned by the backend under `/api/<COLLECTION>`.
pub trait Entity: Serialize + DeserializeOwned + Validate + Send + Sync + 'static {
    /// Path segment, e.g. `"office-bookings"`.
    const COLLECTION: &'static str;
    /// Human-readable singular, used in messages.
    const LABEL: &'static str;

    fn id(&self) -> Option<&str>;
}

/// Typed handle for one collection. Obtain with [`ApiClient::resources`].
pub struct Resources<'a, T> {
    client: &'a ApiClient,
    _entity: PhantomData<T>,
}

impl ApiClient {
    pub fn resources<T: Entity>(&self) -> Resources<'_, T> {
        Resources {
            client: self,
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Resources<'_, T> {
    fn collection_url(&self) -> url::Url {
        self.client.endpoint(["api", T::COLLECTION])
    }

    fn record_url(&self, id: &str) -> url::Url {
        self.client.endpoint(["api", T::COLLECTION, id])
    }

    pub async fn list(&self) -> ApiResult<Vec<T>> {
        self.client.get_json(self.collection_url()).await
    }

    /// List with query-string filters, e.g. `[("restaurant_id", "r1")]`.
    pub async fn list_where(&self, filters: &[(&str, &str)]) -> ApiResult<Vec<T>> {
        self.client
            .get_json_query(self.collection_url(), filters)
            .await
    }

    pub async fn get(&self, id: &str) -> ApiResult<T> {
        self.client.get_json(self.record_url(id)).await
    }

    pub async fn create(&self, record: &T) -> ApiResult<T> {
        record.validate()?;
        self.client.post_json(self.collection_url(), record).await
    }

    pub async fn update(&self, id: &str, record: &T) -> ApiResult<T> {
        record.validate()?;
        self.client.put_json(self.record_url(id), record).await
    }

    /// Update using the record's own id.
    pub async fn save(&self, record: &T) -> ApiResult<T> {
        let id = record.id().ok_or_else(|| {
            ApiError::Invalid(format!("Cannot update a {} without an id", T::LABEL))
        })?;
        self.update(id, record).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(self.record_url(id)).await
    }

    /// Delete several records concurrently.
    ///
    /// Each id gets its own outcome, in completion order. There is no
    /// atomicity: some deletes may succeed while others fail.
    pub async fn delete_many(&self, ids: &[String]) -> Vec<(String, ApiResult<()>)> {
        let mut set = JoinSet::new();

        for id in ids {
            let client = self.client.clone();
            let id = id.clone();
            set.spawn(async move {
                let result = client.resources::<T>().delete(&id).await;
                (id, result)
            });
        }

        join_all(set).await
    }
}

/// Drain a JoinSet of `(id, result)` pairs. A panicked task is reported
/// as an `Invalid` error against an unknown id.
pub(crate) async fn join_all<R: 'static>(
    mut set: JoinSet<(String, ApiResult<R>)>,
) -> Vec<(String, ApiResult<R>)> {
    let mut results = Vec::with_capacity(set.len());

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(pair) => results.push(pair),
            Err(e) => results.push((String::new(), Err(ApiError::Invalid(format!("task failed: {}", e))))),
        }
    }

    results
}
