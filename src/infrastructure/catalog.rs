use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::{json, Value};

use crate::domain::errors::CommerceError;
use crate::domain::catalog::{Collection, CollectionProducts, Product};

use super::documents;
use super::models::{CollectionDto, CollectionProductsDto, ProductDetailDto};
use super::session::SessionClient;

type ReadResult = Result<Value, CommerceError>;
type SharedRead = Shared<BoxFuture<'static, ReadResult>>;

/// Identical concurrent reads share one request.
///
/// Entries are keyed by the serialized `{query, variables}` pair and removed
/// as soon as the request settles, successfully or not, so completed results
/// are never served from here.
#[derive(Clone, Default)]
pub struct InflightReads {
    entries: Arc<Mutex<HashMap<String, SharedRead>>>,
}

impl InflightReads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingerprint(query: &str, variables: &Value) -> String {
        json!({ "query": query, "variables": variables }).to_string()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Joins the in-flight request for `key`, or starts one with `start`.
    pub async fn run<F, Fut>(&self, key: String, start: F) -> ReadResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ReadResult> + Send + 'static,
    {
        let shared = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            match entries.get(&key) {
                Some(existing) => {
                    log::debug!("Joining in-flight read");
                    existing.clone()
                }
                None => {
                    let registry = Arc::clone(&self.entries);
                    let evict_key = key.clone();
                    let request = start();
                    let fut = async move {
                        let result = request.await;
                        registry
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .remove(&evict_key);
                        result
                    }
                    .boxed()
                    .shared();
                    entries.insert(key, fut.clone());
                    fut
                }
            }
        };
        shared.await
    }
}

/// Read-only catalog queries with a hard deadline. Identical reads running at
/// the same time share one request.
pub struct CatalogClient {
    client: Arc<SessionClient>,
    deadline: Duration,
    inflight: InflightReads,
}

impl CatalogClient {
    pub fn new(client: Arc<SessionClient>, deadline: Duration) -> Self {
        Self {
            client,
            deadline,
            inflight: InflightReads::new(),
        }
    }

    pub fn inflight(&self) -> &InflightReads {
        &self.inflight
    }

    pub async fn query(&self, query: &'static str, variables: Value) -> ReadResult {
        let key = InflightReads::fingerprint(query, &variables);
        let client = Arc::clone(&self.client);
        let deadline = self.deadline;
        self.inflight
            .run(key, move || async move {
                client.send_with_deadline(query, variables, deadline).await
            })
            .await
    }

    pub async fn collections(&self) -> Result<Vec<Collection>, CommerceError> {
        let data = self.query(documents::COLLECTIONS, json!({})).await?;
        let items = data
            .pointer("/collections/items")
            .cloned()
            .ok_or_else(|| CommerceError::Decode("Invalid response format".to_string()))?;
        let items: Vec<CollectionDto> = serde_json::from_value(items)?;
        Ok(items.into_iter().map(Collection::from).collect())
    }

    /// A collection with its variants; `None` for an unknown slug.
    pub async fn collection_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<CollectionProducts>, CommerceError> {
        let data = self
            .query(documents::COLLECTION_PRODUCTS, json!({ "slug": slug }))
            .await?;
        let dto: Option<CollectionProductsDto> =
            serde_json::from_value(data.get("collection").cloned().unwrap_or(Value::Null))?;
        Ok(dto.map(CollectionProducts::from))
    }

    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, CommerceError> {
        let data = self.query(documents::PRODUCT, json!({ "slug": slug })).await?;
        let dto: Option<ProductDetailDto> =
            serde_json::from_value(data.get("product").cloned().unwrap_or(Value::Null))?;
        Ok(dto.map(Product::from))
    }
}
