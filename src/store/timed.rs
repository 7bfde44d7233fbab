//! Deadline wrapper around a Place Store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::PlaceStore;
use crate::error::StoreError;
use crate::models::{GeoBbox, GeoPoint, Place, PlaceId};

/// Applies a fixed timeout to every call into the wrapped store.
///
/// Expiry surfaces as [`StoreError::Timeout`]; nothing is retried here.
pub struct TimedStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: PlaceStore> TimedStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn guarded<T>(
        &self,
        operation: &str,
        call: impl std::future::Future<Output = Result<T, StoreError>> + Send,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                warn!("Place store {} timed out after {}ms", operation, timeout_ms);
                Err(StoreError::Timeout { timeout_ms })
            }
        }
    }
}

#[async_trait]
impl<S: PlaceStore> PlaceStore for TimedStore<S> {
    async fn search_tokens(
        &self,
        tokens: &[String],
        region: Option<&GeoBbox>,
        limit: usize,
    ) -> Result<Vec<Arc<Place>>, StoreError> {
        self.guarded(
            "token search",
            self.inner.search_tokens(tokens, region, limit),
        )
        .await
    }

    async fn search_near(
        &self,
        point: GeoPoint,
        limit: usize,
    ) -> Result<Vec<Arc<Place>>, StoreError> {
        self.guarded("proximity search", self.inner.search_near(point, limit))
            .await
    }

    async fn get(&self, id: PlaceId) -> Result<Option<Arc<Place>>, StoreError> {
        self.guarded("lookup", self.inner.get(id)).await
    }
}
