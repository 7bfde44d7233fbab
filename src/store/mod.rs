//! Place Store collaborator contract.
//!
//! The search pipeline only ever reads through [`PlaceStore`]. Storage layout,
//! index maintenance and retries are the implementation's concern.

mod memory;
mod timed;

#[cfg(test)]
pub(crate) mod fixtures;

pub use memory::MemoryPlaceStore;
pub use timed::TimedStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{GeoBbox, GeoPoint, Place, PlaceId};

#[async_trait]
pub trait PlaceStore: Send + Sync {
    /// Places whose names share at least one token (exactly or within one edit)
    /// with `tokens`. When `region` is set only places intersecting it are returned.
    async fn search_tokens(
        &self,
        tokens: &[String],
        region: Option<&GeoBbox>,
        limit: usize,
    ) -> Result<Vec<Arc<Place>>, StoreError>;

    /// Places closest to `point`, places whose geometry contains it first.
    async fn search_near(
        &self,
        point: GeoPoint,
        limit: usize,
    ) -> Result<Vec<Arc<Place>>, StoreError>;

    /// Lookup by id, used to walk containment chains.
    async fn get(&self, id: PlaceId) -> Result<Option<Arc<Place>>, StoreError>;
}
