//! In-memory Place Store backed by an R-tree and an inverted token index.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use geo::Contains;
use hashbrown::HashMap;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::info;

use super::PlaceStore;
use crate::error::StoreError;
use crate::models::{GeoBbox, GeoPoint, Place, PlaceId, PlaceRecord};
use crate::text;

/// Wrapper for R-tree indexing of places
#[derive(Clone)]
struct IndexedPlace {
    place: Arc<Place>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedPlace {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PointDistance for IndexedPlace {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        if let Some(geometry) = &self.place.geometry {
            if geometry.contains(&geo_types::Point::new(point[0], point[1])) {
                return 0.0;
            }
        }
        self.envelope.distance_2(point)
    }
}

impl IndexedPlace {
    fn new(place: Arc<Place>) -> Self {
        let bbox = place.bbox;
        Self {
            place,
            envelope: AABB::from_corners([bbox.min_lon, bbox.min_lat], [bbox.max_lon, bbox.max_lat]),
        }
    }
}

/// Place store held entirely in memory
pub struct MemoryPlaceStore {
    tree: RTree<IndexedPlace>,
    by_id: HashMap<PlaceId, Arc<Place>>,
    /// Normalized name token -> places carrying it
    tokens: HashMap<String, Vec<PlaceId>>,
}

impl MemoryPlaceStore {
    /// Build the store from place records
    pub fn build(places: Vec<Place>) -> Self {
        info!("Building in-memory place store for {} places...", places.len());

        let mut by_id = HashMap::new();
        let mut tokens: HashMap<String, Vec<PlaceId>> = HashMap::new();

        for place in places {
            let mut own_tokens: Vec<String> = place
                .names
                .values()
                .flat_map(|name| text::tokens(name))
                .collect();
            own_tokens.sort();
            own_tokens.dedup();
            for token in own_tokens {
                tokens.entry(token).or_default().push(place.id);
            }
            by_id.insert(place.id, Arc::new(place));
        }

        let indexed: Vec<IndexedPlace> = by_id.values().cloned().map(IndexedPlace::new).collect();
        let tree = RTree::bulk_load(indexed);

        info!(
            "Place store built with {} places and {} distinct tokens",
            tree.size(),
            tokens.len()
        );

        Self {
            tree,
            by_id,
            tokens,
        }
    }

    /// Build from serialized records, rejecting the first malformed one.
    pub fn from_records(records: Vec<PlaceRecord>) -> Result<Self, StoreError> {
        let places = records
            .into_iter()
            .map(Place::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::Backend)?;
        Ok(Self::build(places))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Index tokens equal to `token` or within one edit of it.
    fn matching_tokens<'a>(&'a self, token: &'a str) -> Vec<&'a str> {
        if self.tokens.contains_key(token) {
            return vec![token];
        }
        if token.chars().count() < text::MIN_FUZZY_TOKEN_LEN {
            return Vec::new();
        }
        self.tokens
            .keys()
            .filter(|candidate| text::tokens_close(candidate, token))
            .map(String::as_str)
            .collect()
    }
}

#[async_trait]
impl PlaceStore for MemoryPlaceStore {
    async fn search_tokens(
        &self,
        tokens: &[String],
        region: Option<&GeoBbox>,
        limit: usize,
    ) -> Result<Vec<Arc<Place>>, StoreError> {
        // BTreeMap keeps the scan order independent of hash seeds.
        let mut hits: BTreeMap<PlaceId, usize> = BTreeMap::new();
        for token in tokens {
            for indexed in self.matching_tokens(token) {
                for id in &self.tokens[indexed] {
                    *hits.entry(*id).or_default() += 1;
                }
            }
        }

        let mut places: Vec<(usize, Arc<Place>)> = hits
            .into_iter()
            .filter_map(|(id, count)| self.by_id.get(&id).map(|p| (count, Arc::clone(p))))
            .filter(|(_, place)| region.map_or(true, |r| place.intersects_bbox(r)))
            .collect();

        places.sort_by(|(ca, a), (cb, b)| {
            cb.cmp(ca)
                .then_with(|| b.importance.total_cmp(&a.importance))
                .then_with(|| a.id.cmp(&b.id))
        });
        places.truncate(limit);

        Ok(places.into_iter().map(|(_, place)| place).collect())
    }

    async fn search_near(
        &self,
        point: GeoPoint,
        limit: usize,
    ) -> Result<Vec<Arc<Place>>, StoreError> {
        Ok(self
            .tree
            .nearest_neighbor_iter(&[point.lon, point.lat])
            .take(limit)
            .map(|ip| Arc::clone(&ip.place))
            .collect())
    }

    async fn get(&self, id: PlaceId) -> Result<Option<Arc<Place>>, StoreError> {
        Ok(self.by_id.get(&id).cloned())
    }
}
