//! Address hierarchy resolution.
//!
//! A place's address is built by walking its containment chain through the
//! Place Store: the place itself, then each parent up to the root. Every place
//! on the way contributes at most one [`AddressComponent`], labeled by its
//! [`AddressCategory`]. When two places map to the same label the one closer
//! to the leaf wins. `address_exclude` pairs only drop the place's own
//! component; ancestors of the same class and type still appear.
//!
//! Broken chains (cycles, missing parents, runaway depth) end the walk early.
//! The components gathered so far are kept and the fault is reported next to
//! them; it never fails the search.

use hashbrown::HashSet;
use tracing::{debug, warn};

use crate::error::{DataIntegrityFault, StoreError};
use crate::models::{AddressCategory, AddressComponent, Place, PlaceId};
use crate::store::PlaceStore;

/// Label of the synthesized country code entry.
pub const COUNTRY_CODE_LABEL: &str = "country_code";

/// Address of one result, most specific component first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedAddress {
    pub components: Vec<AddressComponent>,
    /// Set when the containment chain was cut short
    pub fault: Option<DataIntegrityFault>,
}

impl ResolvedAddress {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.components
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.value.as_str())
    }

    pub fn labels(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Per-request inputs to the resolver.
#[derive(Debug, Clone, Copy)]
pub struct AddressOptions<'a> {
    pub languages: &'a [String],
    /// `(class, type)` pairs that never appear as components
    pub exclude: &'a [(String, String)],
}

/// Walks containment chains, bounded by a hop ceiling.
#[derive(Debug, Clone)]
pub struct AddressResolver {
    max_depth: usize,
}

impl AddressResolver {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub async fn resolve<S: PlaceStore + ?Sized>(
        &self,
        store: &S,
        place: &Place,
        options: AddressOptions<'_>,
    ) -> Result<ResolvedAddress, StoreError> {
        let mut builder = Builder::new(options);
        builder.add(place, true);

        let mut visited: HashSet<PlaceId> = HashSet::new();
        visited.insert(place.id);

        let mut child = place.id;
        let mut next = place.parent;
        let mut hops = 0;
        let mut fault = None;

        while let Some(parent_id) = next {
            if visited.contains(&parent_id) {
                fault = Some(DataIntegrityFault::Cycle {
                    origin: place.id,
                    at: parent_id,
                });
                break;
            }
            if hops >= self.max_depth {
                fault = Some(DataIntegrityFault::DepthExceeded {
                    origin: place.id,
                    max_depth: self.max_depth,
                });
                break;
            }

            let Some(parent) = store.get(parent_id).await? else {
                fault = Some(DataIntegrityFault::DanglingParent {
                    child,
                    parent: parent_id,
                });
                break;
            };

            builder.add(&parent, false);
            visited.insert(parent.id);
            child = parent.id;
            next = parent.parent;
            hops += 1;
        }

        if let Some(fault) = &fault {
            warn!("Address of place {} truncated: {}", place.id, fault);
        }

        let components = builder.finish();
        debug!(
            "Resolved {} address components for place {} in {} hops",
            components.len(),
            place.id,
            hops
        );

        Ok(ResolvedAddress { components, fault })
    }

    /// Country code of `place`, inherited from the closest ancestor carrying
    /// one when the place has none. A broken chain just ends the search.
    pub async fn country_code<S: PlaceStore + ?Sized>(
        &self,
        store: &S,
        place: &Place,
    ) -> Result<Option<String>, StoreError> {
        let mut visited: HashSet<PlaceId> = HashSet::new();
        visited.insert(place.id);

        let mut code = place.country_code.clone();
        let mut next = place.parent;
        let mut hops = 0;

        while let (None, Some(parent_id)) = (&code, next) {
            if hops >= self.max_depth || !visited.insert(parent_id) {
                break;
            }
            let Some(parent) = store.get(parent_id).await? else {
                break;
            };
            code = parent.country_code.clone();
            next = parent.parent;
            hops += 1;
        }

        Ok(code)
    }
}

struct Builder<'a> {
    options: AddressOptions<'a>,
    components: Vec<AddressComponent>,
    labels: HashSet<String>,
    country_code: Option<String>,
}

impl<'a> Builder<'a> {
    fn new(options: AddressOptions<'a>) -> Self {
        Self {
            options,
            components: Vec::new(),
            labels: HashSet::new(),
            country_code: None,
        }
    }

    fn add(&mut self, place: &Place, is_self: bool) {
        if self.country_code.is_none() {
            self.country_code = place.country_code.clone();
        }

        let excluded = is_self
            && self.options.exclude.iter().any(|(class, place_type)| {
                *class == place.class && *place_type == place.place_type
            });
        if excluded {
            return;
        }

        let Some(category) =
            AddressCategory::for_place(&place.class, &place.place_type, place.place_rank)
        else {
            return;
        };

        let value = place.localized_name(self.options.languages);
        if value.is_empty() || !self.labels.insert(category.label().to_string()) {
            return;
        }
        self.components.push(AddressComponent::new(
            category.label(),
            value,
            place.place_rank,
        ));
    }

    fn finish(mut self) -> Vec<AddressComponent> {
        if let Some(code) = self.country_code.take() {
            if !self.labels.contains(COUNTRY_CODE_LABEL) {
                self.components
                    .push(AddressComponent::new(COUNTRY_CODE_LABEL, &code, 0));
            }
        }
        self.components
    }
}
