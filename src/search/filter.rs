//! Feature-type and spatial restrictions applied after ranking.

use std::ops::RangeInclusive;
use std::str::FromStr;

use hashbrown::HashMap;

use super::ranking::ScoredCandidate;
use super::request::QuerySpec;
use crate::address::AddressResolver;
use crate::error::{SearchError, StoreError};
use crate::models::{Place, PlaceId};
use crate::store::PlaceStore;

/// Country code of each candidate, inherited along its containment chain.
pub type CountryCodes = HashMap<PlaceId, String>;

/// Coarse category a caller may restrict results to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureType {
    Country,
    State,
    City,
    Settlement,
}

impl FeatureType {
    /// Place ranks belonging to this category.
    pub fn rank_band(&self) -> RangeInclusive<u8> {
        match self {
            FeatureType::Country => 4..=4,
            FeatureType::State => 8..=8,
            FeatureType::City => 14..=16,
            FeatureType::Settlement => 8..=20,
        }
    }

    /// `place=*` types that belong to this category whatever their rank.
    fn place_types(&self) -> &'static [&'static str] {
        match self {
            FeatureType::Country => &["country"],
            FeatureType::State => &["state"],
            FeatureType::City => &["city"],
            FeatureType::Settlement => &["city", "town", "village", "hamlet"],
        }
    }

    pub fn matches(&self, place: &Place) -> bool {
        self.rank_band().contains(&place.place_rank)
            || (place.class == "place" && self.place_types().contains(&place.place_type.as_str()))
    }
}

impl FromStr for FeatureType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "country" => Ok(FeatureType::Country),
            "state" => Ok(FeatureType::State),
            "city" => Ok(FeatureType::City),
            "settlement" => Ok(FeatureType::Settlement),
            _ => Err(SearchError::invalid_parameter(
                "featureType",
                s,
                "expected one of country, state, city, settlement",
            )),
        }
    }
}

/// Look up the country code each candidate is filtered on. Places without a
/// code of their own take the closest ancestor's. Nothing is looked up unless
/// the request restricts countries.
pub async fn resolve_country_codes<S: PlaceStore + ?Sized>(
    ranked: &[ScoredCandidate],
    spec: &QuerySpec,
    store: &S,
    resolver: &AddressResolver,
) -> Result<CountryCodes, StoreError> {
    let mut codes = CountryCodes::new();
    if spec.country_codes.is_empty() {
        return Ok(codes);
    }
    for scored in ranked {
        let place = &scored.candidate.place;
        if let Some(code) = resolver.country_code(store, place).await? {
            codes.insert(place.id, code);
        }
    }
    Ok(codes)
}

/// Drop ranked candidates the request rules out, keeping relative order.
///
/// A bounded viewbox is never widened: when nothing intersects it the result
/// is empty. Country restrictions read `countries`, see
/// [`resolve_country_codes`].
pub fn apply(
    ranked: Vec<ScoredCandidate>,
    spec: &QuerySpec,
    countries: &CountryCodes,
) -> Vec<ScoredCandidate> {
    let region = spec.required_region();

    ranked
        .into_iter()
        .filter(|scored| {
            let place = &scored.candidate.place;
            spec.feature_type.map_or(true, |ft| ft.matches(place))
                && region.map_or(true, |bbox| place.intersects_bbox(bbox))
                && !spec.exclude_place_ids.contains(&place.id)
                && (spec.country_codes.is_empty()
                    || countries
                        .get(&place.id)
                        .is_some_and(|cc| spec.country_codes.contains(cc)))
        })
        .collect()
}
