//! Final result assembly: truncation plus on-demand address and geometry.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::ranking::ScoredCandidate;
use super::request::QuerySpec;
use crate::address::{AddressOptions, AddressResolver, ResolvedAddress};
use crate::config::OutputConfig;
use crate::error::{DataIntegrityFault, StoreError};
use crate::geometry::{format_geometry, GeometryFormat, GeometryPayload};
use crate::models::{AddressComponent, OsmType, Place, PlaceId};
use crate::store::PlaceStore;

/// `(class, type)` → icon file stem.
const ICONS: &[((&str, &str), &str)] = &[
    (("amenity", "restaurant"), "food_restaurant"),
    (("amenity", "cafe"), "food_cafe"),
    (("amenity", "pub"), "food_pub"),
    (("amenity", "bar"), "food_bar"),
    (("amenity", "school"), "education_school"),
    (("amenity", "university"), "education_university"),
    (("amenity", "hospital"), "health_hospital"),
    (("amenity", "pharmacy"), "health_pharmacy"),
    (("amenity", "place_of_worship"), "place_of_worship_unknown3"),
    (("amenity", "post_office"), "amenity_post_office"),
    (("leisure", "park"), "leisure_park"),
    (("leisure", "dog_park"), "leisure_park"),
    (("tourism", "hotel"), "accommodation_hotel2"),
    (("tourism", "museum"), "tourist_museum"),
    (("railway", "station"), "transport_train_station2"),
    (("aeroway", "aerodrome"), "transport_airport2"),
    (("place", "city"), "poi_place_city"),
    (("place", "town"), "poi_place_town"),
    (("place", "village"), "poi_place_village"),
    (("place", "hamlet"), "poi_place_village"),
    (("boundary", "administrative"), "poi_boundary_administrative"),
];

/// One entry of the final response, immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub place_id: PlaceId,
    pub osm_type: OsmType,
    pub osm_id: i64,
    pub place_rank: u8,
    /// `[min_lat, max_lat, min_lon, max_lon]`
    pub boundingbox: [f64; 4],
    pub lat: f64,
    pub lon: f64,
    /// Localized name
    pub name: String,
    pub display_name: String,
    pub class: String,
    #[serde(rename = "type")]
    pub place_type: String,
    pub importance: f64,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<AddressComponent>>,
    #[serde(skip)]
    pub address_fault: Option<DataIntegrityFault>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extratags: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namedetails: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub geometry: BTreeMap<GeometryFormat, GeometryPayload>,
    #[serde(skip)]
    pub place: Arc<Place>,
}

impl SearchResult {
    /// Value of an address component, if addresses were requested and present.
    pub fn address_value(&self, label: &str) -> Option<&str> {
        self.address
            .as_ref()?
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.value.as_str())
    }
}

/// Icon URL for a class/type pair, when one is known.
pub fn icon_for(class: &str, place_type: &str, base_url: &str) -> Option<String> {
    ICONS
        .iter()
        .find(|((c, t), _)| *c == class && *t == place_type)
        .map(|(_, stem)| format!("{}/{}.p.20.png", base_url.trim_end_matches('/'), stem))
}

/// Truncate to the request limit and build results. Address and geometry work
/// only happens for survivors and only when the request asks for it.
pub async fn assemble<S: PlaceStore + ?Sized>(
    ranked: Vec<ScoredCandidate>,
    spec: &QuerySpec,
    store: &S,
    resolver: &AddressResolver,
    output: &OutputConfig,
) -> Result<Vec<SearchResult>, StoreError> {
    let options = AddressOptions {
        languages: &spec.languages,
        exclude: &spec.address_exclude,
    };

    let mut results = Vec::with_capacity(spec.limit.min(ranked.len()));
    for scored in ranked.into_iter().take(spec.limit) {
        let place = scored.candidate.place;

        let (address, address_fault) = if spec.address_details {
            let ResolvedAddress { components, fault } =
                resolver.resolve(store, &place, options).await?;
            (Some(components), fault)
        } else {
            (None, None)
        };

        let geometry = if spec.polygon.is_requested() {
            format_geometry(&place, &spec.polygon)
        } else {
            BTreeMap::new()
        };

        results.push(SearchResult {
            place_id: place.id,
            osm_type: place.osm_type,
            osm_id: place.osm_id,
            place_rank: place.place_rank,
            boundingbox: place.bbox.as_lat_lon_array(),
            lat: place.centroid.lat,
            lon: place.centroid.lon,
            name: place.localized_name(&spec.languages).to_string(),
            display_name: place.display_name.clone(),
            class: place.class.clone(),
            place_type: place.place_type.clone(),
            importance: place.importance,
            score: scored.score,
            icon: icon_for(&place.class, &place.place_type, &output.icon_base_url),
            address,
            address_fault,
            extratags: spec.extratags.then(|| place.extratags.clone()),
            namedetails: spec.namedetails.then(|| place.names.clone()),
            geometry,
            place,
        });
    }

    Ok(results)
}
