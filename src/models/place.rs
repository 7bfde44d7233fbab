//! Place records as served by the Place Store.

use std::collections::BTreeMap;

use geo::{BoundingRect, Centroid, Intersects};
use geo_types::{Coord, Geometry, Point, Rect};
use serde::{Deserialize, Serialize};

/// Stable place identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(pub u64);

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type of OSM object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmType {
    Node,
    Way,
    Relation,
}

impl std::fmt::Display for OsmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsmType::Node => write!(f, "node"),
            OsmType::Way => write!(f, "way"),
            OsmType::Relation => write!(f, "relation"),
        }
    }
}

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    /// Planar distance in degrees. Only used for relative comparisons.
    pub fn degree_distance(&self, other: &GeoPoint) -> f64 {
        (self.lon - other.lon).hypot(self.lat - other.lat)
    }
}

/// Axis-aligned bounding box in lon/lat degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBbox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeoBbox {
    /// Build from any two opposite corners; the corners are normalized.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon: min_lon.min(max_lon),
            min_lat: min_lat.min(max_lat),
            max_lon: min_lon.max(max_lon),
            max_lat: min_lat.max(max_lat),
        }
    }

    pub fn from_point(point: GeoPoint) -> Self {
        Self::new(point.lon, point.lat, point.lon, point.lat)
    }

    pub fn from_rect(rect: Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.min_lon,
                y: self.min_lat,
            },
            Coord {
                x: self.max_lon,
                y: self.max_lat,
            },
        )
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Half of the diagonal length in degrees.
    pub fn half_diagonal(&self) -> f64 {
        (self.max_lon - self.min_lon).hypot(self.max_lat - self.min_lat) / 2.0
    }

    pub fn intersects(&self, other: &GeoBbox) -> bool {
        self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
            && self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
    }

    /// `[min_lat, max_lat, min_lon, max_lon]`, the order results report it in.
    pub fn as_lat_lon_array(&self) -> [f64; 4] {
        [self.min_lat, self.max_lat, self.min_lon, self.max_lon]
    }
}

/// A place as served by the store. Read-only for the duration of a query.
///
/// The containment parent is an id lookup into the store, never an owning pointer.
#[derive(Debug, Clone)]
pub struct Place {
    pub id: PlaceId,
    pub osm_type: OsmType,
    pub osm_id: i64,
    /// Main tag key, e.g. `amenity`, `place`, `boundary`
    pub class: String,
    /// Main tag value, e.g. `restaurant`, `city`, `administrative`
    pub place_type: String,
    /// Multilingual names: {"default": "...", "de": "...", "fr": "..."}
    pub names: BTreeMap<String, String>,
    pub display_name: String,
    pub centroid: GeoPoint,
    /// Full geometry when the store has more than a point.
    pub geometry: Option<Geometry<f64>>,
    pub bbox: GeoBbox,
    pub place_rank: u8,
    pub importance: f64,
    pub parent: Option<PlaceId>,
    /// ISO 3166-1 alpha-2, lowercase
    pub country_code: Option<String>,
    pub extratags: BTreeMap<String, String>,
}

impl Place {
    /// Create a point place with minimal required fields
    pub fn new(
        id: PlaceId,
        osm_type: OsmType,
        osm_id: i64,
        class: &str,
        place_type: &str,
        centroid: GeoPoint,
    ) -> Self {
        Self {
            id,
            osm_type,
            osm_id,
            class: class.to_string(),
            place_type: place_type.to_string(),
            names: BTreeMap::new(),
            display_name: String::new(),
            centroid,
            geometry: None,
            bbox: GeoBbox::from_point(centroid),
            place_rank: 30,
            importance: 0.0,
            parent: None,
            country_code: None,
            extratags: BTreeMap::new(),
        }
    }

    /// Add a name in a specific language
    pub fn add_name(&mut self, lang: &str, name: &str) {
        let key = if lang.is_empty() { "default" } else { lang };
        self.names.insert(key.to_string(), name.to_string());
    }

    /// Attach a full geometry and derive the bounding box from it.
    pub fn set_geometry(&mut self, geometry: Geometry<f64>) {
        if let Some(rect) = geometry.bounding_rect() {
            self.bbox = GeoBbox::from_rect(rect);
        }
        self.geometry = Some(geometry);
    }

    pub fn default_name(&self) -> &str {
        self.names
            .get("default")
            .or_else(|| self.names.values().next())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Name in the first preferred language the place carries, else the default name.
    pub fn localized_name(&self, languages: &[String]) -> &str {
        languages
            .iter()
            .find_map(|lang| self.names.get(lang))
            .map(String::as_str)
            .unwrap_or_else(|| self.default_name())
    }

    /// Stored geometry, or the centroid when only a point is known.
    pub fn effective_geometry(&self) -> Geometry<f64> {
        self.geometry
            .clone()
            .unwrap_or_else(|| Geometry::Point(self.centroid.to_point()))
    }

    /// Exact geometry test against a rectangle (falls back to the centroid).
    pub fn intersects_bbox(&self, bbox: &GeoBbox) -> bool {
        if !self.bbox.intersects(bbox) {
            return false;
        }
        let rect = bbox.to_rect();
        match &self.geometry {
            Some(geometry) => geometry.intersects(&rect),
            None => self.centroid.to_point().intersects(&rect),
        }
    }
}

/// Serialized place shape used to load a store from JSON dumps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub place_id: PlaceId,
    pub osm_type: OsmType,
    pub osm_id: i64,
    pub class: String,
    #[serde(rename = "type")]
    pub place_type: String,
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub centroid: Option<GeoPoint>,
    #[serde(default)]
    pub geometry: Option<geojson::Geometry>,
    pub place_rank: u8,
    #[serde(default)]
    pub importance: Option<f64>,
    #[serde(default)]
    pub parent_place_id: Option<PlaceId>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub extratags: BTreeMap<String, String>,
}

impl TryFrom<PlaceRecord> for Place {
    type Error = String;

    fn try_from(record: PlaceRecord) -> Result<Self, Self::Error> {
        let geometry = record
            .geometry
            .map(|g| {
                Geometry::<f64>::try_from(g)
                    .map_err(|e| format!("place {}: bad geometry: {}", record.place_id, e))
            })
            .transpose()?;

        let centroid = match (record.centroid, geometry.as_ref()) {
            (Some(point), _) => point,
            (None, Some(geometry)) => geometry
                .centroid()
                .map(|p| GeoPoint::new(p.y(), p.x()))
                .ok_or_else(|| format!("place {}: empty geometry", record.place_id))?,
            (None, None) => {
                return Err(format!(
                    "place {}: needs a centroid or a geometry",
                    record.place_id
                ))
            }
        };

        let mut place = Place::new(
            record.place_id,
            record.osm_type,
            record.osm_id,
            &record.class,
            &record.place_type,
            centroid,
        );
        place.names = record.names;
        place.display_name = record
            .display_name
            .unwrap_or_else(|| place.default_name().to_string());
        place.place_rank = record.place_rank;
        place.importance = record.importance.unwrap_or(0.0);
        place.parent = record.parent_place_id;
        place.country_code = record.country_code.map(|c| c.to_lowercase());
        place.extratags = record.extratags;
        if let Some(geometry) = geometry {
            place.set_geometry(geometry);
        }
        Ok(place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::polygon;

    #[test]
    fn test_bbox_normalizes_corners() {
        let bbox = GeoBbox::new(10.0, 5.0, -10.0, -5.0);
        assert_eq!(bbox.min_lon, -10.0);
        assert_eq!(bbox.max_lat, 5.0);
        assert_eq!(bbox.as_lat_lon_array(), [-5.0, 5.0, -10.0, 10.0]);
    }

    #[test]
    fn test_set_geometry_updates_bbox() {
        let mut place = Place::new(
            PlaceId(1),
            OsmType::Way,
            1,
            "leisure",
            "park",
            GeoPoint::new(0.5, 0.5),
        );
        place.set_geometry(Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ]));
        assert_eq!(place.bbox, GeoBbox::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_intersects_uses_exact_geometry() {
        let mut place = Place::new(
            PlaceId(1),
            OsmType::Way,
            1,
            "landuse",
            "forest",
            GeoPoint::new(0.0, 0.0),
        );
        // Triangle whose bbox covers (0.9, 0.9) but whose area does not.
        place.set_geometry(Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 0.0, y: 1.0),
        ]));
        assert!(!place.intersects_bbox(&GeoBbox::new(0.85, 0.85, 0.95, 0.95)));
        assert!(place.intersects_bbox(&GeoBbox::new(0.1, 0.1, 0.2, 0.2)));
    }

    #[test]
    fn test_localized_name_falls_back() {
        let mut place = Place::new(
            PlaceId(1),
            OsmType::Node,
            1,
            "place",
            "city",
            GeoPoint::new(0.0, 0.0),
        );
        place.add_name("", "Wien");
        place.add_name("en", "Vienna");
        assert_eq!(place.localized_name(&["en".to_string()]), "Vienna");
        assert_eq!(place.localized_name(&["fr".to_string()]), "Wien");
        assert_eq!(place.localized_name(&[]), "Wien");
    }

    #[test]
    fn test_record_without_location_is_rejected() {
        let record: PlaceRecord = serde_json::from_value(serde_json::json!({
            "place_id": 7,
            "osm_type": "node",
            "osm_id": 7,
            "class": "place",
            "type": "village",
            "place_rank": 19
        }))
        .unwrap();
        assert!(Place::try_from(record).is_err());
    }

    #[test]
    fn test_record_centroid_from_geojson() {
        let record: PlaceRecord = serde_json::from_value(serde_json::json!({
            "place_id": 8,
            "osm_type": "way",
            "osm_id": 8,
            "class": "leisure",
            "type": "park",
            "names": {"default": "Square"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]]]
            },
            "place_rank": 30,
            "country_code": "UY"
        }))
        .unwrap();
        let place = Place::try_from(record).unwrap();
        assert_eq!(place.centroid, GeoPoint::new(1.0, 1.0));
        assert_eq!(place.display_name, "Square");
        assert_eq!(place.country_code.as_deref(), Some("uy"));
    }
}
