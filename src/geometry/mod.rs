//! Geometry output for search results.
//!
//! Each requested [`GeometryFormat`] yields exactly one [`GeometryPayload`] per
//! result. Polygon outputs may be simplified; the WKT text output never is.

mod encode;

pub use encode::{to_kml, to_points, to_svg, to_wkt};

use std::collections::BTreeMap;

use geo::Simplify;
use geo_types::Geometry;
use serde::{Serialize, Serializer};

use crate::error::{Result, SearchError};
use crate::models::Place;

/// Output representation a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryFormat {
    /// Boundary vertex list (`polygon=1`)
    Points,
    Svg,
    Kml,
    #[serde(rename = "geojson")]
    GeoJson,
    /// Well-known text, lossless
    Text,
}

impl GeometryFormat {
    /// Whether the simplification threshold applies to this format.
    pub fn is_simplified(&self) -> bool {
        !matches!(self, GeometryFormat::Text)
    }
}

/// One rendered geometry, tagged by its format.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryPayload {
    Points(Vec<[f64; 2]>),
    Svg(String),
    Kml(String),
    GeoJson(geojson::Geometry),
    Text(String),
}

impl GeometryPayload {
    pub fn format(&self) -> GeometryFormat {
        match self {
            GeometryPayload::Points(_) => GeometryFormat::Points,
            GeometryPayload::Svg(_) => GeometryFormat::Svg,
            GeometryPayload::Kml(_) => GeometryFormat::Kml,
            GeometryPayload::GeoJson(_) => GeometryFormat::GeoJson,
            GeometryPayload::Text(_) => GeometryFormat::Text,
        }
    }
}

impl Serialize for GeometryPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            GeometryPayload::Points(points) => points.serialize(serializer),
            GeometryPayload::Svg(s) | GeometryPayload::Kml(s) | GeometryPayload::Text(s) => {
                serializer.serialize_str(s)
            }
            GeometryPayload::GeoJson(geometry) => geometry.serialize(serializer),
        }
    }
}

/// Requested geometry outputs and the simplification threshold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonOutput {
    pub formats: Vec<GeometryFormat>,
    /// Tolerance in degrees; zero or negative disables simplification
    pub threshold: f64,
}

impl PolygonOutput {
    pub fn is_requested(&self) -> bool {
        !self.formats.is_empty()
    }
}

/// Parse a `polygon_threshold` value.
///
/// Negative values are accepted and disable simplification. Anything that is
/// not a finite number is rejected rather than clamped.
pub fn parse_threshold(value: &str) -> Result<f64> {
    let trimmed = value.trim();
    let threshold: f64 = trimmed.parse().map_err(|_| {
        SearchError::invalid_parameter("polygon_threshold", value, "expected a number")
    })?;
    if !threshold.is_finite() {
        return Err(SearchError::invalid_parameter(
            "polygon_threshold",
            value,
            "must be a finite number",
        ));
    }
    Ok(threshold)
}

/// Ramer-Douglas-Peucker simplification of line and area geometries.
pub fn simplify(geometry: &Geometry<f64>, threshold: f64) -> Geometry<f64> {
    if threshold <= 0.0 {
        return geometry.clone();
    }
    match geometry {
        Geometry::LineString(ls) => Geometry::LineString(ls.simplify(threshold)),
        Geometry::MultiLineString(mls) => Geometry::MultiLineString(mls.simplify(threshold)),
        Geometry::Polygon(p) => Geometry::Polygon(p.simplify(threshold)),
        Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(mp.simplify(threshold)),
        other => other.clone(),
    }
}

/// Render a place's geometry in every requested format.
pub fn format_geometry(
    place: &Place,
    output: &PolygonOutput,
) -> BTreeMap<GeometryFormat, GeometryPayload> {
    let full = place.effective_geometry();
    let simplified = output
        .formats
        .iter()
        .any(GeometryFormat::is_simplified)
        .then(|| simplify(&full, output.threshold));

    output
        .formats
        .iter()
        .map(|format| {
            let geometry = match simplified.as_ref() {
                Some(simplified) if format.is_simplified() => simplified,
                _ => &full,
            };
            let payload = match format {
                GeometryFormat::Points => GeometryPayload::Points(to_points(geometry)),
                GeometryFormat::Svg => GeometryPayload::Svg(to_svg(geometry)),
                GeometryFormat::Kml => GeometryPayload::Kml(to_kml(geometry)),
                GeometryFormat::GeoJson => GeometryPayload::GeoJson(geojson::Geometry::new(
                    geojson::Value::from(geometry),
                )),
                GeometryFormat::Text => GeometryPayload::Text(to_wkt(geometry)),
            };
            (*format, payload)
        })
        .collect()
}
