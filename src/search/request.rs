//! Raw request parameters and their validated form.

use serde::Deserialize;

use super::classifier::{classify, QueryMode};
use super::filter::FeatureType;
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::geometry::{parse_threshold, GeometryFormat, PolygonOutput};
use crate::models::{GeoBbox, PlaceId};

/// Search parameters as they arrive from the transport layer, unvalidated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    /// Free-text or coordinate query
    pub q: Option<String>,
    pub amenity: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postalcode: Option<String>,
    /// "x1,y1,x2,y2", any two opposite corners
    pub viewbox: Option<String>,
    /// "left,bottom,right,top"
    pub viewboxlbrt: Option<String>,
    pub bounded: Option<String>,
    #[serde(rename = "featureType")]
    pub feature_type: Option<String>,
    pub limit: Option<String>,
    pub dedupe: Option<String>,
    pub addressdetails: Option<String>,
    pub extratags: Option<String>,
    pub namedetails: Option<String>,
    pub polygon: Option<String>,
    pub polygon_geojson: Option<String>,
    pub polygon_kml: Option<String>,
    pub polygon_svg: Option<String>,
    pub polygon_text: Option<String>,
    pub polygon_threshold: Option<String>,
    #[serde(rename = "accept-language")]
    pub accept_language: Option<String>,
    pub countrycodes: Option<String>,
    pub exclude_place_ids: Option<String>,
    /// "class=type" pairs left out of a result's own address
    pub address_exclude: Option<String>,
}

impl SearchRequest {
    /// Free-text request with every other option at its default.
    pub fn text(q: &str) -> Self {
        Self {
            q: Some(q.to_string()),
            ..Default::default()
        }
    }

    fn structured_parts(&self) -> Vec<&str> {
        [
            &self.amenity,
            &self.street,
            &self.city,
            &self.county,
            &self.state,
            &self.postalcode,
            &self.country,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
    }
}

/// Viewbox with its role: hard filter when `bounded`, ranking bias otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewbox {
    pub bbox: GeoBbox,
    pub bounded: bool,
}

/// Immutable, validated description of one search.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub mode: QueryMode,
    pub viewbox: Option<Viewbox>,
    pub feature_type: Option<FeatureType>,
    /// Already clamped to the configured maximum
    pub limit: usize,
    pub dedupe: bool,
    pub address_details: bool,
    pub extratags: bool,
    pub namedetails: bool,
    pub polygon: PolygonOutput,
    /// Preferred languages, best first
    pub languages: Vec<String>,
    /// Lowercase ISO 3166-1 alpha-2 codes
    pub country_codes: Vec<String>,
    pub exclude_place_ids: Vec<PlaceId>,
    /// (class, type) pairs a result must not list in its own address
    pub address_exclude: Vec<(String, String)>,
}

impl QuerySpec {
    /// Bounded viewbox acting as a hard spatial constraint, if any.
    pub fn required_region(&self) -> Option<&GeoBbox> {
        self.viewbox.as_ref().filter(|v| v.bounded).map(|v| &v.bbox)
    }

    pub fn from_request(request: &SearchRequest, config: &SearchConfig) -> Result<Self> {
        let query = request
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());
        let structured = request.structured_parts();

        let mode = match (query, structured.is_empty()) {
            (Some(_), false) => {
                return Err(SearchError::InvalidQuery(
                    "free-text and structured query parameters cannot be combined".to_string(),
                ))
            }
            (Some(q), true) => classify(q)?,
            (None, false) => classify(&structured.join(", "))?,
            (None, true) => {
                return Err(SearchError::InvalidQuery("no query given".to_string()))
            }
        };

        let bounded = parse_flag("bounded", request.bounded.as_deref(), false)?;
        let viewbox = match (&request.viewbox, &request.viewboxlbrt) {
            (Some(v), _) => Some(parse_viewbox("viewbox", v)?),
            (None, Some(v)) => Some(parse_viewbox("viewboxlbrt", v)?),
            (None, None) => None,
        }
        .map(|bbox| Viewbox { bbox, bounded });

        let feature_type = request
            .feature_type
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(str::parse::<FeatureType>)
            .transpose()?;

        let polygon = PolygonOutput {
            formats: parse_polygon_formats(request)?,
            threshold: match request.polygon_threshold.as_deref() {
                Some(value) => parse_threshold(value)?,
                None => 0.0,
            },
        };

        Ok(Self {
            mode,
            viewbox,
            feature_type,
            limit: parse_limit(request.limit.as_deref(), config)?,
            dedupe: parse_flag("dedupe", request.dedupe.as_deref(), true)?,
            address_details: parse_flag(
                "addressdetails",
                request.addressdetails.as_deref(),
                false,
            )?,
            extratags: parse_flag("extratags", request.extratags.as_deref(), false)?,
            namedetails: parse_flag("namedetails", request.namedetails.as_deref(), false)?,
            polygon,
            languages: request
                .accept_language
                .as_deref()
                .map(parse_accept_language)
                .unwrap_or_default(),
            country_codes: parse_country_codes(request.countrycodes.as_deref())?,
            exclude_place_ids: parse_place_ids(request.exclude_place_ids.as_deref())?,
            address_exclude: parse_address_exclude(request.address_exclude.as_deref())?,
        })
    }
}

fn parse_flag(name: &'static str, value: Option<&str>, default: bool) -> Result<bool> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        "" => Ok(default),
        _ => Err(SearchError::invalid_parameter(
            name,
            value,
            "expected a boolean (0/1)",
        )),
    }
}

/// Requested limit, clamped to `1..=max_results`.
fn parse_limit(value: Option<&str>, config: &SearchConfig) -> Result<usize> {
    let max = config.limits.max_results.max(1);
    let requested = match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => config.limits.default_limit,
        Some(v) => {
            let n: i64 = v.parse().map_err(|_| {
                SearchError::invalid_parameter("limit", v, "expected an integer")
            })?;
            n.max(1).try_into().unwrap_or(usize::MAX)
        }
    };
    Ok(requested.clamp(1, max))
}

fn parse_viewbox(name: &'static str, value: &str) -> Result<GeoBbox> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| SearchError::invalid_parameter(name, value, "expected four numbers"))?;

    let &[x1, y1, x2, y2] = parts.as_slice() else {
        return Err(SearchError::invalid_parameter(
            name,
            value,
            "expected four numbers",
        ));
    };

    // viewbox is x1,y1,x2,y2 and viewboxlbrt is left,bottom,right,top: both are
    // two lon/lat corners, which GeoBbox::new normalizes.
    if [x1, y1, x2, y2].iter().any(|v| !v.is_finite())
        || !(-180.0..=180.0).contains(&x1)
        || !(-180.0..=180.0).contains(&x2)
        || !(-90.0..=90.0).contains(&y1)
        || !(-90.0..=90.0).contains(&y2)
    {
        return Err(SearchError::invalid_parameter(
            name,
            value,
            "coordinates out of range",
        ));
    }
    if x1 == x2 || y1 == y2 {
        return Err(SearchError::invalid_parameter(
            name,
            value,
            "viewbox must have a non-zero area",
        ));
    }
    Ok(GeoBbox::new(x1, y1, x2, y2))
}

fn parse_polygon_formats(request: &SearchRequest) -> Result<Vec<GeometryFormat>> {
    let flags = [
        ("polygon", &request.polygon, GeometryFormat::Points),
        ("polygon_geojson", &request.polygon_geojson, GeometryFormat::GeoJson),
        ("polygon_kml", &request.polygon_kml, GeometryFormat::Kml),
        ("polygon_svg", &request.polygon_svg, GeometryFormat::Svg),
        ("polygon_text", &request.polygon_text, GeometryFormat::Text),
    ];

    let mut formats = Vec::new();
    for (name, value, format) in flags {
        if parse_flag(name, value.as_deref(), false)? {
            formats.push(format);
        }
    }
    Ok(formats)
}

/// "de-CH,de;q=0.8,en;q=0.5" -> ["de-ch", "de", "en"]. Base languages of
/// regional tags follow the regional tag.
pub fn parse_accept_language(value: &str) -> Vec<String> {
    let mut weighted: Vec<(String, f64)> = value
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let lang = pieces.next()?.trim().to_ascii_lowercase();
            if lang.is_empty() || lang == "*" {
                return None;
            }
            let quality = pieces
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.trim().parse::<f64>().ok())
                .unwrap_or(1.0);
            Some((lang, quality))
        })
        .collect();
    // Stable sort keeps header order among equal weights.
    weighted.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut languages: Vec<String> = Vec::new();
    for (lang, _) in weighted {
        let base = lang.split('-').next().map(String::from);
        for candidate in std::iter::once(lang).chain(base) {
            if !languages.contains(&candidate) {
                languages.push(candidate);
            }
        }
    }
    languages
}

fn parse_country_codes(value: Option<&str>) -> Result<Vec<String>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
                Ok(code.to_ascii_lowercase())
            } else {
                Err(SearchError::invalid_parameter(
                    "countrycodes",
                    value,
                    "expected two-letter country codes",
                ))
            }
        })
        .collect()
}

fn parse_place_ids(value: Option<&str>) -> Result<Vec<PlaceId>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse().map(PlaceId).map_err(|_| {
                SearchError::invalid_parameter("exclude_place_ids", value, "expected place ids")
            })
        })
        .collect()
}

fn parse_address_exclude(value: Option<&str>) -> Result<Vec<(String, String)>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((class, place_type)) if !class.is_empty() && !place_type.is_empty() => {
                Ok((class.to_string(), place_type.to_string()))
            }
            _ => Err(SearchError::invalid_parameter(
                "address_exclude",
                value,
                "expected class=type pairs",
            )),
        })
        .collect()
}
