//! Query classification: coordinate pair or free text.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, SearchError};
use crate::models::GeoPoint;
use crate::text;

/// "lat,lon" or "lat lon" in decimal degrees.
static DECIMAL_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?\d{1,3}(?:\.\d+)?)\s*(?:,\s*|\s+)([+-]?\d{1,3}(?:\.\d+)?)\s*$")
        .expect("valid regex")
});

/// "14.27N 107.69E" style, hemisphere letters after the value.
static HEMISPHERE_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(\d{1,2}(?:\.\d+)?)\s*°?\s*([NS])\s*,?\s*(\d{1,3}(?:\.\d+)?)\s*°?\s*([EW])\s*$",
    )
    .expect("valid regex")
});

/// A normalized free-text query.
#[derive(Debug, Clone, PartialEq)]
pub struct TextQuery {
    pub raw: String,
    /// Comma-separated parts, most specific first
    pub phrases: Vec<String>,
    pub tokens: Vec<String>,
}

impl TextQuery {
    /// All tokens joined by single spaces.
    pub fn joined(&self) -> String {
        self.tokens.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryMode {
    Coordinate(GeoPoint),
    Text(TextQuery),
}

impl QueryMode {
    pub fn token_count(&self) -> usize {
        match self {
            QueryMode::Coordinate(_) => 0,
            QueryMode::Text(query) => query.tokens.len(),
        }
    }
}

/// Decide whether `query` is a coordinate pair or free text.
pub fn classify(query: &str) -> Result<QueryMode> {
    if let Some(point) = parse_coordinates(query)? {
        return Ok(QueryMode::Coordinate(point));
    }

    let phrases = text::phrases(query);
    let tokens = text::tokens(query);
    if tokens.is_empty() {
        return Err(SearchError::InvalidQuery(format!(
            "query {:?} is empty after normalization",
            query
        )));
    }

    Ok(QueryMode::Text(TextQuery {
        raw: query.to_string(),
        phrases,
        tokens,
    }))
}

/// Parse a coordinate pair. `Ok(None)` means the input is not shaped like one.
fn parse_coordinates(query: &str) -> Result<Option<GeoPoint>> {
    let (lat, lon) = if let Some(caps) = DECIMAL_PAIR_RE.captures(query) {
        (parse_degree(&caps[1], query)?, parse_degree(&caps[2], query)?)
    } else if let Some(caps) = HEMISPHERE_PAIR_RE.captures(query) {
        let mut lat = parse_degree(&caps[1], query)?;
        let mut lon = parse_degree(&caps[3], query)?;
        if caps[2].eq_ignore_ascii_case("s") {
            lat = -lat;
        }
        if caps[4].eq_ignore_ascii_case("w") {
            lon = -lon;
        }
        (lat, lon)
    } else {
        return Ok(None);
    };

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(SearchError::InvalidQuery(format!(
            "coordinate {:?} out of range (lat must be within ±90, lon within ±180)",
            query
        )));
    }
    Ok(Some(GeoPoint::new(lat, lon)))
}

fn parse_degree(value: &str, query: &str) -> Result<f64> {
    value
        .parse()
        .map_err(|_| SearchError::InvalidQuery(format!("bad coordinate in {:?}", query)))
}
