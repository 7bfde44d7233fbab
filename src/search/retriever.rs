//! Candidate retrieval from the Place Store.

use std::sync::Arc;

use geo::Contains;
use tracing::debug;

use super::classifier::{QueryMode, TextQuery};
use super::request::QuerySpec;
use crate::error::StoreError;
use crate::models::{GeoPoint, Place};
use crate::store::PlaceStore;
use crate::text;

/// How well a candidate's names match the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchQuality {
    Fuzzy,
    Partial,
    Exact,
}

/// An unranked place with the signals the ranking engine needs.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub place: Arc<Place>,
    /// `None` for coordinate queries
    pub match_quality: Option<MatchQuality>,
    /// Degrees to the reference point: the query coordinate, or the viewbox
    /// center when a viewbox is set. Zero when the geometry contains the point.
    pub distance: Option<f64>,
}

/// Look up candidates for `spec`. A bounded viewbox is passed to the store;
/// a biasing one only contributes a distance signal.
pub async fn retrieve<S: PlaceStore + ?Sized>(
    store: &S,
    spec: &QuerySpec,
    pool: usize,
) -> Result<Vec<Candidate>, StoreError> {
    let candidates: Vec<Candidate> = match &spec.mode {
        QueryMode::Coordinate(point) => store
            .search_near(*point, pool)
            .await?
            .into_iter()
            .map(|place| Candidate {
                distance: Some(distance_to(&place, point)),
                match_quality: None,
                place,
            })
            .collect(),
        QueryMode::Text(query) => {
            let reference = spec.viewbox.map(|v| v.bbox.center());
            store
                .search_tokens(&query.tokens, spec.required_region(), pool)
                .await?
                .into_iter()
                .filter_map(|place| {
                    let quality = match_quality(&place, query)?;
                    Some(Candidate {
                        distance: reference.as_ref().map(|r| distance_to(&place, r)),
                        match_quality: Some(quality),
                        place,
                    })
                })
                .collect()
        }
    };

    debug!("Retrieved {} candidates", candidates.len());
    Ok(candidates)
}

fn distance_to(place: &Place, point: &GeoPoint) -> f64 {
    match &place.geometry {
        Some(geometry) if geometry.contains(&point.to_point()) => 0.0,
        _ => place.centroid.degree_distance(point),
    }
}

/// Best match over all of a place's name variants, `None` when nothing matches.
pub fn match_quality(place: &Place, query: &TextQuery) -> Option<MatchQuality> {
    let joined = query.joined();
    let leading = query.phrases.first().map(String::as_str).unwrap_or("");

    place
        .names
        .values()
        .filter_map(|name| {
            let name = text::normalize(name).replace(',', " ");
            let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                return None;
            }
            if name == joined || name == leading {
                return Some(MatchQuality::Exact);
            }

            let name_tokens: Vec<&str> = name.split(' ').collect();
            let all_name_in_query = name_tokens
                .iter()
                .all(|t| query.tokens.iter().any(|q| q == t));
            let all_query_in_name = query
                .tokens
                .iter()
                .all(|q| name_tokens.iter().any(|t| t == q));
            if all_name_in_query || all_query_in_name {
                return Some(MatchQuality::Partial);
            }

            let overlaps = query
                .tokens
                .iter()
                .any(|q| name_tokens.iter().any(|t| text::tokens_close(q, t)));
            overlaps.then_some(MatchQuality::Fuzzy)
        })
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::search::classifier::classify;
    use crate::search::request::SearchRequest;
    use crate::store::fixtures;

    fn text(q: &str) -> TextQuery {
        match classify(q).unwrap() {
            QueryMode::Text(query) => query,
            other => panic!("text query expected, got {other:?}"),
        }
    }

    fn spec(request: SearchRequest) -> QuerySpec {
        QuerySpec::from_request(&request, &SearchConfig::default()).unwrap()
    }

    fn named(name: &str) -> Place {
        fixtures::place(
            crate::models::PlaceId(99),
            crate::models::OsmType::Node,
            "place",
            "city",
            name,
            name,
            16,
            0.1,
            (0.0, 0.0),
            None,
        )
    }

    #[test]
    fn test_exact_match_ignores_case_and_accents() {
        let place = named("Concepción del Uruguay");
        assert_eq!(
            match_quality(&place, &text("concepcion del uruguay")),
            Some(MatchQuality::Exact)
        );
    }

    #[test]
    fn test_leading_phrase_match_is_exact() {
        assert_eq!(
            match_quality(&named("Montevideo"), &text("Montevideo, Uruguay")),
            Some(MatchQuality::Exact)
        );
    }

    #[test]
    fn test_subset_match_is_partial() {
        assert_eq!(
            match_quality(&named("Concepción del Uruguay"), &text("Uruguay")),
            Some(MatchQuality::Partial)
        );
    }

    #[test]
    fn test_one_edit_is_fuzzy() {
        assert_eq!(
            match_quality(&named("Montevideo"), &text("Montevido")),
            Some(MatchQuality::Fuzzy)
        );
        assert_eq!(match_quality(&named("Montevideo"), &text("Lima")), None);
    }

    #[tokio::test]
    async fn test_text_candidates_carry_quality() {
        let store = fixtures::world();
        let candidates = retrieve(&store, &spec(SearchRequest::text("Montevideo")), 50)
            .await
            .unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(candidates
            .iter()
            .all(|c| c.match_quality == Some(MatchQuality::Exact) && c.distance.is_none()));
    }

    #[tokio::test]
    async fn test_biasing_viewbox_attaches_distance_only() {
        let store = fixtures::world();
        let spec = spec(SearchRequest {
            viewbox: Some("9.47,47.04,9.64,47.27".to_string()),
            ..SearchRequest::text("Montevideo")
        });
        let candidates = retrieve(&store, &spec, 50).await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.distance.unwrap() > 100.0));
    }

    #[tokio::test]
    async fn test_bounded_viewbox_restricts_lookup() {
        let store = fixtures::world();
        let spec = spec(SearchRequest {
            viewbox: Some("9.47,47.04,9.64,47.27".to_string()),
            bounded: Some("1".to_string()),
            ..SearchRequest::text("Montevideo")
        });
        let candidates = retrieve(&store, &spec, 50).await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_coordinate_candidates_carry_distance() {
        let store = fixtures::world();
        let spec = spec(SearchRequest::text("14.271104294939,107.69828796387"));
        let candidates = retrieve(&store, &spec, 10).await.unwrap();
        let province = candidates
            .iter()
            .find(|c| c.place.id == fixtures::KON_TUM_PROVINCE)
            .unwrap();
        assert_eq!(province.distance, Some(0.0));
        assert!(province.match_quality.is_none());
    }
}
