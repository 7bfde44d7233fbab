//! Collapse results that describe the same real-world entity.

use super::ranking::ScoredCandidate;
use crate::models::Place;

/// Whether two places are the same entity: the same OSM object, or the same
/// display name, class, type and rank with centroids within `epsilon` degrees.
pub fn is_duplicate(a: &Place, b: &Place, epsilon: f64) -> bool {
    if a.osm_type == b.osm_type && a.osm_id == b.osm_id {
        return true;
    }
    a.display_name == b.display_name
        && a.class == b.class
        && a.place_type == b.place_type
        && a.place_rank == b.place_rank
        && a.centroid.degree_distance(&b.centroid) <= epsilon
}

/// Keep the first (highest scored) member of every duplicate group.
///
/// Input must already be in result order. Order of survivors is preserved and
/// a second pass over the output removes nothing.
pub fn dedupe(ranked: Vec<ScoredCandidate>, epsilon: f64) -> Vec<ScoredCandidate> {
    let mut kept: Vec<ScoredCandidate> = Vec::with_capacity(ranked.len());
    for scored in ranked {
        let place = &scored.candidate.place;
        let seen = kept
            .iter()
            .any(|k| is_duplicate(&k.candidate.place, place, epsilon));
        if !seen {
            kept.push(scored);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OsmType, PlaceId};
    use crate::search::retriever::Candidate;
    use crate::store::fixtures;
    use std::sync::Arc;

    fn scored(place: Place, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            candidate: Candidate {
                place: Arc::new(place),
                match_quality: None,
                distance: None,
            },
            score,
        }
    }

    fn by_id(id: PlaceId) -> Place {
        fixtures::places()
            .into_iter()
            .find(|p| p.id == id)
            .unwrap()
    }

    fn ids(ranked: &[ScoredCandidate]) -> Vec<PlaceId> {
        ranked.iter().map(|s| s.candidate.place.id).collect()
    }

    #[test]
    fn test_near_identical_places_collapse_to_best() {
        let input = vec![
            scored(by_id(fixtures::VADUZ), 9.0),
            scored(by_id(fixtures::LIECHTENSTEIN), 8.0),
            scored(by_id(fixtures::VADUZ_DUPLICATE), 7.0),
        ];
        let out = dedupe(input, 0.05);
        assert_eq!(ids(&out), vec![fixtures::VADUZ, fixtures::LIECHTENSTEIN]);
    }

    #[test]
    fn test_same_osm_object_is_duplicate() {
        let a = by_id(fixtures::MONTEVIDEO_CITY);
        let mut b = by_id(fixtures::CONCEPCION_DEL_URUGUAY);
        b.osm_type = a.osm_type;
        b.osm_id = a.osm_id;
        assert!(is_duplicate(&a, &b, 0.0));
    }

    #[test]
    fn test_far_apart_namesakes_survive() {
        let a = by_id(fixtures::VADUZ);
        let mut b = by_id(fixtures::VADUZ_DUPLICATE);
        b.centroid = crate::models::GeoPoint::new(10.0, 10.0);
        assert!(!is_duplicate(&a, &b, 0.05));
    }

    #[test]
    fn test_different_class_is_not_duplicate() {
        let a = by_id(fixtures::MONTEVIDEO_CITY);
        let mut b = by_id(fixtures::MONTEVIDEO_CITY);
        b.id = PlaceId(77);
        b.osm_type = OsmType::Relation;
        b.class = "boundary".to_string();
        assert!(!is_duplicate(&a, &b, 0.05));
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let input: Vec<ScoredCandidate> = fixtures::places()
            .into_iter()
            .enumerate()
            .map(|(i, p)| scored(p, 50.0 - i as f64))
            .collect();
        let total = input.len();
        let once = dedupe(input, 0.05);
        let twice = dedupe(once.clone(), 0.05);
        assert_eq!(ids(&once), ids(&twice));
        assert_eq!(once.len(), total - 1);
    }
}
