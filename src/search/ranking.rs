//! Ranking engine.
//!
//! Text queries score, in priority order: text-match quality, importance,
//! proximity to the viewbox center (only when a viewbox is set) and how well
//! the place rank fits the number of query tokens. Coordinate queries score
//! proximity first and prefer finer place ranks among equally close places.
//!
//! Ordering is a total order over `(match quality desc, score desc, place id
//! asc)`, so a better text match always comes first whatever the weights, and
//! identical inputs always produce identical output.

use std::cmp::Ordering;

use super::classifier::QueryMode;
use super::request::QuerySpec;
use super::retriever::{Candidate, MatchQuality};
use crate::config::RankingConfig;

/// Finest place rank.
const MAX_RANK: f64 = 30.0;

/// Distance (degrees) at which a coordinate query's proximity term halves.
const COORDINATE_HALF_DISTANCE: f64 = 0.01;

/// A candidate with its computed score. The place itself is untouched.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
}

impl ScoredCandidate {
    /// Result order: better match quality first, then higher score, then lower
    /// place id.
    pub fn order(&self, other: &Self) -> Ordering {
        other
            .candidate
            .match_quality
            .cmp(&self.candidate.match_quality)
            .then_with(|| other.score.total_cmp(&self.score))
            .then_with(|| self.candidate.place.id.cmp(&other.candidate.place.id))
    }
}

/// Score and order candidates, best first.
pub fn rank(
    candidates: Vec<Candidate>,
    spec: &QuerySpec,
    weights: &RankingConfig,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let score = match &spec.mode {
                QueryMode::Coordinate(_) => coordinate_score(&candidate, weights),
                QueryMode::Text(query) => {
                    text_score(&candidate, spec, query.tokens.len(), weights)
                }
            };
            ScoredCandidate { candidate, score }
        })
        .collect();

    scored.sort_by(ScoredCandidate::order);
    scored
}

fn text_score(
    candidate: &Candidate,
    spec: &QuerySpec,
    token_count: usize,
    weights: &RankingConfig,
) -> f64 {
    let place = &candidate.place;

    let text_match = match candidate.match_quality {
        Some(MatchQuality::Exact) => weights.exact_match,
        Some(MatchQuality::Partial) => weights.partial_match,
        Some(MatchQuality::Fuzzy) => weights.fuzzy_match,
        None => 0.0,
    };

    let proximity = match (spec.viewbox, candidate.distance) {
        (Some(viewbox), Some(distance)) => {
            let scale = viewbox.bbox.half_diagonal().max(f64::EPSILON);
            1.0 / (1.0 + distance / scale)
        }
        _ => 0.0,
    };

    weights.text_match * text_match
        + weights.importance * place.importance.clamp(0.0, 1.0)
        + weights.proximity * proximity
        + weights.rank_fit * rank_fit(place.place_rank, token_count)
}

fn coordinate_score(candidate: &Candidate, weights: &RankingConfig) -> f64 {
    let distance = candidate.distance.unwrap_or(f64::INFINITY);
    let proximity = 1.0 / (1.0 + distance / COORDINATE_HALF_DISTANCE);
    let fineness = f64::from(candidate.place.place_rank).min(MAX_RANK) / MAX_RANK;

    weights.proximity * proximity + weights.rank_fit * fineness
}

/// How well `rank` suits a query of `token_count` tokens, in `0.0..=1.0`.
///
/// One-word queries favor coarse places (countries, cities); every extra word
/// moves the preferred rank eight steps finer.
pub fn rank_fit(rank: u8, token_count: usize) -> f64 {
    let extra_words = token_count.saturating_sub(1) as f64;
    let target = (4.0 + 8.0 * extra_words).min(MAX_RANK);
    1.0 - (f64::from(rank).min(MAX_RANK) - target).abs() / MAX_RANK
}
