// ---------------------------------------------------------------------------
// Recommendation Engine — ranking unseen items for a user
// ---------------------------------------------------------------------------
//
// Pure functions over a `RatingStore`. User-based scores are raw
// similarity-weighted sums across neighbours; item-based scores are
// similarity-weighted averages of the user's own ratings (a predicted
// rating). No side effects.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use crate::similarity::row_similarity;
use crate::store::RatingStore;
use crate::types::Recommendation;

// ---------------------------------------------------------------------------
// User-based
// ---------------------------------------------------------------------------

/// Score each item `user` has not rated by summing `similarity * rating`
/// over every other user with positive similarity to `user`.
pub fn user_based(store: &RatingStore, user: &str, n: usize) -> Vec<Recommendation> {
	let Some(target) = store.user_row(user) else {
		tracing::debug!(user, "user-based recommendations for unknown user");
		return Vec::new();
	};

	// Scores in the order each item was first accumulated.
	let mut scored: Vec<(&str, f64)> = Vec::new();
	let mut slots: HashMap<&str, usize> = HashMap::new();
	for other in store.users() {
		if other == user {
			continue;
		}
		let Some(neighbour) = store.user_row(other) else {
			continue;
		};
		let sim = row_similarity(target, neighbour);
		if sim <= 0.0 {
			continue;
		}
		for (item, rating) in neighbour.iter() {
			if target.contains(item) {
				continue;
			}
			let slot = *slots.entry(item).or_insert_with(|| {
				scored.push((item, 0.0));
				scored.len() - 1
			});
			scored[slot].1 += sim * rating;
		}
	}

	rank(scored, n)
}

// ---------------------------------------------------------------------------
// Item-based
// ---------------------------------------------------------------------------

/// Predict a rating for each item `user` has not rated as the
/// similarity-weighted mean of the user's own ratings, counting only own
/// items with positive similarity to the candidate.
pub fn item_based(store: &RatingStore, user: &str, n: usize) -> Vec<Recommendation> {
	let Some(target) = store.user_row(user) else {
		tracing::debug!(user, "item-based recommendations for unknown user");
		return Vec::new();
	};

	let mut scored: Vec<(&str, f64)> = Vec::new();
	for candidate in store.items() {
		if target.contains(candidate) {
			continue;
		}
		let Some(candidate_row) = store.item_row(candidate) else {
			continue;
		};

		let mut sim_sum = 0.0;
		let mut weighted_sum = 0.0;
		for (own_item, own_rating) in target.iter() {
			let Some(own_row) = store.item_row(own_item) else {
				continue;
			};
			let sim = row_similarity(candidate_row, own_row);
			if sim > 0.0 {
				sim_sum += sim;
				weighted_sum += sim * own_rating;
			}
		}

		if sim_sum > 0.0 {
			scored.push((candidate.as_str(), weighted_sum / sim_sum));
		}
	}

	rank(scored, n)
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Stable-sort scored items descending and keep the first `n`. Ties keep
/// the order of `scored`. NaN scores sort after every number.
fn rank(scored: Vec<(&str, f64)>, n: usize) -> Vec<Recommendation> {
	let mut results: Vec<Recommendation> = scored
		.into_iter()
		.map(|(item, score)| {
			if !score.is_finite() {
				tracing::warn!(item, score, "non-finite recommendation score");
			}
			Recommendation {
				item: item.to_string(),
				score,
			}
		})
		.collect();

	results.sort_by(|a, b| match (a.score.is_nan(), b.score.is_nan()) {
		(false, false) => b
			.score
			.partial_cmp(&a.score)
			.unwrap_or(std::cmp::Ordering::Equal),
		(a_nan, b_nan) => a_nan.cmp(&b_nan),
	});
	results.truncate(n);
	results
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
