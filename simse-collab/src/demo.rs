//! Sample data set and a plain-text report of both recommendation modes.

use std::fmt::Write;

use crate::store::RatingStore;
use crate::types::{Rating, Recommendation};

/// Three users rating four movies.
pub const SAMPLE_RATINGS: [(u32, &str, f64); 9] = [
	(1, "movie1", 5.0),
	(1, "movie2", 3.0),
	(1, "movie3", 4.0),
	(2, "movie1", 3.0),
	(2, "movie2", 4.0),
	(2, "movie4", 5.0),
	(3, "movie1", 4.0),
	(3, "movie3", 5.0),
	(3, "movie4", 2.0),
];

/// The user the demo reports on.
pub const DEMO_USER: &str = "1";

pub fn seed(store: &mut RatingStore) -> usize {
	store.add_batch(
		SAMPLE_RATINGS
			.iter()
			.map(|&(user, item, score)| Rating::new(user.to_string(), item, score)),
	)
}

/// Render both recommendation lists for [`DEMO_USER`].
pub fn report(store: &RatingStore) -> String {
	let limit = store.config().default_limit;
	let mut out = String::new();
	let _ = writeln!(out, "User-based recommendations for user {DEMO_USER}:");
	write_list(&mut out, &store.user_based_recommendations(DEMO_USER, limit));
	let _ = writeln!(out);
	let _ = writeln!(out, "Item-based recommendations for user {DEMO_USER}:");
	write_list(&mut out, &store.item_based_recommendations(DEMO_USER, limit));
	out
}

fn write_list(out: &mut String, recommendations: &[Recommendation]) {
	if recommendations.is_empty() {
		let _ = writeln!(out, "  (none)");
		return;
	}
	for (rank, r) in recommendations.iter().enumerate() {
		let _ = writeln!(out, "  {}. {} ({:.4})", rank + 1, r.item, r.score);
	}
}
