// ---------------------------------------------------------------------------
// RatingStore — mirrored user/item rating tables
// ---------------------------------------------------------------------------
//
// Holds every rating twice: once keyed user -> item and once keyed
// item -> user. Both tables are written by the same call and must never
// diverge. First-seen order of users and items is recorded so that every
// ranked output is deterministic.
//
// Not thread-safe: callers serialize access through `&mut`.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use crate::error::CollabError;
use crate::recommendation;
use crate::similarity::row_similarity;
use crate::types::{Rating, Recommendation, StoreStats};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default number of recommendations returned when the caller gives no limit.
pub const DEFAULT_LIMIT: usize = 5;

/// Configuration for a `RatingStore`.
#[derive(Debug, Clone)]
pub struct StoreConfig {
	pub default_limit: usize,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			default_limit: DEFAULT_LIMIT,
		}
	}
}

// ---------------------------------------------------------------------------
// RatingRow — one entity's ratings, in first-seen order
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub(crate) struct RatingRow {
	scores: HashMap<String, f64>,
	order: Vec<String>,
}

impl RatingRow {
	/// Insert or overwrite. Returns `true` when a previous score was replaced.
	fn insert(&mut self, key: &str, score: f64) -> bool {
		match self.scores.get_mut(key) {
			Some(existing) => {
				*existing = score;
				true
			}
			None => {
				self.scores.insert(key.to_string(), score);
				self.order.push(key.to_string());
				false
			}
		}
	}

	pub(crate) fn get(&self, key: &str) -> Option<f64> {
		self.scores.get(key).copied()
	}

	pub(crate) fn contains(&self, key: &str) -> bool {
		self.scores.contains_key(key)
	}

	pub(crate) fn len(&self) -> usize {
		self.order.len()
	}

	/// Entries in first-seen order.
	pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
		self.order
			.iter()
			.map(|k| (k.as_str(), self.scores.get(k).copied().unwrap_or_default()))
	}
}

// ---------------------------------------------------------------------------
// RatingStore
// ---------------------------------------------------------------------------

/// In-memory rating store with similarity and recommendation queries.
#[derive(Debug, Default)]
pub struct RatingStore {
	by_user: HashMap<String, RatingRow>,
	by_item: HashMap<String, RatingRow>,
	user_order: Vec<String>,
	item_order: Vec<String>,
	config: StoreConfig,
}

impl RatingStore {
	// -- Lifecycle -----------------------------------------------------------

	pub fn new(config: StoreConfig) -> Self {
		Self {
			config,
			..Default::default()
		}
	}

	pub fn config(&self) -> &StoreConfig {
		&self.config
	}

	/// Drop every rating. Configuration is kept.
	pub fn clear(&mut self) {
		self.by_user.clear();
		self.by_item.clear();
		self.user_order.clear();
		self.item_order.clear();
		tracing::debug!("rating store cleared");
	}

	// -- Writes --------------------------------------------------------------

	/// Insert or overwrite a rating in both tables. Returns `true` when an
	/// earlier rating for the same `(user, item)` pair was replaced.
	pub fn add_rating(&mut self, user: &str, item: &str, score: f64) -> bool {
		if !self.by_user.contains_key(user) {
			self.user_order.push(user.to_string());
		}
		if !self.by_item.contains_key(item) {
			self.item_order.push(item.to_string());
		}

		let overwritten = self
			.by_user
			.entry(user.to_string())
			.or_default()
			.insert(item, score);
		self.by_item
			.entry(item.to_string())
			.or_default()
			.insert(user, score);

		tracing::debug!(user, item, score, overwritten, "rating stored");
		overwritten
	}

	/// Apply ratings in order. Returns the number applied.
	pub fn add_batch<I>(&mut self, ratings: I) -> usize
	where
		I: IntoIterator<Item = Rating>,
	{
		let mut count = 0;
		for r in ratings {
			self.add_rating(&r.user, &r.item, r.score);
			count += 1;
		}
		count
	}

	// -- Reads ---------------------------------------------------------------

	pub fn rating(&self, user: &str, item: &str) -> Option<f64> {
		self.by_user.get(user).and_then(|row| row.get(item))
	}

	pub fn has_user(&self, user: &str) -> bool {
		self.by_user.contains_key(user)
	}

	pub fn has_item(&self, item: &str) -> bool {
		self.by_item.contains_key(item)
	}

	/// User ids in first-seen order.
	pub fn users(&self) -> &[String] {
		&self.user_order
	}

	/// Item ids in first-seen order.
	pub fn items(&self) -> &[String] {
		&self.item_order
	}

	/// `(item, score)` pairs for one user, or `None` for an unknown user.
	pub fn user_ratings(&self, user: &str) -> Option<Vec<(String, f64)>> {
		self.by_user.get(user).map(|row| {
			row.iter()
				.map(|(item, score)| (item.to_string(), score))
				.collect()
		})
	}

	/// `(user, score)` pairs for one item, or `None` for an unknown item.
	pub fn item_ratings(&self, item: &str) -> Option<Vec<(String, f64)>> {
		self.by_item.get(item).map(|row| {
			row.iter()
				.map(|(user, score)| (user.to_string(), score))
				.collect()
		})
	}

	pub fn stats(&self) -> StoreStats {
		StoreStats {
			users: self.user_order.len(),
			items: self.item_order.len(),
			ratings: self.by_user.values().map(RatingRow::len).sum(),
		}
	}

	pub(crate) fn user_row(&self, user: &str) -> Option<&RatingRow> {
		self.by_user.get(user)
	}

	pub(crate) fn item_row(&self, item: &str) -> Option<&RatingRow> {
		self.by_item.get(item)
	}

	// -- Similarity ----------------------------------------------------------

	/// Cosine similarity over the items both users rated. 0 when they share
	/// none. Fails when either user has no ratings.
	pub fn user_similarity(&self, a: &str, b: &str) -> Result<f64, CollabError> {
		let row_a = self
			.user_row(a)
			.ok_or_else(|| CollabError::UserNotFound(a.to_string()))?;
		let row_b = self
			.user_row(b)
			.ok_or_else(|| CollabError::UserNotFound(b.to_string()))?;
		Ok(row_similarity(row_a, row_b))
	}

	/// Cosine similarity over the users who rated both items. 0 when no user
	/// rated both. Fails when either item has no ratings.
	pub fn item_similarity(&self, a: &str, b: &str) -> Result<f64, CollabError> {
		let row_a = self
			.item_row(a)
			.ok_or_else(|| CollabError::ItemNotFound(a.to_string()))?;
		let row_b = self
			.item_row(b)
			.ok_or_else(|| CollabError::ItemNotFound(b.to_string()))?;
		Ok(row_similarity(row_a, row_b))
	}

	// -- Recommendation ------------------------------------------------------

	/// Neighbour-weighted scores for items `user` has not rated. Empty for an
	/// unknown user.
	pub fn user_based_recommendations(&self, user: &str, n: usize) -> Vec<Recommendation> {
		recommendation::user_based(self, user, n)
	}

	/// Predicted ratings for items `user` has not rated. Empty for an
	/// unknown user.
	pub fn item_based_recommendations(&self, user: &str, n: usize) -> Vec<Recommendation> {
		recommendation::item_based(self, user, n)
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_rating_writes_both_tables() {
		let mut store = RatingStore::default();
		store.add_rating("1", "m1", 5.0);

		assert_eq!(store.rating("1", "m1"), Some(5.0));
		assert_eq!(store.user_ratings("1").unwrap(), vec![("m1".to_string(), 5.0)]);
		assert_eq!(store.item_ratings("m1").unwrap(), vec![("1".to_string(), 5.0)]);
	}

	#[test]
	fn overwrite_keeps_single_entry_in_both_tables() {
		let mut store = RatingStore::default();
		assert!(!store.add_rating("1", "m1", 5.0));
		assert!(store.add_rating("1", "m1", 2.0));

		assert_eq!(store.user_ratings("1").unwrap(), vec![("m1".to_string(), 2.0)]);
		assert_eq!(store.item_ratings("m1").unwrap(), vec![("1".to_string(), 2.0)]);
		assert_eq!(store.stats().ratings, 1);
	}

	#[test]
	fn first_seen_order_is_kept() {
		let mut store = RatingStore::default();
		store.add_rating("2", "b", 1.0);
		store.add_rating("1", "a", 1.0);
		store.add_rating("2", "a", 1.0);
		store.add_rating("3", "c", 1.0);

		assert_eq!(store.users(), ["2", "1", "3"]);
		assert_eq!(store.items(), ["b", "a", "c"]);
		let items: Vec<String> = store
			.user_ratings("2")
			.unwrap()
			.into_iter()
			.map(|(i, _)| i)
			.collect();
		assert_eq!(items, vec!["b", "a"]);
	}

	#[test]
	fn unknown_entities() {
		let store = RatingStore::default();
		assert!(store.user_ratings("nobody").is_none());
		assert!(store.item_ratings("nothing").is_none());
		assert_eq!(store.rating("nobody", "nothing"), None);
		assert!(!store.has_user("nobody"));
	}

	#[test]
	fn stats_count_mirrored_entries_once() {
		let mut store = RatingStore::default();
		let n = store.add_batch(vec![
			Rating::new("1", "m1", 5.0),
			Rating::new("1", "m2", 3.0),
			Rating::new("2", "m1", 3.0),
		]);
		assert_eq!(n, 3);
		assert_eq!(
			store.stats(),
			StoreStats {
				users: 2,
				items: 2,
				ratings: 3,
			}
		);
	}

	#[test]
	fn clear_resets_everything() {
		let mut store = RatingStore::new(StoreConfig { default_limit: 3 });
		store.add_rating("1", "m1", 5.0);
		store.clear();
		assert_eq!(store.stats().ratings, 0);
		assert!(store.users().is_empty());
		assert_eq!(store.config().default_limit, 3);
	}

	#[test]
	fn similarity_on_unknown_ids_fails() {
		let mut store = RatingStore::default();
		store.add_rating("1", "m1", 5.0);

		let err = store.user_similarity("1", "9").unwrap_err();
		assert!(matches!(err, CollabError::UserNotFound(ref id) if id == "9"));
		let err = store.item_similarity("m7", "m1").unwrap_err();
		assert!(matches!(err, CollabError::ItemNotFound(ref id) if id == "m7"));
	}

	#[test]
	fn self_similarity_is_one() {
		let mut store = RatingStore::default();
		store.add_rating("1", "m1", 5.0);
		store.add_rating("1", "m2", 3.0);
		let sim = store.user_similarity("1", "1").unwrap();
		assert!((sim - 1.0).abs() < 1e-10);
	}

	#[test]
	fn similarity_is_symmetric() {
		let mut store = RatingStore::default();
		store.add_rating("1", "m1", 5.0);
		store.add_rating("1", "m2", 3.0);
		store.add_rating("1", "m3", 4.0);
		store.add_rating("2", "m3", 1.0);
		store.add_rating("2", "m2", 4.0);
		store.add_rating("2", "m1", 3.0);

		assert_eq!(
			store.user_similarity("1", "2").unwrap(),
			store.user_similarity("2", "1").unwrap()
		);
		assert_eq!(
			store.item_similarity("m1", "m3").unwrap(),
			store.item_similarity("m3", "m1").unwrap()
		);
	}

	#[test]
	fn no_overlap_is_zero() {
		let mut store = RatingStore::default();
		store.add_rating("1", "m1", 5.0);
		store.add_rating("2", "m2", 4.0);
		assert_eq!(store.user_similarity("1", "2").unwrap(), 0.0);
		assert_eq!(store.item_similarity("m1", "m2").unwrap(), 0.0);
	}
}
