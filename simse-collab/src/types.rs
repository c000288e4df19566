use serde::{Deserialize, Serialize};

/// One ranked entry of a recommendation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
	pub item: String,
	pub score: f64,
}

/// A single `(user, item, score)` observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
	pub user: String,
	pub item: String,
	pub score: f64,
}

impl Rating {
	pub fn new(user: impl Into<String>, item: impl Into<String>, score: f64) -> Self {
		Self {
			user: user.into(),
			item: item.into(),
			score,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
	pub users: usize,
	pub items: usize,
	pub ratings: usize,
}
