//! In-memory collaborative filtering: a mirrored user/item rating store,
//! co-rating cosine similarity, and user-based / item-based
//! recommendations, served over JSON-RPC 2.0 on stdio.

pub mod config;
pub mod cosine;
pub mod demo;
pub mod error;
pub mod protocol;
pub mod recommendation;
pub mod server;
pub mod similarity;
pub mod store;
pub mod transport;
pub mod types;

pub use error::CollabError;
pub use store::{RatingStore, StoreConfig};
pub use types::{Rating, Recommendation, StoreStats};
