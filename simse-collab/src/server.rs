// ---------------------------------------------------------------------------
// CollabServer — JSON-RPC dispatcher
// ---------------------------------------------------------------------------
//
// Routes incoming JSON-RPC 2.0 requests (NDJSON over stdin) to RatingStore
// operations: a main `run()` loop, a `dispatch()` match, and free-standing
// handler functions for each method.
// ---------------------------------------------------------------------------

use std::io::{self, BufRead, Write};

use serde::Deserialize;

use crate::error::CollabError;
use crate::protocol::*;
use crate::store::RatingStore;
use crate::transport::NdjsonTransport;
use crate::types::Rating;

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// JSON-RPC server that owns a single [`RatingStore`].
pub struct CollabServer<W: Write = io::Stdout> {
	transport: NdjsonTransport<W>,
	store: RatingStore,
}

impl CollabServer {
	/// Main loop: read JSON-RPC messages from stdin, dispatch to handlers.
	pub fn run(&mut self) -> Result<(), CollabError> {
		let stdin = io::stdin();
		self.serve(stdin.lock())
	}
}

impl<W: Write> CollabServer<W> {
	pub fn new(transport: NdjsonTransport<W>, store: RatingStore) -> Self {
		Self { transport, store }
	}

	pub fn store(&self) -> &RatingStore {
		&self.store
	}

	pub fn into_transport(self) -> NdjsonTransport<W> {
		self.transport
	}

	/// Serve requests from any line reader until EOF.
	pub fn serve<R: BufRead>(&mut self, reader: R) -> Result<(), CollabError> {
		for line_result in reader.lines() {
			let line = line_result?;
			if line.trim().is_empty() {
				continue;
			}

			let request: JsonRpcRequest = match serde_json::from_str(&line) {
				Ok(r) => r,
				Err(e) => {
					tracing::error!("Failed to parse request: {}", e);
					continue;
				}
			};

			self.dispatch(request);
		}

		tracing::info!("input closed, shutting down");
		Ok(())
	}

	// ── Dispatch ──────────────────────────────────────────────────────────

	fn dispatch(&mut self, req: JsonRpcRequest) {
		let id = req.id;
		tracing::debug!(id, method = %req.method, "dispatch");

		let store = &mut self.store;
		let result = match req.method.as_str() {
			// -- Ratings -------------------------------------------------
			"rating/add" => handle_add(store, req.params),
			"rating/addBatch" => handle_add_batch(store, req.params),
			"rating/get" => handle_get(store, req.params),
			"user/ratings" => handle_user_ratings(store, req.params),
			"item/ratings" => handle_item_ratings(store, req.params),

			// -- Similarity ----------------------------------------------
			"similarity/users" => handle_user_similarity(store, req.params),
			"similarity/items" => handle_item_similarity(store, req.params),

			// -- Recommendation ------------------------------------------
			"recommend/userBased" => handle_user_based(store, req.params),
			"recommend/itemBased" => handle_item_based(store, req.params),

			// -- Store ---------------------------------------------------
			"store/stats" => serde_json::to_value(store.stats())
				.map_err(|e| CollabError::Serialization(e.to_string())),
			"store/clear" => {
				store.clear();
				Ok(serde_json::json!({}))
			}

			// -- Unknown -------------------------------------------------
			_ => {
				self.transport.write_error(
					id,
					METHOD_NOT_FOUND,
					format!("Unknown method: {}", req.method),
					None,
				);
				return;
			}
		};

		match result {
			Ok(value) => self.transport.write_response(id, value),
			Err(e) => {
				let code = match e {
					CollabError::InvalidParams(_) => INVALID_PARAMS,
					CollabError::Io(_) | CollabError::Serialization(_) => INTERNAL_ERROR,
					_ => COLLAB_ERROR,
				};
				self.transport.write_error(id, code, e.to_string(), Some(e.to_json_rpc_error()))
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Param types
// ---------------------------------------------------------------------------

fn parse_params<T: serde::de::DeserializeOwned>(
	params: serde_json::Value,
) -> Result<T, CollabError> {
	serde_json::from_value(params).map_err(|e| CollabError::InvalidParams(e.to_string()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingParams {
	#[serde(deserialize_with = "deserialize_id")]
	user_id: String,
	#[serde(deserialize_with = "deserialize_id")]
	item_id: String,
	score: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddBatchParams {
	ratings: Vec<RatingParams>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PairParams {
	#[serde(deserialize_with = "deserialize_id")]
	user_id: String,
	#[serde(deserialize_with = "deserialize_id")]
	item_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserParams {
	#[serde(deserialize_with = "deserialize_id")]
	user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemParams {
	#[serde(deserialize_with = "deserialize_id")]
	item_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimilarityParams {
	#[serde(deserialize_with = "deserialize_id")]
	a: String,
	#[serde(deserialize_with = "deserialize_id")]
	b: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendParams {
	#[serde(deserialize_with = "deserialize_id")]
	user_id: String,
	limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Free-standing handler functions
// ---------------------------------------------------------------------------

fn handle_add(
	store: &mut RatingStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, CollabError> {
	let p: RatingParams = parse_params(params)?;
	let overwritten = store.add_rating(&p.user_id, &p.item_id, p.score);
	Ok(serde_json::json!({ "overwritten": overwritten }))
}

fn handle_add_batch(
	store: &mut RatingStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, CollabError> {
	let p: AddBatchParams = parse_params(params)?;
	let count = store.add_batch(
		p.ratings
			.into_iter()
			.map(|r| Rating::new(r.user_id, r.item_id, r.score)),
	);
	Ok(serde_json::json!({ "count": count }))
}

fn handle_get(
	store: &RatingStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, CollabError> {
	let p: PairParams = parse_params(params)?;
	Ok(serde_json::json!({ "score": store.rating(&p.user_id, &p.item_id) }))
}

fn handle_user_ratings(
	store: &RatingStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, CollabError> {
	let p: UserParams = parse_params(params)?;
	let ratings = store
		.user_ratings(&p.user_id)
		.ok_or(CollabError::UserNotFound(p.user_id))?;
	let ratings: Vec<serde_json::Value> = ratings
		.into_iter()
		.map(|(item, score)| serde_json::json!({ "itemId": item, "score": score }))
		.collect();
	Ok(serde_json::json!({ "ratings": ratings }))
}

fn handle_item_ratings(
	store: &RatingStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, CollabError> {
	let p: ItemParams = parse_params(params)?;
	let ratings = store
		.item_ratings(&p.item_id)
		.ok_or(CollabError::ItemNotFound(p.item_id))?;
	let ratings: Vec<serde_json::Value> = ratings
		.into_iter()
		.map(|(user, score)| serde_json::json!({ "userId": user, "score": score }))
		.collect();
	Ok(serde_json::json!({ "ratings": ratings }))
}

fn handle_user_similarity(
	store: &RatingStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, CollabError> {
	let p: SimilarityParams = parse_params(params)?;
	let similarity = store.user_similarity(&p.a, &p.b)?;
	Ok(serde_json::json!({ "similarity": similarity }))
}

fn handle_item_similarity(
	store: &RatingStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, CollabError> {
	let p: SimilarityParams = parse_params(params)?;
	let similarity = store.item_similarity(&p.a, &p.b)?;
	Ok(serde_json::json!({ "similarity": similarity }))
}

fn handle_user_based(
	store: &RatingStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, CollabError> {
	let p: RecommendParams = parse_params(params)?;
	let limit = p.limit.unwrap_or(store.config().default_limit);
	let recommendations = store.user_based_recommendations(&p.user_id, limit);
	Ok(serde_json::json!({ "recommendations": recommendations }))
}

fn handle_item_based(
	store: &RatingStore,
	params: serde_json::Value,
) -> Result<serde_json::Value, CollabError> {
	let p: RecommendParams = parse_params(params)?;
	let limit = p.limit.unwrap_or(store.config().default_limit);
	let recommendations = store.item_based_recommendations(&p.user_id, limit);
	Ok(serde_json::json!({ "recommendations": recommendations }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
