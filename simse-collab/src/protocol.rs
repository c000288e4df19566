use serde::{Deserialize, Deserializer};

// JSON-RPC 2.0 error codes
pub const INTERNAL_ERROR: i32 = -32603;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const COLLAB_ERROR: i32 = -32000;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
	pub id: u64,
	pub method: String,
	#[serde(default)]
	pub params: serde_json::Value,
}

/// User and item ids arrive either as JSON strings or integers. Both map
/// to the same string key, so `1` and `"1"` address the same entity.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawId {
		Text(String),
		Unsigned(u64),
		Signed(i64),
	}

	Ok(match RawId::deserialize(deserializer)? {
		RawId::Text(s) => s,
		RawId::Unsigned(n) => n.to_string(),
		RawId::Signed(n) => n.to_string(),
	})
}
