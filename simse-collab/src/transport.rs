use std::io::{self, Write};

use serde::Serialize;

#[derive(Serialize)]
struct JsonRpcResponse<'a> {
	jsonrpc: &'a str,
	id: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	result: Option<serde_json::Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<JsonRpcErrorBody>,
}

#[derive(Serialize)]
struct JsonRpcErrorBody {
	code: i32,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	data: Option<serde_json::Value>,
}

/// Writes one JSON-RPC 2.0 message per line. Defaults to stdout; logging
/// goes to stderr so the two never interleave.
pub struct NdjsonTransport<W: Write = io::Stdout> {
	out: W,
}

impl Default for NdjsonTransport {
	fn default() -> Self {
		Self::new()
	}
}

impl NdjsonTransport {
	pub fn new() -> Self {
		Self { out: io::stdout() }
	}
}

impl<W: Write> NdjsonTransport<W> {
	pub fn with_writer(out: W) -> Self {
		Self { out }
	}

	pub fn into_inner(self) -> W {
		self.out
	}

	pub fn write_response(&mut self, id: u64, result: serde_json::Value) {
		self.write_line(&JsonRpcResponse {
			jsonrpc: "2.0",
			id,
			result: Some(result),
			error: None,
		});
	}

	pub fn write_error(
		&mut self,
		id: u64,
		code: i32,
		message: impl Into<String>,
		data: Option<serde_json::Value>,
	) {
		self.write_line(&JsonRpcResponse {
			jsonrpc: "2.0",
			id,
			result: None,
			error: Some(JsonRpcErrorBody {
				code,
				message: message.into(),
				data,
			}),
		});
	}

	fn write_line(&mut self, value: &impl Serialize) {
		if let Err(e) = serde_json::to_writer(&mut self.out, value) {
			tracing::error!("Failed to serialize: {}", e);
			return;
		}
		let _ = writeln!(self.out);
		let _ = self.out.flush();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn lines(transport: NdjsonTransport<Vec<u8>>) -> Vec<serde_json::Value> {
		let buf = transport.into_inner();
		String::from_utf8(buf)
			.unwrap()
			.lines()
			.map(|l| serde_json::from_str(l).unwrap())
			.collect()
	}

	#[test]
	fn response_line() {
		let mut t = NdjsonTransport::with_writer(Vec::new());
		t.write_response(4, serde_json::json!({ "count": 2 }));
		let out = lines(t);
		assert_eq!(out.len(), 1);
		assert_eq!(out[0]["jsonrpc"], "2.0");
		assert_eq!(out[0]["id"], 4);
		assert_eq!(out[0]["result"]["count"], 2);
		assert!(out[0].get("error").is_none());
	}

	#[test]
	fn error_line_omits_result() {
		let mut t = NdjsonTransport::with_writer(Vec::new());
		t.write_error(9, -32601, "Unknown method: nope", None);
		let out = lines(t);
		assert_eq!(out[0]["error"]["code"], -32601);
		assert!(out[0].get("result").is_none());
		assert!(out[0]["error"].get("data").is_none());
	}
}
