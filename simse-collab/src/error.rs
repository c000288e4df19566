use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollabError {
	#[error("User not found: {0}")]
	UserNotFound(String),
	#[error("Item not found: {0}")]
	ItemNotFound(String),
	#[error("Invalid params: {0}")]
	InvalidParams(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Serialization error: {0}")]
	Serialization(String),
}

impl CollabError {
	pub fn code(&self) -> &str {
		match self {
			Self::UserNotFound(_) => "COLLAB_USER_NOT_FOUND",
			Self::ItemNotFound(_) => "COLLAB_ITEM_NOT_FOUND",
			Self::InvalidParams(_) => "COLLAB_INVALID_PARAMS",
			Self::Io(_) => "COLLAB_IO",
			Self::Serialization(_) => "COLLAB_SERIALIZATION",
		}
	}

	pub fn to_json_rpc_error(&self) -> serde_json::Value {
		serde_json::json!({
			"collabCode": self.code(),
			"message": self.to_string(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn codes_are_stable() {
		assert_eq!(
			CollabError::UserNotFound("7".into()).code(),
			"COLLAB_USER_NOT_FOUND"
		);
		assert_eq!(
			CollabError::ItemNotFound("m1".into()).code(),
			"COLLAB_ITEM_NOT_FOUND"
		);
	}

	#[test]
	fn json_rpc_error_carries_code_and_message() {
		let err = CollabError::ItemNotFound("movie9".into());
		let value = err.to_json_rpc_error();
		assert_eq!(value["collabCode"], "COLLAB_ITEM_NOT_FOUND");
		assert_eq!(value["message"], "Item not found: movie9");
	}
}
