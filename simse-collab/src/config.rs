use clap::{Parser, Subcommand};

use crate::store::{StoreConfig, DEFAULT_LIMIT};

#[derive(Parser, Debug)]
#[command(
	name = "simse-collab",
	about = "Collaborative filtering engine over JSON-RPC 2.0 / NDJSON stdio"
)]
pub struct CliArgs {
	/// Number of recommendations returned when a request gives no limit
	#[arg(long, default_value_t = DEFAULT_LIMIT, env = "SIMSE_COLLAB_DEFAULT_LIMIT")]
	pub default_limit: usize,

	/// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
	#[arg(long, default_value = "info", env = "SIMSE_COLLAB_LOG_LEVEL")]
	pub log_level: String,

	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
	/// Serve JSON-RPC requests on stdin/stdout (default)
	Serve,
	/// Seed the sample ratings and print recommendations for user 1
	Demo,
}

impl CliArgs {
	pub fn command(&self) -> Command {
		self.command.unwrap_or(Command::Serve)
	}

	pub fn store_config(&self) -> StoreConfig {
		StoreConfig {
			default_limit: self.default_limit,
		}
	}
}
