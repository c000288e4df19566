use clap::Parser;
use simse_collab::config::{CliArgs, Command};
use simse_collab::demo;
use simse_collab::server::CollabServer;
use simse_collab::store::RatingStore;
use simse_collab::transport::NdjsonTransport;

fn main() {
	let args = CliArgs::parse();

	// Logging goes to stderr; stdout carries the protocol
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
		)
		.init();

	let store = RatingStore::new(args.store_config());

	match args.command() {
		Command::Demo => {
			let mut store = store;
			let seeded = demo::seed(&mut store);
			tracing::debug!(seeded, "sample ratings loaded");
			print!("{}", demo::report(&store));
		}
		Command::Serve => {
			let mut server = CollabServer::new(NdjsonTransport::new(), store);

			tracing::info!(
				default_limit = server.store().config().default_limit,
				"simse-collab ready"
			);

			if let Err(e) = server.run() {
				tracing::error!("Server error: {}", e);
				std::process::exit(1);
			}
		}
	}
}
