use std::error::Error as _;

use clap::Parser;
use droid_cli::{cli::Cli, commands, logging};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = commands::dispatch(cli).await {
		eprintln!("Error: {err}");
		let mut source = err.source();
		while let Some(cause) = source {
			eprintln!("  caused by: {cause}");
			source = cause.source();
		}
		std::process::exit(err.exit_code());
	}
}
