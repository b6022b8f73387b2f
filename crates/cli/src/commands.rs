use std::time::Duration;

use anyhow::Context;
use droid::endpoint::{CloudEndpoint, redact};
use droid::{ConfigSource, SessionCoordinator, SessionMode, Settings, WebDriverConnector, capabilities};
use serde_json::Value;
use tracing::{info, warn};

use crate::cli::{Cli, Commands, RunArgs};
use crate::error::Result;
use crate::report;

/// Snapshots the environment, applies `-D` overrides, and runs the command.
pub async fn dispatch(cli: Cli) -> Result<()> {
	let source = snapshot_source(cli.overrides)?;

	match cli.command {
		Commands::Run(args) => run(&source, args).await,
		Commands::Capabilities(args) => {
			let payload = capabilities_payload(&source, args.mode.into())?;
			println!("{}", serde_json::to_string_pretty(&payload)?);
			Ok(())
		}
		Commands::Endpoint(args) => {
			println!("{}", endpoint_display(&source, args.mode.into())?);
			Ok(())
		}
	}
}

/// Process environment and working directory, with `overrides` applied on top.
pub fn snapshot_source(overrides: Vec<(String, String)>) -> Result<ConfigSource> {
	let mut source = ConfigSource::from_env().context("failed to read the working directory")?;
	source.apply_overrides(overrides);
	Ok(source)
}

async fn run(source: &ConfigSource, args: RunArgs) -> Result<()> {
	let mode = SessionMode::from(args.mode);
	let settings = Settings::resolve(mode, source)?;
	let mut session = SessionCoordinator::new(settings, WebDriverConnector::new()?);

	if let Err(err) = session.open().await {
		print_report(&session.close().await);
		return Err(err.into());
	}

	if let Some(endpoint) = session.endpoint() {
		for line in report::render_open(endpoint, session.session_id().unwrap_or_default()) {
			println!("{line}");
		}
	}

	if let Some(secs) = args.hold {
		hold(Duration::from_secs(secs)).await;
	}

	let report = session.close().await;
	print_report(&report);
	report.into_result()?;
	Ok(())
}

async fn hold(duration: Duration) {
	info!(target = "droid", secs = duration.as_secs(), "holding session open");
	tokio::select! {
		_ = tokio::time::sleep(duration) => {}
		signal = tokio::signal::ctrl_c() => match signal {
			Ok(()) => info!(target = "droid", "interrupted, closing session"),
			Err(err) => warn!(target = "droid", error = %err, "failed to listen for Ctrl-C"),
		},
	}
}

fn print_report(report: &droid::CloseReport) {
	for line in report::render(report) {
		println!("{line}");
	}
}

/// New-session payload for `mode`. No process or network action.
pub fn capabilities_payload(source: &ConfigSource, mode: SessionMode) -> Result<Value> {
	let settings = Settings::resolve(mode, source)?;
	let descriptor = capabilities::build(mode, &settings.device, &settings.source)?;
	Ok(descriptor.new_session_payload())
}

/// Endpoint URL with any access key masked.
///
/// Local mode reports the address the server would bind; nothing is started.
pub fn endpoint_display(source: &ConfigSource, mode: SessionMode) -> Result<String> {
	match mode {
		SessionMode::Cloud => Ok(redact(&CloudEndpoint::resolve(source)?.url)),
		SessionMode::Local => {
			let settings = Settings::resolve(mode, source)?;
			let url = settings.connection.server_config().url().map_err(droid::Error::from)?;
			Ok(url.to_string())
		}
	}
}
