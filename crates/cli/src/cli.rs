use clap::{Args, Parser, Subcommand, ValueEnum};
use droid::SessionMode;

use crate::styles::cli_styles;

#[derive(Parser, Debug)]
#[command(name = "droid")]
#[command(about = "Open, drive and tear down Android automation sessions")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Override a configuration value; wins over the environment (repeatable)
	#[arg(short = 'D', long = "define", global = true, value_name = "KEY=VALUE", value_parser = parse_override)]
	pub overrides: Vec<(String, String)>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Open a session, optionally hold it, then close it and print the close report.
	Run(RunArgs),
	/// Print the new-session payload without starting anything.
	Capabilities(ModeArgs),
	/// Print the endpoint a session would connect to (credentials redacted).
	Endpoint(EndpointArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
	#[arg(long, value_enum, default_value_t = Mode::Local)]
	pub mode: Mode,

	/// Keep the session open this long before closing (Ctrl-C closes early).
	#[arg(long, value_name = "SECS")]
	pub hold: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ModeArgs {
	#[arg(long, value_enum, default_value_t = Mode::Local)]
	pub mode: Mode,
}

#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
	#[arg(long, value_enum, default_value_t = Mode::Cloud)]
	pub mode: Mode,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	/// Start a local Appium server
	Local,
	/// Use the cloud grid
	Cloud,
}

impl From<Mode> for SessionMode {
	fn from(mode: Mode) -> Self {
		match mode {
			Mode::Local => SessionMode::Local,
			Mode::Cloud => SessionMode::Cloud,
		}
	}
}

fn parse_override(raw: &str) -> Result<(String, String), String> {
	match raw.split_once('=') {
		Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
		_ => Err(format!("expected KEY=VALUE, got {raw:?}")),
	}
}
