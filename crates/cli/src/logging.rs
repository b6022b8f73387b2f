use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Filter directive for `-v` count. `RUST_LOG` wins when set.
pub fn filter_for(verbosity: u8) -> &'static str {
	// 0 = warnings only (failed close steps, unsaved recordings)
	// 1 (-v) = info for droid crates
	// 2+ (-vv) = debug for droid crates, including every WebDriver command
	match verbosity {
		0 => "warn",
		1 => "warn,droid=info",
		_ => "info,droid=debug",
	}
}

/// Module targets are noise until `-vv`, where they tell WebDriver traffic from server output.
pub fn shows_targets(verbosity: u8) -> bool {
	verbosity > 1
}

/// Installs the stderr subscriber. Colors only when stderr is a terminal.
pub fn init_logging(verbosity: u8) {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_for(verbosity)));

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.with_target(shows_targets(verbosity))
		.without_time()
		.compact()
		.init();
}
