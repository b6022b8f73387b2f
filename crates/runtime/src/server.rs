//! Local Appium server management
//!
//! Launches the server process with a fixed argument set, waits until its
//! status endpoint answers, and stops it again.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use crate::driver::{ServerLocator, get_server_executable};
use crate::error::{Error, Result};

/// Base path the server mounts the WebDriver routes under.
pub const DEFAULT_BASE_PATH: &str = "/wd/hub";

/// Time allowed between spawn and a successful status check.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(20);

const READINESS_POLL_INTERVAL: Duration = Duration::from_millis(500);
const STATUS_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Startup flags passed to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerArgs {
	pub base_path: String,
	/// Drivers the server is allowed to load.
	pub drivers: Vec<String>,
	/// Replace a stale session instead of rejecting the new one.
	pub session_override: bool,
	/// Insecure features enabled on the server.
	pub allow_insecure: Vec<String>,
}

impl Default for ServerArgs {
	fn default() -> Self {
		Self {
			base_path: DEFAULT_BASE_PATH.to_string(),
			drivers: vec!["uiautomator2".to_string()],
			session_override: true,
			allow_insecure: vec!["chromedriver_autodownload".to_string(), "adb_screen_streaming".to_string()],
		}
	}
}

impl ServerArgs {
	/// Renders the full command line for `host:port`, logging to `log_file`.
	pub fn to_args(&self, host: &str, port: u16, log_file: &Path) -> Vec<OsString> {
		let mut args: Vec<OsString> = vec![
			"--address".into(),
			host.into(),
			"--port".into(),
			port.to_string().into(),
			"--base-path".into(),
			self.base_path.clone().into(),
		];
		if !self.drivers.is_empty() {
			args.push("--use-drivers".into());
			args.push(self.drivers.join(",").into());
		}
		if self.session_override {
			args.push("--session-override".into());
		}
		if !self.allow_insecure.is_empty() {
			args.push("--allow-insecure".into());
			args.push(self.allow_insecure.join(",").into());
		}
		args.push("--log".into());
		args.push(log_file.as_os_str().to_os_string());
		args
	}
}

/// Everything needed to start one server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
	/// Server log destination. Parent directories are created on start.
	pub log_file: PathBuf,
	pub locator: ServerLocator,
	pub args: ServerArgs,
	pub startup_timeout: Duration,
}

impl ServerConfig {
	/// Creates a config with the default argument set and startup timeout.
	pub fn new(host: impl Into<String>, port: u16, log_file: impl Into<PathBuf>) -> Self {
		Self {
			host: host.into(),
			port,
			log_file: log_file.into(),
			locator: ServerLocator::default(),
			args: ServerArgs::default(),
			startup_timeout: DEFAULT_STARTUP_TIMEOUT,
		}
	}

	/// URL the server will answer on once started.
	pub fn url(&self) -> Result<Url> {
		let raw = format!("http://{}:{}{}", self.host, self.port, self.args.base_path);
		Url::parse(&raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))
	}
}

/// Manages the Appium server process lifecycle
///
/// Owned exclusively by whoever started it. Dropping the handle kills the
/// process; [`AppiumServer::stop`] is the orderly path.
#[derive(Debug)]
pub struct AppiumServer {
	process: Child,
	url: Url,
	log_file: PathBuf,
}

impl AppiumServer {
	/// Launch the server and wait until it answers `GET <url>/status`.
	///
	/// # Errors
	///
	/// Returns `Error::ServerNotFound`/`Error::BinaryMissing` if no executable is found,
	/// `Error::LaunchFailed` if the process cannot spawn or exits during startup, and
	/// `Error::StartupTimeout` if it never becomes ready. The process is killed
	/// before any readiness error is returned.
	pub async fn start(config: &ServerConfig) -> Result<Self> {
		let executable = get_server_executable(&config.locator)?;
		let url = config.url()?;

		if let Some(parent) = config.log_file.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}

		let args = config.args.to_args(&config.host, config.port, &config.log_file);
		debug!(
			target = "droid.server",
			executable = %executable.display(),
			?args,
			"spawning appium server"
		);

		let mut cmd = Command::new(&executable);
		cmd.args(&args)
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::inherit())
			.kill_on_drop(true);

		let child = cmd
			.spawn()
			.map_err(|e| Error::LaunchFailed(format!("Failed to spawn {}: {e}", executable.display())))?;

		let mut server = Self {
			process: child,
			url,
			log_file: config.log_file.clone(),
		};

		if let Err(err) = server.wait_until_ready(config.startup_timeout).await {
			warn!(target = "droid.server", error = %err, "appium server failed to start");
			let _ = server.process.kill().await;
			return Err(err);
		}

		info!(
			target = "droid.server",
			url = %server.url,
			pid = ?server.pid(),
			log = %server.log_file.display(),
			"appium server ready"
		);
		Ok(server)
	}

	/// Bound server URL, e.g. `http://127.0.0.1:4723/wd/hub`.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// OS process id while the process has not been reaped.
	pub fn pid(&self) -> Option<u32> {
		self.process.id()
	}

	pub fn log_file(&self) -> &Path {
		&self.log_file
	}

	/// Returns true while the process has not exited.
	pub fn is_running(&mut self) -> bool {
		matches!(self.process.try_wait(), Ok(None))
	}

	/// Stops the server if it is still running.
	pub async fn stop(mut self) -> Result<()> {
		if !self.is_running() {
			debug!(target = "droid.server", url = %self.url, "appium server already exited");
			return Ok(());
		}

		self.process
			.kill()
			.await
			.map_err(|e| Error::StopFailed(format!("Failed to kill process: {e}")))?;

		info!(target = "droid.server", url = %self.url, "appium server stopped");
		Ok(())
	}

	async fn wait_until_ready(&mut self, timeout: Duration) -> Result<()> {
		let status_url = format!("{}/status", self.url.as_str().trim_end_matches('/'));
		let client = reqwest::Client::builder()
			.timeout(STATUS_PROBE_TIMEOUT)
			.build()
			.map_err(|e| Error::LaunchFailed(format!("Failed to build status client: {e}")))?;
		let deadline = Instant::now() + timeout;

		loop {
			match self.process.try_wait() {
				Ok(Some(status)) => {
					return Err(Error::LaunchFailed(format!(
						"Server process exited during startup with status: {status}. See {}",
						self.log_file.display()
					)));
				}
				Ok(None) => {}
				Err(e) => {
					return Err(Error::LaunchFailed(format!("Failed to check process status: {e}")));
				}
			}

			match client.get(&status_url).send().await {
				Ok(response) if response.status().is_success() => return Ok(()),
				Ok(response) => debug!(target = "droid.server", status = %response.status(), "status check not ready"),
				Err(err) => debug!(target = "droid.server", error = %err, "status check failed"),
			}

			if Instant::now() >= deadline {
				return Err(Error::StartupTimeout {
					url: self.url.to_string(),
					timeout,
				});
			}
			tokio::time::sleep(READINESS_POLL_INTERVAL).await;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_args_render_fixed_flags() {
		let args = ServerArgs::default().to_args("127.0.0.1", 4723, Path::new("/work/logs/appium.log"));
		let args: Vec<String> = args.into_iter().map(|a| a.to_string_lossy().into_owned()).collect();
		assert_eq!(
			args,
			[
				"--address",
				"127.0.0.1",
				"--port",
				"4723",
				"--base-path",
				"/wd/hub",
				"--use-drivers",
				"uiautomator2",
				"--session-override",
				"--allow-insecure",
				"chromedriver_autodownload,adb_screen_streaming",
				"--log",
				"/work/logs/appium.log",
			]
		);
	}

	#[test]
	fn empty_optional_flags_are_omitted() {
		let args = ServerArgs {
			drivers: Vec::new(),
			session_override: false,
			allow_insecure: Vec::new(),
			..Default::default()
		};
		let rendered = args.to_args("0.0.0.0", 4724, Path::new("appium.log"));
		assert_eq!(rendered.len(), 8);
		assert!(!rendered.iter().any(|a| a == "--session-override"));
	}

	#[test]
	fn config_url_includes_base_path() {
		let config = ServerConfig::new("127.0.0.1", 4723, "appium.log");
		let url = config.url().unwrap();
		assert_eq!(url.as_str(), "http://127.0.0.1:4723/wd/hub");
		assert_eq!(url.port(), Some(4723));
	}

	#[test]
	fn config_url_rejects_garbage_host() {
		let config = ServerConfig::new("bad host", 4723, "appium.log");
		assert!(matches!(config.url(), Err(Error::InvalidUrl(_))));
	}
}
