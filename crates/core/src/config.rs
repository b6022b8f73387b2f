//! Configuration resolution.
//!
//! [`ConfigSource`] is a snapshot of named values taken once at startup
//! (process environment plus explicit overrides). [`Settings::resolve`] turns
//! it into typed connection, device, and extension parameters without any
//! network or process side effects.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use droid_runtime::{ServerConfig, ServerLocator};

use crate::error::ConfigError;

/// Configuration keys understood by the resolver.
pub mod keys {
	pub const HOST: &str = "host";
	pub const PORT: &str = "port";
	pub const DEVICE_NAME: &str = "deviceName";
	pub const DEVICE_VERSION: &str = "deviceVersion";
	pub const HEADLESS: &str = "headless";
	pub const APP_PATH: &str = "appPath";
	pub const SERVER_STARTUP_TIMEOUT: &str = "serverStartupTimeout";
	pub const STREAMING: &str = "streaming";
	pub const RECORDING: &str = "recording";
	pub const SWIPE: &str = "swipe";
	pub const APPIUM_BINARY: &str = "APPIUM_BINARY";
	/// Bin directory of the Node.js runtime (set by nvm).
	pub const RUNTIME_BIN_DIR: &str = "NVM_BIN";
	pub const SEARCH_PATH: &str = "PATH";
	pub const LT_USERNAME: &str = "LT_USERNAME";
	pub const LT_ACCESS_KEY: &str = "LT_ACCESS_KEY";
	pub const LT_APP_ANDROID: &str = "LT_APP_ANDROID";
	pub const LT_HUB: &str = "LT_HUB";
}

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4723;
pub const DEFAULT_DEVICE_NAME: &str = "Pixel_6_Pro";
pub const DEFAULT_PLATFORM_VERSION: &str = "11";

/// App package under test, relative to the working directory.
pub const APP_RESOURCE: &str = "src/test/resources/proverbial.apk";

/// Server log file, relative to the working directory.
pub const SERVER_LOG: &str = "logs/appium.log";

/// Where the remote session is hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
	/// Start a local Appium server and drive an emulator/device through it.
	#[default]
	Local,
	/// Use a pre-existing cloud grid.
	Cloud,
}

impl fmt::Display for SessionMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SessionMode::Local => f.write_str("local"),
			SessionMode::Cloud => f.write_str("cloud"),
		}
	}
}

impl FromStr for SessionMode {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"local" => Ok(SessionMode::Local),
			"cloud" => Ok(SessionMode::Cloud),
			_ => Err(ConfigError::InvalidValue {
				key: "mode".to_string(),
				value: s.to_string(),
				expected: "local or cloud",
			}),
		}
	}
}

/// Snapshot of named configuration values.
///
/// Empty values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
	values: BTreeMap<String, String>,
	work_dir: PathBuf,
}

impl ConfigSource {
	/// Creates an empty source rooted at `work_dir`.
	pub fn new(work_dir: impl Into<PathBuf>) -> Self {
		Self {
			values: BTreeMap::new(),
			work_dir: work_dir.into(),
		}
	}

	/// Snapshots the process environment and current directory.
	pub fn from_env() -> std::io::Result<Self> {
		let mut source = Self::new(std::env::current_dir()?);
		source.values.extend(std::env::vars());
		Ok(source)
	}

	/// Sets `key`, replacing any earlier value.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.set(key, value);
		self
	}

	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.values.insert(key.into(), value.into());
	}

	/// Applies `key=value` overrides on top of the snapshot.
	pub fn apply_overrides<I, K, V>(&mut self, overrides: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		for (key, value) in overrides {
			self.set(key, value);
		}
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.values.get(key).map(String::as_str).filter(|v| !v.is_empty())
	}

	pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
		self.get(key).unwrap_or(default)
	}

	/// Returns the value or a [`ConfigError::MissingValue`] naming `key`.
	pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
		self.get(key).ok_or_else(|| ConfigError::MissingValue { name: key.to_string() })
	}

	/// Parses `key` when set, otherwise returns `default`.
	pub fn parse_or<T: FromStr>(&self, key: &str, default: T, expected: &'static str) -> Result<T, ConfigError> {
		match self.get(key) {
			None => Ok(default),
			Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
				key: key.to_string(),
				value: raw.to_string(),
				expected,
			}),
		}
	}

	/// Reads a `true`/`false` flag (case-insensitive).
	pub fn flag_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
		match self.get(key) {
			None => Ok(default),
			Some(raw) if raw.trim().eq_ignore_ascii_case("true") => Ok(true),
			Some(raw) if raw.trim().eq_ignore_ascii_case("false") => Ok(false),
			Some(raw) => Err(ConfigError::InvalidValue {
				key: key.to_string(),
				value: raw.to_string(),
				expected: "true or false",
			}),
		}
	}

	/// Directory relative paths (app, logs, videos) are resolved against.
	pub fn work_dir(&self) -> &Path {
		&self.work_dir
	}
}

/// Connection parameters for the automation server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
	pub host: String,
	pub port: u16,
	pub log_file: PathBuf,
	/// Explicit server executable. Local mode only.
	pub server_binary: Option<PathBuf>,
	pub runtime_bin_dir: Option<PathBuf>,
	pub search_path: Option<String>,
	pub startup_timeout: Duration,
	pub work_dir: PathBuf,
}

impl ConnectionConfig {
	/// Server launch parameters for local mode.
	pub fn server_config(&self) -> ServerConfig {
		let mut config = ServerConfig::new(self.host.clone(), self.port, self.log_file.clone());
		config.locator = ServerLocator {
			explicit: self.server_binary.clone(),
			runtime_bin_dir: self.runtime_bin_dir.clone(),
			search_path: self.search_path.clone(),
		};
		config.startup_timeout = self.startup_timeout;
		config
	}

	/// Directory recording artifacts are written to.
	pub fn videos_dir(&self) -> PathBuf {
		self.work_dir.join("videos")
	}
}

/// Target device parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
	pub device_name: String,
	pub platform_version: String,
	pub app_path: PathBuf,
	pub auto_grant_permissions: bool,
	pub headless: bool,
}

/// Optional session-scoped extensions. All off unless configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtensionConfig {
	pub streaming: bool,
	pub recording: bool,
	pub swipe: bool,
}

/// Fully resolved settings for one session.
#[derive(Debug, Clone)]
pub struct Settings {
	pub mode: SessionMode,
	pub connection: ConnectionConfig,
	pub device: DeviceConfig,
	pub extensions: ExtensionConfig,
	/// Source snapshot, kept for values only needed later (cloud credentials, app reference).
	pub source: ConfigSource,
}

impl Settings {
	/// Resolves typed settings for `mode` from `source`.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::InvalidValue`] when a numeric or boolean key does not parse.
	pub fn resolve(mode: SessionMode, source: &ConfigSource) -> Result<Self, ConfigError> {
		let work_dir = source.work_dir().to_path_buf();
		let startup_secs = source.parse_or(keys::SERVER_STARTUP_TIMEOUT, droid_runtime::DEFAULT_STARTUP_TIMEOUT.as_secs(), "whole seconds")?;

		let connection = ConnectionConfig {
			host: source.get_or(keys::HOST, DEFAULT_HOST).to_string(),
			port: source.parse_or(keys::PORT, DEFAULT_PORT, "a port number")?,
			log_file: work_dir.join(SERVER_LOG),
			server_binary: source.get(keys::APPIUM_BINARY).map(PathBuf::from),
			runtime_bin_dir: source.get(keys::RUNTIME_BIN_DIR).map(PathBuf::from),
			search_path: source.get(keys::SEARCH_PATH).map(str::to_string),
			startup_timeout: Duration::from_secs(startup_secs),
			work_dir: work_dir.clone(),
		};

		let device = DeviceConfig {
			device_name: source.get_or(keys::DEVICE_NAME, DEFAULT_DEVICE_NAME).to_string(),
			platform_version: source.get_or(keys::DEVICE_VERSION, DEFAULT_PLATFORM_VERSION).to_string(),
			app_path: source.get(keys::APP_PATH).map(PathBuf::from).unwrap_or_else(|| work_dir.join(APP_RESOURCE)),
			auto_grant_permissions: true,
			headless: source.flag_or(keys::HEADLESS, false)?,
		};

		let extensions = ExtensionConfig {
			streaming: source.flag_or(keys::STREAMING, false)?,
			recording: source.flag_or(keys::RECORDING, false)?,
			swipe: source.flag_or(keys::SWIPE, false)?,
		};

		Ok(Self {
			mode,
			connection,
			device,
			extensions,
			source: source.clone(),
		})
	}
}
