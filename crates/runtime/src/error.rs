//! Error types for the local server runtime.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while locating, starting, or stopping the automation server.
#[derive(Debug, Error)]
pub enum Error {
	/// Server executable was not found in any search location.
	#[error("Appium server not found. Install with: npm install -g appium")]
	ServerNotFound,

	/// Explicitly configured executable does not exist.
	#[error("Appium executable does not exist: {}", .0.display())]
	BinaryMissing(PathBuf),

	/// Failed to launch the server process.
	#[error("Failed to launch Appium server: {0}")]
	LaunchFailed(String),

	/// Server process is alive but never answered its status endpoint.
	#[error("Appium server at {url} was not ready after {}ms", timeout.as_millis())]
	StartupTimeout { url: String, timeout: Duration },

	/// Host/port/base path do not form a valid URL.
	#[error("Invalid server URL: {0}")]
	InvalidUrl(String),

	/// Failed to stop the server process.
	#[error("Failed to stop Appium server: {0}")]
	StopFailed(String),

	/// I/O error (log directory, log file).
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Returns true when the failure happened before any process was spawned.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Error::ServerNotFound | Error::BinaryMissing(_))
	}
}
