//! Error types for session orchestration.

use std::path::PathBuf;

use thiserror::Error;

use crate::client::RemoteError;
use crate::session::SessionState;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid or missing configuration. Always fatal, never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// A required value (cloud credential or app reference) is absent.
	#[error("missing required configuration value: {name}")]
	MissingValue { name: String },

	/// A value could not be parsed into its expected type.
	#[error("invalid value for {key}: {value:?} (expected {expected})")]
	InvalidValue {
		key: String,
		value: String,
		expected: &'static str,
	},

	/// A constructed endpoint URL does not parse. The URL is stored redacted.
	#[error("URL malformed: {url}")]
	MalformedUrl { url: String },
}

/// Errors surfaced by [`SessionCoordinator`](crate::SessionCoordinator).
#[derive(Debug, Error)]
pub enum Error {
	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),

	/// Remote handshake failed after endpoint and capabilities were valid.
	#[error("failed to open remote session at {endpoint}")]
	SessionOpen {
		endpoint: String,
		#[source]
		source: RemoteError,
	},

	/// Local server could not be located or started.
	#[error("local server: {0}")]
	Server(#[from] droid_runtime::Error),

	/// An ordinary command against an open session failed.
	#[error("{command} failed")]
	Remote {
		command: &'static str,
		#[source]
		source: RemoteError,
	},

	#[error("session is not open (state: {0})")]
	SessionNotOpen(SessionState),

	#[error("session was already started (state: {0})")]
	AlreadyStarted(SessionState),

	/// One or more close steps failed. Produced only by [`CloseReport::into_result`](crate::CloseReport::into_result).
	#[error("cleanup failed: {0}")]
	Cleanup(String),
}

impl Error {
	/// Returns true for configuration failures.
	pub fn is_config(&self) -> bool {
		matches!(self, Error::Config(_))
	}

	pub(crate) fn remote(command: &'static str) -> impl FnOnce(RemoteError) -> Error {
		move |source| Error::Remote { command, source }
	}
}

/// Recording payload could not be persisted. Reported, never propagated.
#[derive(Debug, Error)]
pub enum ArtifactError {
	#[error("recording payload is not valid base64: {0}")]
	Decode(#[from] base64::DecodeError),

	#[error("failed to write recording to {}", path.display())]
	Write {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}
