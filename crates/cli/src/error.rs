use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	/// The session itself failed (configuration, server, handshake, cleanup).
	#[error(transparent)]
	Session(#[from] droid::Error),

	#[error(transparent)]
	Config(#[from] droid::ConfigError),

	#[error("failed to build HTTP client: {0}")]
	Client(#[from] droid::RemoteError),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl CliError {
	/// Process exit code: 2 for configuration problems, 1 otherwise.
	pub fn exit_code(&self) -> i32 {
		match self {
			CliError::Config(_) => 2,
			CliError::Session(err) if err.is_config() => 2,
			_ => 1,
		}
	}
}
