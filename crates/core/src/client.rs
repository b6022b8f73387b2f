//! Remote-protocol seam.
//!
//! The coordinator only composes and sequences these calls. [`WebDriverConnector`](crate::WebDriverConnector)
//! is the HTTP implementation; tests substitute scripted fakes.

use async_trait::async_trait;
use droid_protocol::{CapabilityDescriptor, PointerSequence, Setting, StartRecordingOptions, StopRecordingOptions, WindowRect};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Failure reported by the remote protocol client.
#[derive(Debug, Error)]
pub enum RemoteError {
	/// Transport-level failure (connection refused, TLS, timeout).
	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	/// W3C error response.
	#[error("{error} (HTTP {status}): {message}")]
	Protocol { status: u16, error: String, message: String },

	/// Response did not have the expected shape.
	#[error("unexpected response: {0}")]
	InvalidResponse(String),

	/// Failure described only by a message.
	#[error("{0}")]
	Other(String),
}

/// Opens remote sessions.
#[async_trait]
pub trait SessionConnector: Send + Sync {
	/// Performs the new-session handshake against `endpoint`.
	async fn connect(&self, endpoint: &Url, capabilities: &CapabilityDescriptor) -> Result<Box<dyn RemoteSession>, RemoteError>;
}

/// Commands issued against an open remote session.
#[async_trait]
pub trait RemoteSession: Send + Sync {
	/// Server-assigned session id.
	fn session_id(&self) -> &str;

	async fn set_setting(&self, setting: &Setting) -> Result<(), RemoteError>;

	/// Executes a script such as `mobile: startScreenStreaming`.
	async fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value, RemoteError>;

	async fn start_recording_screen(&self, options: &StartRecordingOptions) -> Result<(), RemoteError>;

	/// Stops recording and returns the base64-encoded video.
	async fn stop_recording_screen(&self, options: &StopRecordingOptions) -> Result<String, RemoteError>;

	async fn window_rect(&self) -> Result<WindowRect, RemoteError>;

	async fn perform_actions(&self, actions: &[PointerSequence]) -> Result<(), RemoteError>;

	/// Ends the remote session.
	async fn quit(&self) -> Result<(), RemoteError>;
}
