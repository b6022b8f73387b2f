//! Device screen streaming.

use droid_protocol::{START_SCREEN_STREAMING, STOP_SCREEN_STREAMING, ScreenStreamingOptions};
use tracing::debug;

use crate::client::{RemoteError, RemoteSession};

pub const STREAM_HOST: &str = "127.0.0.1";
pub const STREAM_PORT: u16 = 8093;
pub const STREAM_QUALITY: u8 = 75;
pub const STREAM_BIT_RATE: u64 = 20_000_000;

/// Fixed streaming parameters.
pub fn streaming_options() -> ScreenStreamingOptions {
	ScreenStreamingOptions {
		host: STREAM_HOST.to_string(),
		port: STREAM_PORT,
		quality: STREAM_QUALITY,
		bit_rate: STREAM_BIT_RATE,
	}
}

pub(crate) async fn start(remote: &dyn RemoteSession) -> Result<(), RemoteError> {
	let options = streaming_options();
	debug!(target = "droid.session", host = %options.host, port = options.port, "starting screen streaming");
	let args = serde_json::to_value(&options).map_err(|e| RemoteError::Other(format!("encode streaming options: {e}")))?;
	remote.execute_script(START_SCREEN_STREAMING, vec![args]).await.map(drop)
}

pub(crate) async fn stop(remote: &dyn RemoteSession) -> Result<(), RemoteError> {
	debug!(target = "droid.session", "stopping screen streaming");
	remote.execute_script(STOP_SCREEN_STREAMING, Vec::new()).await.map(drop)
}
