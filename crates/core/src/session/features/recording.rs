//! Screen recording and artifact persistence.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use chrono::{DateTime, Local};
use droid_protocol::{StartRecordingOptions, StopRecordingOptions};
use tracing::{debug, info, warn};

use crate::client::{RemoteError, RemoteSession};
use crate::error::ArtifactError;

/// Server-side recording limit in seconds. The server stops on its own at this point.
pub const RECORDING_TIME_LIMIT: u64 = 300;

/// Outcome of persisting a recording payload.
#[derive(Debug)]
pub enum RecordingOutcome {
	Saved(PathBuf),
	Failed(ArtifactError),
}

impl RecordingOutcome {
	pub fn path(&self) -> Option<&Path> {
		match self {
			RecordingOutcome::Saved(path) => Some(path),
			RecordingOutcome::Failed(_) => None,
		}
	}
}

/// `VID-<yyyyMMdd-HHmmss>.mp4` for the given local time.
pub fn artifact_file_name(at: DateTime<Local>) -> String {
	format!("VID-{}.mp4", at.format("%Y%m%d-%H%M%S"))
}

/// Decodes `payload` and writes it under `dir`, creating the directory if needed.
///
/// Never fails: decode and write errors are logged and returned as
/// [`RecordingOutcome::Failed`].
pub async fn save_recording(dir: &Path, payload: &str, at: DateTime<Local>) -> RecordingOutcome {
	match write_artifact(dir, payload, at).await {
		Ok(path) => {
			info!(target = "droid.session", path = %path.display(), "recording saved");
			RecordingOutcome::Saved(path)
		}
		Err(err) => {
			warn!(target = "droid.session", error = %err, "failed to save recording");
			RecordingOutcome::Failed(err)
		}
	}
}

async fn write_artifact(dir: &Path, payload: &str, at: DateTime<Local>) -> Result<PathBuf, ArtifactError> {
	let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
	let bytes = BASE64_STANDARD.decode(compact)?;

	let path = dir.join(artifact_file_name(at));
	let write_err = |source| ArtifactError::Write { path: path.clone(), source };
	tokio::fs::create_dir_all(dir).await.map_err(write_err)?;
	tokio::fs::write(&path, bytes).await.map_err(write_err)?;
	Ok(path)
}

pub(crate) async fn start(remote: &dyn RemoteSession) -> Result<(), RemoteError> {
	debug!(target = "droid.session", time_limit = RECORDING_TIME_LIMIT, "starting screen recording");
	let options = StartRecordingOptions::default().with_time_limit_secs(RECORDING_TIME_LIMIT);
	remote.start_recording_screen(&options).await
}

/// Stops recording and persists the returned payload under `dir`.
pub(crate) async fn stop_and_save(remote: &dyn RemoteSession, dir: &Path) -> Result<RecordingOutcome, RemoteError> {
	debug!(target = "droid.session", "stopping screen recording");
	let payload = remote.stop_recording_screen(&StopRecordingOptions::default()).await?;
	Ok(save_recording(dir, &payload, Local::now()).await)
}
