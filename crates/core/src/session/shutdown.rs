use std::fmt;

use tracing::{debug, warn};

use super::features::recording::{self, RecordingOutcome};
use super::features::streaming;
use super::{SessionCoordinator, SessionState};
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};

/// One teardown step, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseStepKind {
	StopStreaming,
	StopRecording,
	EndSession,
	StopServer,
}

impl fmt::Display for CloseStepKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			CloseStepKind::StopStreaming => "stop streaming",
			CloseStepKind::StopRecording => "stop recording",
			CloseStepKind::EndSession => "end session",
			CloseStepKind::StopServer => "stop server",
		};
		f.write_str(name)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseStep {
	pub kind: CloseStepKind,
	/// Failure message, if the step failed.
	pub error: Option<String>,
}

impl CloseStep {
	pub fn is_ok(&self) -> bool {
		self.error.is_none()
	}
}

/// What [`SessionCoordinator::close`] attempted and how each step went.
#[derive(Debug, Default)]
pub struct CloseReport {
	pub steps: Vec<CloseStep>,
	/// Set when a recording was stopped and its payload handled.
	pub recording: Option<RecordingOutcome>,
}

impl CloseReport {
	pub fn kinds(&self) -> Vec<CloseStepKind> {
		self.steps.iter().map(|step| step.kind).collect()
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	/// True when every step succeeded. A failed recording save does not count.
	pub fn is_clean(&self) -> bool {
		self.steps.iter().all(CloseStep::is_ok)
	}

	pub fn failures(&self) -> impl Iterator<Item = &CloseStep> {
		self.steps.iter().filter(|step| !step.is_ok())
	}

	/// Converts failed steps into [`Error::Cleanup`].
	pub fn into_result(self) -> Result<Option<RecordingOutcome>> {
		let failures: Vec<String> = self
			.failures()
			.map(|step| format!("{}: {}", step.kind, step.error.as_deref().unwrap_or_default()))
			.collect();
		if failures.is_empty() {
			Ok(self.recording)
		} else {
			Err(Error::Cleanup(failures.join("; ")))
		}
	}

	fn record<E: fmt::Display>(&mut self, kind: CloseStepKind, outcome: std::result::Result<(), E>) {
		let error = match outcome {
			Ok(()) => {
				debug!(target = "droid.session", step = %kind, "close step done");
				None
			}
			Err(err) => {
				warn!(target = "droid.session", step = %kind, error = %err, "close step failed");
				Some(err.to_string())
			}
		};
		self.steps.push(CloseStep { kind, error });
	}
}

/// Stops streaming, stops and saves recording, ends the session, then stops
/// the local server. Each step runs regardless of earlier failures.
pub(super) async fn close(coordinator: &mut SessionCoordinator) -> CloseReport {
	let mut report = CloseReport::default();
	if coordinator.state == SessionState::Closed {
		return report;
	}

	if let Some(remote) = coordinator.remote.take() {
		if std::mem::take(&mut coordinator.streaming_active) {
			report.record(CloseStepKind::StopStreaming, streaming::stop(&*remote).await);
		}
		if std::mem::take(&mut coordinator.recording_active) {
			let videos = coordinator.settings.connection.videos_dir();
			match recording::stop_and_save(&*remote, &videos).await {
				Ok(outcome) => {
					report.record::<Error>(CloseStepKind::StopRecording, Ok(()));
					report.recording = Some(outcome);
				}
				Err(err) => report.record(CloseStepKind::StopRecording, Err(err)),
			}
		}
		report.record(CloseStepKind::EndSession, remote.quit().await);
	}

	match coordinator.endpoint.take() {
		Some(Endpoint::Local(server)) => {
			report.record(CloseStepKind::StopServer, server.stop().await);
		}
		other => coordinator.endpoint = other,
	}

	coordinator.state = SessionState::Closed;
	report
}
