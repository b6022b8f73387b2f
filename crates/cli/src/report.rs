//! Human-readable session summaries.

use colored::Colorize;
use droid::{CloseReport, Endpoint, RecordingOutcome};

/// Session banner printed once the handshake succeeds. Local sessions also name the server log.
pub fn render_open(endpoint: &Endpoint, session_id: &str) -> Vec<String> {
	let mut lines = vec![format!(
		"{} {} session {session_id} at {}",
		"open".green().bold(),
		endpoint.mode(),
		endpoint.display_url()
	)];
	if let Endpoint::Local(server) = endpoint {
		lines.push(format!("{} {}", "server log".dimmed(), server.log_file().display()));
	}
	lines
}

/// One line per close step, then the recording outcome if any.
pub fn render(report: &CloseReport) -> Vec<String> {
	if report.is_empty() {
		return vec![format!("{} nothing to close", "-".dimmed())];
	}

	let mut lines: Vec<String> = report
		.steps
		.iter()
		.map(|step| match &step.error {
			None => format!("{} {}", "ok".green(), step.kind),
			Some(err) => format!("{} {}: {err}", "failed".red().bold(), step.kind),
		})
		.collect();

	match &report.recording {
		Some(RecordingOutcome::Saved(path)) => lines.push(format!("{} {}", "recording".cyan(), path.display())),
		Some(RecordingOutcome::Failed(err)) => lines.push(format!("{} recording not saved: {err}", "warning".yellow())),
		None => {}
	}
	lines
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use droid::endpoint::CloudEndpoint;
	use droid::{CloseStep, CloseStepKind, ConfigSource};

	use super::*;

	#[test]
	fn cloud_banner_hides_access_key() {
		colored::control::set_override(false);
		let source = ConfigSource::new(".").with("LT_USERNAME", "alice").with("LT_ACCESS_KEY", "s3cr3t");
		let endpoint = Endpoint::Cloud(CloudEndpoint::resolve(&source).unwrap());

		let lines = render_open(&endpoint, "abc-123");
		assert_eq!(lines.len(), 1);
		assert!(lines[0].starts_with("open cloud session abc-123 at https://alice:****@"));
		assert!(!lines[0].contains("s3cr3t"));
	}

	#[test]
	fn empty_report() {
		colored::control::set_override(false);
		let lines = render(&CloseReport::default());
		assert_eq!(lines, ["- nothing to close"]);
	}

	#[test]
	fn steps_and_recording_are_listed_in_order() {
		colored::control::set_override(false);
		let report = CloseReport {
			steps: vec![
				CloseStep {
					kind: CloseStepKind::StopRecording,
					error: None,
				},
				CloseStep {
					kind: CloseStepKind::EndSession,
					error: Some("invalid session id".into()),
				},
			],
			recording: Some(RecordingOutcome::Saved(PathBuf::from("videos/VID-20240102-030405.mp4"))),
		};

		let lines = render(&report);
		assert_eq!(
			lines,
			[
				"ok stop recording",
				"failed end session: invalid session id",
				"recording videos/VID-20240102-030405.mp4",
			]
		);
	}
}
