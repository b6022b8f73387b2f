//! Coordinator behavior in local mode: a mock `appium` launcher plus an
//! in-process status endpoint stand in for the real server.
#![cfg(unix)]

mod common;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use common::{FakeConnector, settings};
use droid::{CloseStepKind, ConfigSource, Endpoint, Error, RecordingOutcome, SessionCoordinator, SessionMode, SessionState};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn write_launcher(path: &Path) {
	fs::write(path, "#!/bin/sh\nexec sleep 30\n").unwrap();
	let mut perms = fs::metadata(path).unwrap().permissions();
	perms.set_mode(0o755);
	fs::set_permissions(path, perms).unwrap();
}

async fn spawn_status_endpoint() -> u16 {
	let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
	let port = listener.local_addr().unwrap().port();
	tokio::spawn(async move {
		while let Ok((mut stream, _)) = listener.accept().await {
			tokio::spawn(async move {
				let mut buf = [0u8; 2048];
				let _ = stream.read(&mut buf).await;
				let body = r#"{"value":{"ready":true}}"#;
				let response = format!(
					"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
					body.len()
				);
				let _ = stream.write_all(response.as_bytes()).await;
			});
		}
	});
	port
}

async fn local_source(temp: &TempDir) -> ConfigSource {
	let launcher = temp.path().join("appium");
	write_launcher(&launcher);
	let port = spawn_status_endpoint().await;
	ConfigSource::new(temp.path())
		.with("APPIUM_BINARY", launcher.to_string_lossy())
		.with("port", port.to_string())
		.with("serverStartupTimeout", "5")
}

#[tokio::test]
async fn open_starts_server_on_configured_address() {
	let temp = TempDir::new().unwrap();
	let source = local_source(&temp).await;
	let settings = settings(SessionMode::Local, &source);
	let port = settings.connection.port;
	let connector = FakeConnector::new();
	let mut session = SessionCoordinator::new(settings, connector.clone());

	session.open().await.unwrap();
	assert_eq!(session.state(), SessionState::Open);
	assert!(session.is_server_running());

	let url = session.endpoint_url().unwrap().clone();
	assert_eq!(url.host_str(), Some("127.0.0.1"));
	assert_eq!(url.port(), Some(port));
	assert_eq!(url.path(), "/wd/hub");
	assert_eq!(connector.observed().endpoints[0], url);
	match session.endpoint() {
		Some(endpoint @ Endpoint::Local(server)) => {
			assert_eq!(endpoint.mode(), SessionMode::Local);
			assert_eq!(server.log_file(), temp.path().join("logs/appium.log"));
		}
		other => panic!("expected local endpoint, got {other:?}"),
	}

	let payload = connector.observed().payloads[0].clone();
	let caps = &payload["capabilities"]["alwaysMatch"];
	let app = temp.path().join("src/test/resources/proverbial.apk");
	assert_eq!(caps["appium:app"].as_str(), app.to_str());
	assert_eq!(caps["appium:avd"], "Pixel_6_Pro");

	let report = session.close().await;
	assert_eq!(report.kinds(), [CloseStepKind::EndSession, CloseStepKind::StopServer]);
	assert!(report.is_clean());
	assert!(!session.is_server_running());
	assert!(temp.path().join("logs").is_dir());
}

#[tokio::test]
async fn failed_open_leaves_server_for_close() {
	let temp = TempDir::new().unwrap();
	let source = local_source(&temp).await;
	let connector = FakeConnector::new().failing(&["connect"]);
	let mut session = SessionCoordinator::new(settings(SessionMode::Local, &source), connector);

	let err = session.open().await.unwrap_err();
	assert!(matches!(err, Error::SessionOpen { .. }), "unexpected error: {err:?}");
	assert_eq!(session.state(), SessionState::ServerStarted);
	assert!(session.is_server_running());

	let report = session.close().await;
	assert_eq!(report.kinds(), [CloseStepKind::StopServer]);
	assert!(report.is_clean());
	assert!(!session.is_server_running());
}

#[tokio::test]
async fn missing_launcher_fails_without_connecting() {
	let temp = TempDir::new().unwrap();
	let source = ConfigSource::new(temp.path()).with("APPIUM_BINARY", temp.path().join("nope").to_string_lossy());
	let connector = FakeConnector::new();
	let mut session = SessionCoordinator::new(settings(SessionMode::Local, &source), connector.clone());

	let err = session.open().await.unwrap_err();
	assert!(matches!(err, Error::Server(droid_runtime::Error::BinaryMissing(_))), "unexpected error: {err:?}");
	assert!(connector.calls().is_empty());
	assert_eq!(session.state(), SessionState::CapabilitiesBuilt);
	assert!(session.close().await.is_empty());
}

#[tokio::test]
async fn close_tears_down_extensions_before_session_and_server() {
	let temp = TempDir::new().unwrap();
	let video = b"local screen capture";
	let source = local_source(&temp)
		.await
		.with("streaming", "true")
		.with("recording", "true")
		.with("swipe", "true");
	let connector = FakeConnector::new().with_recording(BASE64_STANDARD.encode(video));
	let mut session = SessionCoordinator::new(settings(SessionMode::Local, &source), connector.clone());

	session.open().await.unwrap();
	assert!(session.is_streaming());
	assert!(session.is_recording());
	assert!(connector.calls().iter().any(|call| call == "perform_actions"));

	let report = session.close().await;
	assert_eq!(
		report.kinds(),
		[
			CloseStepKind::StopStreaming,
			CloseStepKind::StopRecording,
			CloseStepKind::EndSession,
			CloseStepKind::StopServer
		]
	);
	assert!(report.is_clean());
	assert!(!session.is_server_running());

	let Some(RecordingOutcome::Saved(path)) = &report.recording else {
		panic!("expected saved recording, got {:?}", report.recording);
	};
	assert_eq!(path.parent(), Some(temp.path().join("videos").as_path()));
	assert_eq!(fs::read(path).unwrap(), video);
}

#[tokio::test]
async fn failed_quit_still_stops_server() {
	let temp = TempDir::new().unwrap();
	let source = local_source(&temp).await;
	let connector = FakeConnector::new().failing(&["quit"]);
	let mut session = SessionCoordinator::new(settings(SessionMode::Local, &source), connector.clone());

	session.open().await.unwrap();
	let report = session.close().await;

	assert_eq!(report.kinds(), [CloseStepKind::EndSession, CloseStepKind::StopServer]);
	let failed: Vec<CloseStepKind> = report.failures().map(|step| step.kind).collect();
	assert_eq!(failed, [CloseStepKind::EndSession]);
	assert!(!session.is_server_running());
	assert_eq!(session.state(), SessionState::Closed);
	assert!(matches!(report.into_result(), Err(Error::Cleanup(_))));
}
