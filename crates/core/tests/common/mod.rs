//! Scripted remote-session fake shared by the coordinator tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use droid::protocol::{CapabilityDescriptor, PointerSequence, Setting, StartRecordingOptions, StopRecordingOptions, WindowRect};
use droid::{ConfigSource, RemoteError, RemoteSession, SessionConnector, SessionMode, Settings};
use serde_json::Value;
use url::Url;

/// Everything the fake observed, shared between the connector and its sessions.
#[derive(Debug, Default)]
pub struct Observed {
	pub calls: Vec<String>,
	pub endpoints: Vec<Url>,
	pub payloads: Vec<Value>,
	pub actions: Vec<PointerSequence>,
	pub recording_options: Vec<StartRecordingOptions>,
	pub script_args: Vec<Value>,
}

#[derive(Clone)]
pub struct FakeConnector {
	observed: Arc<Mutex<Observed>>,
	failing: Arc<HashSet<&'static str>>,
	recording_payload: String,
	window: WindowRect,
}

impl FakeConnector {
	pub fn new() -> Self {
		Self {
			observed: Arc::default(),
			failing: Arc::default(),
			recording_payload: String::new(),
			window: WindowRect {
				x: 0,
				y: 0,
				width: 1080,
				height: 1920,
			},
		}
	}

	/// Makes the named command fail: `connect`, `set_setting`, `execute`,
	/// `start_recording`, `stop_recording`, `window_rect`, `perform_actions`, `quit`.
	pub fn failing(mut self, commands: &[&'static str]) -> Self {
		self.failing = Arc::new(commands.iter().copied().collect());
		self
	}

	pub fn with_recording(mut self, payload: impl Into<String>) -> Self {
		self.recording_payload = payload.into();
		self
	}

	pub fn calls(&self) -> Vec<String> {
		self.observed.lock().unwrap().calls.clone()
	}

	pub fn observed(&self) -> std::sync::MutexGuard<'_, Observed> {
		self.observed.lock().unwrap()
	}
}

#[async_trait]
impl SessionConnector for FakeConnector {
	async fn connect(&self, endpoint: &Url, capabilities: &CapabilityDescriptor) -> Result<Box<dyn RemoteSession>, RemoteError> {
		{
			let mut observed = self.observed.lock().unwrap();
			observed.calls.push("connect".to_string());
			observed.endpoints.push(endpoint.clone());
			observed.payloads.push(capabilities.new_session_payload());
		}
		if self.failing.contains("connect") {
			return Err(RemoteError::Other("connection refused".into()));
		}
		Ok(Box::new(FakeSession {
			connector: self.clone(),
			id: "fake-session-1".to_string(),
		}))
	}
}

pub struct FakeSession {
	connector: FakeConnector,
	id: String,
}

impl FakeSession {
	fn call(&self, name: &'static str, detail: Option<String>) -> Result<(), RemoteError> {
		let entry = match detail {
			Some(detail) => format!("{name}:{detail}"),
			None => name.to_string(),
		};
		self.connector.observed.lock().unwrap().calls.push(entry);
		if self.connector.failing.contains(name) {
			Err(RemoteError::Other(format!("{name} rejected")))
		} else {
			Ok(())
		}
	}
}

#[async_trait]
impl RemoteSession for FakeSession {
	fn session_id(&self) -> &str {
		&self.id
	}

	async fn set_setting(&self, setting: &Setting) -> Result<(), RemoteError> {
		self.call("set_setting", Some(format!("{}={}", setting.name(), setting.value())))
	}

	async fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value, RemoteError> {
		self.connector.observed.lock().unwrap().script_args.extend(args);
		self.call("execute", Some(script.to_string()))?;
		Ok(Value::Null)
	}

	async fn start_recording_screen(&self, options: &StartRecordingOptions) -> Result<(), RemoteError> {
		self.connector.observed.lock().unwrap().recording_options.push(options.clone());
		self.call("start_recording", None)
	}

	async fn stop_recording_screen(&self, _options: &StopRecordingOptions) -> Result<String, RemoteError> {
		self.call("stop_recording", None)?;
		Ok(self.connector.recording_payload.clone())
	}

	async fn window_rect(&self) -> Result<WindowRect, RemoteError> {
		self.call("window_rect", None)?;
		Ok(self.connector.window)
	}

	async fn perform_actions(&self, actions: &[PointerSequence]) -> Result<(), RemoteError> {
		self.connector.observed.lock().unwrap().actions.extend_from_slice(actions);
		self.call("perform_actions", None)
	}

	async fn quit(&self) -> Result<(), RemoteError> {
		self.call("quit", None)
	}
}

/// Cloud source with all three required values set.
pub fn cloud_source(work_dir: &Path) -> ConfigSource {
	ConfigSource::new(work_dir)
		.with("LT_USERNAME", "alice")
		.with("LT_ACCESS_KEY", "s3cr3t-key")
		.with("LT_APP_ANDROID", "lt://APP1016")
}

pub fn settings(mode: SessionMode, source: &ConfigSource) -> Settings {
	Settings::resolve(mode, source).unwrap()
}
