//! W3C WebDriver adapter over HTTP.
//!
//! Implements only the calls the session coordinator issues. Credentials in
//! the endpoint userinfo are moved into a basic-auth header so they never
//! appear in request URLs or error messages.

use std::fmt;

use async_trait::async_trait;
use droid_protocol::{CapabilityDescriptor, PointerSequence, Setting, StartRecordingOptions, StopRecordingOptions, WindowRect};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::client::{RemoteError, RemoteSession, SessionConnector};

/// Opens sessions with `POST {endpoint}/session`.
#[derive(Debug, Clone)]
pub struct WebDriverConnector {
	client: reqwest::Client,
}

impl WebDriverConnector {
	pub fn new() -> Result<Self, RemoteError> {
		let client = reqwest::Client::builder().build()?;
		Ok(Self { client })
	}
}

#[async_trait]
impl SessionConnector for WebDriverConnector {
	async fn connect(&self, endpoint: &Url, capabilities: &CapabilityDescriptor) -> Result<Box<dyn RemoteSession>, RemoteError> {
		let transport = Transport::new(self.client.clone(), endpoint);
		let body = transport.send_raw(Method::POST, "/session", Some(capabilities.new_session_payload())).await?;
		let id = parse_session_id(&body)?;
		debug!(target = "droid.session", session_id = %id, "new session created");
		Ok(Box::new(WebDriverSession { transport, id }))
	}
}

/// An open WebDriver session.
#[derive(Debug)]
pub struct WebDriverSession {
	transport: Transport,
	id: String,
}

impl WebDriverSession {
	fn path(&self, suffix: &str) -> String {
		format!("/session/{}{suffix}", self.id)
	}
}

#[async_trait]
impl RemoteSession for WebDriverSession {
	fn session_id(&self) -> &str {
		&self.id
	}

	async fn set_setting(&self, setting: &Setting) -> Result<(), RemoteError> {
		self.transport
			.send_raw(Method::POST, &self.path("/appium/settings"), Some(setting.to_payload()))
			.await
			.map(drop)
	}

	async fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value, RemoteError> {
		let body = json!({ "script": script, "args": args });
		self.transport.send(Method::POST, &self.path("/execute/sync"), Some(body)).await
	}

	async fn start_recording_screen(&self, options: &StartRecordingOptions) -> Result<(), RemoteError> {
		let body = json!({ "options": options });
		self.transport
			.send_raw(Method::POST, &self.path("/appium/start_recording_screen"), Some(body))
			.await
			.map(drop)
	}

	async fn stop_recording_screen(&self, options: &StopRecordingOptions) -> Result<String, RemoteError> {
		let body = json!({ "options": options });
		self.transport.send(Method::POST, &self.path("/appium/stop_recording_screen"), Some(body)).await
	}

	async fn window_rect(&self) -> Result<WindowRect, RemoteError> {
		self.transport.send(Method::GET, &self.path("/window/rect"), None).await
	}

	async fn perform_actions(&self, actions: &[PointerSequence]) -> Result<(), RemoteError> {
		let body = json!({ "actions": actions });
		self.transport.send_raw(Method::POST, &self.path("/actions"), Some(body)).await.map(drop)
	}

	async fn quit(&self) -> Result<(), RemoteError> {
		self.transport.send_raw(Method::DELETE, &self.path(""), None).await.map(drop)
	}
}

#[derive(Clone)]
struct Transport {
	client: reqwest::Client,
	base: String,
	auth: Option<(String, Option<String>)>,
}

impl fmt::Debug for Transport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let user = self.auth.as_ref().map(|(user, pass)| (user.as_str(), pass.as_ref().map(|_| "****")));
		f.debug_struct("Transport").field("base", &self.base).field("auth", &user).finish()
	}
}

impl Transport {
	fn new(client: reqwest::Client, endpoint: &Url) -> Self {
		let (base, auth) = split_credentials(endpoint);
		Self { client, base, auth }
	}

	/// Sends a command and deserializes the `value` field.
	async fn send<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, RemoteError> {
		let body = self.send_raw(method, path, body).await?;
		let value = body.get("value").cloned().unwrap_or(Value::Null);
		serde_json::from_value(value).map_err(|e| RemoteError::InvalidResponse(format!("{path}: {e}")))
	}

	/// Sends a command and returns the whole response body.
	async fn send_raw(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, RemoteError> {
		let url = format!("{}{path}", self.base);
		let mut request = self.client.request(method.clone(), &url);
		if let Some((user, pass)) = &self.auth {
			request = request.basic_auth(user, pass.as_ref());
		}
		if let Some(body) = body {
			request = request.json(&body);
		}

		debug!(target = "droid.session", %method, %path, "webdriver command");
		let response = request.send().await?;
		let status = response.status();
		let text = response.text().await?;
		decode_response(status, path, &text)
	}
}

/// Parses a successful body as JSON. Failures keep the status even when the body is not JSON.
fn decode_response(status: StatusCode, path: &str, text: &str) -> Result<Value, RemoteError> {
	let parsed = if text.trim().is_empty() {
		Ok(Value::Null)
	} else {
		serde_json::from_str::<Value>(text)
	};

	if status.is_success() {
		return parsed.map_err(|e| RemoteError::InvalidResponse(format!("{path}: {e}")));
	}
	match parsed {
		Ok(body) => Err(protocol_error(status, &body)),
		Err(_) => Err(RemoteError::Protocol {
			status: status.as_u16(),
			error: status.canonical_reason().unwrap_or("unknown error").to_string(),
			message: text.trim().to_string(),
		}),
	}
}

/// Strips userinfo from `endpoint`, returning the base URL without a trailing slash.
fn split_credentials(endpoint: &Url) -> (String, Option<(String, Option<String>)>) {
	let mut base = endpoint.clone();
	let auth = if endpoint.username().is_empty() {
		None
	} else {
		let user = decode(endpoint.username());
		let pass = endpoint.password().map(decode);
		let _ = base.set_username("");
		let _ = base.set_password(None);
		Some((user, pass))
	};
	(base.as_str().trim_end_matches('/').to_string(), auth)
}

fn decode(component: &str) -> String {
	urlencoding::decode(component).map(|c| c.into_owned()).unwrap_or_else(|_| component.to_string())
}

fn parse_session_id(body: &Value) -> Result<String, RemoteError> {
	body.pointer("/value/sessionId")
		.or_else(|| body.get("sessionId"))
		.and_then(Value::as_str)
		.map(str::to_string)
		.ok_or_else(|| RemoteError::InvalidResponse(format!("new session response has no sessionId: {body}")))
}

fn protocol_error(status: StatusCode, body: &Value) -> RemoteError {
	let value = body.get("value").unwrap_or(body);
	let error = value.get("error").and_then(Value::as_str).unwrap_or("unknown error").to_string();
	let message = value
		.get("message")
		.and_then(Value::as_str)
		.map(str::to_string)
		.unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
	RemoteError::Protocol {
		status: status.as_u16(),
		error,
		message,
	}
}
