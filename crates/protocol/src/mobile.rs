//! Appium extension payloads: `mobile:` scripts, screen recording, settings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Script name that starts MJPEG screen streaming on the device.
pub const START_SCREEN_STREAMING: &str = "mobile: startScreenStreaming";

/// Script name that stops screen streaming.
pub const STOP_SCREEN_STREAMING: &str = "mobile: stopScreenStreaming";

/// Arguments for [`START_SCREEN_STREAMING`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenStreamingOptions {
	/// Address the stream is bound to on the server host.
	pub host: String,
	pub port: u16,
	/// JPEG quality, 1-100.
	pub quality: u8,
	/// Bits per second.
	pub bit_rate: u64,
}

/// Options for `POST /session/{id}/appium/start_recording_screen`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRecordingOptions {
	/// Maximum duration in seconds. The server stops the recording on its own at this limit.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub time_limit: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bit_rate: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub video_size: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub force_restart: Option<bool>,
}

impl StartRecordingOptions {
	/// Sets the time limit from whole seconds.
	pub fn with_time_limit_secs(mut self, secs: u64) -> Self {
		self.time_limit = Some(secs.to_string());
		self
	}
}

/// Options for `POST /session/{id}/appium/stop_recording_screen`.
///
/// Leaving `remote_path` unset makes the server return the video inline as base64.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRecordingOptions {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub remote_path: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pass: Option<String>,
}

/// Driver settings applied through `POST /session/{id}/appium/settings`.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
	/// Hide non-interactive views from the accessibility hierarchy.
	IgnoreUnimportantViews(bool),
	/// Any setting by raw name.
	Raw { name: String, value: Value },
}

impl Setting {
	/// Setting name as understood by the driver.
	pub fn name(&self) -> &str {
		match self {
			Setting::IgnoreUnimportantViews(_) => "ignoreUnimportantViews",
			Setting::Raw { name, .. } => name,
		}
	}

	/// Setting value.
	pub fn value(&self) -> Value {
		match self {
			Setting::IgnoreUnimportantViews(enabled) => Value::Bool(*enabled),
			Setting::Raw { value, .. } => value.clone(),
		}
	}

	/// Request body for the settings endpoint.
	pub fn to_payload(&self) -> Value {
		let mut settings = serde_json::Map::new();
		settings.insert(self.name().to_string(), self.value());
		serde_json::json!({ "settings": settings })
	}
}

/// Result of `GET /session/{id}/window/rect`.
///
/// W3C allows fractional values; they are truncated to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowRect {
	#[serde(default, deserialize_with = "whole_pixels")]
	pub x: i64,
	#[serde(default, deserialize_with = "whole_pixels")]
	pub y: i64,
	#[serde(deserialize_with = "whole_pixels")]
	pub width: i64,
	#[serde(deserialize_with = "whole_pixels")]
	pub height: i64,
}

fn whole_pixels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
	let value = f64::deserialize(deserializer)?;
	if !value.is_finite() {
		return Err(serde::de::Error::custom(format!("non-finite coordinate {value}")));
	}
	Ok(value.trunc() as i64)
}
