//! Capability descriptors sent in the W3C new-session request.
//!
//! Local devices use `appium:`-prefixed extension capabilities. Cloud grids
//! receive the same platform identity plus a vendor options map under
//! [`CLOUD_OPTIONS_KEY`].

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Platform name sent for every Android session.
pub const PLATFORM_ANDROID: &str = "Android";

/// Automation backend requested from the server.
pub const AUTOMATION_UIAUTOMATOR2: &str = "UiAutomator2";

/// Capability key holding the cloud vendor options map.
pub const CLOUD_OPTIONS_KEY: &str = "lt:options";

/// Capabilities for an emulator or device driven by a local server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCapabilities {
	#[serde(rename = "platformName")]
	pub platform_name: String,
	#[serde(rename = "appium:automationName")]
	pub automation_name: String,
	#[serde(rename = "appium:platformVersion")]
	pub platform_version: String,
	#[serde(rename = "appium:deviceName")]
	pub device_name: String,
	/// Emulator image to boot. Matches the device name.
	#[serde(rename = "appium:avd")]
	pub avd: String,
	/// Absolute path of the application package under test.
	#[serde(rename = "appium:app")]
	pub app: String,
	#[serde(rename = "appium:autoGrantPermissions")]
	pub auto_grant_permissions: bool,
	#[serde(rename = "appium:isHeadless")]
	pub is_headless: bool,
}

/// Vendor options map nested under [`CLOUD_OPTIONS_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudOptions {
	pub w3c: bool,
	pub platform_name: String,
	pub device_name: String,
	pub platform_version: String,
	/// App reference previously uploaded to the grid (e.g. `lt://APP123`).
	pub app: String,
	pub devicelog: bool,
	pub visual: bool,
	pub network: bool,
	pub video: bool,
	pub build: String,
	pub name: String,
	pub project: String,
	pub auto_grant_permissions: bool,
	pub is_real_mobile: bool,
}

/// Capabilities for a session hosted on a cloud grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudCapabilities {
	#[serde(rename = "platformName")]
	pub platform_name: String,
	#[serde(rename = "appium:automationName")]
	pub automation_name: String,
	#[serde(rename = "lt:options")]
	pub options: CloudOptions,
}

/// Mode-specific capability descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapabilityDescriptor {
	/// Local server + emulator/device.
	Local(LocalCapabilities),
	/// Cloud grid.
	Cloud(CloudCapabilities),
}

impl CapabilityDescriptor {
	/// Returns true for the cloud variant.
	pub fn is_cloud(&self) -> bool {
		matches!(self, CapabilityDescriptor::Cloud(_))
	}

	/// Flat capability object used as `alwaysMatch`.
	pub fn always_match(&self) -> Value {
		serde_json::to_value(self).unwrap_or(Value::Null)
	}

	/// Full body for `POST /session`.
	pub fn new_session_payload(&self) -> Value {
		json!({
			"capabilities": {
				"alwaysMatch": self.always_match(),
				"firstMatch": [{}],
			}
		})
	}
}

impl From<LocalCapabilities> for CapabilityDescriptor {
	fn from(caps: LocalCapabilities) -> Self {
		CapabilityDescriptor::Local(caps)
	}
}

impl From<CloudCapabilities> for CapabilityDescriptor {
	fn from(caps: CloudCapabilities) -> Self {
		CapabilityDescriptor::Cloud(caps)
	}
}
