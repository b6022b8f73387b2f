//! Capability builder.

use droid_protocol::{
	AUTOMATION_UIAUTOMATOR2, CapabilityDescriptor, CloudCapabilities, CloudOptions, LocalCapabilities, PLATFORM_ANDROID,
};

use crate::config::{ConfigSource, DeviceConfig, SessionMode, keys};
use crate::error::ConfigError;

pub const CLOUD_BUILD_NAME: &str = "Appium sample Build";
pub const CLOUD_TEST_NAME: &str = "Android Sample";
pub const CLOUD_PROJECT_NAME: &str = "Appium Sample Project";

/// Builds the capability descriptor for `mode`.
///
/// Cloud mode reads the app reference from `source` and fails before any
/// network action when it is absent.
pub fn build(mode: SessionMode, device: &DeviceConfig, source: &ConfigSource) -> Result<CapabilityDescriptor, ConfigError> {
	match mode {
		SessionMode::Local => Ok(local_capabilities(device).into()),
		SessionMode::Cloud => {
			let app = source.require(keys::LT_APP_ANDROID)?;
			Ok(cloud_capabilities(device, app).into())
		}
	}
}

/// Capabilities for a local emulator named after the device.
pub fn local_capabilities(device: &DeviceConfig) -> LocalCapabilities {
	LocalCapabilities {
		platform_name: PLATFORM_ANDROID.to_string(),
		automation_name: AUTOMATION_UIAUTOMATOR2.to_string(),
		platform_version: device.platform_version.clone(),
		device_name: device.device_name.clone(),
		avd: device.device_name.clone(),
		app: device.app_path.to_string_lossy().into_owned(),
		auto_grant_permissions: device.auto_grant_permissions,
		is_headless: device.headless,
	}
}

/// Capabilities for a real device on the cloud grid.
pub fn cloud_capabilities(device: &DeviceConfig, app: &str) -> CloudCapabilities {
	CloudCapabilities {
		platform_name: PLATFORM_ANDROID.to_string(),
		automation_name: AUTOMATION_UIAUTOMATOR2.to_string(),
		options: CloudOptions {
			w3c: true,
			platform_name: PLATFORM_ANDROID.to_string(),
			device_name: device.device_name.clone(),
			platform_version: device.platform_version.clone(),
			app: app.to_string(),
			devicelog: true,
			visual: true,
			network: true,
			video: true,
			build: CLOUD_BUILD_NAME.to_string(),
			name: CLOUD_TEST_NAME.to_string(),
			project: CLOUD_PROJECT_NAME.to_string(),
			auto_grant_permissions: true,
			is_real_mobile: true,
		},
	}
}

#[cfg(test)]
mod tests {
	use droid_protocol::CLOUD_OPTIONS_KEY;

	use super::*;
	use crate::config::Settings;

	fn settings(mode: SessionMode, source: &ConfigSource) -> Settings {
		Settings::resolve(mode, source).unwrap()
	}

	#[test]
	fn local_descriptor_points_at_bundled_app() {
		let source = ConfigSource::new("/work").with(keys::HEADLESS, "true");
		let settings = settings(SessionMode::Local, &source);

		let descriptor = build(SessionMode::Local, &settings.device, &source).unwrap();
		let CapabilityDescriptor::Local(caps) = descriptor else {
			panic!("expected local capabilities");
		};
		assert_eq!(caps.platform_name, "Android");
		assert_eq!(caps.platform_version, "11");
		assert_eq!(caps.device_name, "Pixel_6_Pro");
		assert_eq!(caps.avd, "Pixel_6_Pro");
		assert_eq!(caps.app, "/work/src/test/resources/proverbial.apk");
		assert!(caps.auto_grant_permissions);
		assert!(caps.is_headless);
	}

	#[test]
	fn cloud_descriptor_requires_app_reference() {
		let source = ConfigSource::new("/work");
		let settings = settings(SessionMode::Cloud, &source);

		let err = build(SessionMode::Cloud, &settings.device, &source).unwrap_err();
		assert!(matches!(err, ConfigError::MissingValue { ref name } if name == "LT_APP_ANDROID"));
	}

	#[test]
	fn cloud_descriptor_carries_fixed_flags() {
		let source = ConfigSource::new("/work")
			.with(keys::LT_APP_ANDROID, "lt://APP10160")
			.with(keys::DEVICE_VERSION, "13");
		let settings = settings(SessionMode::Cloud, &source);

		let descriptor = build(SessionMode::Cloud, &settings.device, &source).unwrap();
		let options = &descriptor.always_match()[CLOUD_OPTIONS_KEY];
		assert_eq!(options["app"], "lt://APP10160");
		assert_eq!(options["platformVersion"], "13");
		assert_eq!(options["deviceName"], "Pixel_6_Pro");
		assert_eq!(options["w3c"], true);
		assert_eq!(options["isRealMobile"], true);
		assert_eq!(options["video"], true);
		assert_eq!(options["build"], CLOUD_BUILD_NAME);
		assert_eq!(options["name"], CLOUD_TEST_NAME);
		assert_eq!(options["project"], CLOUD_PROJECT_NAME);
	}
}
