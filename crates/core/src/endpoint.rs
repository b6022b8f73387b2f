//! Remote endpoint resolution.
//!
//! A session talks either to the local server it started or to a cloud grid
//! addressed with embedded credentials. [`Endpoint`] carries whichever applies,
//! so the mode is never inferred from a missing field.

use std::fmt;

use droid_runtime::AppiumServer;
use url::Url;

use crate::config::{ConfigSource, SessionMode, keys};
use crate::error::ConfigError;

/// Default cloud grid host.
pub const DEFAULT_CLOUD_HUB: &str = "mobile-hub.lambdatest.com";

/// WebDriver base path on both the local server and the grid.
pub const HUB_PATH: &str = "/wd/hub";

const REDACTED: &str = "****";

/// Cloud grid credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudCredentials {
	pub username: String,
	access_key: String,
}

impl CloudCredentials {
	pub fn new(username: impl Into<String>, access_key: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			access_key: access_key.into(),
		}
	}

	/// Reads `LT_USERNAME` and `LT_ACCESS_KEY`; both are required.
	pub fn from_source(source: &ConfigSource) -> Result<Self, ConfigError> {
		let username = source.require(keys::LT_USERNAME)?;
		let access_key = source.require(keys::LT_ACCESS_KEY)?;
		Ok(Self::new(username, access_key))
	}
}

impl fmt::Debug for CloudCredentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CloudCredentials")
			.field("username", &self.username)
			.field("access_key", &REDACTED)
			.finish()
	}
}

/// Builds `https://{username}:{accessKey}@{hub}/wd/hub`.
///
/// Credentials are percent-encoded into the userinfo.
pub fn cloud_url(credentials: &CloudCredentials, hub: &str) -> Result<Url, ConfigError> {
	let base = format!("https://{hub}{HUB_PATH}");
	let malformed = || ConfigError::MalformedUrl {
		url: format!("https://{}:{REDACTED}@{hub}{HUB_PATH}", credentials.username),
	};

	let mut url = Url::parse(&base).map_err(|_| malformed())?;
	url.set_username(&credentials.username).map_err(|_| malformed())?;
	url.set_password(Some(&credentials.access_key)).map_err(|_| malformed())?;
	Ok(url)
}

/// Renders `url` with any password replaced by `****`.
pub fn redact(url: &Url) -> String {
	if url.password().is_none() {
		return url.to_string();
	}
	let mut redacted = url.clone();
	let _ = redacted.set_password(Some(REDACTED));
	redacted.to_string()
}

/// Resolved cloud endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudEndpoint {
	pub credentials: CloudCredentials,
	pub url: Url,
}

impl CloudEndpoint {
	/// Resolves credentials and the grid URL from `source`. No network access.
	pub fn resolve(source: &ConfigSource) -> Result<Self, ConfigError> {
		let credentials = CloudCredentials::from_source(source)?;
		let hub = source.get_or(keys::LT_HUB, DEFAULT_CLOUD_HUB);
		let url = cloud_url(&credentials, hub)?;
		Ok(Self { credentials, url })
	}
}

/// Where the remote session lives.
#[derive(Debug)]
pub enum Endpoint {
	/// Local server owned by this session.
	Local(AppiumServer),
	/// Cloud grid.
	Cloud(CloudEndpoint),
}

impl Endpoint {
	pub fn mode(&self) -> SessionMode {
		match self {
			Endpoint::Local(_) => SessionMode::Local,
			Endpoint::Cloud(_) => SessionMode::Cloud,
		}
	}

	/// URL new sessions are requested from.
	pub fn url(&self) -> &Url {
		match self {
			Endpoint::Local(server) => server.url(),
			Endpoint::Cloud(cloud) => &cloud.url,
		}
	}

	/// URL safe to log or display.
	pub fn display_url(&self) -> String {
		redact(self.url())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cloud_url_embeds_credentials_as_userinfo() {
		let creds = CloudCredentials::new("alice", "s3cr3t");
		let url = cloud_url(&creds, DEFAULT_CLOUD_HUB).unwrap();
		assert_eq!(url.scheme(), "https");
		assert_eq!(url.username(), "alice");
		assert_eq!(url.password(), Some("s3cr3t"));
		assert_eq!(url.host_str(), Some("mobile-hub.lambdatest.com"));
		assert_eq!(url.path(), "/wd/hub");
	}

	#[test]
	fn malformed_hub_is_a_configuration_error() {
		let creds = CloudCredentials::new("alice", "s3cr3t");
		let err = cloud_url(&creds, "bad hub").unwrap_err();
		let ConfigError::MalformedUrl { url } = err else {
			panic!("expected MalformedUrl");
		};
		assert!(!url.contains("s3cr3t"));
	}

	#[test]
	fn redact_hides_access_key() {
		let creds = CloudCredentials::new("alice", "s3cr3t");
		let url = cloud_url(&creds, DEFAULT_CLOUD_HUB).unwrap();
		let shown = redact(&url);
		assert!(!shown.contains("s3cr3t"));
		assert!(shown.contains("alice:****@"));
	}

	#[test]
	fn credentials_debug_is_redacted() {
		let creds = CloudCredentials::new("alice", "s3cr3t");
		assert!(!format!("{creds:?}").contains("s3cr3t"));
	}

	#[test]
	fn missing_credentials_name_the_key() {
		let source = ConfigSource::new("/work").with(keys::LT_USERNAME, "alice");
		let err = CloudEndpoint::resolve(&source).unwrap_err();
		assert!(matches!(err, ConfigError::MissingValue { ref name } if name == "LT_ACCESS_KEY"));

		let source = ConfigSource::new("/work").with(keys::LT_ACCESS_KEY, "key");
		let err = CloudEndpoint::resolve(&source).unwrap_err();
		assert!(matches!(err, ConfigError::MissingValue { ref name } if name == "LT_USERNAME"));
	}

	#[test]
	fn hub_override_is_honored() {
		let source = ConfigSource::new("/work")
			.with(keys::LT_USERNAME, "alice")
			.with(keys::LT_ACCESS_KEY, "key")
			.with(keys::LT_HUB, "grid.example.com");
		let endpoint = CloudEndpoint::resolve(&source).unwrap();
		assert_eq!(endpoint.url.host_str(), Some("grid.example.com"));
	}
}
