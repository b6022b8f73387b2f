mod builder;
pub mod features;
mod shutdown;

use std::fmt;

use droid_protocol::CapabilityDescriptor;
pub use shutdown::{CloseReport, CloseStep, CloseStepKind};
use tracing::warn;
use url::Url;

use self::features::gesture::{self, SwipePath};
use crate::client::{RemoteSession, SessionConnector};
use crate::config::{SessionMode, Settings};
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};

/// Lifecycle position of a [`SessionCoordinator`].
///
/// Local sessions pass through `CapabilitiesBuilt` then `ServerStarted`
/// (the endpoint is the server's bound URL). Cloud sessions pass through
/// `EndpointResolved` then `CapabilitiesBuilt`. Both end in `Open` and
/// finally `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
	Uninitialized,
	EndpointResolved,
	CapabilitiesBuilt,
	ServerStarted,
	Open,
	Closed,
}

impl fmt::Display for SessionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			SessionState::Uninitialized => "uninitialized",
			SessionState::EndpointResolved => "endpoint resolved",
			SessionState::CapabilitiesBuilt => "capabilities built",
			SessionState::ServerStarted => "server started",
			SessionState::Open => "open",
			SessionState::Closed => "closed",
		};
		f.write_str(name)
	}
}

/// Owns one remote automation session and, in local mode, the server hosting it.
///
/// Created with [`new`](Self::new), started with [`open`](Self::open), and
/// torn down with [`close`](Self::close). A coordinator whose `open` failed
/// part-way still owns whatever it started; `close` releases it.
pub struct SessionCoordinator {
	settings: Settings,
	connector: Box<dyn SessionConnector>,
	state: SessionState,
	capabilities: Option<CapabilityDescriptor>,
	endpoint: Option<Endpoint>,
	remote: Option<Box<dyn RemoteSession>>,
	streaming_active: bool,
	recording_active: bool,
}

impl SessionCoordinator {
	/// Creates an uninitialized coordinator. No side effects.
	pub fn new(settings: Settings, connector: impl SessionConnector + 'static) -> Self {
		Self {
			settings,
			connector: Box::new(connector),
			state: SessionState::Uninitialized,
			capabilities: None,
			endpoint: None,
			remote: None,
			streaming_active: false,
			recording_active: false,
		}
	}

	/// Resolves the endpoint, builds capabilities, starts the local server
	/// when needed, and opens the remote session.
	///
	/// Enabled extensions are started afterwards in order: streaming,
	/// recording, swipe.
	///
	/// # Errors
	///
	/// - [`Error::AlreadyStarted`] unless the coordinator is uninitialized
	/// - [`Error::Config`] for missing or malformed configuration, before any
	///   process or network action
	/// - [`Error::Server`] when the local server cannot be started
	/// - [`Error::SessionOpen`] when the new-session handshake fails
	/// - [`Error::Remote`] when the initial setting or the swipe fails; the
	///   session is open at that point and must still be closed
	pub async fn open(&mut self) -> Result<()> {
		builder::open(self).await
	}

	/// Tears down everything this coordinator started, in reverse order.
	///
	/// Every step is attempted and reported. Calling it again returns an empty report.
	pub async fn close(&mut self) -> CloseReport {
		shutdown::close(self).await
	}

	pub fn mode(&self) -> SessionMode {
		self.settings.mode
	}

	pub fn state(&self) -> SessionState {
		self.state
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn endpoint(&self) -> Option<&Endpoint> {
		self.endpoint.as_ref()
	}

	/// Endpoint URL, including any embedded credentials.
	pub fn endpoint_url(&self) -> Option<&Url> {
		self.endpoint.as_ref().map(Endpoint::url)
	}

	/// Capabilities sent (or to be sent) with the new-session request.
	pub fn capabilities(&self) -> Option<&CapabilityDescriptor> {
		self.capabilities.as_ref()
	}

	pub fn session_id(&self) -> Option<&str> {
		self.remote.as_deref().map(|remote| remote.session_id())
	}

	pub fn is_streaming(&self) -> bool {
		self.streaming_active
	}

	pub fn is_recording(&self) -> bool {
		self.recording_active
	}

	/// Returns true while the local server this coordinator started is alive.
	pub fn is_server_running(&mut self) -> bool {
		match &mut self.endpoint {
			Some(Endpoint::Local(server)) => server.is_running(),
			_ => false,
		}
	}

	/// The open remote session.
	///
	/// # Errors
	///
	/// Returns [`Error::SessionNotOpen`] in any state other than `Open`.
	pub fn remote(&self) -> Result<&dyn RemoteSession> {
		match (&self.remote, self.state) {
			(Some(remote), SessionState::Open) => Ok(&**remote),
			_ => Err(Error::SessionNotOpen(self.state)),
		}
	}

	/// Performs the upward swipe gesture on the open session.
	pub async fn swipe_up(&self) -> Result<SwipePath> {
		gesture::swipe_up(self.remote()?).await.map_err(Error::remote("swipe"))
	}
}

impl fmt::Debug for SessionCoordinator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SessionCoordinator")
			.field("mode", &self.settings.mode)
			.field("state", &self.state)
			.field("endpoint", &self.endpoint.as_ref().map(Endpoint::display_url))
			.field("session_id", &self.session_id())
			.field("streaming_active", &self.streaming_active)
			.field("recording_active", &self.recording_active)
			.finish()
	}
}

impl Drop for SessionCoordinator {
	fn drop(&mut self) {
		let owns_server = matches!(self.endpoint, Some(Endpoint::Local(_)));
		if self.remote.is_some() || owns_server {
			warn!(
				target = "droid.session",
				state = %self.state,
				owns_server,
				"session coordinator dropped without close"
			);
		}
	}
}
