use droid_protocol::Setting;
use droid_runtime::AppiumServer;
use tracing::{debug, info, warn};

use super::features::{gesture, recording, streaming};
use super::{SessionCoordinator, SessionState};
use crate::capabilities;
use crate::config::SessionMode;
use crate::endpoint::{CloudEndpoint, Endpoint};
use crate::error::{Error, Result};

/// Runs the open sequence on an uninitialized coordinator.
pub(super) async fn open(coordinator: &mut SessionCoordinator) -> Result<()> {
	if coordinator.state != SessionState::Uninitialized {
		return Err(Error::AlreadyStarted(coordinator.state));
	}

	let mode = coordinator.settings.mode;
	debug!(target = "droid.session", %mode, "opening session");
	match mode {
		SessionMode::Local => prepare_local(coordinator).await?,
		SessionMode::Cloud => prepare_cloud(coordinator)?,
	}

	let (Some(endpoint), Some(caps)) = (&coordinator.endpoint, &coordinator.capabilities) else {
		return Err(Error::SessionNotOpen(coordinator.state));
	};
	let display_url = endpoint.display_url();
	debug!(target = "droid.session", endpoint = %display_url, "requesting new session");
	let remote = coordinator
		.connector
		.connect(endpoint.url(), caps)
		.await
		.map_err(|source| Error::SessionOpen {
			endpoint: display_url.clone(),
			source,
		})?;

	info!(target = "droid.session", %mode, endpoint = %display_url, session_id = remote.session_id(), "session open");
	let remote = &**coordinator.remote.insert(remote);
	coordinator.state = SessionState::Open;

	remote
		.set_setting(&Setting::IgnoreUnimportantViews(true))
		.await
		.map_err(Error::remote("set ignoreUnimportantViews"))?;

	let extensions = coordinator.settings.extensions;
	if extensions.streaming {
		match streaming::start(remote).await {
			Ok(()) => coordinator.streaming_active = true,
			Err(err) => warn!(target = "droid.session", error = %err, "screen streaming did not start"),
		}
	}
	if extensions.recording {
		match recording::start(remote).await {
			Ok(()) => coordinator.recording_active = true,
			Err(err) => warn!(target = "droid.session", error = %err, "screen recording did not start"),
		}
	}
	if extensions.swipe {
		gesture::swipe_up(remote).await.map_err(Error::remote("swipe"))?;
	}

	Ok(())
}

/// Capabilities first, then the server; the endpoint is the server's bound URL.
async fn prepare_local(coordinator: &mut SessionCoordinator) -> Result<()> {
	let settings = &coordinator.settings;
	coordinator.capabilities = Some(capabilities::build(SessionMode::Local, &settings.device, &settings.source)?);
	coordinator.state = SessionState::CapabilitiesBuilt;

	let server = AppiumServer::start(&settings.connection.server_config()).await?;
	coordinator.endpoint = Some(Endpoint::Local(server));
	coordinator.state = SessionState::ServerStarted;
	Ok(())
}

/// Endpoint first, then capabilities. No process is started.
fn prepare_cloud(coordinator: &mut SessionCoordinator) -> Result<()> {
	let settings = &coordinator.settings;
	let cloud = CloudEndpoint::resolve(&settings.source)?;
	debug!(target = "droid.session", endpoint = %crate::endpoint::redact(&cloud.url), "cloud endpoint resolved");
	coordinator.endpoint = Some(Endpoint::Cloud(cloud));
	coordinator.state = SessionState::EndpointResolved;

	coordinator.capabilities = Some(capabilities::build(SessionMode::Cloud, &settings.device, &settings.source)?);
	coordinator.state = SessionState::CapabilitiesBuilt;
	Ok(())
}
