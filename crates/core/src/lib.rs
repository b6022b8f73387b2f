//! droid: Android automation session lifecycle manager
//!
//! Opens one remote automation session against either a local Appium server
//! (started and stopped by this crate) or a cloud grid, and tears it down in a
//! fixed order.
//!
//! # Example
//!
//! ```ignore
//! use droid::{ConfigSource, SessionCoordinator, SessionMode, Settings, WebDriverConnector};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = ConfigSource::from_env()?;
//!     let settings = Settings::resolve(SessionMode::Cloud, &source)?;
//!
//!     let mut session = SessionCoordinator::new(settings, WebDriverConnector::new()?);
//!     session.open().await?;
//!     session.swipe_up().await?;
//!
//!     let report = session.close().await;
//!     report.into_result()?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: typed settings from a [`ConfigSource`] snapshot
//! - [`capabilities`]: new-session capability descriptors
//! - [`endpoint`]: local or cloud endpoint resolution
//! - [`session`]: the [`SessionCoordinator`] state machine and its extensions
//! - [`client`]: the remote-protocol seam, with [`WebDriverConnector`] as the HTTP implementation

pub mod capabilities;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod session;
mod webdriver;

pub use client::{RemoteError, RemoteSession, SessionConnector};
pub use config::{ConfigSource, ConnectionConfig, DeviceConfig, ExtensionConfig, SessionMode, Settings};
pub use droid_protocol as protocol;
pub use endpoint::{CloudCredentials, CloudEndpoint, Endpoint};
pub use error::{ArtifactError, ConfigError, Error, Result};
pub use session::features::gesture::{Point, SwipePath};
pub use session::features::recording::RecordingOutcome;
pub use session::{CloseReport, CloseStep, CloseStepKind, SessionCoordinator, SessionState};
pub use webdriver::{WebDriverConnector, WebDriverSession};
