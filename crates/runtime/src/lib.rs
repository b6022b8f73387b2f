//! droid runtime - local Appium server discovery and lifecycle
//!
//! - **Driver discovery**: locating the `appium` launcher ([`driver`])
//! - **Server lifecycle**: spawning with fixed flags, readiness probing, and
//!   stopping ([`server`])
//!
//! Only the owner of an [`AppiumServer`] may stop it. Every search input is
//! passed in explicitly through [`ServerConfig`].

pub mod driver;
pub mod error;
pub mod server;

pub use driver::{ServerLocator, get_server_executable};
pub use error::{Error, Result};
pub use server::{AppiumServer, DEFAULT_BASE_PATH, DEFAULT_STARTUP_TIMEOUT, ServerArgs, ServerConfig};
