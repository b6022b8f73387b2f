//! Appium executable discovery
//!
//! Locates the `appium` launcher installed by npm. Callers pass every search
//! input explicitly; nothing here reads the process environment.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Launcher name inside an npm bin directory.
#[cfg(not(windows))]
const APPIUM_BIN: &str = "appium";
#[cfg(windows)]
const APPIUM_BIN: &str = "appium.cmd";

/// Search inputs for [`get_server_executable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerLocator {
	/// Explicit executable path. When set, no other location is consulted.
	pub explicit: Option<PathBuf>,
	/// Bin directory of the Node.js runtime the server was installed into (e.g. `$NVM_BIN`).
	pub runtime_bin_dir: Option<PathBuf>,
	/// `PATH`-style search list. `None` searches the process `PATH`.
	pub search_path: Option<String>,
}

/// Get the path to the Appium server executable
///
/// Search order:
/// 1. Explicit path (must exist)
/// 2. `appium` inside the runtime bin directory
/// 3. `appium` on the search path
///
/// # Errors
///
/// Returns [`Error::BinaryMissing`] if an explicit path does not exist, and
/// [`Error::ServerNotFound`] if no other location has the executable.
pub fn get_server_executable(locator: &ServerLocator) -> Result<PathBuf> {
	if let Some(explicit) = &locator.explicit {
		if explicit.exists() {
			debug!(target = "droid.server", path = %explicit.display(), "using explicit appium executable");
			return Ok(explicit.clone());
		}
		return Err(Error::BinaryMissing(explicit.clone()));
	}

	if let Some(path) = locator.runtime_bin_dir.as_deref().and_then(try_runtime_bin) {
		debug!(target = "droid.server", path = %path.display(), "using appium from runtime bin dir");
		return Ok(path);
	}

	if let Some(path) = try_search_path(locator.search_path.as_deref()) {
		debug!(target = "droid.server", path = %path.display(), "using appium from PATH");
		return Ok(path);
	}

	Err(Error::ServerNotFound)
}

fn try_runtime_bin(dir: &Path) -> Option<PathBuf> {
	let candidate = dir.join(APPIUM_BIN);
	candidate.is_file().then_some(candidate)
}

fn try_search_path(search_path: Option<&str>) -> Option<PathBuf> {
	match search_path {
		Some(paths) => which::which_in("appium", Some(paths), ".").ok(),
		None => which::which("appium").ok(),
	}
}

#[cfg(test)]
mod tests {
	use std::fs;
	#[cfg(unix)]
	use std::os::unix::fs::PermissionsExt;

	use tempfile::TempDir;

	use super::*;

	fn write_launcher(path: &Path) {
		fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
		#[cfg(unix)]
		{
			let mut perms = fs::metadata(path).unwrap().permissions();
			perms.set_mode(0o755);
			fs::set_permissions(path, perms).unwrap();
		}
	}

	#[test]
	fn explicit_path_wins_when_present() {
		let temp = TempDir::new().unwrap();
		let explicit = temp.path().join("my-appium");
		write_launcher(&explicit);

		let bin_dir = temp.path().join("bin");
		fs::create_dir_all(&bin_dir).unwrap();
		write_launcher(&bin_dir.join(APPIUM_BIN));

		let locator = ServerLocator {
			explicit: Some(explicit.clone()),
			runtime_bin_dir: Some(bin_dir),
			search_path: None,
		};
		assert_eq!(get_server_executable(&locator).unwrap(), explicit);
	}

	#[test]
	fn missing_explicit_path_is_an_error() {
		let locator = ServerLocator {
			explicit: Some(PathBuf::from("/definitely/missing/appium")),
			..Default::default()
		};
		let err = get_server_executable(&locator).unwrap_err();
		assert!(matches!(err, Error::BinaryMissing(_)));
		assert!(err.is_not_found());
	}

	#[test]
	fn runtime_bin_dir_is_searched() {
		let temp = TempDir::new().unwrap();
		write_launcher(&temp.path().join(APPIUM_BIN));

		let locator = ServerLocator {
			runtime_bin_dir: Some(temp.path().to_path_buf()),
			search_path: Some(String::new()),
			..Default::default()
		};
		assert_eq!(get_server_executable(&locator).unwrap(), temp.path().join(APPIUM_BIN));
	}

	#[cfg(unix)]
	#[test]
	fn search_path_is_used_as_fallback() {
		let temp = TempDir::new().unwrap();
		write_launcher(&temp.path().join("appium"));

		let locator = ServerLocator {
			search_path: Some(temp.path().display().to_string()),
			..Default::default()
		};
		assert_eq!(get_server_executable(&locator).unwrap(), temp.path().join("appium"));
	}

	#[test]
	fn empty_locations_report_server_not_found() {
		let temp = TempDir::new().unwrap();
		let locator = ServerLocator {
			runtime_bin_dir: Some(temp.path().to_path_buf()),
			search_path: Some(temp.path().display().to_string()),
			..Default::default()
		};
		assert!(matches!(get_server_executable(&locator), Err(Error::ServerNotFound)));
	}
}
