//! Touch gestures.

use droid_protocol::{BUTTON_PRIMARY, PointerKind, PointerSequence, WindowRect};
use tracing::debug;

use crate::client::{RemoteError, RemoteSession};

pub const FINGER_ID: &str = "Finger 1";

/// Duration of the dragging move.
pub const SWIPE_DURATION_MS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
	pub x: i64,
	pub y: i64,
}

/// Straight single-finger drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipePath {
	pub start: Point,
	pub end: Point,
}

impl SwipePath {
	/// From the screen center up by half the distance to the top edge.
	pub fn upward_from_center(width: i64, height: i64) -> Self {
		let start = Point { x: width / 2, y: height / 2 };
		let end = Point {
			x: start.x,
			y: start.y - start.y / 2,
		};
		Self { start, end }
	}

	pub fn for_window(rect: &WindowRect) -> Self {
		Self::upward_from_center(rect.width, rect.height)
	}

	/// Move (0 ms) to start, press, move (600 ms) to end, release.
	pub fn to_sequence(&self) -> PointerSequence {
		PointerSequence::new(FINGER_ID, PointerKind::Touch)
			.move_to(self.start.x, self.start.y, 0)
			.down(BUTTON_PRIMARY)
			.move_to(self.end.x, self.end.y, SWIPE_DURATION_MS)
			.up(BUTTON_PRIMARY)
	}
}

/// Reads the window size and performs an upward swipe.
pub(crate) async fn swipe_up(remote: &dyn RemoteSession) -> Result<SwipePath, RemoteError> {
	let rect = remote.window_rect().await?;
	let path = SwipePath::for_window(&rect);
	debug!(
		target = "droid.session",
		width = rect.width,
		height = rect.height,
		from = ?(path.start.x, path.start.y),
		to = ?(path.end.x, path.end.y),
		"performing swipe"
	);
	remote.perform_actions(&[path.to_sequence()]).await?;
	Ok(path)
}
