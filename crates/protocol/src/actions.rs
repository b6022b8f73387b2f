//! W3C pointer-input action sequences.
//!
//! See <https://www.w3.org/TR/webdriver2/#actions>

use serde::{Deserialize, Serialize};

/// Kind of pointer device driving a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
	Mouse,
	Pen,
	Touch,
}

/// Coordinate origin for a pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerOrigin {
	/// Coordinates are absolute within the viewport.
	#[default]
	Viewport,
	/// Coordinates are relative to the current pointer position.
	Pointer,
}

/// Primary button / first touch contact.
pub const BUTTON_PRIMARY: u32 = 0;

/// One tick of a pointer sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PointerAction {
	#[serde(rename = "pointerMove")]
	Move {
		/// Duration in milliseconds.
		duration: u64,
		origin: PointerOrigin,
		x: i64,
		y: i64,
	},
	#[serde(rename = "pointerDown")]
	Down { button: u32 },
	#[serde(rename = "pointerUp")]
	Up { button: u32 },
	#[serde(rename = "pause")]
	Pause { duration: u64 },
}

/// Parameters block of a pointer input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerParameters {
	pub pointer_type: PointerKind,
}

/// A single input source with its ordered actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerSequence {
	/// Always `"pointer"`.
	#[serde(rename = "type")]
	pub source_type: String,
	pub id: String,
	pub parameters: PointerParameters,
	pub actions: Vec<PointerAction>,
}

impl PointerSequence {
	/// Creates an empty sequence for a named pointer.
	pub fn new(id: impl Into<String>, kind: PointerKind) -> Self {
		Self {
			source_type: "pointer".to_string(),
			id: id.into(),
			parameters: PointerParameters { pointer_type: kind },
			actions: Vec::new(),
		}
	}

	/// Appends an absolute viewport move.
	pub fn move_to(mut self, x: i64, y: i64, duration_ms: u64) -> Self {
		self.actions.push(PointerAction::Move {
			duration: duration_ms,
			origin: PointerOrigin::Viewport,
			x,
			y,
		});
		self
	}

	/// Appends a press of `button`.
	pub fn down(mut self, button: u32) -> Self {
		self.actions.push(PointerAction::Down { button });
		self
	}

	/// Appends a release of `button`.
	pub fn up(mut self, button: u32) -> Self {
		self.actions.push(PointerAction::Up { button });
		self
	}
}
