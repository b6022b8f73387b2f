//! Wire types for the remote automation protocol.
//!
//! This crate contains the serde-serializable shapes exchanged with an Appium
//! server (local or cloud grid) over W3C WebDriver:
//!
//! - **Capabilities**: new-session payloads for local devices and cloud grids
//! - **Actions**: W3C pointer-input sequences used for touch gestures
//! - **Mobile**: `mobile:` script arguments, recording options, settings and window rects
//!
//! Types here are pure data. Sequencing and lifecycle live in `droid-rs`.

pub mod actions;
pub mod capabilities;
pub mod mobile;

pub use actions::*;
pub use capabilities::*;
pub use mobile::*;
