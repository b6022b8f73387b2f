//! Auxiliary session extensions.
//!
//! Each feature is issued against an open session. Streaming and recording
//! start after open and stop during close; the swipe is a one-shot action.

pub mod gesture;
pub mod recording;
pub mod streaming;
