//! Command-line front end for `droid` sessions.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod report;
pub mod styles;
