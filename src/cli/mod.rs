//! Command-line interface for strack.

pub mod args;
pub mod commands;
