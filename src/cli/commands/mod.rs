//! Command implementations for strack.
//!
//! This module contains the implementation of all CLI commands.

mod common;
mod completions;
mod export;
mod report;
mod session;
mod sync;
mod tasks;

pub use completions::completions;
pub use export::export;
pub use report::report;
pub use session::session;
pub use sync::sync;
pub use tasks::{add, done, list};
