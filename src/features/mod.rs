//! Feature implementations for strack.
//!
//! This module contains the implementation of the app's features:
//! - Task capture with quick-add parsing
//! - Study session timers and logging
//! - Study reports
//! - Offline-first sync with the hosted backend

pub mod study;
pub mod sync;
pub mod tasks;
