//! Client for the hosted backend.
//!
//! The backend exposes per-category record creation; everything else (auth
//! flows, querying, schema) lives server-side and is not modeled here.

mod client;

pub use client::BackendClient;
