// src/statuspage/mod.rs
mod client;
mod status;

pub use client::{ReportError, StatusReporter, StatusUpdate};
pub use status::ComponentStatus;
