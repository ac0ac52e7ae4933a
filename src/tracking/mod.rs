// src/tracking/mod.rs
mod sentry;

pub use sentry::{Dsn, DsnError, SentryTracker};

use async_trait::async_trait;

/// Destination for errors that should reach a human.
///
/// Capturing is fire-and-forget: implementations log their own delivery
/// problems and never hand them back to the caller.
#[async_trait]
pub trait ErrorTracker: Send + Sync {
    async fn capture(&self, error: &anyhow::Error);
}
