// src/health/mod.rs
mod checker;
mod probe;
mod target;

pub use checker::{CheckOutcome, HealthCheckRunner};
pub use probe::{classify, CheckError, ProbeResponse, ProbeResult, SLOW_THRESHOLD_SECS};
pub use target::{CheckTarget, CheckTargets, TargetAuth};
