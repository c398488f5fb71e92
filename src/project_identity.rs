//! Central project identity contract.
//!
//! This module is the single source of truth for runtime identity values.

pub const DISPLAY_NAME: &str = "Cloud Ops Sandbox";
pub const BINARY_NAME: &str = "sandboxctl";
pub const ENV_PREFIX: &str = "SANDBOXCTL";

/// Suffix appended to the project id to derive the terraform state bucket.
pub const STATE_BUCKET_SUFFIX: &str = "cloud-ops-sandbox-tf-state";

/// Project and topic the best-effort usage events are published to.
pub const TELEMETRY_PROJECT: &str = "cloud-ops-sandbox-telemetry";
pub const TELEMETRY_TOPIC: &str = "telemetry";

pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
