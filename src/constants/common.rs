// Common constants used throughout the codebase

/// Name of the terraform state object inside the state bucket
pub const STATE_FILE_NAME: &str = "default.tfstate";

/// Directory holding the terraform configuration, relative to the repo root
pub const TERRAFORM_DIR_NAME: &str = "terraform";

/// Terraform's local working directory, removed before every init
pub const TERRAFORM_CACHE_DIR_NAME: &str = ".terraform";

/// Directory holding the kustomization manifest, relative to the repo root
pub const KUSTOMIZE_DIR_NAME: &str = "kustomize";

/// The manifest file patched around a run
pub const MANIFEST_FILE_NAME: &str = "kustomization.yaml";

/// Optional manifest component that removes the synthetic load generator
pub const COMPONENT_WITHOUT_LOADGENERATOR: &str = "without-loadgenerator";

/// Optional manifest component that enables the service mesh
pub const COMPONENT_SERVICE_MESH: &str = "service-mesh-istio";

/// Terraform output holding the frontend external IP
pub const EXTERNAL_IP_OUTPUT: &str = "frontend_external_ip";

/// Attempts for resolving an auth token
pub const AUTH_RETRY_ATTEMPTS: u32 = 2;

/// Attempts for creating the state bucket
pub const BUCKET_RETRY_ATTEMPTS: u32 = 3;

/// Fixed delay between retry attempts
pub const RETRY_DELAY_MS: u64 = 2_000;

/// Grace delay before a pre-existing deployment state is wiped
pub const STATE_RESET_GRACE_MS: u64 = 5_000;

/// Telemetry publish timeout; the event is best-effort and never blocks long
pub const TELEMETRY_TIMEOUT_MS: u64 = 5_000;

/// Telemetry event names
pub const EVENT_CREATE: &str = "sandboxctl-create";
pub const EVENT_DESTROY: &str = "sandboxctl-destroy";
