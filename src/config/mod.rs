//! Immutable per-invocation configuration.
//!
//! Built once by the CLI layer from flags plus environment overrides, then
//! passed by reference through every later stage. Nothing mutates it after
//! construction.

use crate::constants::common;
use crate::error::{Result, SandboxError};
use crate::project_identity;
use serde_json::Value;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Create,
    Delete,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub operation: Operation,
    pub project_id: Option<String>,
    pub cluster_name: Option<String>,
    pub cluster_location: Option<String>,
    /// Namespace for the remote state; empty means the bucket root.
    pub terraform_prefix: String,
    pub skip_asm: bool,
    pub skip_loadgenerator: bool,
    pub verbose: bool,
    /// Correlation id attached to the telemetry events of this run.
    pub session: String,
    pub telemetry_disabled: bool,
    /// Optional node-pool override, passed verbatim into the variables file.
    pub node_pool: Option<Value>,
    pub terraform_dir: PathBuf,
    pub manifest_path: PathBuf,
    /// Where the generated `.tfvars.json` file is written for this run.
    pub vars_file: PathBuf,
}

impl RunConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn for_create(
        project_id: Option<String>,
        cluster_name: Option<String>,
        cluster_location: Option<String>,
        terraform_prefix: Option<String>,
        skip_asm: bool,
        skip_loadgenerator: bool,
        verbose: bool,
    ) -> Result<Self> {
        Self::build(
            Operation::Create,
            project_id,
            cluster_name,
            cluster_location,
            terraform_prefix,
            skip_asm,
            skip_loadgenerator,
            verbose,
        )
    }

    pub fn for_delete(
        project_id: Option<String>,
        terraform_prefix: Option<String>,
        verbose: bool,
    ) -> Result<Self> {
        Self::build(
            Operation::Delete,
            project_id,
            None,
            None,
            terraform_prefix,
            false,
            false,
            verbose,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        operation: Operation,
        project_id: Option<String>,
        cluster_name: Option<String>,
        cluster_location: Option<String>,
        terraform_prefix: Option<String>,
        skip_asm: bool,
        skip_loadgenerator: bool,
        verbose: bool,
    ) -> Result<Self> {
        let session = session_id(read_env("SESSION").as_deref());
        let telemetry_disabled = telemetry_opt_out(read_env("TELEMETRY_DISABLED").as_deref());
        let node_pool = parse_node_pool(read_env("NODE_POOL").as_deref())?;

        let root = std::env::current_dir()?;
        let terraform_dir = root.join(common::TERRAFORM_DIR_NAME);
        let manifest_path = root
            .join(common::KUSTOMIZE_DIR_NAME)
            .join(common::MANIFEST_FILE_NAME);
        let vars_file = std::env::temp_dir().join(format!(
            "{}-{}.tfvars.json",
            project_identity::BINARY_NAME,
            session
        ));

        Ok(Self {
            operation,
            project_id,
            cluster_name,
            cluster_location,
            terraform_prefix: terraform_prefix.unwrap_or_default(),
            skip_asm,
            skip_loadgenerator,
            verbose,
            session,
            telemetry_disabled,
            node_pool,
            terraform_dir,
            manifest_path,
            vars_file,
        })
    }
}

fn read_env(suffix: &str) -> Option<String> {
    std::env::var(project_identity::env_key(suffix)).ok()
}

/// Use the externally supplied correlation id when present, otherwise mint
/// a fresh one for this run.
fn session_id(override_value: Option<&str>) -> String {
    match override_value {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => Uuid::new_v4().to_string(),
    }
}

fn telemetry_opt_out(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(v) => {
            let v = v.trim();
            !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false")
        }
    }
}

fn parse_node_pool(value: Option<&str>) -> Result<Option<Value>> {
    match value {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => serde_json::from_str(raw).map(Some).map_err(|e| {
            SandboxError::Validation(format!(
                "{} must hold a JSON node-pool definition: {}",
                project_identity::env_key("NODE_POOL"),
                e
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_prefers_the_override() {
        assert_eq!(session_id(Some("run-42")), "run-42");
    }

    #[test]
    fn session_id_generates_uuid_when_unset_or_blank() {
        let generated = session_id(None);
        assert_eq!(generated.len(), 36);
        assert_ne!(session_id(Some("  ")), "  ");
    }

    #[test]
    fn telemetry_opt_out_accepts_truthy_values_only() {
        assert!(!telemetry_opt_out(None));
        assert!(!telemetry_opt_out(Some("0")));
        assert!(!telemetry_opt_out(Some("false")));
        assert!(!telemetry_opt_out(Some("")));
        assert!(telemetry_opt_out(Some("1")));
        assert!(telemetry_opt_out(Some("true")));
        assert!(telemetry_opt_out(Some("yes")));
    }

    #[test]
    fn node_pool_override_must_be_json() {
        assert!(parse_node_pool(None).unwrap().is_none());
        assert!(parse_node_pool(Some("")).unwrap().is_none());

        let pool = parse_node_pool(Some(r#"{"machine_type":"e2-standard-4"}"#))
            .unwrap()
            .unwrap();
        assert_eq!(pool["machine_type"], "e2-standard-4");

        let err = parse_node_pool(Some("not-json")).unwrap_err();
        assert!(err.to_string().contains("SANDBOXCTL_NODE_POOL"));
    }

    #[test]
    fn create_config_resolves_paths_under_the_repo_root() {
        let cfg = RunConfig::for_create(
            Some("demo".into()),
            None,
            None,
            Some("p1".into()),
            false,
            true,
            false,
        )
        .unwrap();

        assert_eq!(cfg.operation, Operation::Create);
        assert_eq!(cfg.terraform_prefix, "p1");
        assert!(cfg.skip_loadgenerator);
        assert!(cfg.terraform_dir.ends_with("terraform"));
        assert!(cfg.manifest_path.ends_with("kustomize/kustomization.yaml"));
        assert!(cfg
            .vars_file
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("sandboxctl-"));
    }

    #[test]
    fn delete_config_defaults_prefix_to_bucket_root() {
        let cfg = RunConfig::for_delete(Some("demo".into()), None, false).unwrap();
        assert_eq!(cfg.operation, Operation::Delete);
        assert_eq!(cfg.terraform_prefix, "");
        assert!(!cfg.skip_asm);
    }
}
