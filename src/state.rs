//! Remote state location and generated terraform variables.

use crate::cloud::CloudSdk;
use crate::config::RunConfig;
use crate::constants::common;
use crate::error::{Result, SandboxError};
use crate::exec;
use crate::project_identity;
use crate::ui;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Deterministic state bucket name for a project.
pub fn bucket_name(project_id: &str) -> String {
    format!("{}-{}", project_id, project_identity::STATE_BUCKET_SUFFIX)
}

/// Full URI of the state object, namespaced by the prefix when one is set.
pub fn state_object_uri(bucket: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        format!("gs://{}/{}", bucket, common::STATE_FILE_NAME)
    } else {
        format!("gs://{}/{}/{}", bucket, prefix, common::STATE_FILE_NAME)
    }
}

/// Make sure the state bucket exists, creating it when absent.
pub fn ensure_bucket(sdk: &CloudSdk, project_id: &str, bucket: &str) -> Result<()> {
    if sdk.bucket_exists(bucket)? {
        return Ok(());
    }
    ui::info(&format!("Creating state bucket gs://{}...", bucket));
    exec::retry(
        "state bucket creation",
        common::BUCKET_RETRY_ATTEMPTS,
        Duration::from_millis(common::RETRY_DELAY_MS),
        || sdk.create_bucket(project_id, bucket),
    )
}

/// During `create`, an existing state object means a previous deployment.
/// It is wiped after a warning and a grace delay so provisioning starts
/// from a clean slate.
pub fn reset_existing_state(sdk: &CloudSdk, object_uri: &str) -> Result<()> {
    if !sdk.object_exists(object_uri)? {
        return Ok(());
    }
    ui::warning(&format!(
        "Found existing deployment state at {}. It will be deleted and the \
         sandbox re-provisioned from scratch. Press Ctrl-C now to abort.",
        object_uri
    ));
    thread::sleep(Duration::from_millis(common::STATE_RESET_GRACE_MS));
    if ui::is_interrupted() {
        return Err(SandboxError::Interrupted);
    }
    sdk.delete_object(object_uri)
}

/// Remove terraform's local working directory so init starts clean.
pub fn clear_local_cache(terraform_dir: &std::path::Path) -> Result<()> {
    let cache = terraform_dir.join(common::TERRAFORM_CACHE_DIR_NAME);
    if cache.is_dir() {
        fs::remove_dir_all(&cache).map_err(|e| SandboxError::IoError {
            path: cache.clone(),
            source: e,
        })?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct TfVars<'a> {
    state_bucket_name: &'a str,
    state_prefix: &'a str,
    gcp_project_id: &'a str,
    /// Directory of the kustomization manifest the cluster deploys from.
    filepath: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_location: Option<&'a str>,
    enable_asm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    gke_node_pool: Option<&'a serde_json::Value>,
}

/// Write the generated `.tfvars.json` for this run and return its path.
///
/// The file lands in the OS temp directory; nothing deletes it explicitly.
pub fn write_vars(cfg: &RunConfig, project_id: &str, bucket: &str) -> Result<PathBuf> {
    let manifest_dir = cfg
        .manifest_path
        .parent()
        .ok_or_else(|| {
            SandboxError::Validation(format!(
                "manifest path '{}' has no parent directory",
                cfg.manifest_path.display()
            ))
        })?
        .to_path_buf();

    let vars = TfVars {
        state_bucket_name: bucket,
        state_prefix: &cfg.terraform_prefix,
        gcp_project_id: project_id,
        filepath: manifest_dir.display().to_string(),
        cluster_name: cfg.cluster_name.as_deref(),
        cluster_location: cfg.cluster_location.as_deref(),
        enable_asm: !cfg.skip_asm,
        gke_node_pool: cfg.node_pool.as_ref(),
    };

    let body = serde_json::to_string_pretty(&vars)?;
    fs::write(&cfg.vars_file, body).map_err(|e| SandboxError::IoError {
        path: cfg.vars_file.clone(),
        source: e,
    })?;
    Ok(cfg.vars_file.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;

    #[test]
    fn bucket_name_is_derived_from_the_project() {
        assert_eq!(bucket_name("abc"), "abc-cloud-ops-sandbox-tf-state");
    }

    #[test]
    fn state_path_without_prefix_sits_at_bucket_root() {
        let uri = state_object_uri(&bucket_name("abc"), "");
        assert_eq!(uri, "gs://abc-cloud-ops-sandbox-tf-state/default.tfstate");
    }

    #[test]
    fn state_path_with_prefix_is_namespaced() {
        let uri = state_object_uri(&bucket_name("abc"), "p1");
        assert_eq!(
            uri,
            "gs://abc-cloud-ops-sandbox-tf-state/p1/default.tfstate"
        );
    }

    #[test]
    fn vars_file_carries_the_run_configuration() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = RunConfig::for_create(
            Some("demo".into()),
            Some("my-cluster".into()),
            None,
            Some("p1".into()),
            true,
            false,
            false,
        )
        .unwrap();
        cfg.vars_file = tmp.path().join("vars.tfvars.json");
        cfg.manifest_path = tmp.path().join("kustomize").join("kustomization.yaml");

        let path = write_vars(&cfg, "demo", &bucket_name("demo")).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(
            parsed["state_bucket_name"],
            "demo-cloud-ops-sandbox-tf-state"
        );
        assert_eq!(parsed["state_prefix"], "p1");
        assert_eq!(parsed["gcp_project_id"], "demo");
        assert_eq!(parsed["cluster_name"], "my-cluster");
        assert_eq!(parsed["enable_asm"], false);
        assert!(parsed.get("cluster_location").is_none());
        assert!(parsed.get("gke_node_pool").is_none());
        assert!(parsed["filepath"].as_str().unwrap().ends_with("kustomize"));
    }

    #[test]
    fn node_pool_override_lands_in_the_vars_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg =
            RunConfig::for_create(Some("demo".into()), None, None, None, false, false, false)
                .unwrap();
        cfg.vars_file = tmp.path().join("vars.tfvars.json");
        cfg.manifest_path = tmp.path().join("kustomize").join("kustomization.yaml");
        cfg.node_pool = Some(serde_json::json!({"machine_type": "e2-standard-4"}));

        let path = write_vars(&cfg, "demo", &bucket_name("demo")).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed["gke_node_pool"]["machine_type"], "e2-standard-4");
    }

    #[test]
    fn clearing_a_missing_cache_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        clear_local_cache(tmp.path()).unwrap();

        let cache = tmp.path().join(".terraform");
        fs::create_dir_all(cache.join("providers")).unwrap();
        clear_local_cache(tmp.path()).unwrap();
        assert!(!cache.exists());
    }
}
