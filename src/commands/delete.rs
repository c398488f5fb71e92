//! The `delete` command: tear down a previously provisioned sandbox.

use crate::cloud::CloudSdk;
use crate::config::RunConfig;
use crate::constants::common;
use crate::error::{Result, SandboxError};
use crate::exec;
use crate::project_identity;
use crate::state;
use crate::telemetry;
use crate::terraform::Terraform;
use crate::ui;
use std::time::Duration;

pub fn run(cfg: &RunConfig) -> Result<()> {
    // Checked before anything touches gcloud or the filesystem
    let project_id = cfg.project_id.clone().ok_or_else(|| {
        SandboxError::Validation(
            "delete needs the --project-id of the deployed sandbox.".to_string(),
        )
    })?;

    let sdk = CloudSdk::discover()?;
    let terraform = Terraform::discover(&cfg.terraform_dir)?;

    let token = exec::retry(
        "auth token lookup",
        common::AUTH_RETRY_ATTEMPTS,
        Duration::from_millis(common::RETRY_DELAY_MS),
        || sdk.auth_token(),
    )?;

    if !sdk.project_exists(&project_id)? {
        return Err(SandboxError::Validation(format!(
            "'{}' is not a valid project ID, or your account cannot see it.",
            project_id
        )));
    }

    let bucket = state::bucket_name(&project_id);
    let object_uri = state::state_object_uri(&bucket, &cfg.terraform_prefix);
    if !sdk.object_exists(&object_uri)? {
        return Err(SandboxError::Validation(format!(
            "{} is not deployed in project '{}': no state found at {}.",
            project_identity::DISPLAY_NAME,
            project_id,
            object_uri
        )));
    }

    ui::info(&format!(
        "Deleting {} from project '{}'...",
        project_identity::DISPLAY_NAME,
        project_id
    ));

    state::clear_local_cache(&cfg.terraform_dir)?;
    let vars_file = state::write_vars(cfg, &project_id, &bucket)?;

    terraform.init(&bucket, &cfg.terraform_prefix)?;
    terraform.destroy(&vars_file)?;

    if ui::is_interrupted() {
        return Err(SandboxError::Interrupted);
    }

    ui::success(&format!(
        "{} resources in project '{}' were deleted.",
        project_identity::DISPLAY_NAME,
        project_id
    ));

    if !cfg.telemetry_disabled {
        let event = telemetry::Event::new(&cfg.session, &project_id, common::EVENT_DESTROY);
        telemetry::publish(&event, &token);
    }

    Ok(())
}
