//! The `create` command: provision the sandbox into a Google Cloud project.
//!
//! Stages run strictly in sequence: validate preconditions, prepare remote
//! state and generated config, patch the manifest, drive terraform, report.
//! The manifest is restored on every exit path.

use crate::cloud::CloudSdk;
use crate::config::RunConfig;
use crate::constants::{common, urls};
use crate::error::{Result, SandboxError};
use crate::exec;
use crate::manifest::{self, ManifestGuard};
use crate::project_identity;
use crate::state;
use crate::telemetry;
use crate::terraform::Terraform;
use crate::ui;
use std::path::Path;
use std::time::Duration;

pub fn run(cfg: &RunConfig) -> Result<()> {
    let sdk = CloudSdk::discover()?;
    let terraform = Terraform::discover(&cfg.terraform_dir)?;

    let token = exec::retry(
        "auth token lookup",
        common::AUTH_RETRY_ATTEMPTS,
        Duration::from_millis(common::RETRY_DELAY_MS),
        || sdk.auth_token(),
    )?;

    let Some(project_id) = resolve_project(cfg, &sdk)? else {
        // Interactive decline is a clean exit, not a failure
        ui::info("Aborted at user request.");
        return Ok(());
    };

    ui::info(&format!(
        "Provisioning {} into project '{}'...",
        project_identity::DISPLAY_NAME,
        project_id
    ));

    let bucket = state::bucket_name(&project_id);
    state::ensure_bucket(&sdk, &project_id, &bucket)?;

    let object_uri = state::state_object_uri(&bucket, &cfg.terraform_prefix);
    state::reset_existing_state(&sdk, &object_uri)?;
    state::clear_local_cache(&cfg.terraform_dir)?;

    let vars_file = state::write_vars(cfg, &project_id, &bucket)?;

    let mut guard = ManifestGuard::new(&cfg.manifest_path)?;
    let outcome = provision(cfg, &terraform, &bucket, &vars_file);
    guard.restore()?;
    let external_ip = outcome?;

    if ui::is_interrupted() {
        return Err(SandboxError::Interrupted);
    }

    report_success(&project_id, &external_ip);

    if !cfg.telemetry_disabled {
        let event = telemetry::Event::new(&cfg.session, &project_id, common::EVENT_CREATE);
        telemetry::publish(&event, &token);
    }

    Ok(())
}

/// Validate the supplied project id, or confirm the SDK's default project
/// interactively. `None` means the user declined.
fn resolve_project(cfg: &RunConfig, sdk: &CloudSdk) -> Result<Option<String>> {
    match &cfg.project_id {
        Some(id) => {
            if !sdk.project_exists(id)? {
                return Err(SandboxError::Validation(format!(
                    "'{}' is not a valid project ID, or your account cannot see it. \
                     Pass an existing project with --project-id.",
                    id
                )));
            }
            Ok(Some(id.clone()))
        }
        None => {
            let default = sdk.default_project()?.ok_or_else(|| {
                SandboxError::Validation(
                    "No project id given and no default project is configured. \
                     Pass --project-id or run 'gcloud config set project' first."
                        .to_string(),
                )
            })?;
            if !ui::prompt_yes_no(&format!(
                "Deploy {} to the currently configured project '{}'?",
                project_identity::DISPLAY_NAME,
                default
            )) {
                return Ok(None);
            }
            Ok(Some(default))
        }
    }
}

fn provision(
    cfg: &RunConfig,
    terraform: &Terraform,
    bucket: &str,
    vars_file: &Path,
) -> Result<String> {
    let patched = manifest::apply_rules(&cfg.manifest_path, &manifest::rules_for(cfg))?;
    if patched > 0 && ui::is_verbose() {
        ui::info(&format!("enabled {} optional manifest component(s)", patched));
    }

    terraform.init(bucket, &cfg.terraform_prefix)?;
    terraform.apply(vars_file)?;
    terraform.output(common::EXTERNAL_IP_OUTPUT)
}

fn report_success(project_id: &str, external_ip: &str) {
    println!();
    ui::success(&format!("{} deployed!", project_identity::DISPLAY_NAME));
    println!();
    ui::keyval("Application URL", &format!("http://{}", external_ip));
    ui::keyval("Cloud Console", &urls::cloud_console(project_id));
    ui::keyval("Monitoring", &urls::monitoring_console(project_id));
    ui::keyval("Workloads", &urls::kubernetes_console(project_id));
    println!();
    ui::indent(&format!("Next steps: {}", urls::DOCS), 1);
}
