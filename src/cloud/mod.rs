//! Narrow adapter over the `gcloud` CLI.
//!
//! Every query the orchestrator needs from the cloud SDK lives behind a
//! method with a structured return value, so fragility against the SDK's
//! output formats stays in this one module.

use crate::error::{Result, SandboxError};
use crate::exec;
use std::path::PathBuf;
use std::process::Command;

pub struct CloudSdk {
    binary: PathBuf,
}

impl CloudSdk {
    /// Locate the `gcloud` binary on PATH.
    pub fn discover() -> Result<Self> {
        let binary = which::which("gcloud").map_err(|_| {
            SandboxError::DependencyMissing(
                "gcloud not found. Install the Google Cloud SDK first: \
                 https://cloud.google.com/sdk/docs/install"
                    .to_string(),
            )
        })?;
        Ok(Self { binary })
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        cmd
    }

    /// Resolve an access token for the active account.
    pub fn auth_token(&self) -> Result<String> {
        let token = exec::run_capture_checked(&mut self.command(&["auth", "print-access-token"]))?;
        if token.is_empty() {
            return Err(SandboxError::Validation(
                "Authentication token could not be retrieved. Run 'gcloud auth login' first."
                    .to_string(),
            ));
        }
        Ok(token)
    }

    /// The SDK's currently configured default project, if any.
    pub fn default_project(&self) -> Result<Option<String>> {
        let value =
            exec::run_capture_checked(&mut self.command(&["config", "get-value", "project"]))?;
        if value.is_empty() || value == "(unset)" {
            return Ok(None);
        }
        Ok(Some(value))
    }

    /// Whether the given project id exists and is visible to the account.
    pub fn project_exists(&self, project_id: &str) -> Result<bool> {
        let filter = format!("projectId:{}", project_id);
        let listed = exec::run_capture_checked(&mut self.command(&[
            "projects",
            "list",
            "--filter",
            &filter,
            "--format",
            "value(projectId)",
        ]))?;
        Ok(listed.lines().any(|line| line.trim() == project_id))
    }

    pub fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        let uri = format!("gs://{}", bucket);
        let output =
            exec::run_capture(&mut self.command(&["storage", "buckets", "describe", &uri]))?;
        Ok(output.status.success())
    }

    pub fn create_bucket(&self, project_id: &str, bucket: &str) -> Result<()> {
        let uri = format!("gs://{}", bucket);
        let mut cmd = self.command(&["storage", "buckets", "create", &uri, "--project", project_id]);
        let line = exec::render(&cmd);
        let output = exec::run_capture(&mut cmd)?;
        if !output.status.success() {
            return Err(SandboxError::ExternalStatus {
                command: line,
                code: output.status.code().unwrap_or(1),
            });
        }
        Ok(())
    }

    pub fn object_exists(&self, uri: &str) -> Result<bool> {
        let output = exec::run_capture(&mut self.command(&["storage", "ls", uri]))?;
        Ok(output.status.success())
    }

    pub fn delete_object(&self, uri: &str) -> Result<()> {
        let mut cmd = self.command(&["storage", "rm", uri]);
        let line = exec::render(&cmd);
        let output = exec::run_capture(&mut cmd)?;
        if !output.status.success() {
            return Err(SandboxError::ExternalStatus {
                command: line,
                code: output.status.code().unwrap_or(1),
            });
        }
        Ok(())
    }
}
