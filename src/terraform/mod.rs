//! Narrow adapter over the `terraform` CLI.

use crate::error::{Result, SandboxError};
use crate::exec;
use crate::ui;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct Terraform {
    binary: PathBuf,
    work_dir: PathBuf,
}

impl Terraform {
    /// Locate the `terraform` binary on PATH and bind it to a working
    /// directory holding the infrastructure configuration.
    pub fn discover(work_dir: &Path) -> Result<Self> {
        let binary = which::which("terraform").map_err(|_| {
            SandboxError::DependencyMissing(
                "terraform not found. Install it first: \
                 https://developer.hashicorp.com/terraform/install"
                    .to_string(),
            )
        })?;
        if !work_dir.is_dir() {
            return Err(SandboxError::Validation(format!(
                "terraform configuration directory not found at '{}'",
                work_dir.display()
            )));
        }
        Ok(Self {
            binary,
            work_dir: work_dir.to_path_buf(),
        })
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.current_dir(&self.work_dir);
        cmd.args(args);
        cmd
    }

    /// `terraform init` against the remote state bucket/prefix.
    ///
    /// Locking is disabled: this is a scripted single-run context and the
    /// backend owns consistency for anything beyond that.
    pub fn init(&self, bucket: &str, prefix: &str) -> Result<()> {
        let bucket_arg = format!("bucket={}", bucket);
        let prefix_arg = format!("prefix={}", prefix);
        let mut cmd = self.command(&[
            "init",
            "-backend-config",
            &bucket_arg,
            "-backend-config",
            &prefix_arg,
            "-lock=false",
        ]);
        let status = exec::run_status(&mut cmd)?;
        if !status.success() {
            ui::error(&format!(
                "terraform could not initialize its backend at gs://{}. \
                 Check your permissions on the state bucket.",
                bucket
            ));
            return Err(SandboxError::ExternalStatus {
                command: "terraform init".to_string(),
                code: status.code().unwrap_or(1),
            });
        }
        Ok(())
    }

    /// `terraform apply -auto-approve` with the generated variables file.
    pub fn apply(&self, var_file: &Path) -> Result<()> {
        self.run_with_vars("apply", var_file)
    }

    /// `terraform destroy -auto-approve` with the generated variables file.
    pub fn destroy(&self, var_file: &Path) -> Result<()> {
        self.run_with_vars("destroy", var_file)
    }

    fn run_with_vars(&self, verb: &str, var_file: &Path) -> Result<()> {
        let var_arg = format!("-var-file={}", var_file.display());
        let mut cmd = self.command(&[verb, "-auto-approve", &var_arg]);
        let status = exec::run_status(&mut cmd)?;
        if !status.success() {
            return Err(SandboxError::ExternalStatus {
                command: format!("terraform {}", verb),
                code: status.code().unwrap_or(1),
            });
        }
        Ok(())
    }

    /// Read a single output value of the applied configuration.
    pub fn output(&self, key: &str) -> Result<String> {
        exec::run_capture_checked(&mut self.command(&["output", "-raw", key]))
    }
}
