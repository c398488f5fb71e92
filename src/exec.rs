//! External command chokepoint.
//!
//! Every `gcloud`/`terraform` invocation goes through this module. In
//! verbose mode the full command line is logged before and after execution;
//! otherwise the child's stderr is suppressed. Exit status is captured and
//! returned, never raised, so callers decide what a non-zero status means.

use crate::error::{Result, SandboxError};
use crate::ui;
use std::process::{Command, ExitStatus, Output, Stdio};
use std::thread;
use std::time::Duration;

/// Render a command line for logs and error messages.
pub fn render(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    shlex::try_join(parts.iter().map(String::as_str)).unwrap_or_else(|_| parts.join(" "))
}

/// Execute a command, capturing stdout (non-interactive).
pub fn run_capture(cmd: &mut Command) -> Result<Output> {
    let line = render(cmd);

    cmd.stdin(Stdio::null()).stdout(Stdio::piped());
    if ui::is_verbose() {
        ui::info(&format!("running: {}", line));
        cmd.stderr(Stdio::inherit());
    } else {
        cmd.stderr(Stdio::null());
    }

    let output = cmd
        .output()
        .map_err(|e| SandboxError::SystemCommandFailed {
            command: line.clone(),
            reason: e.to_string(),
        })?;

    if ui::is_verbose() {
        ui::info(&format!("finished ({}): {}", output.status, line));
    }

    Ok(output)
}

/// Execute a command with live output (interactive), returning its status.
pub fn run_status(cmd: &mut Command) -> Result<ExitStatus> {
    let line = render(cmd);

    cmd.stdin(Stdio::inherit()).stdout(Stdio::inherit());
    if ui::is_verbose() {
        ui::info(&format!("running: {}", line));
        cmd.stderr(Stdio::inherit());
    } else {
        cmd.stderr(Stdio::null());
    }

    let status = cmd
        .status()
        .map_err(|e| SandboxError::SystemCommandFailed {
            command: line.clone(),
            reason: e.to_string(),
        })?;

    if ui::is_verbose() {
        ui::info(&format!("finished ({}): {}", status, line));
    }

    Ok(status)
}

/// Capture stdout of a command whose non-zero exit is an error.
pub fn run_capture_checked(cmd: &mut Command) -> Result<String> {
    let line = render(cmd);
    let output = run_capture(cmd)?;
    if !output.status.success() {
        return Err(SandboxError::ExternalStatus {
            command: line,
            code: output.status.code().unwrap_or(1),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Retry an operation with a fixed delay between attempts.
///
/// Returns on the first success; after `max_attempts` failures the last
/// error is reported.
pub fn retry<T, F>(
    operation_name: &str,
    max_attempts: u32,
    delay: Duration,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match operation() {
            Ok(value) => return Ok(value),
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    ui::warning(&format!(
                        "{} failed (attempt {}/{}), retrying in {}s...",
                        operation_name,
                        attempt,
                        max_attempts,
                        delay.as_secs()
                    ));
                    thread::sleep(delay);
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        SandboxError::Other(format!(
            "{} failed after {} attempts",
            operation_name, max_attempts
        ))
    }))
}

#[cfg(test)]
mod tests {
    use super::{render, retry};
    use crate::error::SandboxError;
    use std::process::Command;
    use std::time::Duration;

    #[test]
    fn retry_succeeds_on_second_attempt() {
        let mut attempts = 0u32;
        let result = retry("op", 3, Duration::ZERO, || {
            attempts += 1;
            if attempts < 2 {
                Err(SandboxError::Other("temporary".to_string()))
            } else {
                Ok(())
            }
        });
        assert!(result.is_ok());
        assert_eq!(attempts, 2);
    }

    #[test]
    fn retry_attempts_exactly_max_then_reports_last_error() {
        let mut attempts = 0u32;
        let result = retry("op", 3, Duration::ZERO, || -> crate::error::Result<()> {
            attempts += 1;
            Err(SandboxError::Other(format!("fail-{attempts}")))
        })
        .expect_err("should fail");

        assert_eq!(attempts, 3);
        assert!(result.to_string().contains("fail-3"));
    }

    #[test]
    fn retry_returns_first_success_immediately() {
        let mut attempts = 0u32;
        let result = retry("op", 3, Duration::ZERO, || {
            attempts += 1;
            Ok(attempts)
        });
        assert_eq!(result.unwrap(), 1);
        assert_eq!(attempts, 1);
    }

    #[test]
    fn render_quotes_arguments_with_spaces() {
        let mut cmd = Command::new("gcloud");
        cmd.args(["projects", "list", "--filter", "name:my project"]);
        let line = render(&cmd);
        assert!(line.starts_with("gcloud projects list"));
        assert!(line.contains("'name:my project'") || line.contains("\"name:my project\""));
    }
}
