//! Kustomization manifest patching.
//!
//! Optional deployment components live in the manifest as commented-out
//! entries. A run selectively uncomments them through a declarative rule
//! list, and a guard restores the original bytes on every exit path.

use crate::config::RunConfig;
use crate::constants::common;
use crate::error::{Result, SandboxError};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
pub struct PatchRule {
    /// Component name as referenced by the manifest.
    pub component: &'static str,
    /// Whether this run wants the component active.
    pub enabled: bool,
}

/// The component rules for one run. The service-mesh entry is only patched
/// alongside the load-generator one; with a stock manifest the mesh is
/// driven by the `enable_asm` terraform variable alone.
pub fn rules_for(cfg: &RunConfig) -> Vec<PatchRule> {
    vec![
        PatchRule {
            component: common::COMPONENT_WITHOUT_LOADGENERATOR,
            enabled: cfg.skip_loadgenerator,
        },
        PatchRule {
            component: common::COMPONENT_SERVICE_MESH,
            enabled: cfg.skip_loadgenerator && !cfg.skip_asm,
        },
    ]
}

/// Holds the original manifest bytes and writes them back when dropped,
/// so a failed apply never leaves the tracked manifest modified.
pub struct ManifestGuard {
    path: PathBuf,
    original: Vec<u8>,
    restored: bool,
}

impl ManifestGuard {
    pub fn new(path: &Path) -> Result<Self> {
        let original = fs::read(path).map_err(|e| SandboxError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            original,
            restored: false,
        })
    }

    /// Explicit restore; preferred over relying on drop so write errors
    /// surface.
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        fs::write(&self.path, &self.original).map_err(|e| SandboxError::IoError {
            path: self.path.clone(),
            source: e,
        })?;
        self.restored = true;
        Ok(())
    }
}

impl Drop for ManifestGuard {
    fn drop(&mut self) {
        if !self.restored {
            let _ = fs::write(&self.path, &self.original);
        }
    }
}

/// Apply the rules to the manifest in place; returns how many lines were
/// uncommented.
pub fn apply_rules(path: &Path, rules: &[PatchRule]) -> Result<usize> {
    let content = fs::read_to_string(path).map_err(|e| SandboxError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let (patched, changed) = patch_content(&content, rules)?;
    if changed > 0 {
        fs::write(path, patched).map_err(|e| SandboxError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(changed)
}

fn patch_content(content: &str, rules: &[PatchRule]) -> Result<(String, usize)> {
    let matchers: Vec<(Regex, bool)> = rules
        .iter()
        .map(|rule| component_matcher(rule.component).map(|re| (re, rule.enabled)))
        .collect::<Result<_>>()?;

    let mut changed = 0usize;
    let mut out = String::with_capacity(content.len());
    for line in content.lines() {
        let mut emitted = false;
        for (re, enabled) in &matchers {
            if !enabled {
                continue;
            }
            if let Some(caps) = re.captures(line) {
                out.push_str(&caps[1]);
                out.push_str(&caps[2]);
                changed += 1;
                emitted = true;
                break;
            }
        }
        if !emitted {
            out.push_str(line);
        }
        out.push('\n');
    }

    // lines() swallows a missing trailing newline; keep the original shape
    if !content.ends_with('\n') {
        out.pop();
    }
    Ok((out, changed))
}

/// Matches a commented-out component entry, tolerating an optional
/// `?version=...` annotation on the reference.
fn component_matcher(component: &str) -> Result<Regex> {
    let pattern = format!(
        r"^(\s*)#\s*(-\s*(?:\.\./)*components/{}(?:\?version=[A-Za-z0-9][A-Za-z0-9._-]*)?\s*)$",
        regex::escape(component)
    );
    Regex::new(&pattern)
        .map_err(|e| SandboxError::Other(format!("invalid component pattern: {}", e)))
}
