use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;
use waymark::graph::{ElementCounts, RepairReport};

/// Contents of `<layers>.provenance.json`, written next to a repaired snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairProvenance<'a> {
    pub code_rev: String,
    pub waymark_version: &'static str,
    /// `file:line` of the command that wrote the layers.
    pub written_by: String,
    pub input: String,
    pub output: String,
    pub tolerance_deg: f64,
    pub counts: ElementCounts,
    pub report: &'a RepairReport,
}

impl<'a> RepairProvenance<'a> {
    #[track_caller]
    pub fn new(
        input: &Path,
        output: &Path,
        tolerance_deg: f64,
        counts: ElementCounts,
        report: &'a RepairReport,
    ) -> Self {
        let caller = Location::caller();
        Self {
            code_rev: current_git_rev(),
            waymark_version: waymark::VERSION,
            written_by: format!("{}:{}", caller.file(), caller.line()),
            input: input.to_string_lossy().into_owned(),
            output: output.to_string_lossy().into_owned(),
            tolerance_deg,
            counts,
            report,
        }
    }
}

/// Write the sidecar for `layers` and return its path.
pub fn write_sidecar(layers: &Path, provenance: &RepairProvenance<'_>) -> Result<PathBuf> {
    let path = sidecar_path(layers);
    let text = serde_json::to_vec_pretty(provenance)?;
    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// `dir/fixed.json` becomes `dir/fixed.provenance.json`.
fn sidecar_path(layers: &Path) -> PathBuf {
    let stem = layers
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "layers".to_string());
    layers.with_file_name(format!("{stem}.provenance.json"))
}

/// Build-time `GIT_COMMIT`, then the runtime variable, then `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|rev| !rev.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|rev| rev.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
