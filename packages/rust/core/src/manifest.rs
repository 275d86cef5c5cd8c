//! Build manifest writing.
//!
//! After a run, `manifest.json` at the output root records what was built:
//! run id, mode, bounds, project names, and one checksummed record per
//! variant.

use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::debug;

use resumeforge_shared::{
    BuildManifest, BuildMode, CURRENT_MANIFEST_VERSION, ResumeForgeError, Result, RunId,
    VariantRecord,
};

/// Manifest file name at the output root.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Assemble a manifest for a completed run.
pub fn build_manifest(
    run_id: RunId,
    tool_version: &str,
    mode: BuildMode,
    pdf_name: &str,
    min_projects: usize,
    max_projects: usize,
    projects: &[String],
    variants: Vec<VariantRecord>,
) -> BuildManifest {
    BuildManifest {
        manifest_version: CURRENT_MANIFEST_VERSION,
        run_id,
        tool_version: tool_version.to_string(),
        mode,
        pdf_name: pdf_name.to_string(),
        min_projects,
        max_projects,
        projects: projects.to_vec(),
        variants,
        created_at: Utc::now(),
    }
}

/// Write the manifest (pretty-printed JSON) at the output root.
///
/// Written to a temp name then renamed, so a crash mid-write never leaves a
/// truncated manifest.
pub fn write_manifest(output_root: &Path, manifest: &BuildManifest) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(manifest).map_err(|e| {
        ResumeForgeError::validation(format!("manifest serialization failed: {e}"))
    })?;

    let target = output_root.join(MANIFEST_FILE_NAME);
    let temp = output_root.join(format!(".{MANIFEST_FILE_NAME}.tmp"));

    std::fs::write(&temp, json).map_err(|e| ResumeForgeError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| ResumeForgeError::io(&target, e))?;

    debug!(path = %target.display(), variants = manifest.variants.len(), "manifest written");

    Ok(target)
}

/// SHA-256 and size of a produced file.
pub fn checksum_file(path: &Path) -> Result<(String, u64)> {
    let bytes = std::fs::read(path).map_err(|e| ResumeForgeError::io(path, e))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let hash = format!("{:x}", hasher.finalize());

    Ok((hash, bytes.len() as u64))
}
