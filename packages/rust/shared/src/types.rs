//! Core domain types for ResumeForge builds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ResumeForgeError;

/// Current schema version for the build manifest format.
pub const CURRENT_MANIFEST_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for build-run identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// BuildMode
// ---------------------------------------------------------------------------

/// How project subsets are enumerated into résumé variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// One variant per unordered subset of projects.
    #[default]
    Combinations,
    /// One variant per ordering of each subset.
    Permutations,
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Combinations => write!(f, "combinations"),
            Self::Permutations => write!(f, "permutations"),
        }
    }
}

impl std::str::FromStr for BuildMode {
    type Err = ResumeForgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "combinations" => Ok(Self::Combinations),
            "permutations" => Ok(Self::Permutations),
            other => Err(ResumeForgeError::validation(format!(
                "invalid mode '{other}': expected 'combinations' or 'permutations'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// BuildManifest
// ---------------------------------------------------------------------------

/// The `manifest.json` structure written at the root of the output directory
/// after a successful build run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Schema version for forward compatibility.
    pub manifest_version: u32,
    /// Unique identifier for this build run.
    pub run_id: RunId,
    /// Tool version that produced this manifest.
    pub tool_version: String,
    /// Enumeration mode used.
    pub mode: BuildMode,
    /// Final PDF file name inside each variant folder.
    pub pdf_name: String,
    /// Minimum subset size.
    pub min_projects: usize,
    /// Maximum subset size.
    pub max_projects: usize,
    /// All project names seen in the store, in store order.
    pub projects: Vec<String>,
    /// One record per produced variant, in build order.
    pub variants: Vec<VariantRecord>,
    /// When the run completed.
    pub created_at: DateTime<Utc>,
}

/// A single produced résumé variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantRecord {
    /// Output folder name (underscore-join of the project tuple).
    pub folder: String,
    /// Project names in assembly order.
    pub projects: Vec<String>,
    /// SHA-256 of the final PDF.
    pub pdf_sha256: String,
    /// Size of the final PDF in bytes.
    pub pdf_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_roundtrip() {
        let id = RunId::new();
        let s = id.to_string();
        let parsed: RunId = s.parse().expect("parse RunId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn build_mode_parse_and_display() {
        let mode: BuildMode = "permutations".parse().expect("parse mode");
        assert_eq!(mode, BuildMode::Permutations);
        assert_eq!(mode.to_string(), "permutations");

        let err = "shuffled".parse::<BuildMode>().unwrap_err();
        assert!(err.to_string().contains("invalid mode 'shuffled'"));
    }

    #[test]
    fn manifest_serialization() {
        let manifest = BuildManifest {
            manifest_version: CURRENT_MANIFEST_VERSION,
            run_id: RunId::new(),
            tool_version: "0.1.0".into(),
            mode: BuildMode::Combinations,
            pdf_name: "resume.pdf".into(),
            min_projects: 2,
            max_projects: 3,
            projects: vec!["alpha".into(), "beta".into(), "gamma".into()],
            variants: vec![VariantRecord {
                folder: "alpha_beta".into(),
                projects: vec!["alpha".into(), "beta".into()],
                pdf_sha256: "ab".repeat(32),
                pdf_size_bytes: 2048,
            }],
            created_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&manifest).expect("serialize");
        assert!(json.contains("\"mode\": \"combinations\""));

        let parsed: BuildManifest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.manifest_version, CURRENT_MANIFEST_VERSION);
        assert_eq!(parsed.variants.len(), 1);
        assert_eq!(parsed.variants[0].folder, "alpha_beta");
    }
}
