//! End-to-end build pipeline: store → enumerate → render → compile → manifest.
//!
//! Strictly sequential and blocking: each variant is fully assembled,
//! compiled, and finalized before the next begins, and the first failure
//! aborts the whole run. The only state shared across iterations is the
//! filesystem.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument};

use resumeforge_compiler::DocumentCompiler;
use resumeforge_shared::{
    BuildMode, ResumeForgeError, Result, RunId, VariantRecord,
};
use resumeforge_store::ProjectStore;
use resumeforge_template::Template;

use crate::enumerate::{enumerate_variants, folder_name};
use crate::manifest;

/// Configuration for one build run, fully merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Enumeration mode.
    pub mode: BuildMode,
    /// Final PDF name inside each variant folder.
    pub pdf_name: String,
    /// Minimum subset size.
    pub min_projects: usize,
    /// Maximum subset size.
    pub max_projects: usize,
    /// Directory holding `*.tex` project fragments.
    pub projects_dir: PathBuf,
    /// Root directory receiving one folder per variant.
    pub output_root: PathBuf,
    /// Template file path.
    pub template_file: PathBuf,
    /// Substitution marker within the template.
    pub placeholder: String,
    /// Separator inserted between fragments.
    pub separator: String,
    /// Tool version string recorded in the manifest.
    pub tool_version: String,
}

/// Result of a completed build run.
#[derive(Debug)]
pub struct BuildResult {
    /// Run identifier (also recorded in the manifest).
    pub run_id: RunId,
    /// Output root containing the variant folders.
    pub output_root: PathBuf,
    /// Path of the written manifest.
    pub manifest_path: PathBuf,
    /// Number of variants produced.
    pub variant_count: usize,
    /// Number of projects in the store.
    pub project_count: usize,
    /// Mode the run used.
    pub mode: BuildMode,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Result of a dry run: what a build would produce, without compiling.
#[derive(Debug)]
pub struct PlanResult {
    /// Folder names in build order.
    pub folders: Vec<String>,
    /// Number of projects in the store.
    pub project_count: usize,
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for reporting build status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a variant starts compiling.
    fn variant_started(&self, folder: &str, current: usize, total: usize);
    /// Called after a variant's PDF is finalized.
    fn variant_built(&self, folder: &str, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn variant_started(&self, _folder: &str, _current: usize, _total: usize) {}
    fn variant_built(&self, _folder: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

// ---------------------------------------------------------------------------
// Build pipeline
// ---------------------------------------------------------------------------

/// Run the full build.
///
/// 1. Scan the project store (creating the projects dir if missing)
/// 2. Validate store size and bounds (before any output folder exists)
/// 3. Load the template
/// 4. Enumerate variants
/// 5. Per variant: read fragments → render → compile → checksum
/// 6. Write the build manifest
#[instrument(skip_all, fields(mode = %config.mode, min = config.min_projects, max = config.max_projects))]
pub fn run_build(
    config: &BuildConfig,
    compiler: &dyn DocumentCompiler,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let start = Instant::now();
    let run_id = RunId::new();

    info!(%run_id, projects_dir = %config.projects_dir.display(), "starting build run");

    // --- Phase 1: Scan store ---
    progress.phase("Scanning projects");
    let store = scan_store(config)?;

    // --- Phase 2: Validate + enumerate (no output folder exists yet) ---
    progress.phase("Enumerating variants");
    let variants = enumerate_variants(
        store.names(),
        config.mode,
        config.min_projects,
        config.max_projects,
    )?;

    // --- Phase 3: Load template ---
    progress.phase("Loading template");
    let template = Template::load(&config.template_file, &config.placeholder)?;

    // --- Phase 4: Create output root ---
    std::fs::create_dir_all(&config.output_root)
        .map_err(|e| ResumeForgeError::io(&config.output_root, e))?;

    // --- Phase 5: Build each variant sequentially ---
    progress.phase("Compiling variants");
    let total = variants.len();
    let mut records: Vec<VariantRecord> = Vec::with_capacity(total);

    for (i, tuple) in variants.iter().enumerate() {
        let folder = folder_name(tuple);
        progress.variant_started(&folder, i + 1, total);

        let fragments = tuple
            .iter()
            .map(|name| store.read(name))
            .collect::<Result<Vec<String>>>()?;

        let rendered = template.render(&fragments, &config.separator);

        let out_dir = config.output_root.join(&folder);
        let doc = compiler.compile(&rendered.content, &out_dir, &config.pdf_name)?;

        let (pdf_sha256, pdf_size_bytes) = manifest::checksum_file(&doc.pdf_path)?;
        records.push(VariantRecord {
            folder: folder.clone(),
            projects: tuple.clone(),
            pdf_sha256,
            pdf_size_bytes,
        });

        progress.variant_built(&folder, i + 1, total);
    }

    // --- Phase 6: Write manifest ---
    progress.phase("Writing manifest");
    let manifest = manifest::build_manifest(
        run_id.clone(),
        &config.tool_version,
        config.mode,
        &config.pdf_name,
        config.min_projects,
        config.max_projects,
        store.names(),
        records,
    );
    let manifest_path = manifest::write_manifest(&config.output_root, &manifest)?;

    let result = BuildResult {
        run_id,
        output_root: config.output_root.clone(),
        manifest_path,
        variant_count: total,
        project_count: store.len(),
        mode: config.mode,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        run_id = %result.run_id,
        variant_count = result.variant_count,
        project_count = result.project_count,
        elapsed_ms = result.elapsed.as_millis(),
        "build run complete"
    );

    Ok(result)
}

/// Dry run: validate and enumerate, touching nothing under the output root.
#[instrument(skip_all, fields(mode = %config.mode))]
pub fn plan_build(config: &BuildConfig) -> Result<PlanResult> {
    let store = scan_store(config)?;
    let variants = enumerate_variants(
        store.names(),
        config.mode,
        config.min_projects,
        config.max_projects,
    )?;

    // The template is validated here too so `plan` catches a missing marker
    // before anyone burns time on a full build.
    Template::load(&config.template_file, &config.placeholder)?;

    Ok(PlanResult {
        folders: variants.iter().map(|v| folder_name(v)).collect(),
        project_count: store.len(),
    })
}

/// Scan the projects directory, creating it first if missing.
fn scan_store(config: &BuildConfig) -> Result<ProjectStore> {
    std::fs::create_dir_all(&config.projects_dir)
        .map_err(|e| ResumeForgeError::io(&config.projects_dir, e))?;
    ProjectStore::scan(&config.projects_dir)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
