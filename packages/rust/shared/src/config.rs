//! Application configuration for ResumeForge.
//!
//! User config lives at `~/.resumeforge/resumeforge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ResumeForgeError, Result};
use crate::types::BuildMode;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "resumeforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".resumeforge";

// ---------------------------------------------------------------------------
// Config structs (matching resumeforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// External compiler settings.
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Template settings.
    #[serde(default)]
    pub template: TemplateConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory holding project fragments (`*.tex`).
    #[serde(default = "default_projects_dir")]
    pub projects_dir: String,

    /// Root directory for variant output folders.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Final PDF name inside each variant folder.
    #[serde(default = "default_pdf_name")]
    pub pdf_name: String,

    /// Enumeration mode.
    #[serde(default)]
    pub mode: BuildMode,

    /// Minimum number of projects per variant.
    #[serde(default = "default_min_projects")]
    pub min_projects: usize,

    /// Maximum number of projects per variant.
    #[serde(default = "default_max_projects")]
    pub max_projects: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            projects_dir: default_projects_dir(),
            output_dir: default_output_dir(),
            pdf_name: default_pdf_name(),
            mode: BuildMode::default(),
            min_projects: default_min_projects(),
            max_projects: default_max_projects(),
        }
    }
}

fn default_projects_dir() -> String {
    "projects".into()
}
fn default_output_dir() -> String {
    "output".into()
}
fn default_pdf_name() -> String {
    "resume.pdf".into()
}
fn default_min_projects() -> usize {
    2
}
fn default_max_projects() -> usize {
    3
}

/// `[compiler]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Compiler executable invoked per variant.
    #[serde(default = "default_program")]
    pub program: String,

    /// Extra arguments appended to every invocation.
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Keep `.aux`/`.log`/`.out`/`.toc` and the generated `.tex` source.
    #[serde(default)]
    pub keep_intermediates: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            extra_args: Vec::new(),
            keep_intermediates: false,
        }
    }
}

fn default_program() -> String {
    "pdflatex".into()
}

/// `[template]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Template file path.
    #[serde(default = "default_template_file")]
    pub file: String,

    /// Substitution marker replaced with the merged project content.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Separator inserted between project fragments.
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            file: default_template_file(),
            placeholder: default_placeholder(),
            separator: default_separator(),
        }
    }
}

fn default_template_file() -> String {
    "template.tex".into()
}
fn default_placeholder() -> String {
    "%PROJECT_CONTENT%".into()
}
fn default_separator() -> String {
    "\n".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.resumeforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ResumeForgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.resumeforge/resumeforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ResumeForgeError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        ResumeForgeError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ResumeForgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ResumeForgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ResumeForgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
