//! Shared types, error model, and configuration for ResumeForge.
//!
//! This crate is the foundation depended on by all other ResumeForge crates.
//! It provides:
//! - [`ResumeForgeError`] — the unified error type
//! - Domain types ([`BuildMode`], [`BuildManifest`], [`VariantRecord`], [`RunId`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CompilerConfig, DefaultsConfig, TemplateConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{ResumeForgeError, Result};
pub use types::{BuildManifest, BuildMode, CURRENT_MANIFEST_VERSION, RunId, VariantRecord};
