//! External document compiler invocation.
//!
//! Each résumé variant is compiled by shelling out to a LaTeX engine
//! (`pdflatex` by default): write the assembled source into the variant
//! folder, run the engine with that folder as its output directory, delete
//! the intermediate artifacts, and rename the engine's default output to the
//! configured PDF name. Strictly blocking, one invocation per variant, no
//! retry and no timeout. A failed invocation aborts the whole run.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, instrument};

use resumeforge_shared::{CompilerConfig, ResumeForgeError, Result};

/// File stem of the per-variant source written for the engine.
const JOB_STEM: &str = "variant";

/// Intermediate extensions removed after a successful run.
const INTERMEDIATE_EXTENSIONS: &[&str] = &["aux", "log", "out", "toc", "tex"];

/// How much engine output to keep in error messages.
const OUTPUT_TAIL_BYTES: usize = 2048;

// ---------------------------------------------------------------------------
// DocumentCompiler trait
// ---------------------------------------------------------------------------

/// A compiled variant document.
#[derive(Debug, Clone)]
pub struct CompiledDocument {
    /// Path of the final renamed PDF.
    pub pdf_path: PathBuf,
}

/// Turns assembled LaTeX source into a named PDF inside a variant folder.
///
/// The pipeline depends on this trait so tests can substitute a fake
/// implementation instead of requiring a TeX installation.
pub trait DocumentCompiler: Send + Sync {
    /// Compile `source` into `<out_dir>/<final_name>`.
    fn compile(&self, source: &str, out_dir: &Path, final_name: &str) -> Result<CompiledDocument>;
}

// ---------------------------------------------------------------------------
// LatexCompiler
// ---------------------------------------------------------------------------

/// Production compiler: spawns the configured LaTeX engine per variant.
#[derive(Debug, Clone)]
pub struct LatexCompiler {
    config: CompilerConfig,
}

impl LatexCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Check that the configured engine is on PATH before starting a run.
    pub fn check_available(&self) -> Result<()> {
        let probe = Command::new(&self.config.program)
            .arg("--version")
            .output();

        match probe {
            Ok(output) if output.status.success() => {
                let version = String::from_utf8_lossy(&output.stdout);
                let first_line = version.lines().next().unwrap_or("").trim().to_string();
                debug!(program = %self.config.program, version = %first_line, "compiler found");
                Ok(())
            }
            _ => Err(ResumeForgeError::Compiler(format!(
                "'{}' not found. Install a TeX distribution (e.g. TeX Live) or set \
                 [compiler] program in the config.",
                self.config.program
            ))),
        }
    }

    /// Run the engine against an already-written source file.
    fn run_engine(&self, out_dir: &Path, source_path: &Path) -> Result<()> {
        let output = Command::new(&self.config.program)
            .arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg("-output-directory")
            .arg(out_dir)
            .args(&self.config.extra_args)
            .arg(source_path)
            .output()
            .map_err(|e| {
                ResumeForgeError::Compiler(format!(
                    "failed to spawn '{}': {e}",
                    self.config.program
                ))
            })?;

        if !output.status.success() {
            let tail = output_tail(&output.stdout, &output.stderr);
            return Err(ResumeForgeError::Compiler(format!(
                "'{}' exited with status {} in {}\n{tail}",
                self.config.program,
                output.status.code().unwrap_or(-1),
                out_dir.display(),
            )));
        }

        Ok(())
    }

    /// Delete the intermediate artifacts the engine leaves next to the PDF.
    fn clean_intermediates(&self, out_dir: &Path) -> Result<()> {
        for ext in INTERMEDIATE_EXTENSIONS {
            let path = out_dir.join(format!("{JOB_STEM}.{ext}"));
            if path.exists() {
                std::fs::remove_file(&path).map_err(|e| ResumeForgeError::io(&path, e))?;
            }
        }
        Ok(())
    }
}

impl DocumentCompiler for LatexCompiler {
    #[instrument(skip_all, fields(out_dir = %out_dir.display(), final_name))]
    fn compile(&self, source: &str, out_dir: &Path, final_name: &str) -> Result<CompiledDocument> {
        std::fs::create_dir_all(out_dir).map_err(|e| ResumeForgeError::io(out_dir, e))?;

        let source_path = out_dir.join(format!("{JOB_STEM}.tex"));
        std::fs::write(&source_path, source)
            .map_err(|e| ResumeForgeError::io(&source_path, e))?;

        self.run_engine(out_dir, &source_path)?;

        if !self.config.keep_intermediates {
            self.clean_intermediates(out_dir)?;
        }

        let produced = out_dir.join(format!("{JOB_STEM}.pdf"));
        if !produced.exists() {
            return Err(ResumeForgeError::Compiler(format!(
                "'{}' reported success but produced no {} in {}",
                self.config.program,
                produced.file_name().unwrap_or_default().to_string_lossy(),
                out_dir.display()
            )));
        }

        let pdf_path = out_dir.join(final_name);
        std::fs::rename(&produced, &pdf_path)
            .map_err(|e| ResumeForgeError::io(&pdf_path, e))?;

        info!(pdf = %pdf_path.display(), "variant compiled");

        Ok(CompiledDocument { pdf_path })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Last chunk of combined engine output, for error messages.
fn output_tail(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    let err = String::from_utf8_lossy(stderr);
    if !err.trim().is_empty() {
        combined.push('\n');
        combined.push_str(&err);
    }

    let trimmed = combined.trim();
    if trimmed.len() <= OUTPUT_TAIL_BYTES {
        return trimmed.to_string();
    }

    let cut = trimmed.len() - OUTPUT_TAIL_BYTES;
    // Cut on a char boundary
    let start = (cut..trimmed.len())
        .find(|i| trimmed.is_char_boundary(*i))
        .unwrap_or(cut);
    format!("…{}", &trimmed[start..])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rf-compiler-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// An engine stand-in: copies its input to `variant.pdf` and writes the
    /// usual intermediate droppings, like a cooperative LaTeX engine would.
    fn fake_engine_config(tmp: &Path) -> CompilerConfig {
        let script = tmp.join("fake-engine.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             # args: -interaction=nonstopmode -halt-on-error -output-directory <dir> [extra] <src>\n\
             shift 2\n\
             shift # -output-directory\n\
             dir=\"$1\"; shift\n\
             for last; do :; done\n\
             cp \"$last\" \"$dir/variant.pdf\"\n\
             touch \"$dir/variant.aux\" \"$dir/variant.log\"\n",
        )
        .unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        CompilerConfig {
            program: script.to_string_lossy().into_owned(),
            extra_args: vec![],
            keep_intermediates: false,
        }
    }

    #[test]
    #[cfg(unix)]
    fn compile_renames_output_and_cleans_intermediates() {
        let tmp = temp_dir();
        let out_dir = tmp.join("proj1_proj2");
        let compiler = LatexCompiler::new(fake_engine_config(&tmp));

        let doc = compiler
            .compile("\\documentclass{article}", &out_dir, "resume.pdf")
            .unwrap();

        assert_eq!(doc.pdf_path, out_dir.join("resume.pdf"));
        assert!(doc.pdf_path.exists());
        assert!(!out_dir.join("variant.pdf").exists());
        assert!(!out_dir.join("variant.tex").exists());
        assert!(!out_dir.join("variant.aux").exists());
        assert!(!out_dir.join("variant.log").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    #[cfg(unix)]
    fn compile_keep_intermediates_leaves_artifacts() {
        let tmp = temp_dir();
        let out_dir = tmp.join("variant-out");
        let mut config = fake_engine_config(&tmp);
        config.keep_intermediates = true;
        let compiler = LatexCompiler::new(config);

        compiler.compile("source", &out_dir, "resume.pdf").unwrap();

        assert!(out_dir.join("variant.tex").exists());
        assert!(out_dir.join("variant.aux").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn compile_missing_program_errors() {
        let tmp = temp_dir();
        let compiler = LatexCompiler::new(CompilerConfig {
            program: "definitely-not-a-latex-engine".into(),
            extra_args: vec![],
            keep_intermediates: false,
        });

        let err = compiler
            .compile("source", &tmp.join("out"), "resume.pdf")
            .unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn check_available_missing_program_errors() {
        let compiler = LatexCompiler::new(CompilerConfig {
            program: "definitely-not-a-latex-engine".into(),
            extra_args: vec![],
            keep_intermediates: false,
        });

        let err = compiler.check_available().unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    #[cfg(unix)]
    fn compile_nonzero_exit_carries_output_tail() {
        let tmp = temp_dir();
        let script = tmp.join("failing-engine.sh");
        std::fs::write(&script, "#!/bin/sh\necho '! Undefined control sequence.'\nexit 1\n")
            .unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let compiler = LatexCompiler::new(CompilerConfig {
            program: script.to_string_lossy().into_owned(),
            extra_args: vec![],
            keep_intermediates: false,
        });

        let err = compiler
            .compile("source", &tmp.join("out"), "resume.pdf")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("exited with status 1"));
        assert!(msg.contains("Undefined control sequence"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn output_tail_truncates_long_output() {
        let long = "x".repeat(OUTPUT_TAIL_BYTES * 2);
        let tail = output_tail(long.as_bytes(), b"");
        assert!(tail.len() <= OUTPUT_TAIL_BYTES + '…'.len_utf8());
        assert!(tail.starts_with('…'));
    }
}
