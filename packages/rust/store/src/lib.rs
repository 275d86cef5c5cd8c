//! Project fragment store.
//!
//! A "project" is one `.tex` fragment file inside the projects directory,
//! keyed by its file stem. The store scans the directory once and reads
//! fragment content on demand; content is treated as opaque LaTeX text.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use resumeforge_shared::{ResumeForgeError, Result};

/// File extension recognized as a project fragment.
const FRAGMENT_EXTENSION: &str = "tex";

// ---------------------------------------------------------------------------
// ProjectStore
// ---------------------------------------------------------------------------

/// A scanned projects directory.
///
/// Names are file stems, unique by construction, sorted lexicographically so
/// enumeration downstream is deterministic regardless of filesystem order.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
    names: Vec<String>,
}

impl ProjectStore {
    /// Scan a directory for `*.tex` project fragments.
    ///
    /// Non-`.tex` entries, dotfiles, and subdirectories are ignored.
    /// A missing directory is an error; an existing-but-empty directory
    /// yields an empty store (callers decide whether that is fatal).
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn scan(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| ResumeForgeError::io(dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ResumeForgeError::io(dir, e))?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(FRAGMENT_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.is_empty() || stem.starts_with('.') {
                continue;
            }

            names.push(stem.to_string());
        }

        names.sort();

        debug!(count = names.len(), "project store scanned");

        Ok(Self {
            root: dir.to_path_buf(),
            names,
        })
    }

    /// Project names in store order (sorted).
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of projects in the store.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the store holds no projects.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Path of a named fragment file (whether or not it exists).
    pub fn fragment_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{FRAGMENT_EXTENSION}"))
    }

    /// Read the text of a named project fragment.
    ///
    /// Fails with a descriptive error if the fragment is missing or
    /// unreadable; a fragment deleted between scan and read is fatal.
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.fragment_path(name);
        std::fs::read_to_string(&path).map_err(|e| {
            ResumeForgeError::store(format!(
                "cannot read project '{name}' at {}: {e}",
                path.display()
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rf-store-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn scan_sorts_names_and_ignores_non_tex() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("zeta.tex"), "z").unwrap();
        std::fs::write(tmp.join("alpha.tex"), "a").unwrap();
        std::fs::write(tmp.join("notes.txt"), "ignored").unwrap();
        std::fs::write(tmp.join(".hidden.tex"), "ignored").unwrap();
        std::fs::create_dir_all(tmp.join("subdir.tex")).unwrap();

        let store = ProjectStore::scan(&tmp).unwrap();
        assert_eq!(store.names(), &["alpha".to_string(), "zeta".to_string()]);
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn scan_missing_directory_errors() {
        let tmp = temp_dir();
        let missing = tmp.join("nope");

        let err = ProjectStore::scan(&missing).unwrap_err();
        assert!(err.to_string().contains("I/O error"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn scan_empty_directory_yields_empty_store() {
        let tmp = temp_dir();

        let store = ProjectStore::scan(&tmp).unwrap();
        assert!(store.is_empty());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn read_returns_fragment_content() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("webshop.tex"), "\\section{Webshop}\nBuilt a shop.\n").unwrap();

        let store = ProjectStore::scan(&tmp).unwrap();
        let text = store.read("webshop").unwrap();
        assert!(text.contains("\\section{Webshop}"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn read_missing_fragment_errors_with_name() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("real.tex"), "x").unwrap();

        let store = ProjectStore::scan(&tmp).unwrap();
        let err = store.read("ghost").unwrap_err();
        assert!(err.to_string().contains("ghost"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn read_fragment_deleted_after_scan_errors() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("gone.tex"), "x").unwrap();

        let store = ProjectStore::scan(&tmp).unwrap();
        std::fs::remove_file(tmp.join("gone.tex")).unwrap();

        assert!(store.read("gone").is_err());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
