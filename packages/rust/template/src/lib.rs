//! Résumé template loading and placeholder substitution.
//!
//! The template is a single LaTeX text blob with a substitution marker
//! (default `%PROJECT_CONTENT%`). Rendering joins the selected project
//! fragments with a separator and replaces every occurrence of the marker.
//! This is deliberately not a templating engine: one marker, plain text
//! replacement, nothing else is interpreted.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use resumeforge_shared::{ResumeForgeError, Result};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Result of rendering a template against a set of fragments.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// The assembled LaTeX source.
    pub content: String,
    /// Number of fragments merged in.
    pub fragment_count: usize,
}

/// A loaded résumé template.
#[derive(Debug, Clone)]
pub struct Template {
    text: String,
    placeholder: String,
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

impl Template {
    /// Load a template file and verify it contains the substitution marker.
    pub fn load(path: &Path, placeholder: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ResumeForgeError::template(format!(
                "cannot read template {}: {e}",
                path.display()
            ))
        })?;

        Self::from_text(text, placeholder, path)
    }

    fn from_text(text: String, placeholder: &str, origin: &Path) -> Result<Self> {
        if placeholder.is_empty() {
            return Err(ResumeForgeError::template("placeholder must not be empty"));
        }
        if !text.contains(placeholder) {
            return Err(ResumeForgeError::template(format!(
                "template {} contains no '{placeholder}' marker",
                origin.display()
            )));
        }

        debug!(
            origin = %origin.display(),
            len = text.len(),
            "template loaded"
        );

        Ok(Self {
            text,
            placeholder: placeholder.to_string(),
        })
    }

    /// Merge fragments with `separator` and substitute them into the template.
    ///
    /// Every occurrence of the placeholder is replaced. Leftover markers of
    /// the same `%UPPER_SNAKE%` shape are reported via a warning so a typo'd
    /// marker in the template doesn't end up silently in the PDF.
    pub fn render(&self, fragments: &[String], separator: &str) -> RenderResult {
        let merged = fragments.join(separator);
        let content = self.text.replace(&self.placeholder, &merged);

        let leftover = unresolved_markers(&content);
        if !leftover.is_empty() {
            warn!(markers = ?leftover, "unrecognized markers left in rendered output");
        }

        RenderResult {
            content,
            fragment_count: fragments.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Marker detection
// ---------------------------------------------------------------------------

/// Find `%UPPER_SNAKE%`-style markers remaining in rendered text.
///
/// Detection only: unknown markers are reported, never expanded.
pub fn unresolved_markers(text: &str) -> Vec<String> {
    static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"%[A-Z][A-Z0-9_]*%").expect("valid regex")
    });

    let mut markers: Vec<String> = MARKER_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    markers.sort();
    markers.dedup();
    markers
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
