//! Verification report of embedded form field names.
//!
//! After detected fields have been turned into a real AcroForm, by
//! [`apply_fields`](crate::apply_fields) or a downstream editor,
//! [`FieldNameReport`] lists the names that actually landed in the file so
//! they can be checked by hand.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use fieldscan_core::ScanError;
use fieldscan_pdf::read_field_names_from_path;
use tracing::{debug, warn};

/// Width of the rule under the report header.
const RULE_WIDTH: usize = 50;

/// Field names read from one PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNameReport {
    source: PathBuf,
    names: Vec<String>,
}

impl FieldNameReport {
    /// Build a report from already-known names. Repeated names are listed once.
    pub fn new(source: impl Into<PathBuf>, names: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .filter(|n| seen.insert(n.clone()))
            .collect();
        Self {
            source: source.into(),
            names,
        }
    }

    /// Read the AcroForm field names of the PDF at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::DocumentOpen`] if the file is missing, encrypted
    /// or not a PDF.
    pub fn from_file(path: &Path) -> Result<Self, ScanError> {
        let names = read_field_names_from_path(path)?;
        debug!(path = %path.display(), count = names.len(), "read form field names");
        let report = Self::new(path, names);
        for name in report.trailing_space_names() {
            warn!(field = %name, "form field name ends with a space");
        }
        Ok(report)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Names ending in a space, which usually means a label was pasted in
    /// with its padding.
    pub fn trailing_space_names(&self) -> Vec<&str> {
        self.names
            .iter()
            .filter(|n| n.ends_with(' '))
            .map(String::as_str)
            .collect()
    }

    /// The report text: header, a rule, a blank line, then one name per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Verification Report for: {}\n",
            self.source.display()
        ));
        out.push_str(&"=".repeat(RULE_WIDTH));
        out.push_str("\n\n");
        for name in &self.names {
            out.push_str(name);
            out.push('\n');
        }
        out
    }

    /// Write [`render`](Self::render) to `path` as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.render())
    }
}
