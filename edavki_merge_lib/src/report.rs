//! Output files: the merged XML report and the two plain-text side reports.

use std::path::{Path, PathBuf};

use edavki_xml::{Document, NamespaceBindings};
use serde::Serialize;

use crate::error::MergeError;
use crate::matcher::MatchReport;

pub const OUTPUT_DIR: &str = "output";
pub const MERGED_FILE: &str = "merged.xml";
pub const INFO_FILE: &str = "info.log";
pub const ERRORS_FILE: &str = "errors.log";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub merged: PathBuf,
    pub info: PathBuf,
    pub errors: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            merged: dir.join(MERGED_FILE),
            info: dir.join(INFO_FILE),
            errors: dir.join(ERRORS_FILE),
            dir,
        }
    }

    /// `output/` next to the primary report file.
    pub fn beside(primary: &Path) -> Self {
        let parent = primary.parent().unwrap_or_else(|| Path::new(""));
        Self::in_dir(parent.join(OUTPUT_DIR))
    }

    pub fn create_dir(&self) -> Result<(), MergeError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| MergeError::Io {
            path: self.dir.clone(),
            source,
        })
    }
}

/// `info.log` content: one line per matched code.
pub fn matched_lines(report: &MatchReport, label: &str) -> String {
    report
        .matched()
        .iter()
        .map(|code| format!("Matched code {} in {}\n", code, label))
        .collect()
}

/// `errors.log` content: one line per unmatched code.
pub fn unmatched_lines(report: &MatchReport, label: &str) -> String {
    report
        .unmatched()
        .iter()
        .map(|code| format!("No match for code {} in {}\n", code, label))
        .collect()
}

fn write_text(path: &Path, content: &str) -> Result<(), MergeError> {
    std::fs::write(path, content).map_err(|source| MergeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `info.log`, `errors.log` and then `merged.xml`, overwriting existing files.
///
/// The output directory must already exist.
pub fn write_outputs(
    paths: &OutputPaths,
    merged: &Document,
    report: &MatchReport,
    bindings: &NamespaceBindings,
    label: &str,
) -> Result<(), MergeError> {
    write_text(&paths.info, &matched_lines(report, label))?;
    write_text(&paths.errors, &unmatched_lines(report, label))?;
    merged.write_to_file(&paths.merged, bindings)?;
    tracing::info!(dir = %paths.dir.display(), "wrote merged report");
    Ok(())
}
