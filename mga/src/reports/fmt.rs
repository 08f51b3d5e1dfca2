//! Fmt command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Outcome of formatting a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Formatted,
    Unchanged,
    /// `--check` only: the file is not canonically formatted.
    WouldChange,
    /// The file could not be parsed; holds the rendered diagnostic.
    Failed(String),
}

/// Report data from formatting.
#[derive(Debug, Default)]
pub struct FmtReport {
    pub files: Vec<(PathBuf, FileStatus)>,
}

impl FmtReport {
    /// Whether any file failed or would change.
    pub fn needs_attention(&self) -> bool {
        self.files
            .iter()
            .any(|(_, status)| matches!(status, FileStatus::WouldChange | FileStatus::Failed(_)))
    }
}

impl Report for FmtReport {
    fn render(&self, out: &mut dyn Output) {
        for (path, status) in &self.files {
            let path = path.display();
            match status {
                FileStatus::Formatted => out.added_item(&format!("Formatted {path}")),
                FileStatus::Unchanged => out.unchanged_item(&format!("{path} is already formatted")),
                FileStatus::WouldChange => out.warning(&format!("{path} is not formatted")),
                FileStatus::Failed(diagnostic) => out.error(diagnostic),
            }
        }

        if self
            .files
            .iter()
            .any(|(_, status)| *status == FileStatus::WouldChange)
        {
            out.newline();
            out.preformatted("Run `mga fmt` to fix.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::testing::RecordingOutput;

    #[test]
    fn test_render_check_failures() {
        let report = FmtReport {
            files: vec![
                (PathBuf::from("a.go"), FileStatus::Unchanged),
                (PathBuf::from("b.go"), FileStatus::WouldChange),
            ],
        };

        let mut out = RecordingOutput::default();
        report.render(&mut out);
        assert_eq!(
            out.lines,
            [
                "  = a.go is already formatted",
                "warning: b.go is not formatted",
                "",
                "Run `mga fmt` to fix.",
            ]
        );
        assert!(report.needs_attention());
    }

    #[test]
    fn test_formatted_files_need_no_attention() {
        let report = FmtReport {
            files: vec![(PathBuf::from("a.go"), FileStatus::Formatted)],
        };
        assert!(!report.needs_attention());
    }
}
