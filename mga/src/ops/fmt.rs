//! Fmt operation - canonical formatting of Go files.

use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use mga_codegen::format_named;

use crate::reports::{FileStatus, FmtReport};

/// Options for the fmt operation.
pub struct FmtOptions {
    /// Only report files that would change.
    pub check: bool,
}

/// Format every file, collecting syntax errors instead of stopping at the
/// first one.
pub fn fmt(files: &[PathBuf], opts: FmtOptions) -> Result<FmtReport> {
    let mut report = FmtReport::default();
    for path in files {
        let status = fmt_file(path, &opts)?;
        report.files.push((path.clone(), status));
    }
    Ok(report)
}

fn fmt_file(path: &Path, opts: &FmtOptions) -> Result<FileStatus> {
    let src = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read '{}'", path.display()))?;

    let formatted = match format_named(&src, &path.display().to_string()) {
        Ok(formatted) => formatted,
        Err(err) => return Ok(FileStatus::Failed(format!("{:?}", miette::Report::new(*err)))),
    };

    if formatted == src {
        return Ok(FileStatus::Unchanged);
    }
    if opts.check {
        return Ok(FileStatus::WouldChange);
    }

    std::fs::write(path, formatted)
        .wrap_err_with(|| format!("failed to write '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), "formatted");
    Ok(FileStatus::Formatted)
}
