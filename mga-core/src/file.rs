use std::path::{Path, PathBuf};

use eyre::{Context, Result};

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File already had the same content and was left untouched
    Unchanged,
}

/// A generated file, relative to an output directory.
///
/// Generated files are always overwritten; a file whose content is already
/// up to date is not rewritten so modification times stay stable.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    path: PathBuf,
    content: Vec<u8>,
}

impl GeneratedFile {
    /// Create a new generated file with the given relative path and content
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Get the relative file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Get the content as text (lossy for non UTF-8 content).
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Write the file below `base`
    pub fn write(&self, base: &Path) -> Result<WriteResult> {
        let path = base.join(&self.path);

        if std::fs::read(&path).is_ok_and(|existing| existing == self.content) {
            tracing::debug!(path = %path.display(), "generated file is up to date");
            return Ok(WriteResult::Unchanged);
        }

        write_file(&path, &self.content)
            .wrap_err_with(|| format!("failed to write '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = self.content.len(), "wrote generated file");
        Ok(WriteResult::Written)
    }
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
