//! Manifest parsing from files and strings.

use std::{path::Path, str::FromStr};

use super::Manifest;
use crate::{Error, Result, error::SourceContext};

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "mga.toml";

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, MANIFEST_FILE)
    }
}

impl Manifest {
    /// Parse an mga.toml file from the given path.
    ///
    /// A `header_file` is read relative to the manifest's directory and
    /// replaces `header`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read(path)?;
        let mut manifest = parse_manifest(&content, &path.display().to_string())?;

        if let Some(header_file) = manifest.header_file.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            let header = read(&base.join(header_file))?;
            manifest.header = Some(header);
        }
        tracing::debug!(
            path = %path.display(),
            event_dispatchers = manifest.event_dispatchers.len(),
            services = manifest.services.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// Parse an mga.toml from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_manifest(content, filename)
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })
}

/// Parse a manifest from content with the given filename for error reporting.
pub fn parse_manifest(content: &str, filename: &str) -> Result<Manifest> {
    let source_ctx = SourceContext::new(content, filename);
    let manifest: Manifest = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    manifest.validate(content, filename)?;
    Ok(manifest)
}
