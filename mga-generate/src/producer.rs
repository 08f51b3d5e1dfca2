use mga_codegen::{builder::File, format_named};
use mga_core::GeneratedFile;
use mga_ir::FileSpec;

use crate::Result;

/// First header line of every generated file.
pub const BUILD_CONSTRAINT: &str = "// +build !ignore_autogenerated\n";

/// Last header line of every generated file.
pub const GENERATED_NOTICE: &str = "Code generated by mga tool. DO NOT EDIT.";

/// Generates one Go file from a specification.
///
/// Producers hold no state between invocations: each call builds a fresh
/// [`File`] with its own import registry.
pub trait Producer {
    /// File name relative to the output directory.
    fn file_name(&self) -> &'static str;

    /// Build the node model of the file.
    ///
    /// Specifications are validated before anything is built.
    fn build(&self, spec: &FileSpec) -> Result<File>;

    /// Build, render and format the file.
    fn generate(&self, spec: &FileSpec) -> Result<GeneratedFile> {
        let file = self.build(spec)?;
        let raw = file.render()?;
        let source = format_named(&raw, self.file_name())?;
        tracing::debug!(
            file = self.file_name(),
            package = %spec.package,
            bytes = source.len(),
            "generated file"
        );
        Ok(GeneratedFile::new(self.file_name(), source))
    }
}

/// Create a file for `spec` with the standard header comments.
pub fn new_file(spec: &FileSpec) -> File {
    let mut file = File::new(spec.package.clone());
    file.header_comment(BUILD_CONSTRAINT);
    if let Some(text) = spec.header_text.as_deref().filter(|t| !t.trim().is_empty()) {
        file.header_comment(text);
    }
    file.header_comment(GENERATED_NOTICE);
    file
}
