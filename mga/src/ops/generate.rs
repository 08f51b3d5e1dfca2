//! Generate operation - Go files from a manifest.

use std::path::Path;

use eyre::Result;
use mga_core::GeneratedFile;
use mga_generate::{Producer, event::DispatcherFile, kit::EndpointFile};
use mga_manifest::Manifest;

use crate::reports::{
    GenerateReport, GenerationResult, PreviewFile, PreviewResult, WrittenFile, WrittenResult,
};

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    /// Directory the files are written to.
    pub output_dir: &'a Path,
    /// Whether to preview without writing files.
    pub dry_run: bool,
}

/// Run every producer the manifest has specifications for.
///
/// Nothing touches the disk here, so a failing producer never leaves a
/// partial set of files behind.
pub fn render(manifest: &Manifest) -> mga_generate::Result<Vec<GeneratedFile>> {
    let spec = manifest.file_spec();
    let dispatchers = manifest.dispatchers();
    let services = manifest.service_specs();

    let mut producers: Vec<Box<dyn Producer + '_>> = Vec::new();
    if !dispatchers.is_empty() {
        producers.push(Box::new(DispatcherFile::new(&dispatchers)));
    }
    for service in &services {
        producers.push(Box::new(EndpointFile::new(service)));
    }

    producers.iter().map(|producer| producer.generate(&spec)).collect()
}

/// Execute the generate operation on already rendered files.
pub fn generate(
    manifest: &Manifest,
    files: Vec<GeneratedFile>,
    opts: GenerateOptions,
) -> Result<GenerateReport> {
    let result = if opts.dry_run {
        let files = files
            .iter()
            .map(|file| PreviewFile {
                path: file.path().display().to_string(),
                content: file.text().into_owned(),
            })
            .collect();
        GenerationResult::Preview(PreviewResult { files })
    } else {
        let mut written = Vec::with_capacity(files.len());
        for file in &files {
            let result = file.write(opts.output_dir)?;
            tracing::info!(path = %file.path().display(), ?result, "generated");
            written.push(WrittenFile {
                path: file.path().to_path_buf(),
                result,
            });
        }
        GenerationResult::Written(WrittenResult {
            output_dir: opts.output_dir.to_path_buf(),
            files: written,
        })
    };

    Ok(GenerateReport {
        package: manifest.package.path.clone(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use std::{fs, str::FromStr};

    use mga_core::WriteResult;
    use tempfile::TempDir;

    use super::*;

    const MANIFEST: &str = r#"
[package]
path = "example.com/app/todo/tododriver"
name = "tododriver"

[[event_dispatchers]]
name = "Todo"

[[event_dispatchers.methods]]
name = "MarkedAsDone"
event = { path = "example.com/app/todo", name = "MarkedAsDone" }
returns_error = true

[[services]]
name = "Service"
package = { path = "example.com/app/todo", name = "todo" }

[[services.endpoints]]
name = "CreateTodo"
params = [{ name = "text", type = { name = "string" } }]
results = [{ name = "id", type = { name = "string" } }]
"#;

    fn manifest() -> Manifest {
        Manifest::from_str(MANIFEST).unwrap()
    }

    #[test]
    fn test_render_runs_every_producer() {
        let files = render(&manifest()).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path().display().to_string()).collect();
        assert_eq!(paths, ["zz_generated.event_dispatcher.go", "zz_generated.endpoint.go"]);
        assert!(files[0].text().contains("package tododriver"));
        assert!(files[1].text().contains("type CreateTodoRequest struct"));
    }

    #[test]
    fn test_render_skips_missing_sections() {
        let manifest = Manifest::from_str(
            "[package]\npath = \"example.com/app/todo/tododriver\"\nname = \"tododriver\"\n",
        )
        .unwrap();
        assert!(render(&manifest).unwrap().is_empty());
    }

    #[test]
    fn test_generate_writes_files() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest();
        let opts = || GenerateOptions {
            output_dir: dir.path(),
            dry_run: false,
        };

        let report = generate(&manifest, render(&manifest).unwrap(), opts()).unwrap();
        let GenerationResult::Written(written) = report.result else {
            panic!("expected written files");
        };
        assert!(written.files.iter().all(|f| f.result == WriteResult::Written));
        let content = fs::read_to_string(dir.path().join("zz_generated.endpoint.go")).unwrap();
        assert!(content.starts_with("// +build !ignore_autogenerated\n"));

        let report = generate(&manifest, render(&manifest).unwrap(), opts()).unwrap();
        let GenerationResult::Written(written) = report.result else {
            panic!("expected written files");
        };
        assert!(written.files.iter().all(|f| f.result == WriteResult::Unchanged));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest();
        let opts = GenerateOptions {
            output_dir: dir.path(),
            dry_run: true,
        };

        let report = generate(&manifest, render(&manifest).unwrap(), opts).unwrap();
        let GenerationResult::Preview(preview) = report.result else {
            panic!("expected a preview");
        };
        assert_eq!(preview.files.len(), 2);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
