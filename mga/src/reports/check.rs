//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from manifest validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Import path of the generated package.
    pub package: String,
    pub event_dispatchers: Vec<SectionSummary>,
    pub services: Vec<SectionSummary>,
}

/// A generated type and the members it will get.
#[derive(Debug)]
pub struct SectionSummary {
    pub name: String,
    pub items: Vec<String>,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
        out.newline();
        out.key_value("Package", &self.package);

        render_sections(out, "Event dispatchers", &self.event_dispatchers);
        render_sections(out, "Services", &self.services);

        if self.event_dispatchers.is_empty() && self.services.is_empty() {
            out.newline();
            out.warning("nothing to generate");
        }
    }
}

fn render_sections(out: &mut dyn Output, heading: &str, sections: &[SectionSummary]) {
    if sections.is_empty() {
        return;
    }
    out.newline();
    out.section(&format!("{} ({})", heading, sections.len()));
    for section in sections {
        out.list_item(&format!("{} ({})", section.name, section.items.join(", ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::testing::RecordingOutput;

    #[test]
    fn test_render_sections() {
        let report = CheckReport {
            config_path: PathBuf::from("mga.toml"),
            package: "example.com/app/todo/tododriver".into(),
            event_dispatchers: vec![SectionSummary {
                name: "TodoEventDispatcher".into(),
                items: vec!["MarkedAsDone".into()],
            }],
            services: Vec::new(),
        };

        let mut out = RecordingOutput::default();
        report.render(&mut out);
        assert_eq!(
            out.lines,
            [
                "✓ mga.toml is valid",
                "",
                "Package: example.com/app/todo/tododriver",
                "",
                "Event dispatchers (1):",
                "  - TodoEventDispatcher (MarkedAsDone)",
            ]
        );
    }

    #[test]
    fn test_render_empty_manifest_warns() {
        let report = CheckReport {
            config_path: PathBuf::from("mga.toml"),
            package: "example.com/app".into(),
            event_dispatchers: Vec::new(),
            services: Vec::new(),
        };

        let mut out = RecordingOutput::default();
        report.render(&mut out);
        assert_eq!(out.lines.last().map(String::as_str), Some("warning: nothing to generate"));
    }
}
