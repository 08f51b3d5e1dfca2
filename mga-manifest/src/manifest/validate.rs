//! Validation context and utilities for manifest parsing.

use std::{collections::HashSet, sync::Arc};

use mga_core::is_keyword;
use miette::SourceSpan;

use super::{Manifest, PackageConfig, TypeConfig};
use crate::{Result, error::SourceContext};

/// Parsing and validation context that carries source information.
///
/// This struct encapsulates the source content, filename, and current path
/// through the manifest hierarchy, making it easier to pass validation
/// context through recursive operations.
///
/// # Example
///
/// ```ignore
/// let ctx = ParseContext::new(src, "mga.toml");
/// ctx.validate_name("Order", "event dispatcher")?;
///
/// // For nested validation
/// let nested = ctx.push("Order");
/// nested.validate_name("Created", "method")?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    /// Source context for error reporting (shared across nested contexts)
    source: Arc<SourceContext>,
    /// Path segments for nested validation (e.g., ["Service", "CreateTodo"])
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    /// Create a new parse context with the given source and filename.
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: Arc::new(SourceContext::new(src, filename)),
            path: Vec::new(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        self.source.src()
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        self.source.filename()
    }

    /// Get the source context for error creation.
    pub fn source_context(&self) -> &SourceContext {
        &self.source
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut new_path = self.path.clone();
        new_path.push(segment);
        Self {
            source: Arc::clone(&self.source),
            path: new_path,
        }
    }

    /// Get the current path as a dot-separated string.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Get a context description for error messages.
    ///
    /// For example: "method in 'Order'" or just "event dispatcher" if no path.
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    /// Find the span of a name in the source.
    pub fn find_span(&self, name: &str) -> Option<SourceSpan> {
        find_name_spans(self.source.src(), name).into_iter().next()
    }

    /// Validate that a name is a valid Go identifier.
    pub fn validate_name(&self, name: &str, kind: &str) -> Result<()> {
        if is_keyword(name) {
            return Err(self.source.reserved_keyword_error(
                name,
                self.context_for(kind),
                self.find_span(name),
            ));
        }

        if let Some(reason) = validate_identifier(name) {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for(kind),
                reason,
                self.find_span(name),
            ));
        }

        Ok(())
    }

    /// Validate that names are unique, pointing at both definitions of the
    /// first duplicate.
    pub fn validate_unique<'n>(
        &self,
        names: impl IntoIterator<Item = &'n str>,
        kind: &str,
    ) -> Result<()> {
        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(name) {
                let spans = find_name_spans(self.source.src(), name);
                return Err(self.source.duplicate_error(
                    name,
                    self.context_for(kind),
                    spans.first().copied(),
                    spans.get(1).copied(),
                ));
            }
        }
        Ok(())
    }

    fn validate_package(&self, package: &PackageConfig, kind: &str) -> Result<()> {
        if package.path.trim().is_empty() {
            return Err(self.source.validation_error(
                format!("{} package path cannot be empty", self.context_for(kind)),
                find_key_span(self.src(), "path", ""),
            ));
        }
        self.validate_name(&package.name, "package")
    }

    fn validate_type(&self, ty: &TypeConfig) -> Result<()> {
        self.validate_name(&ty.name, "type")?;
        if let Some(path) = &ty.path {
            if path.trim().is_empty() {
                return Err(self.source.validation_error(
                    format!("package path of type '{}' cannot be empty", ty.name),
                    find_key_span(self.src(), "path", ""),
                ));
            }
        }
        if let Some(package) = ty.package_name() {
            self.validate_name(package, "package")?;
        }
        Ok(())
    }
}

impl Manifest {
    /// Validate the manifest after parsing.
    pub fn validate(&self, src: &str, filename: &str) -> Result<()> {
        let ctx = ParseContext::new(src, filename);

        if self.header.is_some() && self.header_file.is_some() {
            return Err(ctx.source_context().validation_error(
                "'header' and 'header_file' cannot be used together",
                find_key_span(src, "header_file", ""),
            ));
        }
        ctx.validate_package(&self.package, "generated")?;

        ctx.validate_unique(
            self.event_dispatchers.iter().map(|d| d.name.as_str()),
            "event dispatcher",
        )?;
        for dispatcher in &self.event_dispatchers {
            ctx.validate_name(&dispatcher.name, "event dispatcher")?;

            let ctx = ctx.push(&dispatcher.name);
            ctx.validate_unique(dispatcher.methods.iter().map(|m| m.name.as_str()), "method")?;
            for method in &dispatcher.methods {
                ctx.validate_name(&method.name, "method")?;
                ctx.validate_type(&method.event)?;
                if method.event.path.is_none() {
                    return Err(ctx.source_context().validation_error(
                        format!(
                            "event type '{}' of method '{}' must declare its package path",
                            method.event.name, method.name
                        ),
                        ctx.find_span(&method.event.name),
                    ));
                }
            }
        }

        if let [_, second, ..] = self.services.as_slice() {
            return Err(ctx.source_context().validation_error(
                "only one service can be generated per manifest",
                ctx.find_span(&second.name),
            ));
        }
        for service in &self.services {
            ctx.validate_name(&service.name, "service")?;
            ctx.validate_package(&service.package, "service")?;

            let ctx = ctx.push(&service.name);
            if service.endpoints.is_empty() {
                return Err(ctx.source_context().validation_error(
                    format!("service '{}' has no endpoints", service.name),
                    ctx.find_span(&service.name),
                ));
            }
            ctx.validate_unique(
                service.endpoints.iter().map(|e| e.name.as_str()),
                "endpoint",
            )?;
            for endpoint in &service.endpoints {
                ctx.validate_name(&endpoint.name, "endpoint")?;

                let ctx = ctx.push(&endpoint.name);
                let params = endpoint.params.iter().chain(&endpoint.results);
                ctx.validate_unique(params.clone().map(|p| p.name.as_str()), "parameter")?;
                for param in params {
                    ctx.validate_name(&param.name, "parameter")?;
                    ctx.validate_type(&param.ty)?;
                }
            }
        }

        Ok(())
    }
}

/// Validate that a name is a valid Go identifier.
/// Returns None if valid, Some(reason) if invalid
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();

    // First character must be a letter or underscore
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
        None => return Some("name cannot be empty"),
    }

    if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_')) {
        return Some("name must contain only letters, numbers, and underscores");
    }

    None
}

/// Find every span of a name in the TOML source.
///
/// Names appear as `name = "value"` both in array tables and inline tables.
pub(crate) fn find_name_spans(src: &str, name: &str) -> Vec<SourceSpan> {
    let mut spans: Vec<_> = ["\"", "'"]
        .iter()
        .flat_map(|quote| {
            let pattern = format!("{quote}{name}{quote}");
            src.match_indices(&pattern)
                .filter(|(pos, _)| is_name_value(&src[..*pos]))
                .map(|(pos, _)| SourceSpan::from((pos + 1, name.len())))
                .collect::<Vec<_>>()
        })
        .collect();
    spans.sort_by_key(|span| span.offset());
    spans
}

/// Whether the text before a string literal ends with `name =`.
fn is_name_value(before: &str) -> bool {
    let before = before.trim_end();
    let Some(before) = before.strip_suffix('=') else {
        return false;
    };
    let before = before.trim_end();
    before.strip_suffix("name").is_some_and(|rest| {
        rest.chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace() || c == '{' || c == ',')
    })
}

/// Find the span of `key = "value"`, pointing at the value.
pub(crate) fn find_key_span(src: &str, key: &str, value: &str) -> Option<SourceSpan> {
    let pattern = format!("{key} = \"{value}\"");
    src.find(&pattern).map(|pos| {
        let start = pos + key.len() + 3;
        SourceSpan::from((start, value.len() + 2))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(validate_identifier("Order").is_none());
        assert!(validate_identifier("newTodo").is_none());
        assert!(validate_identifier("_private").is_none());
        assert!(validate_identifier("arg1").is_none());
        assert!(validate_identifier("service_with_struct").is_none());
    }

    #[test]
    fn test_invalid_identifiers() {
        assert_eq!(validate_identifier(""), Some("name cannot be empty"));
        assert_eq!(
            validate_identifier("1st"),
            Some("name must start with a letter or underscore")
        );
        assert!(validate_identifier("my-name").is_some());
        assert!(validate_identifier("hello world").is_some());
        assert!(validate_identifier("a.b").is_some());
    }

    #[test]
    fn test_find_name_spans() {
        let src = r#"[[event_dispatchers]]
name = "Order"

[[event_dispatchers]]
name = "Order"
"#;
        let spans = find_name_spans(src, "Order");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].offset(), 30);
        assert_eq!(spans[0].len(), 5);
        assert_eq!(spans[1].offset(), 68);
    }

    #[test]
    fn test_find_name_spans_inline_table() {
        let src = r#"event = { path = "example.com/app/order", name = "Created" }"#;
        let spans = find_name_spans(src, "Created");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].offset(), 50);
    }

    #[test]
    fn test_find_name_spans_ignores_other_keys() {
        let src = r#"operation_name = "List"
description = "List""#;
        assert!(find_name_spans(src, "List").is_empty());
    }

    #[test]
    fn test_find_key_span() {
        let src = "[package]\npath = \"\"\n";
        let span = find_key_span(src, "path", "").unwrap();
        assert_eq!(span.offset(), 17);
        assert_eq!(span.len(), 2);
    }

    #[test]
    fn test_parse_context_push() {
        let ctx = ParseContext::new("", "mga.toml");
        let nested = ctx.push("Service").push("CreateTodo");
        assert_eq!(nested.path_string(), "Service.CreateTodo");
        assert_eq!(nested.context_for("parameter"), "parameter in 'Service.CreateTodo'");
        assert_eq!(ctx.context_for("service"), "service");
    }

    #[test]
    fn test_parse_context_validate_name_keyword() {
        let ctx = ParseContext::new("[[services]]\nname = \"func\"\n", "mga.toml");
        let err = ctx.validate_name("func", "service").unwrap_err();
        assert!(err.to_string().contains("reserved keyword"));
    }

    #[test]
    fn test_parse_context_validate_unique() {
        let ctx = ParseContext::new("", "mga.toml");
        assert!(ctx.validate_unique(["a", "b"], "method").is_ok());
        let err = ctx.validate_unique(["a", "b", "a"], "method").unwrap_err();
        assert_eq!(err.to_string(), "duplicate method 'a'");
    }
}
