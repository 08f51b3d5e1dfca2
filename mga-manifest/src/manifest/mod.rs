//! Manifest types and parsing for mga.toml files.

mod lower;
mod parse;
mod validate;

use std::path::PathBuf;

use serde::Deserialize;
pub use parse::{MANIFEST_FILE, parse_manifest};
pub use validate::ParseContext;

/// Root manifest for mga.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Package the generated files belong to
    pub package: PackageConfig,

    /// Custom header text placed above the generated-code notice
    #[serde(default)]
    pub header: Option<String>,

    /// File holding the header text, relative to the manifest
    #[serde(default)]
    pub header_file: Option<PathBuf>,

    #[serde(default)]
    pub event_dispatchers: Vec<EventDispatcherConfig>,

    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

/// A Go package: import path and declared name.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    pub path: String,
    pub name: String,
}

/// `[[event_dispatchers]]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventDispatcherConfig {
    /// Base name; the generated type is `{name}EventDispatcher`
    pub name: String,
    #[serde(default)]
    pub methods: Vec<EventMethodConfig>,
}

/// `[[event_dispatchers.methods]]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventMethodConfig {
    pub name: String,
    pub event: TypeConfig,
    #[serde(default)]
    pub receives_context: bool,
    #[serde(default)]
    pub returns_error: bool,
}

/// `[[services]]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Interface name, e.g. `Service` or `TodoService`
    pub name: String,
    /// Package declaring the interface
    pub package: PackageConfig,
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

/// `[[services.endpoints]]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    pub name: String,
    /// Overrides the default `{package}.{name}` operation name
    #[serde(default)]
    pub operation_name: Option<String>,
    /// Parameters after the leading `context.Context`
    #[serde(default)]
    pub params: Vec<ParamConfig>,
    /// Results before the trailing `error`
    #[serde(default)]
    pub results: Vec<ParamConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeConfig,
}

/// A type reference; without `path` it names a builtin or local type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeConfig {
    #[serde(default)]
    pub path: Option<String>,
    /// Declared package name, defaults to the last path segment
    #[serde(default)]
    pub package: Option<String>,
    pub name: String,
    #[serde(default)]
    pub pointer: bool,
    #[serde(default)]
    pub slice: bool,
}

impl TypeConfig {
    /// The declared package name of a qualified type.
    pub fn package_name(&self) -> Option<&str> {
        let path = self.path.as_deref()?;
        Some(
            self.package
                .as_deref()
                .unwrap_or_else(|| path.rsplit('/').next().unwrap_or(path)),
        )
    }
}

impl Manifest {
    /// Whether the manifest describes anything to generate.
    pub fn is_empty(&self) -> bool {
        self.event_dispatchers.is_empty() && self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_defaults_to_last_segment() {
        let ty = TypeConfig {
            path: Some("example.com/app/order".into()),
            package: None,
            name: "Event".into(),
            pointer: false,
            slice: false,
        };
        assert_eq!(ty.package_name(), Some("order"));

        let ty = TypeConfig {
            package: Some("orders".into()),
            ..ty
        };
        assert_eq!(ty.package_name(), Some("orders"));
    }

    #[test]
    fn test_builtin_type_has_no_package() {
        let ty = TypeConfig {
            path: None,
            package: None,
            name: "string".into(),
            pointer: false,
            slice: false,
        };
        assert_eq!(ty.package_name(), None);
    }
}
