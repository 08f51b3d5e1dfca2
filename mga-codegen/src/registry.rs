//! Per-file import registry.
//!
//! Every external package referenced by a file gets exactly one alias. Aliases
//! are allocated on first registration and never change afterwards, so
//! declarations can be built in any order.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use mga_core::{is_keyword, is_predeclared};

use crate::{Error, Result};

/// A reference to a member of an external package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    /// Canonical import path of the declaring package.
    pub path: String,
    /// Exported member name (type, function, variable or constant).
    pub member: String,
}

impl Symbol {
    pub fn new(path: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            member: member.into(),
        }
    }
}

/// A registered import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Canonical import path.
    pub path: String,
    /// Alias used to qualify members of the package in this file.
    pub alias: String,
    /// Declared package name, or the terminal path segment when unknown.
    pub name: String,
    /// Whether the alias was requested explicitly.
    pub explicit: bool,
}

impl Import {
    /// Whether the alias has to be spelled out in the import line.
    pub fn needs_alias(&self) -> bool {
        self.explicit || self.alias != self.name
    }

    /// The import spec as it appears inside an import block.
    pub fn spec(&self) -> String {
        if self.needs_alias() {
            format!("{} \"{}\"", self.alias, self.path)
        } else {
            format!("\"{}\"", self.path)
        }
    }
}

/// Allocates and tracks import aliases for one file.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    imports: IndexMap<String, Import>,
    taken: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package and return its alias.
    ///
    /// `preferred` is the declared package name when known; otherwise the
    /// alias is guessed from the import path. Registering a path again returns
    /// the alias assigned the first time.
    pub fn register(&mut self, path: &str, preferred: Option<&str>) -> String {
        if let Some(import) = self.imports.get(path) {
            return import.alias.clone();
        }

        let (candidate, name) = match preferred {
            Some(name) => (sanitize(name), name.to_string()),
            None => (guess_alias(path), terminal_segment(path).to_string()),
        };
        self.insert(path, candidate, name, false)
    }

    /// Register a package under an explicit alias.
    ///
    /// The alias is always written in the import line. A colliding alias is
    /// still suffixed to keep aliases unique.
    pub fn register_alias(&mut self, path: &str, alias: &str) -> String {
        if let Some(import) = self.imports.get(path) {
            return import.alias.clone();
        }

        let name = terminal_segment(path).to_string();
        self.insert(path, sanitize(alias), name, true)
    }

    fn insert(&mut self, path: &str, candidate: String, name: String, explicit: bool) -> String {
        let alias = self.unique(candidate);
        self.taken.insert(alias.clone());
        self.imports.insert(
            path.to_string(),
            Import {
                path: path.to_string(),
                alias: alias.clone(),
                name,
                explicit,
            },
        );
        alias
    }

    fn unique(&self, candidate: String) -> String {
        let reserved = |alias: &str| {
            is_keyword(alias) || is_predeclared(alias) || self.taken.contains(alias)
        };
        if !reserved(&candidate) {
            return candidate;
        }

        let mut suffix = 1usize;
        loop {
            let alias = format!("{candidate}{suffix}");
            if !reserved(&alias) {
                tracing::debug!(%candidate, %alias, "import alias collision");
                return alias;
            }
            suffix += 1;
        }
    }

    /// Resolve a member of a registered package to its qualified identifier.
    pub fn resolve(&self, path: &str, member: &str) -> Result<String> {
        self.imports
            .get(path)
            .map(|import| format!("{}.{member}", import.alias))
            .ok_or_else(|| Error::unresolved(path, member))
    }

    /// The alias of a registered package.
    pub fn alias(&self, path: &str) -> Option<&str> {
        self.imports.get(path).map(|import| import.alias.as_str())
    }

    pub fn get(&self, path: &str) -> Option<&Import> {
        self.imports.get(path)
    }

    /// Iterate over all imports in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Import> {
        self.imports.values()
    }

    /// The imports whose paths are in `used`, sorted by canonical path.
    pub fn used<'a>(&'a self, used: &'a BTreeSet<String>) -> impl Iterator<Item = &'a Import> {
        used.iter().filter_map(|path| self.imports.get(path))
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}

/// The terminal segment of an import path, skipping a `vN` major version.
fn terminal_segment(path: &str) -> &str {
    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let last = segments.next().unwrap_or(path);
    if is_major_version(last) {
        segments.next().unwrap_or(last)
    } else {
        last
    }
}

fn is_major_version(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}

/// Guess a package alias from its import path.
fn guess_alias(path: &str) -> String {
    let alias = sanitize(&terminal_segment(path).to_ascii_lowercase());
    if alias.is_empty() { "pkg".to_string() } else { alias }
}

/// Keep ASCII letters, digits and underscores and drop leading digits.
fn sanitize(name: &str) -> String {
    let alias: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .skip_while(|c| c.is_ascii_digit())
        .collect();
    if alias.is_empty() { "pkg".to_string() } else { alias }
}
