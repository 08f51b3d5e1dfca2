//! Package and type references.

use std::fmt;

/// A Go package identity: its canonical import path and its declared name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PackageRef {
    /// Canonical import path (e.g., "emperror.dev/errors").
    pub path: String,
    /// Declared package name (e.g., "errors").
    pub name: String,
}

impl PackageRef {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// A reference to a Go type.
///
/// A type without a package is either builtin (`string`, `error`) or local
/// to the generated package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Package declaring the type.
    pub package: Option<PackageRef>,
    /// Type name.
    pub name: String,
    /// Whether the type is used as a pointer (`*T`).
    pub pointer: bool,
    /// Whether the type is used as a slice (`[]T`, `[]*T`).
    pub slice: bool,
}

impl TypeRef {
    /// A type declared in another package.
    pub fn qualified(package: PackageRef, name: impl Into<String>) -> Self {
        Self {
            package: Some(package),
            name: name.into(),
            pointer: false,
            slice: false,
        }
    }

    /// A builtin or package-local type.
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            package: None,
            name: name.into(),
            pointer: false,
            slice: false,
        }
    }

    pub fn pointer(mut self) -> Self {
        self.pointer = true;
        self
    }

    pub fn slice(mut self) -> Self {
        self.slice = true;
        self
    }

    /// The canonical import path, empty for local types.
    pub fn package_path(&self) -> &str {
        self.package.as_ref().map_or("", |p| p.path.as_str())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slice {
            write!(f, "[]")?;
        }
        if self.pointer {
            write!(f, "*")?;
        }
        match &self.package {
            Some(package) => write!(f, "{}.{}", package.name, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_display() {
        let pkg = PackageRef::new("example.com/app/order", "order");
        assert_eq!(TypeRef::qualified(pkg.clone(), "Event").to_string(), "order.Event");
        assert_eq!(TypeRef::local("string").slice().to_string(), "[]string");
        assert_eq!(
            TypeRef::qualified(pkg, "Todo").pointer().slice().to_string(),
            "[]*order.Todo"
        );
    }

    #[test]
    fn test_package_path() {
        let pkg = PackageRef::new("example.com/app/order", "order");
        assert_eq!(TypeRef::qualified(pkg, "Event").package_path(), "example.com/app/order");
        assert_eq!(TypeRef::local("error").package_path(), "");
    }
}
