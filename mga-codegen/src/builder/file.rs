//! The root of a generated Go file.

use mga_ir::{PackageRef, TypeRef};

use super::{Decl, Type};
use crate::{Registry, Result, Symbol, format, render};

/// A Go compilation unit under construction.
///
/// The file owns its declarations and the [`Registry`] that assigns import
/// aliases to every package its declarations reference.
///
/// # Example
///
/// ```
/// use mga_codegen::builder::{Expr, File, FuncDecl, Statement};
/// use mga_ir::PackageRef;
///
/// let mut file = File::new(PackageRef::new("example.com/app", "app"));
/// let background = file.qual("context", "Background");
/// file.push_decl(FuncDecl::new("run").statement(Statement::expr(Expr::from(background).call(Vec::new()))));
///
/// let source = file.generate().unwrap();
/// assert!(source.contains("import \"context\""));
/// ```
#[derive(Debug, Clone)]
pub struct File {
    package: PackageRef,
    headers: Vec<String>,
    decls: Vec<Decl>,
    registry: Registry,
}

impl File {
    pub fn new(package: PackageRef) -> Self {
        Self {
            package,
            headers: Vec::new(),
            decls: Vec::new(),
            registry: Registry::new(),
        }
    }

    pub fn package(&self) -> &PackageRef {
        &self.package
    }

    /// Header comment blocks in registration order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn decls(&self) -> &[Decl] {
        &self.decls
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Add a comment block above the package clause.
    ///
    /// Lines are prefixed with `//` unless the text already starts with a
    /// comment marker.
    pub fn header_comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.headers.push(text.into());
        self
    }

    /// Register a package with its declared name and return its alias.
    pub fn import_name(&mut self, path: &str, name: &str) -> String {
        self.registry.register(path, Some(name))
    }

    /// Register a package under an explicit alias and return the alias
    /// actually assigned.
    pub fn import_alias(&mut self, path: &str, alias: &str) -> String {
        self.registry.register_alias(path, alias)
    }

    /// Reference a member of a package, registering the package if needed.
    pub fn qual(&mut self, path: &str, member: &str) -> Symbol {
        if path != self.package.path {
            self.registry.register(path, None);
        }
        Symbol::new(path, member)
    }

    /// Build a type from a specification type reference, registering its
    /// package under the declared package name.
    pub fn type_ref(&mut self, ty: &TypeRef) -> Type {
        if let Some(package) = ty.package.as_ref().filter(|p| p.path != self.package.path) {
            let name = (!package.name.is_empty()).then_some(package.name.as_str());
            self.registry.register(&package.path, name);
        }
        Type::from_ref(ty)
    }

    pub fn push_decl(&mut self, decl: impl Into<Decl>) -> &mut Self {
        self.decls.push(decl.into());
        self
    }

    pub fn decl(mut self, decl: impl Into<Decl>) -> Self {
        self.push_decl(decl);
        self
    }

    /// Render the file to unformatted Go source.
    pub fn render(&self) -> Result<String> {
        render::render(self)
    }

    /// Render and format the file.
    pub fn generate(&self) -> Result<String> {
        let raw = self.render()?;
        let filename = format!("{}.go", self.package.name);
        format::format_named(&raw, &filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> File {
        File::new(PackageRef::new("example.com/app/todo", "todo"))
    }

    #[test]
    fn test_file_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<File>();
    }

    #[test]
    fn test_qual_own_package_registers_nothing() {
        let mut file = file();
        file.qual("example.com/app/todo", "Item");
        assert!(file.registry().is_empty());

        file.qual("context", "Context");
        file.qual("context", "Background");
        assert_eq!(file.registry().len(), 1);
    }

    #[test]
    fn test_type_ref_uses_declared_package_name() {
        let mut file = file();
        let ty = TypeRef::qualified(PackageRef::new("example.com/app/todo/v2", "todov2"), "Item");
        file.type_ref(&ty);
        assert_eq!(file.registry().alias("example.com/app/todo/v2"), Some("todov2"));

        file.type_ref(&TypeRef::local("string"));
        assert_eq!(file.registry().len(), 1);
    }
}
