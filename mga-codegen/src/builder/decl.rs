use super::{FuncDecl, InterfaceDecl, StructDecl, TypeDecl};

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Type(TypeDecl),
    Interface(InterfaceDecl),
    Struct(StructDecl),
    Func(FuncDecl),
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Self::Type(decl) => &decl.name,
            Self::Interface(decl) => &decl.name,
            Self::Struct(decl) => &decl.name,
            Self::Func(decl) => &decl.name,
        }
    }
}

impl From<TypeDecl> for Decl {
    fn from(decl: TypeDecl) -> Self {
        Self::Type(decl)
    }
}

impl From<InterfaceDecl> for Decl {
    fn from(decl: InterfaceDecl) -> Self {
        Self::Interface(decl)
    }
}

impl From<StructDecl> for Decl {
    fn from(decl: StructDecl) -> Self {
        Self::Struct(decl)
    }
}

impl From<FuncDecl> for Decl {
    fn from(decl: FuncDecl) -> Self {
        Self::Func(decl)
    }
}
