//! Go type expressions.

use super::{Field, MethodSig, Signature};
use crate::Symbol;

/// A Go type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// A builtin or package-local type name (`error`, `string`, `EventBus`).
    Named(String),
    /// A type declared in another package.
    Qual(Symbol),
    /// `*T`
    Pointer(Box<Type>),
    /// `[]T`
    Slice(Box<Type>),
    /// `map[K]V`
    Map(Box<Type>, Box<Type>),
    /// Inline interface; empty renders as `interface{}`.
    Interface(Vec<MethodSig>),
    /// Inline struct; empty renders as `struct{}`.
    Struct(Vec<Field>),
    /// Function type.
    Func(Box<Signature>),
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn qual(symbol: Symbol) -> Self {
        Self::Qual(symbol)
    }

    pub fn error() -> Self {
        Self::named("error")
    }

    pub fn string() -> Self {
        Self::named("string")
    }

    pub fn bool() -> Self {
        Self::named("bool")
    }

    pub fn int() -> Self {
        Self::named("int")
    }

    /// `interface{}`
    pub fn empty_interface() -> Self {
        Self::Interface(Vec::new())
    }

    pub fn pointer(self) -> Self {
        Self::Pointer(Box::new(self))
    }

    pub fn slice(self) -> Self {
        Self::Slice(Box::new(self))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    pub fn func(signature: Signature) -> Self {
        Self::Func(Box::new(signature))
    }

    /// Build a type from a specification type reference.
    ///
    /// Packages of qualified references must already be registered in the
    /// file rendering this type.
    pub fn from_ref(ty: &mga_ir::TypeRef) -> Self {
        let base = match &ty.package {
            Some(package) => Self::Qual(Symbol::new(&package.path, &ty.name)),
            None => Self::named(&ty.name),
        };
        let base = if ty.pointer { base.pointer() } else { base };
        if ty.slice { base.slice() } else { base }
    }
}
