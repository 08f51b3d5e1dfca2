//! Type, struct and interface declarations.

use super::{Signature, Type};

/// A struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub doc: Option<String>,
    /// Field name; `None` for an embedded field.
    pub name: Option<String>,
    pub ty: Type,
    /// Raw tag content without backquotes (`json:"id"`).
    pub tag: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            doc: None,
            name: Some(name.into()),
            ty,
            tag: None,
        }
    }

    pub fn embedded(ty: Type) -> Self {
        Self {
            doc: None,
            name: None,
            ty,
            tag: None,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// An interface method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    pub doc: Option<String>,
    pub name: String,
    pub signature: Signature,
}

impl MethodSig {
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            doc: None,
            name: name.into(),
            signature,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// `type Name Underlying`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub doc: Option<String>,
    pub name: String,
    pub underlying: Type,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, underlying: Type) -> Self {
        Self {
            doc: None,
            name: name.into(),
            underlying,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// `type Name interface { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub doc: Option<String>,
    pub name: String,
    pub methods: Vec<MethodSig>,
}

impl InterfaceDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            doc: None,
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn method(mut self, method: MethodSig) -> Self {
        self.methods.push(method);
        self
    }
}

/// `type Name struct { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub doc: Option<String>,
    pub name: String,
    pub fields: Vec<Field>,
}

impl StructDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            doc: None,
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }
}
