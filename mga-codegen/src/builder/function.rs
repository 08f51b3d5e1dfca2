//! Function declarations and signatures.

use super::{Statement, Type};

/// A parameter or result.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name; `None` for unnamed results.
    pub name: Option<String>,
    pub ty: Type,
    /// Variadic parameter (`...T`); only valid last.
    pub variadic: bool,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            variadic: false,
        }
    }

    /// An unnamed parameter or result.
    pub fn unnamed(ty: Type) -> Self {
        Self {
            name: None,
            ty,
            variadic: false,
        }
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }
}

/// Parameters and results of a function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub params: Vec<Param>,
    pub results: Vec<Param>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn result(mut self, result: Param) -> Self {
        self.results.push(result);
        self
    }

    /// Add an unnamed result.
    pub fn returns(self, ty: Type) -> Self {
        self.result(Param::unnamed(ty))
    }
}

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub doc: Option<String>,
    /// Method receiver.
    pub receiver: Option<Param>,
    pub name: String,
    pub signature: Signature,
    pub body: Vec<Statement>,
}

impl FuncDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            doc: None,
            receiver: None,
            name: name.into(),
            signature: Signature::default(),
            body: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Make this a method on `receiver`.
    pub fn receiver(mut self, receiver: Param) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.signature.params.push(param);
        self
    }

    pub fn result(mut self, result: Param) -> Self {
        self.signature.results.push(result);
        self
    }

    pub fn returns(mut self, ty: Type) -> Self {
        self.signature.results.push(Param::unnamed(ty));
        self
    }

    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    pub fn statement(mut self, stmt: Statement) -> Self {
        self.body.push(stmt);
        self
    }

    pub fn statements(mut self, stmts: impl IntoIterator<Item = Statement>) -> Self {
        self.body.extend(stmts);
        self
    }
}
