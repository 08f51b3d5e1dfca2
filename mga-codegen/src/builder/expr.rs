//! Go expressions.
//!
//! Expressions compose through consuming methods:
//!
//! ```
//! use mga_codegen::builder::Expr;
//!
//! let publish = Expr::ident("d")
//!     .dot("bus")
//!     .dot("Publish")
//!     .call([Expr::ident("ctx"), Expr::ident("event")]);
//! let check = Expr::ident("err").not_equal(Expr::Nil);
//! # let _ = (publish, check);
//! ```

use super::{Signature, Statement, Type};
use crate::Symbol;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lit {
    /// A string literal; the value is quoted and escaped when rendered.
    Str(String),
    Int(i64),
    Bool(bool),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    OrOr,
    AndAnd,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Or,
    Xor,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OrOr => "||",
            Self::AndAnd => "&&",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::And => "&",
            Self::AndNot => "&^",
        }
    }

    /// Go operator precedence, 1 (`||`) to 5 (`*`).
    pub fn precedence(self) -> u8 {
        match self {
            Self::OrOr => 1,
            Self::AndAnd => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
            Self::Add | Self::Sub | Self::Or | Self::Xor => 4,
            _ => 5,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!x`
    Not,
    /// `-x`
    Neg,
    /// `&x`
    Addr,
    /// `*x`
    Deref,
    /// `<-x`
    Recv,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Neg => "-",
            Self::Addr => "&",
            Self::Deref => "*",
            Self::Recv => "<-",
        }
    }
}

/// A Go expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Qual(Symbol),
    Nil,
    Lit(Lit),
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        /// Spread the last argument into a variadic parameter (`f(xs...)`).
        spread: bool,
    },
    Selector {
        expr: Box<Expr>,
        name: String,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Composite(CompositeLit),
    FuncLit {
        signature: Signature,
        body: Vec<Statement>,
    },
    TypeAssert {
        expr: Box<Expr>,
        ty: Type,
    },
    /// A type used in expression position, e.g. the operand of a conversion.
    Type(Type),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    pub fn qual(symbol: Symbol) -> Self {
        Self::Qual(symbol)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Lit(Lit::Str(value.into()))
    }

    pub fn int(value: i64) -> Self {
        Self::Lit(Lit::Int(value))
    }

    pub fn bool(value: bool) -> Self {
        Self::Lit(Lit::Bool(value))
    }

    pub fn func_lit(signature: Signature, body: impl IntoIterator<Item = Statement>) -> Self {
        Self::FuncLit {
            signature,
            body: body.into_iter().collect(),
        }
    }

    /// Select a field or method (`x.name`).
    pub fn dot(self, name: impl Into<String>) -> Self {
        Self::Selector {
            expr: Box::new(self),
            name: name.into(),
        }
    }

    pub fn call(self, args: impl IntoIterator<Item = Expr>) -> Self {
        Self::Call {
            func: Box::new(self),
            args: args.into_iter().collect(),
            spread: false,
        }
    }

    /// Call with the last argument spread (`f(a, xs...)`).
    pub fn call_spread(self, args: impl IntoIterator<Item = Expr>) -> Self {
        Self::Call {
            func: Box::new(self),
            args: args.into_iter().collect(),
            spread: true,
        }
    }

    pub fn binary(self, op: BinaryOp, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    pub fn equal(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Eq, rhs)
    }

    pub fn not_equal(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Ne, rhs)
    }

    pub fn and(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::AndAnd, rhs)
    }

    pub fn or(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::OrOr, rhs)
    }

    pub fn unary(self, op: UnaryOp) -> Self {
        Self::Unary {
            op,
            expr: Box::new(self),
        }
    }

    /// `&x`
    pub fn addr(self) -> Self {
        self.unary(UnaryOp::Addr)
    }

    /// `!x`
    pub fn not(self) -> Self {
        self.unary(UnaryOp::Not)
    }

    /// `x.(T)`
    pub fn assert(self, ty: Type) -> Self {
        Self::TypeAssert {
            expr: Box::new(self),
            ty,
        }
    }

    /// Operator precedence of the expression; operands bind tighter than any
    /// binary operator.
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            Self::Binary { op, .. } => op.precedence(),
            Self::Unary { .. } | Self::Lit(Lit::Int(i64::MIN..0)) => 6,
            _ => 7,
        }
    }
}

impl From<CompositeLit> for Expr {
    fn from(lit: CompositeLit) -> Self {
        Self::Composite(lit)
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Self::Qual(symbol)
    }
}

/// An element of a composite literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub key: Option<Expr>,
    pub value: Expr,
}

/// A composite literal (`T{a: b}`).
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeLit {
    pub ty: Type,
    pub elements: Vec<Element>,
    /// Render one element per line.
    pub multiline: bool,
}

impl CompositeLit {
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            elements: Vec::new(),
            multiline: false,
        }
    }

    /// Add a `key: value` element.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.elements.push(Element {
            key: Some(Expr::ident(key)),
            value: value.into(),
        });
        self
    }

    /// Add a positional element.
    pub fn value(mut self, value: impl Into<Expr>) -> Self {
        self.elements.push(Element {
            key: None,
            value: value.into(),
        });
        self
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// Take the address of the literal (`&T{...}`).
    pub fn addr(self) -> Expr {
        Expr::from(self).addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fluent_chain() {
        let expr = Expr::ident("d").dot("bus").call([Expr::ident("x")]);
        let Expr::Call { func, args, spread } = expr else {
            panic!("expected call");
        };
        assert_eq!(*func, Expr::ident("d").dot("bus"));
        assert_eq!(args, [Expr::ident("x")]);
        assert!(!spread);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(BinaryOp::OrOr.precedence(), 1);
        assert_eq!(BinaryOp::Ne.precedence(), 3);
        assert_eq!(BinaryOp::AndNot.precedence(), 5);
        assert!(Expr::ident("a").and(Expr::ident("b")).precedence() < Expr::Nil.precedence());
        assert_eq!(Expr::int(-1).precedence(), 6);
        assert_eq!(Expr::int(0).precedence(), 7);
    }

    #[test]
    fn test_composite_builder() {
        let lit = CompositeLit::new(Type::named("T"))
            .field("a", Expr::int(1))
            .value(Expr::Nil)
            .multiline();
        assert_eq!(lit.elements.len(), 2);
        assert_eq!(lit.elements[0].key, Some(Expr::ident("a")));
        assert!(lit.multiline);
    }
}
