//! Syntax tree produced by the parser and consumed by the printer.
//!
//! Only what the printer needs is kept: layout hints (blank lines, single or
//! multi-line lists) and comments attached to list items.

/// A comment attached to a list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentLine {
    pub text: String,
    /// Preceded by a blank line in the source.
    pub blank_before: bool,
}

/// A list entry with its surrounding comments.
#[derive(Debug, Clone, PartialEq)]
pub struct Item<T> {
    pub leading: Vec<CommentLine>,
    /// A blank line separates the entry from whatever precedes it.
    pub blank_before: bool,
    pub node: T,
    /// Comment on the entry's last line.
    pub trailing: Option<String>,
}

impl<T> Item<T> {
    pub fn new(node: T) -> Self {
        Self {
            leading: Vec::new(),
            blank_before: false,
            node,
            trailing: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Comments above the package clause.
    pub header: Vec<CommentLine>,
    /// A blank line separates the header from the package clause.
    pub package_blank: bool,
    pub package: String,
    /// Import groups; a group is a run of specs not separated by blank lines.
    pub imports: Vec<Vec<Item<ImportSpec>>>,
    pub decls: Vec<Item<Decl>>,
    /// Comments after the last declaration.
    pub trailing: Vec<CommentLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportSpec {
    /// `_`, `.` or an alias.
    pub name: Option<String>,
    /// The path literal including quotes.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenKind {
    Type,
    Var,
    Const,
}

impl GenKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Var => "var",
            Self::Const => "const",
        }
    }
}

/// A `type`, `var` or `const` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub kind: GenKind,
    /// Parenthesized form.
    pub grouped: bool,
    pub specs: Vec<Item<Spec>>,
    /// Comments before the closing parenthesis.
    pub closing: Vec<CommentLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Type {
        name: String,
        /// Alias declaration (`type A = B`).
        alias: bool,
        ty: Expr,
    },
    Value {
        names: Vec<String>,
        ty: Option<Expr>,
        values: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub recv: Option<Vec<ParamGroup>>,
    pub name: String,
    pub sig: Signature,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub params: Vec<ParamGroup>,
    pub results: Vec<ParamGroup>,
}

/// Parameters sharing a type (`a, b int`); unnamed when `names` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamGroup {
    pub names: Vec<String>,
    pub ty: Expr,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Item<Stmt>>,
    /// Both braces on the same source line.
    pub one_line: bool,
    /// Comments before the closing brace.
    pub closing: Vec<CommentLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Assign {
        lhs: Vec<Expr>,
        op: String,
        rhs: Vec<Expr>,
    },
    IncDec {
        expr: Expr,
        op: String,
    },
    Send {
        chan: Expr,
        value: Expr,
    },
    Return(Vec<Expr>),
    If(IfStmt),
    For(ForStmt),
    Block(Block),
    Decl(GenDecl),
    /// `go` or `defer`.
    Call {
        keyword: &'static str,
        call: Expr,
    },
    /// `break` or `continue`.
    Branch(&'static str),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub then: Block,
    pub otherwise: Option<Box<Else>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Else {
    If(IfStmt),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForStmt {
    Loop {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Block,
    },
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        expr: Expr,
        body: Block,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// Expressions; types are expressions too, as in Go's own syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    /// Literal text as written.
    BasicLit(String),
    Composite {
        ty: Option<Box<Expr>>,
        elems: Vec<Item<Element>>,
        multiline: bool,
        /// Comments before the closing brace.
        closing: Vec<CommentLine>,
    },
    FuncLit {
        sig: Signature,
        body: Block,
    },
    Paren(Box<Expr>),
    Selector(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Slice {
        expr: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
    },
    TypeAssert(Box<Expr>, Box<Expr>),
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        ellipsis: bool,
        multiline: bool,
    },
    /// `*x`, either a pointer type or a dereference.
    Star(Box<Expr>),
    Unary(String, Box<Expr>),
    Binary(String, Box<Expr>, Box<Expr>),
    /// `[N]T`, `[...]T` or `[]T` when `len` is `None`.
    Array {
        len: Option<Box<Expr>>,
        elem: Box<Expr>,
    },
    /// `...` as an array length.
    Ellipsis,
    Map(Box<Expr>, Box<Expr>),
    Chan(ChanDir, Box<Expr>),
    FuncType(Signature),
    Struct {
        fields: Vec<Item<FieldDecl>>,
        one_line: bool,
        closing: Vec<CommentLine>,
    },
    Interface {
        elems: Vec<Item<InterfaceElem>>,
        one_line: bool,
        closing: Vec<CommentLine>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub key: Option<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Empty for an embedded field.
    pub names: Vec<String>,
    pub ty: Expr,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceElem {
    Method { name: String, sig: Signature },
    Embedded(Expr),
}

/// Go binary operator precedence.
pub fn precedence(op: &str) -> u8 {
    match op {
        "||" => 1,
        "&&" => 2,
        "==" | "!=" | "<" | "<=" | ">" | ">=" => 3,
        "+" | "-" | "|" | "^" => 4,
        "*" | "/" | "%" | "<<" | ">>" | "&" | "&^" => 5,
        _ => 0,
    }
}
