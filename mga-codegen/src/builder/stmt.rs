use super::Expr;

/// A statement inside a function body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// An expression evaluated for its side effects.
    Expr(Expr),
    /// Short variable declaration (`a, b := x, y`).
    Define { names: Vec<String>, values: Vec<Expr> },
    /// Assignment (`a, b = x, y`).
    Assign { targets: Vec<Expr>, values: Vec<Expr> },
    If(IfStmt),
    Return(Vec<Expr>),
    /// An empty line separating statement groups.
    Blank,
    /// A line comment; the `//` prefix is added when rendered.
    Comment(String),
}

impl Statement {
    pub fn expr(expr: Expr) -> Self {
        Self::Expr(expr)
    }

    /// `name := value`
    pub fn define(name: impl Into<String>, value: Expr) -> Self {
        Self::Define {
            names: vec![name.into()],
            values: vec![value],
        }
    }

    /// `a, b := call()`
    pub fn define_many(
        names: impl IntoIterator<Item = impl Into<String>>,
        values: impl IntoIterator<Item = Expr>,
    ) -> Self {
        Self::Define {
            names: names.into_iter().map(Into::into).collect(),
            values: values.into_iter().collect(),
        }
    }

    /// `target = value`
    pub fn assign(target: Expr, value: Expr) -> Self {
        Self::Assign {
            targets: vec![target],
            values: vec![value],
        }
    }

    pub fn assign_many(
        targets: impl IntoIterator<Item = Expr>,
        values: impl IntoIterator<Item = Expr>,
    ) -> Self {
        Self::Assign {
            targets: targets.into_iter().collect(),
            values: values.into_iter().collect(),
        }
    }

    pub fn ret(values: impl IntoIterator<Item = Expr>) -> Self {
        Self::Return(values.into_iter().collect())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(text.into())
    }
}

impl From<IfStmt> for Statement {
    fn from(stmt: IfStmt) -> Self {
        Self::If(stmt)
    }
}

/// An `if` statement with an optional init statement and `else` branch.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub init: Option<Box<Statement>>,
    pub cond: Expr,
    pub then: Vec<Statement>,
    /// A single nested `If` renders as `else if`.
    pub otherwise: Option<Vec<Statement>>,
}

impl IfStmt {
    pub fn new(cond: Expr) -> Self {
        Self {
            init: None,
            cond,
            then: Vec::new(),
            otherwise: None,
        }
    }

    /// Set the init statement (`if err := f(); err != nil`).
    pub fn init(mut self, stmt: Statement) -> Self {
        self.init = Some(Box::new(stmt));
        self
    }

    pub fn then(mut self, stmt: Statement) -> Self {
        self.then.push(stmt);
        self
    }

    pub fn otherwise(mut self, stmts: impl IntoIterator<Item = Statement>) -> Self {
        self.otherwise = Some(stmts.into_iter().collect());
        self
    }

    /// Chain an `else if` branch.
    pub fn else_if(self, branch: IfStmt) -> Self {
        self.otherwise([Statement::If(branch)])
    }
}
