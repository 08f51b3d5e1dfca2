//! Node model to raw Go source.
//!
//! The renderer emits syntactically complete but not canonically laid out
//! text; [`format`](crate::format) produces the final layout. Declarations
//! are rendered before the import block so that only packages actually
//! referenced are imported.

use std::collections::BTreeSet;

use crate::{
    Registry, Result, Symbol,
    builder::{
        CodeBuilder, CompositeLit, Decl, Expr, Field, File, FuncDecl, IfStmt, Lit, MethodSig,
        Param, Signature, Statement, Type, UnaryOp,
    },
};

/// Render a file to raw Go source.
pub fn render(file: &File) -> Result<String> {
    let mut renderer = Renderer {
        registry: file.registry(),
        own_path: &file.package().path,
        used: BTreeSet::new(),
        header: false,
    };

    let mut body = CodeBuilder::go();
    for (i, decl) in file.decls().iter().enumerate() {
        if i > 0 {
            body.push_blank();
        }
        renderer.decl(&mut body, decl)?;
    }

    let mut out = CodeBuilder::go();
    for header in file.headers() {
        out.push_comment(header);
        out.push_blank();
    }
    out.push_line(&format!("package {}", file.package().name));

    if !renderer.used.is_empty() {
        out.push_blank();
        out.push_line("import (");
        out.push_indent();
        for import in renderer.registry.used(&renderer.used) {
            out.push_line(&import.spec());
        }
        out.push_dedent();
        out.push_line(")");
    }

    tracing::trace!(
        package = %file.package().path,
        decls = file.decls().len(),
        imports = renderer.used.len(),
        "rendered file"
    );

    if !file.decls().is_empty() {
        out.push_blank();
        out.push_raw(body.as_str());
    }
    Ok(out.build())
}

struct Renderer<'a> {
    registry: &'a Registry,
    own_path: &'a str,
    used: BTreeSet<String>,
    /// Set while rendering an `if` header, where a bare composite literal
    /// would be read as the opening of the block.
    header: bool,
}

impl Renderer<'_> {
    fn qualify(&mut self, symbol: &Symbol) -> Result<String> {
        if symbol.path == self.own_path {
            return Ok(symbol.member.clone());
        }
        let qualified = self.registry.resolve(&symbol.path, &symbol.member)?;
        self.used.insert(symbol.path.clone());
        Ok(qualified)
    }

    fn doc(&self, out: &mut CodeBuilder, doc: Option<&String>) {
        if let Some(doc) = doc {
            out.push_comment(doc);
        }
    }

    fn decl(&mut self, out: &mut CodeBuilder, decl: &Decl) -> Result<()> {
        match decl {
            Decl::Type(decl) => {
                self.doc(out, decl.doc.as_ref());
                out.push_raw(&format!("type {} ", decl.name));
                self.ty(out, &decl.underlying)?;
                out.push_newline();
            }
            Decl::Interface(decl) => {
                self.doc(out, decl.doc.as_ref());
                out.push_raw(&format!("type {} ", decl.name));
                self.interface(out, &decl.methods)?;
                out.push_newline();
            }
            Decl::Struct(decl) => {
                self.doc(out, decl.doc.as_ref());
                out.push_raw(&format!("type {} ", decl.name));
                self.structure(out, &decl.fields)?;
                out.push_newline();
            }
            Decl::Func(decl) => self.func(out, decl)?,
        }
        Ok(())
    }

    fn func(&mut self, out: &mut CodeBuilder, decl: &FuncDecl) -> Result<()> {
        self.doc(out, decl.doc.as_ref());
        out.push_raw("func ");
        if let Some(receiver) = &decl.receiver {
            out.push_raw("(");
            self.param(out, receiver)?;
            out.push_raw(") ");
        }
        out.push_raw(&decl.name);
        self.signature(out, &decl.signature)?;
        out.push_raw(" ");
        self.block(out, &decl.body)?;
        out.push_newline();
        Ok(())
    }

    fn interface(&mut self, out: &mut CodeBuilder, methods: &[MethodSig]) -> Result<()> {
        if methods.is_empty() {
            out.push_raw("interface{}");
            return Ok(());
        }
        out.push_raw("interface {").push_newline().push_indent();
        for method in methods {
            self.doc(out, method.doc.as_ref());
            out.push_raw(&method.name);
            self.signature(out, &method.signature)?;
            out.push_newline();
        }
        out.push_dedent().push_raw("}");
        Ok(())
    }

    fn structure(&mut self, out: &mut CodeBuilder, fields: &[Field]) -> Result<()> {
        if fields.is_empty() {
            out.push_raw("struct{}");
            return Ok(());
        }
        out.push_raw("struct {").push_newline().push_indent();
        for field in fields {
            self.doc(out, field.doc.as_ref());
            if let Some(name) = &field.name {
                out.push_raw(name).push_raw(" ");
            }
            self.ty(out, &field.ty)?;
            if let Some(tag) = &field.tag {
                out.push_raw(&format!(" `{tag}`"));
            }
            out.push_newline();
        }
        out.push_dedent().push_raw("}");
        Ok(())
    }

    fn ty(&mut self, out: &mut CodeBuilder, ty: &Type) -> Result<()> {
        match ty {
            Type::Named(name) => {
                out.push_raw(name);
            }
            Type::Qual(symbol) => {
                let name = self.qualify(symbol)?;
                out.push_raw(&name);
            }
            Type::Pointer(inner) => {
                out.push_raw("*");
                self.ty(out, inner)?;
            }
            Type::Slice(inner) => {
                out.push_raw("[]");
                self.ty(out, inner)?;
            }
            Type::Map(key, value) => {
                out.push_raw("map[");
                self.ty(out, key)?;
                out.push_raw("]");
                self.ty(out, value)?;
            }
            Type::Interface(methods) => self.interface(out, methods)?,
            Type::Struct(fields) => self.structure(out, fields)?,
            Type::Func(signature) => {
                out.push_raw("func");
                self.signature(out, signature)?;
            }
        }
        Ok(())
    }

    fn signature(&mut self, out: &mut CodeBuilder, signature: &Signature) -> Result<()> {
        out.push_raw("(");
        self.params(out, &signature.params)?;
        out.push_raw(")");

        match signature.results.as_slice() {
            [] => {}
            [result] if result.name.is_none() => {
                out.push_raw(" ");
                self.ty(out, &result.ty)?;
            }
            results => {
                out.push_raw(" (");
                self.params(out, results)?;
                out.push_raw(")");
            }
        }
        Ok(())
    }

    fn params(&mut self, out: &mut CodeBuilder, params: &[Param]) -> Result<()> {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                out.push_raw(", ");
            }
            self.param(out, param)?;
        }
        Ok(())
    }

    fn param(&mut self, out: &mut CodeBuilder, param: &Param) -> Result<()> {
        if let Some(name) = &param.name {
            out.push_raw(name).push_raw(" ");
        }
        if param.variadic {
            out.push_raw("...");
        }
        self.ty(out, &param.ty)
    }

    /// Write `{ ... }` without the trailing newline.
    fn block(&mut self, out: &mut CodeBuilder, stmts: &[Statement]) -> Result<()> {
        out.push_raw("{").push_newline().push_indent();
        for stmt in stmts {
            self.stmt(out, stmt)?;
        }
        out.push_dedent().push_raw("}");
        Ok(())
    }

    fn stmt(&mut self, out: &mut CodeBuilder, stmt: &Statement) -> Result<()> {
        match stmt {
            Statement::Expr(_) | Statement::Define { .. } | Statement::Assign { .. } => {
                self.simple_stmt(out, stmt)?;
                out.push_newline();
            }
            Statement::If(stmt) => {
                self.if_stmt(out, stmt)?;
                out.push_newline();
            }
            Statement::Return(values) => {
                out.push_raw("return");
                if !values.is_empty() {
                    out.push_raw(" ");
                    self.exprs(out, values)?;
                }
                out.push_newline();
            }
            Statement::Blank => {
                out.push_newline();
            }
            Statement::Comment(text) => {
                out.push_comment(text);
            }
        }
        Ok(())
    }

    fn simple_stmt(&mut self, out: &mut CodeBuilder, stmt: &Statement) -> Result<()> {
        match stmt {
            Statement::Expr(expr) => self.expr(out, expr),
            Statement::Define { names, values } => {
                out.push_raw(&names.join(", ")).push_raw(" := ");
                self.exprs(out, values)
            }
            Statement::Assign { targets, values } => {
                self.exprs(out, targets)?;
                out.push_raw(" = ");
                self.exprs(out, values)
            }
            other => self.stmt(out, other),
        }
    }

    fn if_stmt(&mut self, out: &mut CodeBuilder, stmt: &IfStmt) -> Result<()> {
        out.push_raw("if ");
        let outer = std::mem::replace(&mut self.header, true);
        let header = self.if_header(out, stmt);
        self.header = outer;
        header?;
        out.push_raw(" ");
        self.block(out, &stmt.then)?;

        match stmt.otherwise.as_deref() {
            None => {}
            Some([Statement::If(nested)]) => {
                out.push_raw(" else ");
                self.if_stmt(out, nested)?;
            }
            Some(stmts) => {
                out.push_raw(" else ");
                self.block(out, stmts)?;
            }
        }
        Ok(())
    }

    fn if_header(&mut self, out: &mut CodeBuilder, stmt: &IfStmt) -> Result<()> {
        if let Some(init) = &stmt.init {
            self.simple_stmt(out, init)?;
            out.push_raw("; ");
        }
        self.expr(out, &stmt.cond)
    }

    /// Render with the `if` header restriction lifted, for positions
    /// enclosed in brackets.
    fn enclosed(
        &mut self,
        out: &mut CodeBuilder,
        render: impl FnOnce(&mut Self, &mut CodeBuilder) -> Result<()>,
    ) -> Result<()> {
        let outer = std::mem::replace(&mut self.header, false);
        let result = render(self, out);
        self.header = outer;
        result
    }

    fn exprs(&mut self, out: &mut CodeBuilder, exprs: &[Expr]) -> Result<()> {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                out.push_raw(", ");
            }
            self.expr(out, expr)?;
        }
        Ok(())
    }

    /// Write an expression in operand position, parenthesized when needed.
    fn operand(&mut self, out: &mut CodeBuilder, expr: &Expr) -> Result<()> {
        let needs_parens = expr.precedence() < 7
            || matches!(expr, Expr::Type(Type::Pointer(_) | Type::Func(_)));
        self.wrapped(out, expr, needs_parens)
    }

    /// Write the operand of a selector or type assertion. An integer literal
    /// is parenthesized so the `.` is not lexed as a radix point.
    fn selected(&mut self, out: &mut CodeBuilder, expr: &Expr) -> Result<()> {
        if let Expr::Lit(Lit::Int(_)) = expr {
            return self.wrapped(out, expr, true);
        }
        self.operand(out, expr)
    }

    fn wrapped(&mut self, out: &mut CodeBuilder, expr: &Expr, parens: bool) -> Result<()> {
        if parens {
            out.push_raw("(");
            self.enclosed(out, |r, out| r.expr(out, expr))?;
            out.push_raw(")");
            Ok(())
        } else {
            self.expr(out, expr)
        }
    }

    fn expr(&mut self, out: &mut CodeBuilder, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Ident(name) => {
                out.push_raw(name);
            }
            Expr::Qual(symbol) => {
                let name = self.qualify(symbol)?;
                out.push_raw(&name);
            }
            Expr::Nil => {
                out.push_raw("nil");
            }
            Expr::Lit(lit) => {
                out.push_raw(&literal(lit));
            }
            Expr::Call { func, args, spread } => {
                self.operand(out, func)?;
                out.push_raw("(");
                self.enclosed(out, |r, out| r.exprs(out, args))?;
                if *spread {
                    out.push_raw("...");
                }
                out.push_raw(")");
            }
            Expr::Selector { expr, name } => {
                self.selected(out, expr)?;
                out.push_raw(".").push_raw(name);
            }
            Expr::Binary { op, lhs, rhs } => {
                let prec = op.precedence();
                self.wrapped(out, lhs, lhs.precedence() < prec)?;
                out.push_raw(" ").push_raw(op.as_str()).push_raw(" ");
                self.wrapped(out, rhs, rhs.precedence() <= prec)?;
            }
            Expr::Unary { op, expr } => {
                out.push_raw(op.as_str());
                let repeated = matches!(
                    (op, expr.as_ref()),
                    (UnaryOp::Neg, Expr::Unary { op: UnaryOp::Neg, .. })
                        | (UnaryOp::Neg, Expr::Lit(Lit::Int(i64::MIN..0)))
                        | (UnaryOp::Addr, Expr::Unary { op: UnaryOp::Addr, .. })
                );
                self.wrapped(out, expr, expr.precedence() < 6 || repeated)?;
            }
            Expr::Composite(lit) if self.header => {
                out.push_raw("(");
                self.enclosed(out, |r, out| r.composite(out, lit))?;
                out.push_raw(")");
            }
            Expr::Composite(lit) => self.composite(out, lit)?,
            Expr::FuncLit { signature, body } => {
                out.push_raw("func");
                self.signature(out, signature)?;
                out.push_raw(" ");
                self.enclosed(out, |r, out| r.block(out, body))?;
            }
            Expr::TypeAssert { expr, ty } => {
                self.selected(out, expr)?;
                out.push_raw(".(");
                self.ty(out, ty)?;
                out.push_raw(")");
            }
            Expr::Type(ty) => self.ty(out, ty)?,
        }
        Ok(())
    }

    fn composite(&mut self, out: &mut CodeBuilder, lit: &CompositeLit) -> Result<()> {
        self.ty(out, &lit.ty)?;
        out.push_raw("{");
        self.enclosed(out, |r, out| r.elements(out, lit))?;
        out.push_raw("}");
        Ok(())
    }

    fn elements(&mut self, out: &mut CodeBuilder, lit: &CompositeLit) -> Result<()> {
        if lit.multiline && !lit.elements.is_empty() {
            out.push_newline().push_indent();
            for element in &lit.elements {
                if let Some(key) = &element.key {
                    self.expr(out, key)?;
                    out.push_raw(": ");
                }
                self.expr(out, &element.value)?;
                out.push_raw(",").push_newline();
            }
            out.push_dedent();
        } else {
            for (i, element) in lit.elements.iter().enumerate() {
                if i > 0 {
                    out.push_raw(", ");
                }
                if let Some(key) = &element.key {
                    self.expr(out, key)?;
                    out.push_raw(": ");
                }
                self.expr(out, &element.value)?;
            }
        }
        Ok(())
    }
}

fn literal(lit: &Lit) -> String {
    match lit {
        Lit::Str(value) => quote(value),
        Lit::Int(value) => value.to_string(),
        Lit::Bool(value) => value.to_string(),
    }
}

/// Quote a string as an interpreted Go string literal.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
