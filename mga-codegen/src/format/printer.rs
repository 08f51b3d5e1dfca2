//! Canonical layout of a parsed file.
//!
//! Spacing around binary operators depends on the nesting depth of the
//! expression, the same way `gofmt` decides it: `a + b*c` at statement level,
//! `f(a+b, c)` inside a call with several arguments.

use std::collections::HashSet;

use super::{
    align::{Cell, Chunk, Line, align},
    ast::*,
};

const UNARY_PREC: u8 = 6;
const HIGHEST_PREC: u8 = 7;
const ONE_LINE_FUNC_MAX: usize = 100;
const ONE_LINE_FIELD_MAX: usize = 30;

/// Print a file in canonical form.
pub fn print(file: &SourceFile) -> String {
    let mut printer = Printer::default();
    printer.file(file);
    let text = align(&printer.finish());
    let mut text = text.trim_end_matches('\n').to_string();
    text.push('\n');
    text
}

#[derive(Default)]
struct Printer {
    chunks: Vec<Chunk>,
    cells: Vec<Cell>,
    cur: String,
    indent: usize,
    line_indent: usize,
    started: bool,
    /// Completed lines so far.
    lines: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DeclKind {
    Func,
    Type,
    Var,
    Const,
}

impl Printer {
    fn finish(mut self) -> Vec<Chunk> {
        if self.started {
            self.newline();
        }
        self.chunks
    }

    // ---------------------------------------------------------------------
    // Output primitives
    // ---------------------------------------------------------------------

    fn start(&mut self) {
        if !self.started {
            self.started = true;
            self.line_indent = self.indent;
        }
    }

    fn write(&mut self, text: &str) {
        self.start();
        self.cur.push_str(text);
    }

    /// End the current cell at an alignment stop.
    fn cell(&mut self) {
        self.end_cell(false);
    }

    /// End the current cell before a trailing comment.
    fn tab(&mut self) {
        self.end_cell(true);
    }

    fn end_cell(&mut self, hard: bool) {
        self.start();
        let text = std::mem::take(&mut self.cur);
        self.cells.push(Cell { text, hard });
    }

    fn newline(&mut self) {
        let line = Line {
            indent: if self.started { self.line_indent } else { 0 },
            cells: std::mem::take(&mut self.cells),
            text: std::mem::take(&mut self.cur),
        };
        self.chunks.push(Chunk::Line(line));
        self.started = false;
        self.lines += 1;
    }

    /// Emit an empty line unless one was just emitted.
    fn blank_line(&mut self) {
        let previous = self.chunks.iter().rev().find_map(|chunk| match chunk {
            Chunk::Line(line) => Some(line.is_blank()),
            Chunk::Flush => None,
        });
        if previous == Some(false) {
            self.chunks.push(Chunk::Line(Line::default()));
            self.lines += 1;
        }
    }

    fn flush(&mut self) {
        self.chunks.push(Chunk::Flush);
    }

    /// Finish an opening line and indent the list that follows.
    fn open(&mut self) {
        self.newline();
        self.flush();
        self.indent += 1;
    }

    fn close(&mut self) {
        self.flush();
        self.indent = self.indent.saturating_sub(1);
    }

    fn line_width(&self) -> usize {
        self.cells.iter().map(|c| c.text.chars().count() + 1).sum::<usize>()
            + self.cur.chars().count()
    }

    fn comment_line(&mut self, text: &str) {
        self.write(text);
        self.newline();
    }

    fn trailing(&mut self, comment: Option<&str>) {
        if let Some(comment) = comment {
            self.tab();
            self.write(comment);
        }
    }

    fn item_prefix<T>(&mut self, item: &Item<T>, first: bool, force_blank: bool) {
        let mut suppress = first;
        let mut force = force_blank;
        for comment in &item.leading {
            if force || (comment.blank_before && !suppress) {
                self.blank_line();
            }
            force = false;
            suppress = false;
            self.comment_line(&comment.text);
        }
        if force || (item.blank_before && !suppress) {
            self.blank_line();
        }
    }

    fn closing_comments(&mut self, comments: &[CommentLine], empty: bool) {
        for (i, comment) in comments.iter().enumerate() {
            if comment.blank_before && !(empty && i == 0) {
                self.blank_line();
            }
            self.comment_line(&comment.text);
        }
    }

    // ---------------------------------------------------------------------
    // File structure
    // ---------------------------------------------------------------------

    fn file(&mut self, file: &SourceFile) {
        for (i, comment) in file.header.iter().enumerate() {
            if comment.blank_before && i > 0 {
                self.blank_line();
            }
            self.comment_line(&comment.text);
        }
        if !file.header.is_empty() && file.package_blank {
            self.blank_line();
        }
        self.write("package ");
        self.write(&file.package);
        self.newline();

        self.imports(&file.imports);

        let mut prev = None;
        for item in &file.decls {
            let kind = decl_kind(&item.node);
            let doc = !item.leading.is_empty() && !item.blank_before;
            let force = prev.is_none() || prev != Some(kind) || doc;
            self.item_prefix(item, false, force);
            let before = self.lines;
            self.decl(&item.node);
            self.trailing(item.trailing.as_deref());
            self.newline();
            if self.lines - before > 1 {
                self.flush();
            }
            prev = Some(kind);
        }

        for comment in &file.trailing {
            if comment.blank_before {
                self.blank_line();
            }
            self.comment_line(&comment.text);
        }
    }

    fn imports(&mut self, groups: &[Vec<Item<ImportSpec>>]) {
        let mut seen = HashSet::new();
        let groups: Vec<Vec<&Item<ImportSpec>>> = groups
            .iter()
            .map(|group| {
                let mut specs: Vec<&Item<ImportSpec>> = group.iter().collect();
                specs.sort_by(|a, b| {
                    (&a.node.path, &a.node.name).cmp(&(&b.node.path, &b.node.name))
                });
                specs.retain(|&item| seen.insert(&item.node) || !item.leading.is_empty());
                specs
            })
            .filter(|specs| !specs.is_empty())
            .collect();

        let total: usize = groups.iter().map(Vec::len).sum();
        if total == 0 {
            return;
        }
        self.blank_line();

        if total == 1 {
            let item = groups[0][0];
            for comment in &item.leading {
                self.comment_line(&comment.text);
            }
            self.write("import ");
            self.import_spec(&item.node);
            self.trailing(item.trailing.as_deref());
            self.newline();
            return;
        }

        self.write("import (");
        self.open();
        for (g, group) in groups.iter().enumerate() {
            if g > 0 {
                self.blank_line();
            }
            for item in group {
                for comment in &item.leading {
                    self.comment_line(&comment.text);
                }
                self.import_spec(&item.node);
                self.trailing(item.trailing.as_deref());
                self.newline();
            }
        }
        self.close();
        self.write(")");
        self.newline();
    }

    fn import_spec(&mut self, spec: &ImportSpec) {
        if let Some(name) = &spec.name {
            self.write(name);
            self.write(" ");
        }
        self.write(&spec.path);
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Func(func) => self.func_decl(func),
            Decl::Gen(decl) => self.gen_decl(decl),
        }
    }

    fn func_decl(&mut self, func: &FuncDecl) {
        let start = self.line_width();
        self.write("func ");
        if let Some(recv) = &func.recv {
            self.write("(");
            self.param_groups(recv);
            self.write(") ");
        }
        self.write(&func.name);
        self.signature(&func.sig);
        if let Some(body) = &func.body {
            self.func_body(start, body, true);
        }
    }

    fn func_body(&mut self, start: usize, body: &Block, align: bool) {
        let header = self.line_width().saturating_sub(start);
        if let Some(inline) = self.one_line_body(body) {
            if header + inline.chars().count() <= ONE_LINE_FUNC_MAX {
                if align {
                    self.cell();
                } else {
                    self.write(" ");
                }
                if inline.is_empty() {
                    self.write("{}");
                } else {
                    self.write("{ ");
                    self.write(&inline);
                    self.write(" }");
                }
                return;
            }
        }
        self.write(" ");
        self.block(body);
    }

    fn one_line_body(&self, body: &Block) -> Option<String> {
        let simple = body.one_line
            && body.closing.is_empty()
            && body.stmts.len() <= 5
            && body
                .stmts
                .iter()
                .all(|s| s.leading.is_empty() && s.trailing.is_none());
        if !simple {
            return None;
        }
        let mut sub = Printer::default();
        for (i, stmt) in body.stmts.iter().enumerate() {
            if i > 0 {
                sub.write("; ");
            }
            sub.stmt(&stmt.node);
        }
        (sub.chunks.is_empty() && sub.cells.is_empty()).then_some(sub.cur)
    }

    fn gen_decl(&mut self, decl: &GenDecl) {
        self.write(decl.kind.keyword());
        if !decl.grouped {
            self.write(" ");
            if let Some(spec) = decl.specs.first() {
                self.spec(&spec.node, false, false);
            }
            return;
        }
        if decl.specs.is_empty() && decl.closing.is_empty() {
            self.write(" ()");
            return;
        }

        let keep_type = decl
            .specs
            .iter()
            .any(|s| matches!(s.node, Spec::Value { ty: Some(_), .. }));
        self.write(" (");
        self.open();
        for (i, item) in decl.specs.iter().enumerate() {
            self.item_prefix(item, i == 0, false);
            let before = self.lines;
            let has_comment = item.trailing.is_some();
            self.spec(&item.node, true, keep_type);
            if has_comment {
                if let Spec::Value { .. } = item.node {
                    while self.cells.len() < 3 {
                        self.cell();
                    }
                    self.write(item.trailing.as_deref().unwrap_or_default());
                } else {
                    self.trailing(item.trailing.as_deref());
                }
            }
            self.newline();
            if self.lines - before > 1 {
                self.flush();
            }
        }
        self.closing_comments(&decl.closing, decl.specs.is_empty());
        self.close();
        self.write(")");
    }

    fn spec(&mut self, spec: &Spec, grouped: bool, keep_type: bool) {
        match spec {
            Spec::Type { name, alias, ty } => {
                self.write(name);
                if grouped {
                    self.cell();
                } else {
                    self.write(" ");
                }
                if *alias {
                    self.write("= ");
                }
                self.expr(ty);
            }
            Spec::Value { names, ty, values } => {
                self.write(&names.join(", "));
                if grouped {
                    if ty.is_some() || keep_type {
                        self.cell();
                    }
                    if let Some(ty) = ty {
                        self.expr(ty);
                    }
                    if !values.is_empty() {
                        self.cell();
                        self.write("= ");
                        self.expr_list(values, 1);
                    }
                } else {
                    if let Some(ty) = ty {
                        self.write(" ");
                        self.expr(ty);
                    }
                    if !values.is_empty() {
                        self.write(" = ");
                        self.expr_list(values, 1);
                    }
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Signatures
    // ---------------------------------------------------------------------

    fn signature(&mut self, sig: &Signature) {
        self.write("(");
        self.param_groups(&sig.params);
        self.write(")");
        match sig.results.as_slice() {
            [] => {}
            [result] if result.names.is_empty() => {
                self.write(" ");
                self.expr(&result.ty);
            }
            results => {
                self.write(" (");
                self.param_groups(results);
                self.write(")");
            }
        }
    }

    fn param_groups(&mut self, groups: &[ParamGroup]) {
        for (i, group) in groups.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if !group.names.is_empty() {
                self.write(&group.names.join(", "));
                self.write(" ");
            }
            if group.variadic {
                self.write("...");
            }
            self.expr(&group.ty);
        }
    }

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------

    fn block(&mut self, block: &Block) {
        self.write("{");
        self.open();
        self.stmt_list(&block.stmts);
        self.closing_comments(&block.closing, block.stmts.is_empty());
        self.close();
        self.write("}");
    }

    fn stmt_list(&mut self, stmts: &[Item<Stmt>]) {
        let mut first = true;
        for item in stmts {
            if item.node == Stmt::Empty && item.leading.is_empty() {
                continue;
            }
            self.item_prefix(item, first, false);
            first = false;
            let before = self.lines;
            self.stmt(&item.node);
            self.trailing(item.trailing.as_deref());
            self.newline();
            if self.lines - before > 1 {
                self.flush();
            }
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.expr0(expr, 1),
            Stmt::Assign { lhs, op, rhs } => {
                let depth = if lhs.len() > 1 && rhs.len() > 1 { 2 } else { 1 };
                self.expr_list(lhs, depth);
                self.write(" ");
                self.write(op);
                self.write(" ");
                self.expr_list(rhs, depth);
            }
            Stmt::IncDec { expr, op } => {
                self.expr0(expr, 2);
                self.write(op);
            }
            Stmt::Send { chan, value } => {
                self.expr0(chan, 1);
                self.write(" <- ");
                self.expr0(value, 1);
            }
            Stmt::Return(values) => {
                self.write("return");
                if !values.is_empty() {
                    self.write(" ");
                    self.expr_list(values, 1);
                }
            }
            Stmt::If(stmt) => self.if_stmt(stmt),
            Stmt::For(stmt) => self.for_stmt(stmt),
            Stmt::Block(block) => self.block(block),
            Stmt::Decl(decl) => self.gen_decl(decl),
            Stmt::Call { keyword, call } => {
                self.write(keyword);
                self.write(" ");
                self.expr(call);
            }
            Stmt::Branch(keyword) => self.write(keyword),
            Stmt::Empty => {}
        }
    }

    fn if_stmt(&mut self, stmt: &IfStmt) {
        self.write("if ");
        if let Some(init) = &stmt.init {
            self.stmt(init);
            self.write("; ");
        }
        self.expr(strip_parens(&stmt.cond));
        self.write(" ");
        self.block(&stmt.then);
        match stmt.otherwise.as_deref() {
            None => {}
            Some(Else::If(nested)) => {
                self.write(" else ");
                self.if_stmt(nested);
            }
            Some(Else::Block(block)) => {
                self.write(" else ");
                self.block(block);
            }
        }
    }

    fn for_stmt(&mut self, stmt: &ForStmt) {
        match stmt {
            ForStmt::Loop {
                init,
                cond,
                post,
                body,
            } => {
                self.write("for ");
                if init.is_none() && post.is_none() {
                    if let Some(cond) = cond {
                        self.expr(strip_parens(cond));
                        self.write(" ");
                    }
                } else {
                    if let Some(init) = init {
                        self.stmt(init);
                    }
                    self.write("; ");
                    if let Some(cond) = cond {
                        self.expr(strip_parens(cond));
                    }
                    self.write("; ");
                    if let Some(post) = post {
                        self.stmt(post);
                        self.write(" ");
                    }
                }
                self.block(body);
            }
            ForStmt::Range {
                key,
                value,
                define,
                expr,
                body,
            } => {
                self.write("for ");
                if let Some(key) = key {
                    self.expr(key);
                    if let Some(value) = value {
                        self.write(", ");
                        self.expr(value);
                    }
                    self.write(if *define { " := " } else { " = " });
                }
                self.write("range ");
                self.expr(strip_parens(expr));
                self.write(" ");
                self.block(body);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    fn expr(&mut self, x: &Expr) {
        self.expr1(x, 0, 1);
    }

    fn expr0(&mut self, x: &Expr, depth: usize) {
        self.expr1(x, 0, depth);
    }

    fn expr_list(&mut self, list: &[Expr], depth: usize) {
        for (i, x) in list.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.expr0(x, depth);
        }
    }

    fn expr1(&mut self, x: &Expr, prec1: u8, depth: usize) {
        match x {
            Expr::Ident(name) => self.write(name),
            Expr::BasicLit(lit) => self.write(lit),
            Expr::Binary(..) => {
                let depth = depth.max(1);
                self.binary(x, prec1, cutoff(x, depth), depth);
            }
            Expr::Star(inner) => {
                if UNARY_PREC < prec1 {
                    self.write("(*");
                    self.expr(inner);
                    self.write(")");
                } else {
                    self.write("*");
                    self.expr(inner);
                }
            }
            Expr::Unary(op, inner) => {
                if UNARY_PREC < prec1 {
                    self.write("(");
                    self.expr(x);
                    self.write(")");
                } else {
                    self.write(op);
                    if combines(op, inner) {
                        self.write(" ");
                    }
                    self.expr1(inner, UNARY_PREC, depth);
                }
            }
            Expr::FuncLit { sig, body } => {
                let start = self.line_width();
                self.write("func");
                self.signature(sig);
                self.func_body(start, body, false);
            }
            Expr::Paren(inner) => {
                if let Expr::Paren(_) = inner.as_ref() {
                    self.expr0(inner, depth);
                } else {
                    self.write("(");
                    self.expr0(inner, reduce_depth(depth));
                    self.write(")");
                }
            }
            Expr::Selector(inner, sel) => {
                self.expr1(inner, HIGHEST_PREC, depth);
                self.write(".");
                self.write(sel);
            }
            Expr::TypeAssert(inner, ty) => {
                self.expr1(inner, HIGHEST_PREC, depth);
                self.write(".(");
                self.expr(ty);
                self.write(")");
            }
            Expr::Index(inner, index) => {
                self.expr1(inner, HIGHEST_PREC, 1);
                self.write("[");
                self.expr0(index, depth + 1);
                self.write("]");
            }
            Expr::Slice {
                expr,
                low,
                high,
                max,
            } => self.slice(expr, [low, high, max], depth),
            Expr::Call {
                func,
                args,
                ellipsis,
                multiline,
            } => self.call(func, args, *ellipsis, *multiline, depth),
            Expr::Composite {
                ty,
                elems,
                multiline,
                closing,
            } => self.composite(ty.as_deref(), elems, *multiline, closing, depth),
            Expr::Array { len, elem } => {
                self.write("[");
                if let Some(len) = len {
                    self.expr(len);
                }
                self.write("]");
                self.expr(elem);
            }
            Expr::Ellipsis => self.write("..."),
            Expr::Map(key, value) => {
                self.write("map[");
                self.expr(key);
                self.write("]");
                self.expr(value);
            }
            Expr::Chan(dir, value) => {
                self.write(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.expr(value);
            }
            Expr::FuncType(sig) => {
                self.write("func");
                self.signature(sig);
            }
            Expr::Struct {
                fields,
                one_line,
                closing,
            } => self.struct_type(fields, *one_line, closing),
            Expr::Interface {
                elems,
                one_line,
                closing,
            } => self.interface_type(elems, *one_line, closing),
        }
    }

    fn binary(&mut self, x: &Expr, prec1: u8, cutoff: u8, depth: usize) {
        let Expr::Binary(op, lhs, rhs) = x else {
            return;
        };
        let prec = precedence(op);
        if prec < prec1 {
            self.write("(");
            self.expr0(x, reduce_depth(depth));
            self.write(")");
            return;
        }

        let blank = prec < cutoff;
        self.expr1(lhs, prec, depth + diff_prec(lhs, prec));
        if blank {
            self.write(" ");
        }
        self.write(op);
        if blank || splits(op, rhs, prec) {
            self.write(" ");
        }
        self.expr1(rhs, prec + 1, depth + 1);
    }

    fn slice(&mut self, x: &Expr, indices: [&Option<Box<Expr>>; 3], depth: usize) {
        self.expr1(x, HIGHEST_PREC, 1);
        self.write("[");
        let indices: &[&Option<Box<Expr>>] = if indices[2].is_some() {
            &indices
        } else {
            &indices[..2]
        };
        let needs_blanks = depth <= 1
            && indices.iter().filter(|i| i.is_some()).count() > 1
            && indices
                .iter()
                .any(|i| matches!(i.as_deref(), Some(Expr::Binary(..))));
        for (i, index) in indices.iter().enumerate() {
            if i > 0 {
                if indices[i - 1].is_some() && needs_blanks {
                    self.write(" ");
                }
                self.write(":");
                if index.is_some() && needs_blanks {
                    self.write(" ");
                }
            }
            if let Some(index) = index {
                self.expr0(index, depth + 1);
            }
        }
        self.write("]");
    }

    fn call(&mut self, func: &Expr, args: &[Expr], ellipsis: bool, multiline: bool, depth: usize) {
        let depth = if args.len() > 1 { depth + 1 } else { depth };
        if let Expr::FuncType(_) = func {
            self.write("(");
            self.expr1(func, HIGHEST_PREC, depth);
            self.write(")");
        } else {
            self.expr1(func, HIGHEST_PREC, depth);
        }
        self.write("(");

        if !multiline || args.is_empty() {
            self.expr_list(args, depth);
            if ellipsis {
                self.write("...");
            }
            self.write(")");
            return;
        }

        self.open();
        for (i, arg) in args.iter().enumerate() {
            let before = self.lines;
            self.expr0(arg, depth);
            if ellipsis && i + 1 == args.len() {
                self.write("...");
            }
            self.write(",");
            self.newline();
            if self.lines - before > 1 {
                self.flush();
            }
        }
        self.close();
        self.write(")");
    }

    fn composite(
        &mut self,
        ty: Option<&Expr>,
        elems: &[Item<Element>],
        multiline: bool,
        closing: &[CommentLine],
        depth: usize,
    ) {
        if let Some(ty) = ty {
            self.expr1(ty, HIGHEST_PREC, depth);
        }
        let multiline = multiline
            || !closing.is_empty()
            || elems
                .iter()
                .any(|e| !e.leading.is_empty() || e.trailing.is_some());

        if !multiline {
            self.write("{");
            for (i, item) in elems.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.element(&item.node, false);
            }
            self.write("}");
            return;
        }

        self.write("{");
        self.open();
        let align_keys = elems.len() > 1;
        for (i, item) in elems.iter().enumerate() {
            self.item_prefix(item, i == 0, false);
            let before = self.lines;
            self.element(&item.node, align_keys);
            self.write(",");
            self.trailing(item.trailing.as_deref());
            self.newline();
            if self.lines - before > 1 {
                self.flush();
            }
        }
        self.closing_comments(closing, elems.is_empty());
        self.close();
        self.write("}");
    }

    fn element(&mut self, element: &Element, align_keys: bool) {
        if let Some(key) = &element.key {
            self.expr(key);
            self.write(":");
            if align_keys {
                self.cell();
            } else {
                self.write(" ");
            }
            self.expr(&element.value);
        } else {
            self.expr0(&element.value, 1);
        }
    }

    fn struct_type(&mut self, fields: &[Item<FieldDecl>], one_line: bool, closing: &[CommentLine]) {
        if fields.is_empty() && closing.is_empty() {
            self.write("struct{}");
            return;
        }
        if one_line && closing.is_empty() {
            if let [field] = fields {
                if let Some(text) = self.one_line_field(field) {
                    self.write("struct{ ");
                    self.write(&text);
                    self.write(" }");
                    return;
                }
            }
        }

        self.write("struct {");
        self.open();
        for (i, item) in fields.iter().enumerate() {
            self.item_prefix(item, i == 0, false);
            let before = self.lines;
            self.field(&item.node, item.trailing.as_deref());
            self.newline();
            if self.lines - before > 1 {
                self.flush();
            }
        }
        self.closing_comments(closing, fields.is_empty());
        self.close();
        self.write("}");
    }

    fn one_line_field(&self, field: &Item<FieldDecl>) -> Option<String> {
        if field.node.tag.is_some()
            || field.trailing.is_some()
            || !field.leading.is_empty()
        {
            return None;
        }
        let mut sub = Printer::default();
        if !field.node.names.is_empty() {
            sub.write(&field.node.names.join(", "));
            sub.write(" ");
        }
        sub.expr(&field.node.ty);
        let fits = sub.chunks.is_empty() && sub.cur.chars().count() <= ONE_LINE_FIELD_MAX;
        fits.then_some(sub.cur)
    }

    fn field(&mut self, field: &FieldDecl, comment: Option<&str>) {
        if field.names.is_empty() {
            self.expr(&field.ty);
        } else {
            self.write(&field.names.join(", "));
            self.cell();
            self.expr(&field.ty);
        }
        if let Some(tag) = &field.tag {
            self.cell();
            self.write(tag);
        }
        if let Some(comment) = comment {
            if field.tag.is_some() {
                self.tab();
            } else {
                self.cell();
                if field.names.is_empty() {
                    self.cell();
                }
            }
            self.write(comment);
        }
    }

    fn interface_type(
        &mut self,
        elems: &[Item<InterfaceElem>],
        one_line: bool,
        closing: &[CommentLine],
    ) {
        if elems.is_empty() && closing.is_empty() {
            self.write("interface{}");
            return;
        }
        if one_line && closing.is_empty() {
            if let [elem] = elems {
                if elem.leading.is_empty() && elem.trailing.is_none() {
                    let mut sub = Printer::default();
                    sub.interface_elem(&elem.node);
                    if sub.chunks.is_empty() && sub.cur.chars().count() <= ONE_LINE_FIELD_MAX {
                        self.write("interface{ ");
                        self.write(&sub.cur);
                        self.write(" }");
                        return;
                    }
                }
            }
        }

        self.write("interface {");
        self.open();
        for (i, item) in elems.iter().enumerate() {
            self.item_prefix(item, i == 0, false);
            let before = self.lines;
            self.interface_elem(&item.node);
            self.trailing(item.trailing.as_deref());
            self.newline();
            if self.lines - before > 1 {
                self.flush();
            }
        }
        self.closing_comments(closing, elems.is_empty());
        self.close();
        self.write("}");
    }

    fn interface_elem(&mut self, elem: &InterfaceElem) {
        match elem {
            InterfaceElem::Method { name, sig } => {
                self.write(name);
                self.signature(sig);
            }
            InterfaceElem::Embedded(ty) => self.expr(ty),
        }
    }
}

fn decl_kind(decl: &Decl) -> DeclKind {
    match decl {
        Decl::Func(_) => DeclKind::Func,
        Decl::Gen(decl) => match decl.kind {
            GenKind::Type => DeclKind::Type,
            GenKind::Var => DeclKind::Var,
            GenKind::Const => DeclKind::Const,
        },
    }
}

fn reduce_depth(depth: usize) -> usize {
    depth.saturating_sub(1).max(1)
}

fn diff_prec(x: &Expr, prec: u8) -> usize {
    match x {
        Expr::Binary(op, ..) if precedence(op) == prec => 0,
        _ => 1,
    }
}

/// Operator classes present in a binary expression and the highest
/// precedence that must be spaced to keep adjacent tokens apart.
fn walk_binary(x: &Expr) -> (bool, bool, u8) {
    let Expr::Binary(op, lhs, rhs) = x else {
        return (false, false, 0);
    };
    let prec = precedence(op);
    let mut has4 = prec == 4;
    let mut has5 = prec == 5;
    let mut max_problem = 0;

    if let Expr::Binary(l, ..) = lhs.as_ref() {
        if precedence(l) >= prec {
            let (h4, h5, problem) = walk_binary(lhs);
            has4 |= h4;
            has5 |= h5;
            max_problem = max_problem.max(problem);
        }
    }

    match rhs.as_ref() {
        Expr::Binary(r, ..) if precedence(r) > prec => {
            let (h4, h5, problem) = walk_binary(rhs);
            has4 |= h4;
            has5 |= h5;
            max_problem = max_problem.max(problem);
        }
        Expr::Star(_) if op == "/" => max_problem = 5,
        Expr::Unary(r, _) => match format!("{op}{r}").as_str() {
            "/*" | "&&" | "&^" => max_problem = 5,
            "++" | "--" => max_problem = max_problem.max(4),
            _ => {}
        },
        _ => {}
    }
    (has4, has5, max_problem)
}

fn cutoff(x: &Expr, depth: usize) -> u8 {
    let (has4, has5, max_problem) = walk_binary(x);
    if max_problem > 0 {
        return max_problem + 1;
    }
    match (has4 && has5, depth == 1) {
        (true, true) => 5,
        (false, true) => 6,
        _ => 4,
    }
}

/// Whether a unary operator and its operand would lex as a different token.
fn combines(op: &str, operand: &Expr) -> bool {
    match operand {
        Expr::Unary(inner, _) => matches!(
            (op, inner.as_str()),
            ("-", "-") | ("+", "+") | ("&", "&") | ("&", "^") | ("<-", "-")
        ),
        _ => false,
    }
}

/// Whether a compact binary operator would merge with the first token of
/// its right operand.
fn splits(op: &str, rhs: &Expr, prec: u8) -> bool {
    if matches!(rhs, Expr::Binary(r, ..) if precedence(r) <= prec) {
        return false;
    }
    leading_op(rhs).is_some_and(|next| {
        matches!(
            (op, next),
            ("-", "-") | ("+", "+") | ("/", "*") | ("<", "-") | ("<", "<") | ("&", "&") | ("&", "^")
        )
    })
}

fn leading_op(x: &Expr) -> Option<&str> {
    match x {
        Expr::Unary(op, _) => Some(op.as_str()),
        Expr::Star(_) => Some("*"),
        Expr::Binary(op, lhs, _) => match lhs.as_ref() {
            Expr::Binary(l, ..) if precedence(l) < precedence(op) => None,
            _ => leading_op(lhs),
        },
        _ => None,
    }
}

/// Drop redundant parentheses around a control clause expression unless
/// they protect a composite literal.
fn strip_parens(x: &Expr) -> &Expr {
    match x {
        Expr::Paren(inner) if !has_named_composite(inner) => strip_parens(inner),
        _ => x,
    }
}

fn has_named_composite(x: &Expr) -> bool {
    match x {
        Expr::Paren(_) => false,
        Expr::Composite { ty, .. } => {
            matches!(ty.as_deref(), Some(Expr::Ident(_) | Expr::Selector(..)))
        }
        Expr::Binary(_, lhs, rhs) => has_named_composite(lhs) || has_named_composite(rhs),
        Expr::Unary(_, inner)
        | Expr::Star(inner)
        | Expr::Selector(inner, _)
        | Expr::TypeAssert(inner, _) => has_named_composite(inner),
        Expr::Index(inner, index) => has_named_composite(inner) || has_named_composite(index),
        Expr::Call { func, args, .. } => {
            has_named_composite(func) || args.iter().any(has_named_composite)
        }
        Expr::Slice {
            expr,
            low,
            high,
            max,
        } => {
            has_named_composite(expr)
                || [low, high, max]
                    .into_iter()
                    .flatten()
                    .any(|x| has_named_composite(x))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::parser::parse;

    fn fmt(src: &str) -> String {
        print(&parse(src).unwrap_or_else(|err| panic!("{err:?}")))
    }

    fn fmt_body(body: &str) -> String {
        let out = fmt(&format!("package a\n\nfunc f() {{\n{body}\n}}\n"));
        let start = out.find("{\n").map_or(0, |i| i + 2);
        let end = out.rfind('}').unwrap_or(out.len());
        out[start..end].to_string()
    }

    #[test]
    fn test_binary_spacing_by_depth() {
        assert_eq!(fmt_body("x = a + b*c"), "\tx = a + b*c\n");
        assert_eq!(fmt_body("x = a+b"), "\tx = a + b\n");
        assert_eq!(fmt_body("f(a + b, c)"), "\tf(a+b, c)\n");
        assert_eq!(fmt_body("f(a + b)"), "\tf(a + b)\n");
        assert_eq!(fmt_body("x = a*b + c*d"), "\tx = a*b + c*d\n");
    }

    #[test]
    fn test_compact_operator_keeps_tokens_apart() {
        assert_eq!(fmt_body("f(a - -5*b, c)"), "\tf(a- -5*b, c)\n");
        assert_eq!(fmt_body("f(a - (-5), c)"), "\tf(a-(-5), c)\n");
        assert_eq!(fmt_body("f(a < -5, c)"), "\tf(a < -5, c)\n");
    }

    #[test]
    fn test_logical_operators_keep_blanks() {
        assert_eq!(
            fmt_body("if e:=f();errors.As(err,&e)&&e.Ok() {\nreturn\n}"),
            "\tif e := f(); errors.As(err, &e) && e.Ok() {\n\t\treturn\n\t}\n"
        );
    }

    #[test]
    fn test_strips_condition_parens() {
        assert_eq!(
            fmt_body("if (x > 1) {\n}"),
            "\tif x > 1 {\n\t}\n"
        );
    }

    #[test]
    fn test_keeps_parens_around_composite_condition() {
        assert_eq!(
            fmt_body("if (T{} == t) {\n}"),
            "\tif (T{} == t) {\n\t}\n"
        );
    }

    #[test]
    fn test_aligns_keyed_elements() {
        assert_eq!(
            fmt_body("return &R{\nErr: err,\nResponse: response,\n}, nil"),
            "\treturn &R{\n\t\tErr:      err,\n\t\tResponse: response,\n\t}, nil\n"
        );
    }

    #[test]
    fn test_single_keyed_element_is_not_aligned() {
        assert_eq!(fmt_body("return &R{\nErr:   err,\n}"), "\treturn &R{\n\t\tErr: err,\n\t}\n");
    }

    #[test]
    fn test_struct_fields_and_comments() {
        let out = fmt("package a\n\ntype T struct {\nA int // a\nLonger string `json:\"l\"`\n}\n");
        assert_eq!(
            out,
            "package a\n\ntype T struct {\n\tA      int    // a\n\tLonger string `json:\"l\"`\n}\n"
        );
    }

    #[test]
    fn test_one_line_struct() {
        assert_eq!(
            fmt("package a\n\nvar x struct{ A int }\n"),
            "package a\n\nvar x struct{ A int }\n"
        );
        assert_eq!(
            fmt("package a\n\nvar x struct{ A int; B int }\n"),
            "package a\n\nvar x struct {\n\tA int\n\tB int\n}\n"
        );
    }

    #[test]
    fn test_one_line_funcs_align() {
        let out = fmt("package a\n\nfunc (s S) Len() int { return len(s) }\nfunc (s S) Swap(i, j int) { s[i], s[j] = s[j], s[i] }\n");
        assert_eq!(
            out,
            "package a\n\nfunc (s S) Len() int      { return len(s) }\nfunc (s S) Swap(i, j int) { s[i], s[j] = s[j], s[i] }\n"
        );
    }

    #[test]
    fn test_empty_block_spans_lines() {
        assert_eq!(fmt("package a\nfunc f() {\n}\n"), "package a\n\nfunc f() {\n}\n");
        assert_eq!(fmt("package a\nfunc f() {}\n"), "package a\n\nfunc f() {}\n");
    }

    #[test]
    fn test_blank_lines_collapse() {
        assert_eq!(
            fmt_body("a()\n\n\n\nb()"),
            "\ta()\n\n\tb()\n"
        );
    }

    #[test]
    fn test_import_groups_sorted() {
        let out = fmt("package a\n\nimport (\n\"z\"\n\"b\"\n\n\"y\"\n\"b\"\n)\n");
        assert_eq!(out, "package a\n\nimport (\n\t\"b\"\n\t\"z\"\n\n\t\"y\"\n)\n");
    }

    #[test]
    fn test_adjacent_import_decls_merge() {
        let out = fmt("package a\n\nimport \"fmt\"\nimport \"context\"\nimport \"fmt\"\n");
        assert_eq!(out, "package a\n\nimport (\n\t\"context\"\n\t\"fmt\"\n)\n");

        let out = fmt("package a\n\nimport \"fmt\"\n\nimport (\n\t\"b\"\n\t\"fmt\"\n)\n");
        assert_eq!(out, "package a\n\nimport (\n\t\"fmt\"\n\n\t\"b\"\n)\n");
    }

    #[test]
    fn test_single_import_collapses() {
        let out = fmt("package a\n\nimport (\n\t\"context\"\n)\n");
        assert_eq!(out, "package a\n\nimport \"context\"\n");
    }

    #[test]
    fn test_decl_kinds_are_separated() {
        let out = fmt("package a\ntype A int\ntype B int\nvar x = 1\n");
        assert_eq!(out, "package a\n\ntype A int\ntype B int\n\nvar x = 1\n");
    }

    #[test]
    fn test_grouped_values() {
        let out = fmt("package a\n\nconst (\nA = 1\nLong = 2\n)\n");
        assert_eq!(out, "package a\n\nconst (\n\tA    = 1\n\tLong = 2\n)\n");
    }

    #[test]
    fn test_trailing_statement_comments_align() {
        assert_eq!(
            fmt_body("x := 1 // one\nlonger := 2 // two"),
            "\tx := 1      // one\n\tlonger := 2 // two\n"
        );
    }

    #[test]
    fn test_inner_comment_stays_on_its_line() {
        assert_eq!(
            fmt_body("x := f(a /* c */, b)\ny()"),
            "\tx := f(a, b) /* c */\n\ty()\n"
        );
        assert_eq!(
            fmt_body("x := f(a /* c */, b) // d"),
            "\tx := f(a, b) /* c */ // d\n"
        );
    }

    #[test]
    fn test_doc_comment_forces_blank() {
        let out = fmt("package a\nvar a = 1\n// B is documented.\nvar b = 2\n");
        assert_eq!(out, "package a\n\nvar a = 1\n\n// B is documented.\nvar b = 2\n");
    }
}
