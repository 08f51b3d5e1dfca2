//! Recursive descent parser for the supported Go subset.

use super::{
    SyntaxErr,
    ast::*,
    lexer::{Comment, Kind, Lexer, Token},
};

type PResult<T> = Result<T, SyntaxErr>;

const ASSIGN_OPS: &[&str] = &[
    "=", ":=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", "&^=",
];

/// Parse a complete source file.
pub fn parse(src: &str) -> PResult<SourceFile> {
    let (tokens, comments) = Lexer::new(src).tokenize()?;
    Parser::new(src, tokens, comments).file()
}

enum ParamEntry {
    Named(String, Expr, bool),
    Name(String),
    Type(Expr, bool),
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    comments: Vec<Comment>,
    next_comment: usize,
    line_starts: Vec<usize>,
    /// Negative inside control clauses, where `T {` starts a block.
    expr_lev: i32,
    /// End offset of the last consumed token that is not a semicolon.
    prev_end: usize,
    /// Last source line occupied by the current list.
    last_line: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, tokens: Vec<Token>, comments: Vec<Comment>) -> Self {
        let line_starts = std::iter::once(0)
            .chain(src.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            src,
            tokens,
            pos: 0,
            comments,
            next_comment: 0,
            line_starts,
            expr_lev: 0,
            prev_end: 0,
            last_line: 0,
        }
    }

    // ---------------------------------------------------------------------
    // Token helpers
    // ---------------------------------------------------------------------

    fn tok(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn text(&self) -> &'a str {
        let tok = self.tok();
        &self.src[tok.start..tok.end]
    }

    /// Whether the current token is the operator or keyword `s`.
    fn is(&self, s: &str) -> bool {
        matches!(self.tok().kind, Kind::Op | Kind::Keyword) && self.text() == s
    }

    fn is_semi(&self) -> bool {
        matches!(self.tok().kind, Kind::Semi { .. })
    }

    fn is_eof(&self) -> bool {
        self.tok().kind == Kind::Eof
    }

    fn next(&mut self) -> Token {
        let tok = self.tok();
        if !matches!(tok.kind, Kind::Semi { .. } | Kind::Eof) {
            self.prev_end = tok.end;
        }
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn found(&self) -> String {
        let tok = self.tok();
        match tok.kind {
            Kind::Semi { implicit: true } if tok.start >= self.src.len() => "'EOF'".to_string(),
            Kind::Semi { implicit: true } => "newline".to_string(),
            Kind::Eof => "'EOF'".to_string(),
            Kind::Ident | Kind::Int | Kind::Float | Kind::Imag | Kind::Char | Kind::String => {
                self.text().to_string()
            }
            _ => format!("'{}'", self.text()),
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxErr {
        SyntaxErr::new(message, self.tok().start)
    }

    fn error_expected(&self, what: &str) -> SyntaxErr {
        self.error(format!("expected {what}, found {}", self.found()))
    }

    fn expect(&mut self, s: &str) -> PResult<Token> {
        if self.is(s) {
            Ok(self.next())
        } else {
            Err(self.error_expected(&format!("'{s}'")))
        }
    }

    /// Expect a closing delimiter of a list that may span lines.
    fn expect_closing(&mut self, s: &str, context: &str) -> PResult<Token> {
        if self.tok().kind == (Kind::Semi { implicit: true }) {
            return Err(self.error(format!("missing ',' before newline in {context}")));
        }
        self.expect(s)
    }

    fn expect_semi(&mut self) -> PResult<()> {
        if self.is_semi() {
            self.next();
            Ok(())
        } else if self.is(")") || self.is("}") || self.is_eof() {
            Ok(())
        } else {
            Err(self.error_expected("';'"))
        }
    }

    fn expect_ident(&mut self) -> PResult<String> {
        if self.tok().kind == Kind::Ident {
            let name = self.text().to_string();
            self.next();
            Ok(name)
        } else {
            Err(self.error_expected("'IDENT'"))
        }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    fn end_line(&self, end: usize) -> usize {
        self.line_of(end.saturating_sub(1))
    }

    // ---------------------------------------------------------------------
    // Comments
    // ---------------------------------------------------------------------

    /// Take the comments before `start` and report whether a blank line
    /// precedes the entry starting there.
    fn leading(&mut self, start: usize) -> (Vec<CommentLine>, bool) {
        let mut comments = Vec::new();
        while let Some(comment) = self.comments.get(self.next_comment) {
            if comment.start >= start {
                break;
            }
            let line = self.line_of(comment.start);
            comments.push(CommentLine {
                text: self.src[comment.start..comment.end].to_string(),
                blank_before: line > self.last_line + 1,
            });
            self.last_line = self.end_line(comment.end);
            self.next_comment += 1;
        }
        let blank = self.line_of(start) > self.last_line + 1;
        (comments, blank)
    }

    /// Take the comments following an entry ending at `end` on the same line.
    ///
    /// Comments left inside the entry, such as one between two call
    /// arguments, are taken first so they stay on the entry's line.
    fn trailing(&mut self, end: usize) -> Option<String> {
        let line = self.end_line(end);
        let limit = self.tok().start;
        let mut texts = Vec::new();
        let mut last_line = line;
        while let Some(comment) = self.comments.get(self.next_comment) {
            if comment.start < end {
                texts.push(self.src[comment.start..comment.end].to_string());
                self.next_comment += 1;
                continue;
            }
            if comment.start >= limit || self.line_of(comment.start) != line {
                break;
            }
            texts.push(self.src[comment.start..comment.end].to_string());
            last_line = self.end_line(comment.end);
            self.next_comment += 1;
        }
        self.last_line = last_line;
        (!texts.is_empty()).then(|| texts.join(" "))
    }

    fn open_list(&mut self, open: Token) {
        self.last_line = self.line_of(open.start);
    }

    // ---------------------------------------------------------------------
    // File structure
    // ---------------------------------------------------------------------

    fn file(mut self) -> PResult<SourceFile> {
        let (header, package_blank) = self.leading(self.tok().start);
        self.expect("package")?;
        let package = self.expect_ident()?;
        self.expect_semi()?;
        self.last_line = self.end_line(self.prev_end);

        let mut imports: Vec<Vec<Item<ImportSpec>>> = Vec::new();
        while self.is("import") {
            let (leading, blank) = self.leading(self.tok().start);
            self.import_decl(leading, blank, &mut imports)?;
        }

        let mut decls = Vec::new();
        while !self.is_eof() {
            if self.is_semi() {
                self.next();
                continue;
            }
            let (leading, blank_before) = self.leading(self.tok().start);
            let node = self.decl()?;
            let end = self.prev_end;
            self.expect_semi()?;
            let trailing = self.trailing(end);
            decls.push(Item {
                leading,
                blank_before,
                node,
                trailing,
            });
        }
        let (trailing, _) = self.leading(self.tok().start);

        Ok(SourceFile {
            header,
            package_blank,
            package,
            imports,
            decls,
            trailing,
        })
    }

    fn import_decl(
        &mut self,
        leading: Vec<CommentLine>,
        blank: bool,
        groups: &mut Vec<Vec<Item<ImportSpec>>>,
    ) -> PResult<()> {
        self.expect("import")?;
        let first = groups.len();
        let mut group = Vec::new();

        if self.is("(") {
            let open = self.next();
            self.open_list(open);
            let mut pending = leading;
            while !self.is(")") {
                let (mut comments, blank_before) = self.leading(self.tok().start);
                if !pending.is_empty() {
                    pending.append(&mut comments);
                    comments = std::mem::take(&mut pending);
                }
                let node = self.import_spec()?;
                let end = self.prev_end;
                if !self.is(")") {
                    self.expect_semi()?;
                }
                let trailing = self.trailing(end);
                if blank_before && !group.is_empty() {
                    groups.push(std::mem::take(&mut group));
                }
                group.push(Item {
                    leading: comments,
                    blank_before,
                    node,
                    trailing,
                });
            }
            let (closing, _) = self.leading(self.tok().start);
            if let Some(last) = group.last_mut() {
                last.trailing = join_comments(last.trailing.take(), &closing);
            }
            self.expect(")")?;
        } else {
            let node = self.import_spec()?;
            group.push(Item {
                leading,
                blank_before: blank,
                node,
                trailing: None,
            });
        }

        let end = self.prev_end;
        self.expect_semi()?;
        let trailing = self.trailing(end);
        if let Some(last) = group.last_mut() {
            if last.trailing.is_none() {
                last.trailing = trailing;
            }
        }
        if !group.is_empty() {
            groups.push(group);
        }
        // Adjacent declarations share a group.
        if !blank && first > 0 && groups.len() > first {
            let merged = groups.remove(first);
            groups[first - 1].extend(merged);
        }
        Ok(())
    }

    fn import_spec(&mut self) -> PResult<ImportSpec> {
        let name = match self.tok().kind {
            Kind::Ident => Some(self.expect_ident()?),
            Kind::Op if self.is(".") => {
                self.next();
                Some(".".to_string())
            }
            _ => None,
        };
        if self.tok().kind != Kind::String {
            return Err(self.error("missing import path"));
        }
        let path = self.text().to_string();
        self.next();
        Ok(ImportSpec { name, path })
    }

    fn decl(&mut self) -> PResult<Decl> {
        match self.text() {
            "func" if self.tok().kind == Kind::Keyword => Ok(Decl::Func(self.func_decl()?)),
            "type" | "var" | "const" if self.tok().kind == Kind::Keyword => {
                Ok(Decl::Gen(self.gen_decl()?))
            }
            "import" if self.tok().kind == Kind::Keyword => {
                Err(self.error("imports must appear before other declarations"))
            }
            _ => Err(self.error_expected("declaration")),
        }
    }

    fn func_decl(&mut self) -> PResult<FuncDecl> {
        self.expect("func")?;
        let recv = if self.is("(") {
            Some(self.params()?)
        } else {
            None
        };
        let name = self.expect_ident()?;
        if self.is("[") {
            return Err(self.error("generic functions are not supported"));
        }
        let sig = self.signature()?;
        let body = if self.is("{") {
            let lev = std::mem::replace(&mut self.expr_lev, 0);
            let body = self.block()?;
            self.expr_lev = lev;
            Some(body)
        } else {
            None
        };
        Ok(FuncDecl {
            recv,
            name,
            sig,
            body,
        })
    }

    fn gen_decl(&mut self) -> PResult<GenDecl> {
        let kind = match self.text() {
            "type" => GenKind::Type,
            "var" => GenKind::Var,
            _ => GenKind::Const,
        };
        self.next();

        if !self.is("(") {
            let spec = self.spec(kind)?;
            return Ok(GenDecl {
                kind,
                grouped: false,
                specs: vec![Item::new(spec)],
                closing: Vec::new(),
            });
        }

        let open = self.next();
        self.open_list(open);
        let mut specs = Vec::new();
        while !self.is(")") {
            let (leading, blank_before) = self.leading(self.tok().start);
            let node = self.spec(kind)?;
            let end = self.prev_end;
            if !self.is(")") {
                self.expect_semi()?;
            }
            let trailing = self.trailing(end);
            specs.push(Item {
                leading,
                blank_before,
                node,
                trailing,
            });
        }
        let (closing, _) = self.leading(self.tok().start);
        self.expect(")")?;
        Ok(GenDecl {
            kind,
            grouped: true,
            specs,
            closing,
        })
    }

    fn spec(&mut self, kind: GenKind) -> PResult<Spec> {
        if kind == GenKind::Type {
            let name = self.expect_ident()?;
            let alias = self.is("=");
            if alias {
                self.next();
            }
            let ty = self.ty()?;
            return Ok(Spec::Type { name, alias, ty });
        }

        let mut names = vec![self.expect_ident()?];
        while self.is(",") {
            self.next();
            names.push(self.expect_ident()?);
        }
        let ty = if !self.is("=") && !self.is_semi() && !self.is(")") {
            Some(self.ty()?)
        } else {
            None
        };
        let values = if self.is("=") {
            self.next();
            self.expr_list()?
        } else {
            Vec::new()
        };
        Ok(Spec::Value { names, ty, values })
    }

    // ---------------------------------------------------------------------
    // Types and signatures
    // ---------------------------------------------------------------------

    fn starts_type(&self) -> bool {
        match self.tok().kind {
            Kind::Ident => true,
            Kind::Op => matches!(self.text(), "*" | "[" | "(" | "<-"),
            Kind::Keyword => matches!(self.text(), "func" | "struct" | "map" | "chan" | "interface"),
            _ => false,
        }
    }

    fn type_name(&mut self) -> PResult<Expr> {
        let name = self.expect_ident()?;
        if self.is(".") {
            self.next();
            let sel = self.expect_ident()?;
            return Ok(Expr::Selector(Box::new(Expr::Ident(name)), sel));
        }
        Ok(Expr::Ident(name))
    }

    fn ty(&mut self) -> PResult<Expr> {
        match self.tok().kind {
            Kind::Ident => self.type_name(),
            Kind::Op => match self.text() {
                "*" => {
                    self.next();
                    Ok(Expr::Star(Box::new(self.ty()?)))
                }
                "(" => {
                    self.next();
                    let ty = self.ty()?;
                    self.expect(")")?;
                    Ok(Expr::Paren(Box::new(ty)))
                }
                "[" => self.array_type(),
                "<-" => {
                    self.next();
                    self.expect("chan")?;
                    Ok(Expr::Chan(ChanDir::Recv, Box::new(self.ty()?)))
                }
                _ => Err(self.error_expected("type")),
            },
            Kind::Keyword => match self.text() {
                "map" => {
                    self.next();
                    self.expect("[")?;
                    let key = self.ty()?;
                    self.expect("]")?;
                    let value = self.ty()?;
                    Ok(Expr::Map(Box::new(key), Box::new(value)))
                }
                "chan" => {
                    self.next();
                    let dir = if self.is("<-") {
                        self.next();
                        ChanDir::Send
                    } else {
                        ChanDir::Both
                    };
                    Ok(Expr::Chan(dir, Box::new(self.ty()?)))
                }
                "func" => {
                    self.next();
                    Ok(Expr::FuncType(self.signature()?))
                }
                "struct" => self.struct_type(),
                "interface" => self.interface_type(),
                _ => Err(self.error_expected("type")),
            },
            _ => Err(self.error_expected("type")),
        }
    }

    fn array_type(&mut self) -> PResult<Expr> {
        self.expect("[")?;
        let len = if self.is("]") {
            None
        } else if self.is("...") {
            self.next();
            Some(Box::new(Expr::Ellipsis))
        } else {
            self.expr_lev += 1;
            let len = self.expr()?;
            self.expr_lev -= 1;
            Some(Box::new(len))
        };
        self.expect("]")?;
        let elem = Box::new(self.ty()?);
        Ok(Expr::Array { len, elem })
    }

    fn struct_type(&mut self) -> PResult<Expr> {
        self.expect("struct")?;
        let open = self.expect("{")?;
        self.open_list(open);
        let mut fields = Vec::new();
        while !self.is("}") {
            let (leading, blank_before) = self.leading(self.tok().start);
            let node = self.field_decl()?;
            let end = self.prev_end;
            if !self.is("}") {
                self.expect_semi()?;
            }
            let trailing = self.trailing(end);
            fields.push(Item {
                leading,
                blank_before,
                node,
                trailing,
            });
        }
        let (closing, _) = self.leading(self.tok().start);
        let close = self.expect("}")?;
        let one_line = !fields.is_empty() && self.line_of(open.start) == self.line_of(close.start);
        Ok(Expr::Struct {
            fields,
            one_line,
            closing,
        })
    }

    fn field_decl(&mut self) -> PResult<FieldDecl> {
        let mut names = Vec::new();
        let ty = if self.is("*") {
            self.next();
            Expr::Star(Box::new(self.type_name()?))
        } else if self.tok().kind == Kind::Ident {
            let first = self.expect_ident()?;
            if self.is(".") {
                self.next();
                let sel = self.expect_ident()?;
                Expr::Selector(Box::new(Expr::Ident(first)), sel)
            } else if self.is_semi() || self.is("}") || self.tok().kind == Kind::String {
                Expr::Ident(first)
            } else {
                names.push(first);
                while self.is(",") {
                    self.next();
                    names.push(self.expect_ident()?);
                }
                self.ty()?
            }
        } else {
            return Err(self.error_expected("field name or embedded type"));
        };

        let tag = if self.tok().kind == Kind::String {
            let tag = self.text().to_string();
            self.next();
            Some(tag)
        } else {
            None
        };
        Ok(FieldDecl { names, ty, tag })
    }

    fn interface_type(&mut self) -> PResult<Expr> {
        self.expect("interface")?;
        let open = self.expect("{")?;
        self.open_list(open);
        let mut elems = Vec::new();
        while !self.is("}") {
            let (leading, blank_before) = self.leading(self.tok().start);
            if self.tok().kind != Kind::Ident {
                return Err(self.error("type constraints are not supported"));
            }
            let name = self.expect_ident()?;
            let node = if self.is("(") {
                InterfaceElem::Method {
                    name,
                    sig: self.signature()?,
                }
            } else if self.is(".") {
                self.next();
                let sel = self.expect_ident()?;
                InterfaceElem::Embedded(Expr::Selector(Box::new(Expr::Ident(name)), sel))
            } else {
                InterfaceElem::Embedded(Expr::Ident(name))
            };
            let end = self.prev_end;
            if !self.is("}") {
                self.expect_semi()?;
            }
            let trailing = self.trailing(end);
            elems.push(Item {
                leading,
                blank_before,
                node,
                trailing,
            });
        }
        let (closing, _) = self.leading(self.tok().start);
        let close = self.expect("}")?;
        let one_line = !elems.is_empty() && self.line_of(open.start) == self.line_of(close.start);
        Ok(Expr::Interface {
            elems,
            one_line,
            closing,
        })
    }

    fn signature(&mut self) -> PResult<Signature> {
        let params = self.params()?;
        let results = if self.is("(") {
            self.params()?
        } else if self.starts_type() {
            vec![ParamGroup {
                names: Vec::new(),
                ty: self.ty()?,
                variadic: false,
            }]
        } else {
            Vec::new()
        };
        Ok(Signature { params, results })
    }

    fn params(&mut self) -> PResult<Vec<ParamGroup>> {
        self.expect("(")?;
        let mut entries = Vec::new();
        while !self.is(")") {
            let entry = if self.tok().kind == Kind::Ident {
                let save = self.pos;
                let name = self.expect_ident()?;
                if self.is(".") {
                    self.pos = save;
                    ParamEntry::Type(self.ty()?, false)
                } else if self.is(",") || self.is(")") {
                    ParamEntry::Name(name)
                } else if self.is("...") {
                    self.next();
                    ParamEntry::Named(name, self.ty()?, true)
                } else {
                    ParamEntry::Named(name, self.ty()?, false)
                }
            } else if self.is("...") {
                self.next();
                ParamEntry::Type(self.ty()?, true)
            } else {
                ParamEntry::Type(self.ty()?, false)
            };
            entries.push(entry);
            if !self.is(",") {
                break;
            }
            self.next();
        }
        self.expect_closing(")", "parameter list")?;

        let named = entries.iter().any(|e| matches!(e, ParamEntry::Named(..)));
        if !named {
            return Ok(entries
                .into_iter()
                .map(|entry| match entry {
                    ParamEntry::Name(name) => (Expr::Ident(name), false),
                    ParamEntry::Type(ty, variadic) | ParamEntry::Named(_, ty, variadic) => {
                        (ty, variadic)
                    }
                })
                .map(|(ty, variadic)| ParamGroup {
                    names: Vec::new(),
                    ty,
                    variadic,
                })
                .collect());
        }

        let mut groups = Vec::new();
        let mut pending = Vec::new();
        for entry in entries {
            match entry {
                ParamEntry::Name(name) => pending.push(name),
                ParamEntry::Named(name, ty, variadic) => {
                    pending.push(name);
                    groups.push(ParamGroup {
                        names: std::mem::take(&mut pending),
                        ty,
                        variadic,
                    });
                }
                ParamEntry::Type(..) => {
                    return Err(SyntaxErr::new(
                        "mixed named and unnamed parameters",
                        self.prev_end,
                    ));
                }
            }
        }
        if !pending.is_empty() {
            return Err(SyntaxErr::new(
                "mixed named and unnamed parameters",
                self.prev_end,
            ));
        }
        Ok(groups)
    }

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------

    fn block(&mut self) -> PResult<Block> {
        let open = self.expect("{")?;
        self.open_list(open);
        let mut stmts = Vec::new();
        while !self.is("}") && !self.is_eof() {
            if self.tok().kind == (Kind::Semi { implicit: false }) {
                self.next();
                continue;
            }
            let (leading, blank_before) = self.leading(self.tok().start);
            let node = self.stmt()?;
            let end = self.prev_end;
            if !self.is("}") {
                self.expect_semi()?;
            }
            let trailing = self.trailing(end);
            stmts.push(Item {
                leading,
                blank_before,
                node,
                trailing,
            });
        }
        let (closing, _) = self.leading(self.tok().start);
        let close = self.expect("}")?;
        let one_line = self.line_of(open.start) == self.line_of(close.start);
        Ok(Block {
            stmts,
            one_line,
            closing,
        })
    }

    fn stmt(&mut self) -> PResult<Stmt> {
        let tok = self.tok();
        if tok.kind == Kind::Op && self.text() == "{" {
            return Ok(Stmt::Block(self.block()?));
        }
        if tok.kind != Kind::Keyword {
            return self.simple_stmt();
        }

        match self.text() {
            "return" => {
                self.next();
                if self.is_semi() || self.is("}") {
                    Ok(Stmt::Return(Vec::new()))
                } else {
                    Ok(Stmt::Return(self.expr_list()?))
                }
            }
            "if" => Ok(Stmt::If(self.if_stmt()?)),
            "for" => Ok(Stmt::For(self.for_stmt()?)),
            "go" | "defer" => {
                let keyword = if self.text() == "go" { "go" } else { "defer" };
                self.next();
                let call = self.expr()?;
                if !matches!(call, Expr::Call { .. }) {
                    return Err(SyntaxErr::new(
                        format!("expression in {keyword} must be function call"),
                        tok.end + 1,
                    ));
                }
                Ok(Stmt::Call { keyword, call })
            }
            "break" | "continue" => {
                let keyword = if self.text() == "break" { "break" } else { "continue" };
                self.next();
                if self.tok().kind == Kind::Ident {
                    return Err(self.error("labels are not supported"));
                }
                Ok(Stmt::Branch(keyword))
            }
            "var" | "const" | "type" => Ok(Stmt::Decl(self.gen_decl()?)),
            "func" | "struct" | "map" | "chan" | "interface" => self.simple_stmt(),
            other => Err(self.error(format!("unsupported statement '{other}'"))),
        }
    }

    fn simple_stmt(&mut self) -> PResult<Stmt> {
        let lhs = self.expr_list()?;
        self.simple_stmt_rest(lhs)
    }

    fn simple_stmt_rest(&mut self, mut lhs: Vec<Expr>) -> PResult<Stmt> {
        let text = self.text();
        if self.tok().kind == Kind::Op && ASSIGN_OPS.contains(&text) {
            let op = text.to_string();
            self.next();
            let rhs = self.expr_list()?;
            return Ok(Stmt::Assign { lhs, op, rhs });
        }

        if lhs.len() > 1 {
            return Err(self.error_expected("1 expression"));
        }
        let expr = lhs.remove(0);
        match text {
            "++" | "--" if self.tok().kind == Kind::Op => {
                let op = text.to_string();
                self.next();
                Ok(Stmt::IncDec { expr, op })
            }
            "<-" if self.tok().kind == Kind::Op => {
                self.next();
                let value = self.expr()?;
                Ok(Stmt::Send { chan: expr, value })
            }
            ":" if self.tok().kind == Kind::Op && matches!(expr, Expr::Ident(_)) => {
                Err(self.error("labels are not supported"))
            }
            _ => Ok(Stmt::Expr(expr)),
        }
    }

    fn if_stmt(&mut self) -> PResult<IfStmt> {
        self.expect("if")?;
        if self.is("{") {
            return Err(self.error("missing condition in if statement"));
        }

        let lev = std::mem::replace(&mut self.expr_lev, -1);
        let init = if self.is_semi() {
            None
        } else {
            Some(self.simple_stmt()?)
        };
        let (init, cond) = if self.is_semi() {
            if self.tok().kind == (Kind::Semi { implicit: true }) {
                return Err(self.error_expected("'{'"));
            }
            self.next();
            if self.is("{") {
                return Err(self.error("missing condition in if statement"));
            }
            (init, self.expr()?)
        } else {
            match init {
                Some(Stmt::Expr(cond)) => (None, cond),
                _ => return Err(self.error("cannot use statement as value")),
            }
        };
        self.expr_lev = lev;

        let then = self.block()?;
        let otherwise = if self.is("else") {
            self.next();
            if self.is("if") {
                Some(Box::new(Else::If(self.if_stmt()?)))
            } else if self.is("{") {
                Some(Box::new(Else::Block(self.block()?)))
            } else {
                return Err(self.error("else must be followed by if or statement block"));
            }
        } else {
            None
        };

        Ok(IfStmt {
            init: init.map(Box::new),
            cond,
            then,
            otherwise,
        })
    }

    fn for_stmt(&mut self) -> PResult<ForStmt> {
        self.expect("for")?;
        let lev = std::mem::replace(&mut self.expr_lev, -1);

        if self.is("{") {
            self.expr_lev = lev;
            let body = self.block()?;
            return Ok(ForStmt::Loop {
                init: None,
                cond: None,
                post: None,
                body,
            });
        }

        if self.is("range") {
            self.next();
            let expr = self.expr()?;
            self.expr_lev = lev;
            let body = self.block()?;
            return Ok(ForStmt::Range {
                key: None,
                value: None,
                define: false,
                expr,
                body,
            });
        }

        let init = if self.is_semi() {
            None
        } else {
            let lhs = self.expr_list()?;
            if (self.is(":=") || self.is("=")) && self.peek_is("range") {
                let define = self.is(":=");
                if lhs.len() > 2 {
                    return Err(self.error("range clause permits at most two iteration variables"));
                }
                self.next();
                self.next();
                let expr = self.expr()?;
                self.expr_lev = lev;
                let body = self.block()?;
                let mut vars = lhs.into_iter();
                return Ok(ForStmt::Range {
                    key: vars.next(),
                    value: vars.next(),
                    define,
                    expr,
                    body,
                });
            }
            Some(self.simple_stmt_rest(lhs)?)
        };

        let (init, cond, post) = if self.is("{") {
            match init {
                Some(Stmt::Expr(cond)) => (None, Some(cond), None),
                None => (None, None, None),
                Some(_) => return Err(self.error("expected for loop condition")),
            }
        } else {
            self.expect_for_semi()?;
            let cond = if self.is_semi() {
                None
            } else {
                Some(self.expr()?)
            };
            self.expect_for_semi()?;
            let post = if self.is("{") {
                None
            } else {
                Some(self.simple_stmt()?)
            };
            (init, cond, post)
        };

        self.expr_lev = lev;
        let body = self.block()?;
        Ok(ForStmt::Loop {
            init: init.map(Box::new),
            cond,
            post: post.map(Box::new),
            body,
        })
    }

    fn expect_for_semi(&mut self) -> PResult<()> {
        if self.tok().kind == (Kind::Semi { implicit: false }) {
            self.next();
            Ok(())
        } else {
            Err(self.error_expected("';'"))
        }
    }

    fn peek_is(&self, s: &str) -> bool {
        self.tokens
            .get(self.pos + 1)
            .is_some_and(|tok| tok.kind == Kind::Keyword && &self.src[tok.start..tok.end] == s)
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    fn expr_list(&mut self) -> PResult<Vec<Expr>> {
        let mut list = vec![self.expr()?];
        while self.is(",") {
            self.next();
            list.push(self.expr()?);
        }
        Ok(list)
    }

    fn expr(&mut self) -> PResult<Expr> {
        self.binary_expr(1)
    }

    fn binary_expr(&mut self, prec1: u8) -> PResult<Expr> {
        let mut x = self.unary_expr()?;
        loop {
            if self.tok().kind != Kind::Op {
                return Ok(x);
            }
            let op = self.text();
            let prec = precedence(op);
            if prec == 0 || prec < prec1 {
                return Ok(x);
            }
            self.next();
            let y = self.binary_expr(prec + 1)?;
            x = Expr::Binary(op.to_string(), Box::new(x), Box::new(y));
        }
    }

    fn unary_expr(&mut self) -> PResult<Expr> {
        if self.tok().kind == Kind::Op {
            match self.text() {
                op @ ("+" | "-" | "!" | "^" | "&") => {
                    self.next();
                    let x = self.unary_expr()?;
                    return Ok(Expr::Unary(op.to_string(), Box::new(x)));
                }
                "<-" => {
                    self.next();
                    if self.is("chan") {
                        self.next();
                        let elem = self.ty()?;
                        return self.primary_suffix(Expr::Chan(ChanDir::Recv, Box::new(elem)));
                    }
                    let x = self.unary_expr()?;
                    return Ok(Expr::Unary("<-".to_string(), Box::new(x)));
                }
                "*" => {
                    self.next();
                    let x = self.unary_expr()?;
                    return Ok(Expr::Star(Box::new(x)));
                }
                _ => {}
            }
        }
        self.primary_expr()
    }

    fn primary_expr(&mut self) -> PResult<Expr> {
        let x = self.operand()?;
        self.primary_suffix(x)
    }

    fn primary_suffix(&mut self, mut x: Expr) -> PResult<Expr> {
        loop {
            if self.tok().kind != Kind::Op {
                return Ok(x);
            }
            match self.text() {
                "." => {
                    self.next();
                    if self.tok().kind == Kind::Ident {
                        let sel = self.expect_ident()?;
                        x = Expr::Selector(Box::new(x), sel);
                    } else if self.is("(") {
                        self.next();
                        if self.is("type") {
                            return Err(self.error("type switches are not supported"));
                        }
                        let ty = self.ty()?;
                        self.expect(")")?;
                        x = Expr::TypeAssert(Box::new(x), Box::new(ty));
                    } else {
                        return Err(self.error_expected("selector or type assertion"));
                    }
                }
                "[" => x = self.index_or_slice(x)?,
                "(" => x = self.call(x)?,
                "{" if self.allows_composite(&x) => x = self.composite(Some(x))?,
                _ => return Ok(x),
            }
        }
    }

    fn allows_composite(&self, x: &Expr) -> bool {
        let mut inner = x;
        while let Expr::Paren(expr) = inner {
            inner = expr;
        }
        match inner {
            Expr::Ident(_) | Expr::Selector(..) => self.expr_lev >= 0,
            Expr::Array { .. } | Expr::Struct { .. } | Expr::Map(..) => true,
            _ => false,
        }
    }

    fn operand(&mut self) -> PResult<Expr> {
        let tok = self.tok();
        match tok.kind {
            Kind::Ident => Ok(Expr::Ident(self.expect_ident()?)),
            Kind::Int | Kind::Float | Kind::Imag | Kind::Char | Kind::String => {
                let lit = self.text().to_string();
                self.next();
                Ok(Expr::BasicLit(lit))
            }
            Kind::Op if self.text() == "(" => {
                self.next();
                self.expr_lev += 1;
                let x = if self.is("[") || self.is("*") || self.is("<-") {
                    self.expr()?
                } else if self.starts_type() && self.tok().kind == Kind::Keyword {
                    let ty = self.ty()?;
                    self.primary_suffix(ty)?
                } else {
                    self.expr()?
                };
                self.expr_lev -= 1;
                self.expect(")")?;
                Ok(Expr::Paren(Box::new(x)))
            }
            Kind::Op if self.text() == "[" => self.array_type(),
            Kind::Keyword if self.text() == "func" => {
                self.next();
                let sig = self.signature()?;
                if self.is("{") {
                    self.expr_lev += 1;
                    let body = self.block()?;
                    self.expr_lev -= 1;
                    Ok(Expr::FuncLit { sig, body })
                } else {
                    Ok(Expr::FuncType(sig))
                }
            }
            Kind::Keyword if matches!(self.text(), "struct" | "map" | "chan" | "interface") => {
                self.ty()
            }
            _ => Err(self.error_expected("operand")),
        }
    }

    fn index_or_slice(&mut self, x: Expr) -> PResult<Expr> {
        self.expect("[")?;
        self.expr_lev += 1;
        let mut index: [Option<Box<Expr>>; 3] = [None, None, None];
        let mut colons = 0;
        if !self.is(":") {
            index[0] = Some(Box::new(self.expr()?));
        }
        while self.is(":") && colons < 2 {
            colons += 1;
            self.next();
            if !self.is(":") && !self.is("]") {
                index[colons] = Some(Box::new(self.expr()?));
            }
        }
        if colons == 0 && self.is(",") {
            return Err(self.error("generic instantiation is not supported"));
        }
        self.expr_lev -= 1;
        self.expect("]")?;

        let [low, high, max] = index;
        if colons == 0 {
            let Some(index) = low else {
                return Err(self.error_expected("operand"));
            };
            return Ok(Expr::Index(Box::new(x), index));
        }
        if colons == 2 && (high.is_none() || max.is_none()) {
            return Err(self.error("middle and final index required in 3-index slice"));
        }
        Ok(Expr::Slice {
            expr: Box::new(x),
            low,
            high,
            max,
        })
    }

    fn call(&mut self, func: Expr) -> PResult<Expr> {
        let open = self.expect("(")?;
        self.expr_lev += 1;
        let mut args = Vec::new();
        let mut ellipsis = false;
        while !self.is(")") {
            args.push(self.expr()?);
            if self.is("...") {
                self.next();
                ellipsis = true;
            }
            if !self.is(",") {
                break;
            }
            self.next();
        }
        let last_end = self.prev_end;
        self.expr_lev -= 1;
        let close = self.expect_closing(")", "argument list")?;
        let multiline =
            !args.is_empty() && self.line_of(close.start) > self.end_line(last_end.max(open.end));
        Ok(Expr::Call {
            func: Box::new(func),
            args,
            ellipsis,
            multiline,
        })
    }

    fn composite(&mut self, ty: Option<Expr>) -> PResult<Expr> {
        let open = self.expect("{")?;
        self.open_list(open);
        self.expr_lev += 1;
        let mut elems = Vec::new();
        let mut last_end = open.end;
        while !self.is("}") {
            let (leading, blank_before) = self.leading(self.tok().start);
            let node = self.element()?;
            let end = self.prev_end;
            last_end = end;
            let comma = self.is(",");
            if comma {
                self.next();
            }
            let trailing = self.trailing(end);
            elems.push(Item {
                leading,
                blank_before,
                node,
                trailing,
            });
            if !comma {
                break;
            }
        }
        let (closing, _) = self.leading(self.tok().start);
        self.expr_lev -= 1;
        let close = self.expect_closing("}", "composite literal")?;
        let multiline = if elems.is_empty() {
            !closing.is_empty()
        } else {
            self.line_of(close.start) > self.end_line(last_end)
        };
        Ok(Expr::Composite {
            ty: ty.map(Box::new),
            elems,
            multiline,
            closing,
        })
    }

    fn element(&mut self) -> PResult<Element> {
        let first = self.element_value()?;
        if self.is(":") {
            self.next();
            let value = self.element_value()?;
            return Ok(Element {
                key: Some(first),
                value,
            });
        }
        Ok(Element {
            key: None,
            value: first,
        })
    }

    fn element_value(&mut self) -> PResult<Expr> {
        if self.is("{") {
            self.composite(None)
        } else {
            self.expr()
        }
    }
}

fn join_comments(trailing: Option<String>, extra: &[CommentLine]) -> Option<String> {
    let texts: Vec<&str> = trailing
        .as_deref()
        .into_iter()
        .chain(extra.iter().map(|c| c.text.as_str()))
        .collect();
    (!texts.is_empty()).then(|| texts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> SourceFile {
        parse(src).unwrap_or_else(|err| panic!("{err:?}"))
    }

    fn func_body(file: &SourceFile) -> &Block {
        match &file.decls[0].node {
            Decl::Func(FuncDecl { body: Some(body), .. }) => body,
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_package_and_imports() {
        let file = parse_ok("package a\n\nimport (\n\t\"b\"\n\n\tx \"c\"\n)\n");
        assert_eq!(file.package, "a");
        assert_eq!(file.imports.len(), 2);
        assert_eq!(file.imports[1][0].node.name.as_deref(), Some("x"));
    }

    #[test]
    fn test_if_condition_is_not_composite() {
        let file = parse_ok("package a\nfunc f() {\n\tif err != nil {\n\t\treturn\n\t}\n}\n");
        let body = func_body(&file);
        let Stmt::If(stmt) = &body.stmts[0].node else {
            panic!("expected if");
        };
        assert!(matches!(stmt.cond, Expr::Binary(ref op, ..) if op == "!="));
        assert_eq!(stmt.then.stmts.len(), 1);
    }

    #[test]
    fn test_if_with_init() {
        let file = parse_ok(
            "package a\nfunc f() {\n\tif e := g(nil); errors.As(err, &e) && e.Ok() {\n\t}\n}\n",
        );
        let Stmt::If(stmt) = &func_body(&file).stmts[0].node else {
            panic!("expected if");
        };
        assert!(matches!(stmt.init.as_deref(), Some(Stmt::Assign { op, .. }) if op == ":="));
    }

    #[test]
    fn test_grouped_params() {
        let file = parse_ok("package a\nfunc f(a, b int, c ...string) (x int, err error) {}\n");
        let Decl::Func(func) = &file.decls[0].node else {
            panic!("expected function");
        };
        assert_eq!(func.sig.params.len(), 2);
        assert_eq!(func.sig.params[0].names, ["a", "b"]);
        assert!(func.sig.params[1].variadic);
        assert_eq!(func.sig.results.len(), 2);
    }

    #[test]
    fn test_unnamed_params() {
        let file = parse_ok("package a\ntype F func(context.Context, int) error\n");
        let Decl::Gen(decl) = &file.decls[0].node else {
            panic!("expected type");
        };
        let Spec::Type { ty: Expr::FuncType(sig), .. } = &decl.specs[0].node else {
            panic!("expected func type");
        };
        assert!(sig.params.iter().all(|p| p.names.is_empty()));
        assert_eq!(sig.results.len(), 1);
    }

    #[test]
    fn test_comments_attach_to_items() {
        let file = parse_ok(
            "package a\n\ntype T struct {\n\t// doc\n\tA int // trailing\n\n\tB string\n}\n",
        );
        let Decl::Gen(decl) = &file.decls[0].node else {
            panic!("expected type");
        };
        let Spec::Type { ty: Expr::Struct { fields, .. }, .. } = &decl.specs[0].node else {
            panic!("expected struct");
        };
        assert_eq!(fields[0].leading[0].text, "// doc");
        assert_eq!(fields[0].trailing.as_deref(), Some("// trailing"));
        assert!(fields[1].blank_before);
    }

    #[test]
    fn test_multiline_composite() {
        let file = parse_ok("package a\nvar x = T{\n\tA: 1,\n}\nvar y = T{A: 1}\n");
        let multiline: Vec<bool> = file
            .decls
            .iter()
            .map(|decl| match &decl.node {
                Decl::Gen(GenDecl { specs, .. }) => match &specs[0].node {
                    Spec::Value { values, .. } => {
                        matches!(values[0], Expr::Composite { multiline: true, .. })
                    }
                    _ => false,
                },
                _ => false,
            })
            .collect();
        assert_eq!(multiline, [true, false]);
    }

    #[test]
    fn test_range_loop() {
        let file = parse_ok("package a\nfunc f() {\n\tfor k, v := range m {\n\t}\n}\n");
        assert!(matches!(
            func_body(&file).stmts[0].node,
            Stmt::For(ForStmt::Range { define: true, .. })
        ));
    }

    #[test]
    fn test_rejects_switch() {
        let err = parse("package a\nfunc f() {\n\tswitch {\n\t}\n}\n").unwrap_err();
        assert_eq!(err.message, "unsupported statement 'switch'");
    }

    #[test]
    fn test_missing_comma_in_call() {
        let err = parse("package a\nfunc f() {\n\tg(a\n\t)\n}\n").unwrap_err();
        assert_eq!(err.message, "missing ',' before newline in argument list");
    }

    #[test]
    fn test_missing_package() {
        let err = parse("func f() {}\n").unwrap_err();
        assert_eq!(err.message, "expected 'package', found 'func'");
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn test_keyword_as_identifier() {
        let err = parse("package a\nfunc type() {}\n").unwrap_err();
        assert_eq!(err.message, "expected 'IDENT', found 'type'");
    }
}
