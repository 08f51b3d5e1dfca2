//! Tokenizer with Go's automatic semicolon insertion.

use super::SyntaxErr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Ident,
    Keyword,
    Int,
    Float,
    Imag,
    Char,
    String,
    /// Operator or delimiter.
    Op,
    /// Explicit `;` or one inserted at a newline.
    Semi { implicit: bool },
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: Kind,
    pub start: usize,
    pub end: usize,
}

/// A `//` or `/* */` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub start: usize,
    pub end: usize,
}

const OPERATORS: &[&str] = &[
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^", "+", "-", "*", "/", "%", "&", "|",
    "^", "<", ">", "=", "!", "(", ")", "[", "]", "{", "}", ",", ";", ".", ":", "~",
];

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
    /// Whether a newline after the last token ends the statement.
    insert_semi: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            tokens: Vec::new(),
            comments: Vec::new(),
            insert_semi: false,
        }
    }

    /// Tokenize the whole input.
    pub fn tokenize(mut self) -> Result<(Vec<Token>, Vec<Comment>), SyntaxErr> {
        while let Some(c) = self.peek() {
            match c {
                '\n' => {
                    self.implicit_semi(self.pos);
                    self.pos += 1;
                }
                ' ' | '\t' | '\r' => self.pos += 1,
                '/' if self.rest().starts_with("//") => self.line_comment(),
                '/' if self.rest().starts_with("/*") => self.block_comment()?,
                c if is_letter(c) => self.ident(),
                c if c.is_ascii_digit() => self.number()?,
                '.' if self.rest()[1..].starts_with(|c: char| c.is_ascii_digit()) => self.number()?,
                '"' => self.string()?,
                '`' => self.raw_string()?,
                '\'' => self.char_lit()?,
                _ => self.operator()?,
            }
        }
        self.implicit_semi(self.pos);
        let end = self.pos;
        self.tokens.push(Token {
            kind: Kind::Eof,
            start: end,
            end,
        });
        Ok((self.tokens, self.comments))
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn push(&mut self, kind: Kind, start: usize) {
        self.tokens.push(Token {
            kind,
            start,
            end: self.pos,
        });
        self.insert_semi = match kind {
            Kind::Ident | Kind::Int | Kind::Float | Kind::Imag | Kind::Char | Kind::String => true,
            Kind::Keyword => matches!(
                &self.src[start..self.pos],
                "break" | "continue" | "fallthrough" | "return"
            ),
            Kind::Op => matches!(&self.src[start..self.pos], ")" | "]" | "}" | "++" | "--"),
            Kind::Semi { .. } | Kind::Eof => false,
        };
    }

    fn implicit_semi(&mut self, at: usize) {
        if self.insert_semi {
            self.tokens.push(Token {
                kind: Kind::Semi { implicit: true },
                start: at,
                end: at,
            });
            self.insert_semi = false;
        }
    }

    fn line_comment(&mut self) {
        let start = self.pos;
        let len = self.rest().find('\n').unwrap_or(self.rest().len());
        self.implicit_semi(start);
        self.pos += len;
        let end = trim_cr(self.src, start, self.pos);
        self.comments.push(Comment { start, end });
    }

    fn block_comment(&mut self) -> Result<(), SyntaxErr> {
        let start = self.pos;
        let Some(len) = self.rest()[2..].find("*/") else {
            return Err(SyntaxErr::new("comment not terminated", start));
        };
        self.pos += len + 4;
        if self.src[start..self.pos].contains('\n') {
            self.implicit_semi(start);
        }
        self.comments.push(Comment {
            start,
            end: self.pos,
        });
        Ok(())
    }

    fn ident(&mut self) {
        let start = self.pos;
        let len = self
            .rest()
            .find(|c: char| !(is_letter(c) || c.is_ascii_digit() || c.is_numeric()))
            .unwrap_or(self.rest().len());
        self.pos += len;
        let kind = if mga_core::is_keyword(&self.src[start..self.pos]) {
            Kind::Keyword
        } else {
            Kind::Ident
        };
        self.push(kind, start);
    }

    /// Scan a Go number literal: decimal, hexadecimal, octal or binary, with
    /// `_` separators, a fraction, an exponent and an optional `i` suffix.
    fn number(&mut self) -> Result<(), SyntaxErr> {
        let start = self.pos;
        let mut base = 10;
        let mut prefix = None;
        let mut digits = Digits::default();
        let mut float = false;

        if self.peek() != Some('.') {
            if self.peek() == Some('0') {
                self.pos += 1;
                match self.peek().map(|c| c.to_ascii_lowercase()) {
                    Some(p @ ('x' | 'o' | 'b')) => {
                        self.pos += 1;
                        base = match p {
                            'x' => 16,
                            'o' => 8,
                            _ => 2,
                        };
                        prefix = Some(p);
                    }
                    _ => {
                        base = 8;
                        prefix = Some('0');
                        digits.any = true;
                    }
                }
            }
            self.digits(base, &mut digits);
        }

        if self.peek() == Some('.') {
            if matches!(prefix, Some('o' | 'b')) {
                return Err(SyntaxErr::new(
                    format!("invalid radix point in {}", literal_name(prefix)),
                    self.pos,
                ));
            }
            float = true;
            self.pos += 1;
            self.digits(base, &mut digits);
        }

        if !digits.any {
            return Err(SyntaxErr::new(
                format!("{} has no digits", literal_name(prefix)),
                start,
            ));
        }

        match self.peek().map(|c| c.to_ascii_lowercase()) {
            Some(e @ ('e' | 'p')) => {
                if e == 'e' && matches!(prefix, Some('x' | 'o' | 'b')) {
                    return Err(SyntaxErr::new("'e' exponent requires decimal mantissa", self.pos));
                }
                if e == 'p' && prefix != Some('x') {
                    return Err(SyntaxErr::new(
                        "'p' exponent requires hexadecimal mantissa",
                        self.pos,
                    ));
                }
                self.pos += 1;
                float = true;
                if matches!(self.peek(), Some('+' | '-')) {
                    self.pos += 1;
                }
                let mut exponent = Digits::default();
                self.digits(10, &mut exponent);
                if !exponent.any {
                    return Err(SyntaxErr::new("exponent has no digits", self.pos));
                }
            }
            _ if prefix == Some('x') && float => {
                return Err(SyntaxErr::new(
                    "hexadecimal mantissa requires a 'p' exponent",
                    self.pos,
                ));
            }
            _ => {}
        }

        let imag = self.peek() == Some('i');
        if imag {
            self.pos += 1;
        }

        if let Some((offset, digit)) = digits.invalid {
            if !float && !imag {
                return Err(SyntaxErr::new(
                    format!("invalid digit '{digit}' in {}", literal_name(prefix)),
                    offset,
                ));
            }
        }

        let literal = &self.src[start..self.pos];
        if literal.contains('_') {
            if let Some(i) = invalid_separator(literal) {
                return Err(SyntaxErr::new("'_' must separate successive digits", start + i));
            }
        }

        if let Some(c) = self.peek().filter(|&c| is_letter(c) || c.is_ascii_digit() || c == '.') {
            return Err(SyntaxErr::new(
                format!("invalid character '{c}' after number literal"),
                self.pos,
            ));
        }

        let kind = if imag {
            Kind::Imag
        } else if float {
            Kind::Float
        } else {
            Kind::Int
        };
        self.push(kind, start);
        Ok(())
    }

    /// Consume digits and `_` separators. Bases up to ten accept every
    /// decimal digit and record the first one out of range.
    fn digits(&mut self, base: u32, digits: &mut Digits) {
        while let Some(c) = self.peek() {
            if c == '_' {
                self.pos += 1;
                continue;
            }
            let valid = if base <= 10 {
                c.is_ascii_digit()
            } else {
                c.is_ascii_hexdigit()
            };
            if !valid {
                break;
            }
            if c.to_digit(10).is_some_and(|d| d >= base) && digits.invalid.is_none() {
                digits.invalid = Some((self.pos, c));
            }
            digits.any = true;
            self.pos += 1;
        }
    }

    fn string(&mut self) -> Result<(), SyntaxErr> {
        let start = self.pos;
        self.quoted('"', "string literal not terminated")?;
        self.push(Kind::String, start);
        Ok(())
    }

    fn char_lit(&mut self) -> Result<(), SyntaxErr> {
        let start = self.pos;
        self.quoted('\'', "rune literal not terminated")?;
        self.push(Kind::Char, start);
        Ok(())
    }

    fn quoted(&mut self, quote: char, message: &str) -> Result<(), SyntaxErr> {
        let start = self.pos;
        let mut chars = self.rest().char_indices().skip(1);
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '\n' => break,
                c if c == quote => {
                    self.pos += i + 1;
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(SyntaxErr::new(message, start))
    }

    fn raw_string(&mut self) -> Result<(), SyntaxErr> {
        let start = self.pos;
        let Some(len) = self.rest()[1..].find('`') else {
            return Err(SyntaxErr::new("raw string literal not terminated", start));
        };
        self.pos += len + 2;
        self.push(Kind::String, start);
        Ok(())
    }

    fn operator(&mut self) -> Result<(), SyntaxErr> {
        let start = self.pos;
        let Some(op) = OPERATORS.iter().find(|op| self.rest().starts_with(**op)) else {
            let c = self.peek().unwrap_or_default();
            return Err(SyntaxErr::new(
                format!("invalid character U+{:04X} '{c}'", c as u32),
                start,
            ));
        };
        self.pos += op.len();
        if *op == ";" {
            self.push(Kind::Semi { implicit: false }, start);
        } else {
            self.push(Kind::Op, start);
        }
        Ok(())
    }
}

#[derive(Default)]
struct Digits {
    any: bool,
    /// Offset and value of the first digit outside the literal's base.
    invalid: Option<(usize, char)>,
}

fn literal_name(prefix: Option<char>) -> &'static str {
    match prefix {
        Some('x') => "hexadecimal literal",
        Some('o' | '0') => "octal literal",
        Some('b') => "binary literal",
        _ => "decimal literal",
    }
}

/// Index of the first `_` that does not sit between two digits (a base
/// prefix counts as a digit).
fn invalid_separator(literal: &str) -> Option<usize> {
    let bytes = literal.as_bytes();
    let mut hex = false;
    // '0' for a digit, '_' for a separator, '.' for anything else
    let mut prev = b'.';
    let mut i = 0;
    if bytes.len() >= 2 && bytes[0] == b'0' {
        let p = bytes[1].to_ascii_lowercase();
        if matches!(p, b'x' | b'o' | b'b') {
            hex = p == b'x';
            prev = b'0';
            i = 2;
        }
    }
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'_' {
            if prev != b'0' {
                return Some(i);
            }
            prev = b'_';
        } else if b.is_ascii_digit() || (hex && b.is_ascii_hexdigit()) {
            prev = b'0';
        } else {
            if prev == b'_' {
                return Some(i - 1);
            }
            prev = b'.';
        }
        i += 1;
    }
    (prev == b'_').then(|| bytes.len() - 1)
}

fn is_letter(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn trim_cr(src: &str, start: usize, end: usize) -> usize {
    if src[start..end].ends_with('\r') { end - 1 } else { end }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(Kind, &str)> {
        let (tokens, _) = Lexer::new(src).tokenize().unwrap();
        tokens
            .iter()
            .map(|t| (t.kind, &src[t.start..t.end]))
            .collect()
    }

    #[test]
    fn test_semicolon_insertion() {
        let tokens = kinds("return x\n}\n");
        assert_eq!(
            tokens,
            [
                (Kind::Keyword, "return"),
                (Kind::Ident, "x"),
                (Kind::Semi { implicit: true }, ""),
                (Kind::Op, "}"),
                (Kind::Semi { implicit: true }, ""),
                (Kind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_operator() {
        let tokens = kinds("a &&\nb");
        assert_eq!(
            tokens,
            [
                (Kind::Ident, "a"),
                (Kind::Op, "&&"),
                (Kind::Ident, "b"),
                (Kind::Semi { implicit: true }, ""),
                (Kind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_semicolon_before_line_comment() {
        let (tokens, comments) = Lexer::new("x++ // done\n").tokenize().unwrap();
        assert_eq!(tokens[2].kind, Kind::Semi { implicit: true });
        assert_eq!(tokens[2].start, 4);
        assert_eq!(comments, [Comment { start: 4, end: 11 }]);
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_literals() {
        let tokens = kinds("1 0x1F 1.5e-3 2i 'a' \"s\\\"\" `raw\nstring`");
        let literal_kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            literal_kinds,
            [
                Kind::Int,
                Kind::Int,
                Kind::Float,
                Kind::Imag,
                Kind::Char,
                Kind::String,
                Kind::String,
                Kind::Semi { implicit: true },
                Kind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_forms() {
        let tokens = kinds("0b1010 0o17 017 1_000 0x_1F 0x1p-2 .5 1. 09.5 0i 1e+10i");
        let literal_kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            literal_kinds,
            [
                Kind::Int,
                Kind::Int,
                Kind::Int,
                Kind::Int,
                Kind::Int,
                Kind::Float,
                Kind::Float,
                Kind::Float,
                Kind::Float,
                Kind::Imag,
                Kind::Imag,
                Kind::Semi { implicit: true },
                Kind::Eof,
            ]
        );
        assert_eq!(tokens[5].1, "0x1p-2");
    }

    #[test]
    fn test_malformed_numbers() {
        let cases = [
            ("1.2.3", "invalid character '.' after number literal", 3),
            ("9bad", "invalid character 'b' after number literal", 1),
            ("0xZZ", "hexadecimal literal has no digits", 0),
            ("5.String", "invalid character 'S' after number literal", 2),
            ("0b102", "invalid digit '2' in binary literal", 4),
            ("089", "invalid digit '8' in octal literal", 1),
            ("0x1.5", "hexadecimal mantissa requires a 'p' exponent", 5),
            ("1e", "exponent has no digits", 2),
            ("0b1.0", "invalid radix point in binary literal", 3),
            ("1__0", "'_' must separate successive digits", 2),
            ("1_", "'_' must separate successive digits", 1),
        ];
        for (src, message, offset) in cases {
            let err = Lexer::new(src).tokenize().unwrap_err();
            assert_eq!((err.message.as_str(), err.offset), (message, offset), "{src}");
        }
    }

    #[test]
    fn test_longest_operator_match() {
        let tokens = kinds("a &^= b...");
        assert_eq!(tokens[1], (Kind::Op, "&^="));
        assert_eq!(tokens[3], (Kind::Op, "..."));
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("x := \"abc\n").tokenize().unwrap_err();
        assert_eq!(err.message, "string literal not terminated");
        assert_eq!(err.offset, 5);
    }

    #[test]
    fn test_invalid_character() {
        let err = Lexer::new("a @ b").tokenize().unwrap_err();
        assert_eq!(err.offset, 2);
        assert!(err.message.starts_with("invalid character U+0040"));
    }
}
