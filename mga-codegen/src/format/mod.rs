//! Canonical Go formatting.
//!
//! Source is tokenized, parsed into a syntax tree that keeps comments and
//! layout hints, then printed with `gofmt` conventions: tab indentation,
//! aligned cells, sorted imports, normalized blank lines and operator
//! spacing. Formatting is idempotent.
//!
//! Only the subset of Go emitted by the generators is accepted. Constructs
//! outside of it (`switch`, `select`, labels and type parameters) are
//! rejected with a syntax error rather than passed through.

mod align;
mod ast;
mod lexer;
mod parser;
mod printer;

use crate::{Error, Result, SyntaxError};

/// Syntax error produced while lexing or parsing, positioned by byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SyntaxErr {
    pub message: String,
    pub offset: usize,
}

impl SyntaxErr {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }

    fn locate(self, src: &str) -> SyntaxError {
        let offset = self.offset.min(src.len());
        let before = src.get(..offset).unwrap_or(src);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        SyntaxError {
            message: self.message,
            offset,
            line,
            column: offset - line_start + 1,
        }
    }
}

/// Format Go source.
pub fn format_source(src: &str) -> Result<String> {
    format_named(src, "<input>")
}

/// Format Go source, naming the file in diagnostics.
pub fn format_named(src: &str, filename: &str) -> Result<String> {
    let file = parser::parse(src).map_err(|err| {
        let err = err.locate(src);
        tracing::debug!(filename, line = err.line, column = err.column, "{}", err.message);
        Error::invalid_syntax(err, src, filename)
    })?;
    let out = printer::print(&file);
    tracing::trace!(filename, bytes = out.len(), "formatted");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const ENDPOINT: &str = r#"// Code generated by mga tool. DO NOT EDIT.

package pkgdriver

import (
"errors"
"context"
kitoc "github.com/go-kit/kit/tracing/opencensus"
)

// endpointError identifies an error that should be returned as an error endpoint.
type endpointError interface {
EndpointError() bool
}

type CreateTodoResponse struct {
Response CreatedTodo
Err error
}

func MakeCreateTodoEndpoint(service Service) endpoint.Endpoint {
return func(ctx context.Context, request interface{}) (interface{}, error) {
req := request.(*CreateTodoRequest)

response, err := service.CreateTodo(ctx, req.NewTodo)

if err != nil {
if endpointErr := endpointError(nil); errors.As(err, &endpointErr) && endpointErr.EndpointError() {
return &CreateTodoResponse{
Err: err,
Response: response,
}, err
}
}

return &CreateTodoResponse{Response: response}, nil
}
}
"#;

    const ENDPOINT_FORMATTED: &str = r#"// Code generated by mga tool. DO NOT EDIT.

package pkgdriver

import (
	"context"
	"errors"
	kitoc "github.com/go-kit/kit/tracing/opencensus"
)

// endpointError identifies an error that should be returned as an error endpoint.
type endpointError interface {
	EndpointError() bool
}

type CreateTodoResponse struct {
	Response CreatedTodo
	Err      error
}

func MakeCreateTodoEndpoint(service Service) endpoint.Endpoint {
	return func(ctx context.Context, request interface{}) (interface{}, error) {
		req := request.(*CreateTodoRequest)

		response, err := service.CreateTodo(ctx, req.NewTodo)

		if err != nil {
			if endpointErr := endpointError(nil); errors.As(err, &endpointErr) && endpointErr.EndpointError() {
				return &CreateTodoResponse{
					Err:      err,
					Response: response,
				}, err
			}
		}

		return &CreateTodoResponse{Response: response}, nil
	}
}
"#;

    #[test]
    fn test_formats_generated_code() {
        assert_eq!(format_source(ENDPOINT).unwrap(), ENDPOINT_FORMATTED);
    }

    #[test]
    fn test_idempotent() {
        let once = format_source(ENDPOINT).unwrap();
        assert_eq!(format_source(&once).unwrap(), once);
    }

    #[test]
    fn test_ends_with_single_newline() {
        let out = format_source("package a\n\n\n").unwrap();
        assert_eq!(out, "package a\n");
    }

    #[test]
    fn test_header_comments_kept() {
        let src = "// +build !ignore\n\n// Copyright.\n\npackage a\n";
        assert_eq!(format_source(src).unwrap(), src);
    }

    #[test]
    fn test_syntax_error_position() {
        let err = format_named("package a\n\nfunc f() {\n\tx := \n}\n", "a.go").unwrap_err();
        match *err {
            Error::InvalidSyntax { source, .. } => {
                assert_eq!(source.line, 5);
                assert_eq!(source.column, 1);
                assert_eq!(source.to_string(), "5:1: expected operand, found '}'");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unsupported_statements() {
        for src in [
            "package a\nfunc f() {\n\tswitch x {\n\t}\n}\n",
            "package a\nfunc f() {\n\tselect {\n\t}\n}\n",
            "package a\nfunc f() {\nloop:\n\tfor {\n\t}\n}\n",
            "package a\nfunc f[T any]() {}\n",
        ] {
            assert!(format_source(src).is_err(), "accepted {src:?}");
        }
    }

    #[test]
    fn test_rejects_malformed_numbers() {
        for literal in ["9bad", "1.2.3", "0xZZ", "5.String()", "0b12"] {
            let src = format!("package a\n\nfunc f() {{\n\tx := g({literal})\n}}\n");
            let err = format_source(&src).unwrap_err();
            assert!(matches!(*err, Error::InvalidSyntax { .. }), "accepted {literal:?}");
        }
        let src = "package a\n\nfunc f() {\n\tx := (5).String() + 0x1p-2\n}\n";
        assert_eq!(format_source(src).unwrap(), src);
    }

    #[test]
    fn test_comments_survive() {
        let src = "package a\n\n// F does things.\nfunc F() {\n\t// leading\n\tx := 1 // trailing\n\n\t// closing\n}\n";
        assert_eq!(format_source(src).unwrap(), src);
    }

    proptest! {
        #[test]
        fn test_spacing_is_stable(a in "[a-z]{1,6}", b in "[a-z]{1,6}", c in "[a-z]{1,6}") {
            prop_assume!(!mga_core::is_keyword(&a) && !mga_core::is_keyword(&b) && !mga_core::is_keyword(&c));
            let src = format!("package p\n\nfunc f() {{\n\tx = {a}+{b}*{c}\n\tg({a}+{b}, {c})\n}}\n");
            let once = format_source(&src).unwrap();
            prop_assert_eq!(format_source(&once).unwrap(), once.clone());
            let expected_call = format!("\tg({a}+{b}, {c})\n");
            let expected_assign = format!("\tx = {a} + {b}*{c}\n");
            prop_assert!(once.contains(&expected_assign));
            prop_assert!(once.contains(&expected_call));
        }
    }
}
