use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for engine operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// A syntax error reported by the formatter.
///
/// Displays as `line:column: message`, with 1-based line and byte column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    /// Byte offset of the offending token.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("unresolved symbol '{member}': package '{path}' is not registered")]
    #[diagnostic(
        code(mga::unresolved_symbol),
        help("register '{path}' with `File::import_name` or build the reference with `File::qual`")
    )]
    UnresolvedSymbol { path: String, member: String },

    #[error("invalid Go source: {source}")]
    #[diagnostic(code(mga::invalid_syntax))]
    InvalidSyntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("syntax error here")]
        span: SourceSpan,
        #[source]
        source: SyntaxError,
    },
}

impl Error {
    pub fn unresolved(path: impl Into<String>, member: impl Into<String>) -> Box<Self> {
        Box::new(Error::UnresolvedSymbol {
            path: path.into(),
            member: member.into(),
        })
    }

    /// Create a syntax error pointing into `src`.
    pub fn invalid_syntax(source: SyntaxError, src: &str, filename: &str) -> Box<Self> {
        let len = src
            .get(source.offset..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8);
        Box::new(Error::InvalidSyntax {
            src: NamedSource::new(filename, src.to_string()),
            span: SourceSpan::from((source.offset, len)),
            source,
        })
    }
}
