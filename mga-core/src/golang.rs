//! Go lexical rules shared by the engine and the manifest validator.

/// Reserved Go keywords.
pub const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Predeclared identifiers of the universe block.
///
/// Shadowing these is legal Go, but an import alias named `error` or `len`
/// would make the generated code unreadable, so the registry avoids them.
pub const PREDECLARED: &[&str] = &[
    // types
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32", "float64",
    "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16",
    "uint32", "uint64", "uintptr",
    // constants
    "true", "false", "iota", "nil",
    // functions
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max",
    "min", "new", "panic", "print", "println", "real", "recover",
];

/// Check if a name is a Go keyword.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Check if a name is a predeclared Go identifier.
pub fn is_predeclared(name: &str) -> bool {
    PREDECLARED.contains(&name)
}

/// Check if a string is a syntactically valid Go identifier (keywords excluded).
///
/// Only ASCII letters, digits and underscores are accepted.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_keyword(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert!(is_keyword("func"));
        assert!(is_keyword("range"));
        assert!(!is_keyword("error"));
    }

    #[test]
    fn test_predeclared() {
        assert!(is_predeclared("error"));
        assert!(is_predeclared("nil"));
        assert!(!is_predeclared("errors"));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("Order"));
        assert!(is_identifier("_x1"));
        assert!(is_identifier("service_with_struct"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("foo-bar"));
        assert!(!is_identifier("type"));
    }
}
