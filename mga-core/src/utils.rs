//! Shared utility functions for code generation.

/// Upper-case the first character (e.g., "newTodo" -> "NewTodo")
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_first() {
        assert_eq!(upper_first("newTodo"), "NewTodo");
        assert_eq!(upper_first("X"), "X");
        assert_eq!(upper_first(""), "");
    }
}
