//! Core utilities and types for the mga Go code generator.
//!
//! This crate provides fundamental helpers used across the mga
//! ecosystem: Go naming rules and generated-file output.

mod file;
mod golang;
mod utils;

// File operations
pub use file::{GeneratedFile, WriteResult};
// Go language rules
pub use golang::{KEYWORDS, PREDECLARED, is_identifier, is_keyword, is_predeclared};
// String utilities
pub use utils::upper_first;
