//! Core operations.
//!
//! This module contains the business logic for mga commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod fmt;
pub mod generate;

pub use check::check;
pub use fmt::{FmtOptions, fmt};
pub use generate::{GenerateOptions, generate, render};
