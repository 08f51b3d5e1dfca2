//! Go code synthesis engine.
//!
//! Generators describe Go files with the node model in [`builder`]; a
//! [`File`](builder::File) owns a [`Registry`] that assigns a unique alias to
//! every imported package. [`render`] turns the node model into raw source
//! and [`format`] lays it out canonically.
//!
//! # Module Organization
//!
//! - [`builder`] - Node model and the indentation-aware [`CodeBuilder`](builder::CodeBuilder)
//! - [`render`] - Node model to raw Go source, emitting only used imports
//! - [`format`] - Canonical Go formatting

pub mod builder;
mod error;
pub mod format;
mod registry;
pub mod render;

pub use error::{Error, Result, SyntaxError};
pub use format::{format_named, format_source};
pub use registry::{Import, Registry, Symbol};
