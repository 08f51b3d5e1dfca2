//! Parsing and validation of `mga.toml` manifests.
//!
//! A manifest names the package the generated files belong to and lists the
//! event dispatchers and services to generate. Parsed manifests are lowered
//! into [`mga_ir`] specifications for the producers.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod manifest;

pub use error::{Error, Result, SourceContext};
pub use manifest::*;
