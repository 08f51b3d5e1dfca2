//! Node model and builder API.
//!
//! - [`File`] - root of a generated file, owning its import [`Registry`](crate::Registry)
//! - [`Decl`] - top-level declarations ([`TypeDecl`], [`InterfaceDecl`], [`StructDecl`], [`FuncDecl`])
//! - [`Statement`], [`Expr`], [`Type`] - function bodies and type expressions
//! - [`CodeBuilder`] - indented text buffer used by the renderer

mod code_builder;
mod decl;
mod expr;
mod file;
mod function;
mod indent;
mod stmt;
mod structure;
mod types;

pub use code_builder::CodeBuilder;
pub use decl::Decl;
pub use expr::{BinaryOp, CompositeLit, Element, Expr, Lit, UnaryOp};
pub use file::File;
pub use function::{FuncDecl, Param, Signature};
pub use indent::Indent;
pub use stmt::{IfStmt, Statement};
pub use structure::{Field, InterfaceDecl, MethodSig, StructDecl, TypeDecl};
pub use types::Type;
