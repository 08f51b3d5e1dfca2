//! Specification types for the mga Go code generator.
//!
//! These types describe *what* to generate, independent of how the
//! description was obtained. They are the input of every producer.
//!
//! # Architecture
//!
//! ```text
//! mga.toml (TOML) → mga-manifest (parsing) → mga-ir (specs) → mga-generate (producers)
//! ```
//!
//! Specs are constructed once by a collaborator (usually the manifest
//! loader), read by a producer, and discarded after generation.

mod event;
mod file;
mod service;
mod types;

pub use event::{EventDispatcher, EventMethod};
pub use file::FileSpec;
pub use service::{Endpoint, Param, Service};
pub use types::{PackageRef, TypeRef};
