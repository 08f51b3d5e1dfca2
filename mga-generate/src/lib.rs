//! Producers turning mga specifications into Go source files.
//!
//! Each producer implements [`Producer`]: it validates its specification,
//! drives the [`mga_codegen`] builder API and hands the resulting file to the
//! renderer and formatter.
//!
//! - [`event::DispatcherFile`] - event dispatchers forwarding to a generic event bus
//! - [`kit::EndpointFile`] - go-kit endpoints for a service interface
//!
//! ```
//! use mga_generate::{Producer, event::DispatcherFile};
//! use mga_ir::{EventDispatcher, EventMethod, FileSpec, PackageRef, TypeRef};
//!
//! let event = TypeRef::qualified(PackageRef::new("example.com/app/order", "order"), "Created");
//! let dispatchers = [EventDispatcher::new("Order").method(EventMethod::new("Created", event))];
//! let spec = FileSpec::new(PackageRef::new("example.com/app/order/orderdriver", "orderdriver"));
//!
//! let file = DispatcherFile::new(&dispatchers).generate(&spec).unwrap();
//! assert!(file.text().contains("type OrderEventDispatcher struct"));
//! ```

mod error;
pub mod event;
pub mod kit;
mod producer;

pub use error::{Error, Result};
pub use producer::{BUILD_CONSTRAINT, GENERATED_NOTICE, Producer, new_file};
