//! go-kit integration.

mod endpoint;

pub use endpoint::EndpointFile;
