//! Event dispatching.

mod dispatcher;

pub use dispatcher::DispatcherFile;
