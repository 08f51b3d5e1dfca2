//! Service descriptions for endpoint generation.

use crate::{PackageRef, TypeRef};

/// A service interface whose methods become go-kit endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Interface name (e.g., "Service", "TodoService").
    pub name: String,
    /// Package declaring the interface.
    pub package: PackageRef,
    /// One endpoint per interface method, in declaration order.
    pub endpoints: Vec<Endpoint>,
}

impl Service {
    pub fn new(name: impl Into<String>, package: PackageRef) -> Self {
        Self {
            name: name.into(),
            package,
            endpoints: Vec::new(),
        }
    }

    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.push(endpoint);
        self
    }
}

/// A service method.
///
/// Every method is assumed to take a leading `context.Context` and return a
/// trailing `error`; neither is listed in `params` or `results`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Method name.
    pub name: String,
    /// Operation name override used for tracing and middleware.
    pub operation_name: Option<String>,
    /// Method parameters after the context.
    pub params: Vec<Param>,
    /// Method results before the error.
    pub results: Vec<Param>,
}

impl Endpoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operation_name: None,
            params: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn result(mut self, result: Param) -> Self {
        self.results.push(result);
        self
    }
}

/// A named, typed parameter or result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
