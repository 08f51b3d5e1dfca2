//! Lowering of manifest sections into generator specifications.

use mga_ir::{
    Endpoint, EventDispatcher, EventMethod, FileSpec, PackageRef, Param, Service, TypeRef,
};

use super::{
    EndpointConfig, EventDispatcherConfig, Manifest, PackageConfig, ParamConfig, ServiceConfig,
    TypeConfig,
};

impl Manifest {
    /// File-level configuration shared by every generated file.
    pub fn file_spec(&self) -> FileSpec {
        let spec = FileSpec::new(self.package.to_ref());
        match &self.header {
            Some(header) => spec.header(header.trim_end()),
            None => spec,
        }
    }

    pub fn dispatchers(&self) -> Vec<EventDispatcher> {
        self.event_dispatchers.iter().map(EventDispatcherConfig::to_spec).collect()
    }

    pub fn service_specs(&self) -> Vec<Service> {
        self.services.iter().map(ServiceConfig::to_spec).collect()
    }
}

impl PackageConfig {
    pub fn to_ref(&self) -> PackageRef {
        PackageRef::new(&self.path, &self.name)
    }
}

impl TypeConfig {
    pub fn to_ref(&self) -> TypeRef {
        let ty = match (self.path.as_deref(), self.package_name()) {
            (Some(path), Some(name)) => TypeRef::qualified(PackageRef::new(path, name), &self.name),
            _ => TypeRef::local(&self.name),
        };
        let ty = if self.pointer { ty.pointer() } else { ty };
        if self.slice { ty.slice() } else { ty }
    }
}

impl EventDispatcherConfig {
    pub fn to_spec(&self) -> EventDispatcher {
        self.methods
            .iter()
            .fold(EventDispatcher::new(&self.name), |dispatcher, method| {
                let mut spec = EventMethod::new(&method.name, method.event.to_ref());
                spec.receives_context = method.receives_context;
                spec.returns_error = method.returns_error;
                dispatcher.method(spec)
            })
    }
}

impl ServiceConfig {
    pub fn to_spec(&self) -> Service {
        self.endpoints
            .iter()
            .fold(Service::new(&self.name, self.package.to_ref()), |service, endpoint| {
                service.endpoint(endpoint.to_spec())
            })
    }
}

impl EndpointConfig {
    pub fn to_spec(&self) -> Endpoint {
        Endpoint {
            name: self.name.clone(),
            operation_name: self.operation_name.clone(),
            params: self.params.iter().map(ParamConfig::to_spec).collect(),
            results: self.results.iter().map(ParamConfig::to_spec).collect(),
        }
    }
}

impl ParamConfig {
    pub fn to_spec(&self) -> Param {
        Param::new(&self.name, self.ty.to_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    const MANIFEST: &str = r#"
header = "Copyright 2020 Acme Inc.\n"

[package]
path = "example.com/app/order/orderdriver"
name = "orderdriver"

[[event_dispatchers]]
name = "Order"

[[event_dispatchers.methods]]
name = "Created"
event = { path = "example.com/app/order", name = "Created", pointer = true }
receives_context = true
returns_error = true

[[services]]
name = "Service"
package = { path = "example.com/app/order", name = "order" }

[[services.endpoints]]
name = "List"
operation_name = "order.ListOrders"
params = [{ name = "filter", type = { name = "string" } }]
results = [{ name = "orders", type = { path = "example.com/app/order", name = "Order", slice = true } }]
"#;

    #[test]
    fn test_file_spec() {
        let manifest = Manifest::from_str(MANIFEST).unwrap();
        let spec = manifest.file_spec();
        assert_eq!(spec.package, PackageRef::new("example.com/app/order/orderdriver", "orderdriver"));
        assert_eq!(spec.header_text.as_deref(), Some("Copyright 2020 Acme Inc."));
    }

    #[test]
    fn test_dispatchers() {
        let manifest = Manifest::from_str(MANIFEST).unwrap();
        let order = PackageRef::new("example.com/app/order", "order");
        let expected = EventDispatcher::new("Order").method(
            EventMethod::new("Created", TypeRef::qualified(order, "Created").pointer())
                .receives_context()
                .returns_error(),
        );
        assert_eq!(manifest.dispatchers(), [expected]);
    }

    #[test]
    fn test_services() {
        let manifest = Manifest::from_str(MANIFEST).unwrap();
        let order = PackageRef::new("example.com/app/order", "order");
        let expected = Service::new("Service", order.clone()).endpoint(
            Endpoint::new("List")
                .operation_name("order.ListOrders")
                .param(Param::new("filter", TypeRef::local("string")))
                .result(Param::new("orders", TypeRef::qualified(order, "Order").slice())),
        );
        assert_eq!(manifest.service_specs(), [expected]);
    }
}
