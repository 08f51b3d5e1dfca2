use mga_codegen::{
    Symbol,
    builder::{
        CompositeLit, Expr, Field, File, FuncDecl, IfStmt, InterfaceDecl, MethodSig, Param,
        Signature, Statement, StructDecl, Type,
    },
};
use mga_core::upper_first;
use mga_ir::{Endpoint, FileSpec, Service, TypeRef};

use crate::{Error, Producer, Result, new_file};

const KIT_ENDPOINT_PATH: &str = "github.com/go-kit/kit/endpoint";
const KIT_OC_PATH: &str = "github.com/go-kit/kit/tracing/opencensus";
const KITX_ENDPOINT_PATH: &str = "github.com/sagikazarmark/kitx/endpoint";
const ENDPOINT_ERROR: &str = "endpointError";

/// go-kit endpoints for every method of a service interface.
///
/// Each method gets a request struct, a response struct and an endpoint
/// constructor; an endpoint set struct collects them with helpers applying
/// middleware and tracing to the whole set.
pub struct EndpointFile<'a> {
    service: &'a Service,
}

impl<'a> EndpointFile<'a> {
    pub fn new(service: &'a Service) -> Self {
        Self { service }
    }

    fn validate(&self) -> Result<()> {
        let context = || format!("service '{}'", self.service.name);
        if self.service.package.path.is_empty() {
            return Err(Error::invalid_spec(context(), "package path is empty"));
        }
        if self.service.endpoints.is_empty() {
            return Err(Error::invalid_spec(context(), "service has no endpoints"));
        }
        for endpoint in &self.service.endpoints {
            let mut params = endpoint.params.iter().chain(&endpoint.results);
            if let Some(param) = params.find(|p| is_unrooted(&p.ty)) {
                return Err(Error::invalid_spec(
                    context(),
                    format!(
                        "type '{}' of '{}' in method '{}' has no package path",
                        param.ty.name, param.name, endpoint.name
                    ),
                ));
            }
        }
        Ok(())
    }
}

fn is_unrooted(ty: &TypeRef) -> bool {
    ty.package.as_ref().is_some_and(|p| p.path.is_empty())
}

impl Producer for EndpointFile<'_> {
    fn file_name(&self) -> &'static str {
        "zz_generated.endpoint.go"
    }

    fn build(&self, spec: &FileSpec) -> Result<File> {
        self.validate()?;

        let mut file = new_file(spec);
        file.import_name(KIT_ENDPOINT_PATH, "endpoint");
        file.import_alias(KIT_OC_PATH, "kitoc");
        file.import_alias(KITX_ENDPOINT_PATH, "kitxendpoint");

        let set = EndpointSet::new(&mut file, self.service);
        tracing::trace!(
            service = %self.service.name,
            endpoints = self.service.endpoints.len(),
            "endpoint set"
        );

        push_endpoint_error(&mut file);
        set.push_set(&mut file);
        set.push_make_endpoints(&mut file);
        set.push_trace_endpoints(&mut file);
        for endpoint in &self.service.endpoints {
            set.push_endpoint(&mut file, endpoint);
        }
        Ok(file)
    }
}

fn push_endpoint_error(file: &mut File) {
    file.push_decl(
        InterfaceDecl::new(ENDPOINT_ERROR)
            .doc(format!(
                "{ENDPOINT_ERROR} identifies an error that should be returned as an error endpoint."
            ))
            .method(MethodSig::new(
                "EndpointError",
                Signature::new().returns(Type::bool()),
            )),
    );
}

/// Names and symbols shared by all declarations of one service.
struct EndpointSet<'a> {
    service: &'a Service,
    service_type: Type,
    /// Prefix of generated names; empty for a service named `Service`.
    prefix: String,
    kit_endpoint: Symbol,
    kit_middleware: Symbol,
}

impl<'a> EndpointSet<'a> {
    fn new(file: &mut File, service: &'a Service) -> Self {
        let service_type =
            file.type_ref(&TypeRef::qualified(service.package.clone(), &service.name));
        let prefix = if service.name == "Service" {
            String::new()
        } else {
            service
                .name
                .strip_suffix("Service")
                .unwrap_or(&service.name)
                .to_string()
        };
        Self {
            service,
            service_type,
            prefix,
            kit_endpoint: file.qual(KIT_ENDPOINT_PATH, "Endpoint"),
            kit_middleware: file.qual(KIT_ENDPOINT_PATH, "Middleware"),
        }
    }

    fn set_name(&self) -> String {
        format!("{}Endpoints", self.prefix)
    }

    fn request_name(&self, endpoint: &Endpoint) -> String {
        format!("{}{}Request", self.prefix, endpoint.name)
    }

    fn response_name(&self, endpoint: &Endpoint) -> String {
        format!("{}{}Response", self.prefix, endpoint.name)
    }

    fn constructor_name(&self, endpoint: &Endpoint) -> String {
        format!("Make{}{}Endpoint", self.prefix, endpoint.name)
    }

    fn operation_name(&self, endpoint: &Endpoint) -> String {
        endpoint
            .operation_name
            .clone()
            .unwrap_or_else(|| format!("{}.{}", self.service.package.name, endpoint.name))
    }

    /// Endpoints sorted by name, the order of fields in composite literals.
    fn sorted_endpoints(&self) -> Vec<&'a Endpoint> {
        let mut endpoints: Vec<_> = self.service.endpoints.iter().collect();
        endpoints.sort_by(|a, b| a.name.cmp(&b.name));
        endpoints
    }

    fn set_literal(&self, value: impl Fn(&Endpoint) -> Expr) -> Expr {
        let mut lit = CompositeLit::new(Type::named(self.set_name()));
        for endpoint in self.sorted_endpoints() {
            lit = lit.field(&endpoint.name, value(endpoint));
        }
        if lit.elements.len() > 1 {
            lit = lit.multiline();
        }
        lit.into()
    }

    fn push_set(&self, file: &mut File) {
        let name = self.set_name();
        let fields = self
            .service
            .endpoints
            .iter()
            .map(|endpoint| Field::new(&endpoint.name, Type::qual(self.kit_endpoint.clone())));
        file.push_decl(
            StructDecl::new(&name)
                .doc(format!(
                    "{name} collects all of the endpoints that compose the underlying service. It's\n\
                     meant to be used as a helper struct, to collect all of the endpoints into a\n\
                     single parameter."
                ))
                .fields(fields),
        );
    }

    fn push_make_endpoints(&self, file: &mut File) {
        let name = format!("Make{}", self.set_name());
        let combine = file.qual(KITX_ENDPOINT_PATH, "Combine");
        let operation = file.qual(KITX_ENDPOINT_PATH, "OperationNameMiddleware");

        let endpoints = self.set_literal(|endpoint| {
            let inner = Expr::ident(self.constructor_name(endpoint)).call([Expr::ident("service")]);
            Expr::from(operation.clone())
                .call([Expr::string(self.operation_name(endpoint))])
                .call([Expr::ident("mw").call([inner])])
        });

        file.push_decl(
            FuncDecl::new(&name)
                .doc(format!(
                    "{name} returns a(n) {} struct where each endpoint invokes\n\
                     the corresponding method on the provided service.",
                    self.set_name()
                ))
                .param(Param::new("service", self.service_type.clone()))
                .param(
                    Param::new("middleware", Type::qual(self.kit_middleware.clone())).variadic(),
                )
                .returns(Type::named(self.set_name()))
                .statements([
                    Statement::define(
                        "mw",
                        Expr::from(combine).call_spread([Expr::ident("middleware")]),
                    ),
                    Statement::Blank,
                    Statement::ret([endpoints]),
                ]),
        );
    }

    fn push_trace_endpoints(&self, file: &mut File) {
        let name = format!("Trace{}", self.set_name());
        let trace = file.qual(KIT_OC_PATH, "TraceEndpoint");

        let endpoints = self.set_literal(|endpoint| {
            Expr::from(trace.clone())
                .call([Expr::string(self.operation_name(endpoint))])
                .call([Expr::ident("endpoints").dot(&endpoint.name)])
        });

        file.push_decl(
            FuncDecl::new(&name)
                .doc(format!(
                    "{name} returns a(n) {} struct where each endpoint is wrapped with a tracing middleware.",
                    self.set_name()
                ))
                .param(Param::new("endpoints", Type::named(self.set_name())))
                .returns(Type::named(self.set_name()))
                .statement(Statement::ret([endpoints])),
        );
    }

    fn push_endpoint(&self, file: &mut File, endpoint: &Endpoint) {
        let request = self.request_name(endpoint);
        let response = self.response_name(endpoint);

        let request_fields: Vec<_> = endpoint
            .params
            .iter()
            .map(|param| Field::new(upper_first(&param.name), file.type_ref(&param.ty)))
            .collect();
        file.push_decl(
            StructDecl::new(&request)
                .doc(format!("{request} is a request struct for {} endpoint.", endpoint.name))
                .fields(request_fields),
        );

        let mut response_fields: Vec<_> = endpoint
            .results
            .iter()
            .map(|result| Field::new(upper_first(&result.name), file.type_ref(&result.ty)))
            .collect();
        response_fields.push(Field::new("Err", Type::error()));
        file.push_decl(
            StructDecl::new(&response)
                .doc(format!("{response} is a response struct for {} endpoint.", endpoint.name))
                .fields(response_fields),
        );

        let decl = self.endpoint_constructor(file, endpoint, &request, &response);
        file.push_decl(decl);
    }

    fn endpoint_constructor(
        &self,
        file: &mut File,
        endpoint: &Endpoint,
        request: &str,
        response: &str,
    ) -> FuncDecl {
        let name = self.constructor_name(endpoint);
        let context = file.qual("context", "Context");
        let errors_as = file.qual("errors", "As");

        let mut body = Vec::new();
        if !endpoint.params.is_empty() {
            body.push(Statement::define(
                "req",
                Expr::ident("request").assert(Type::named(request).pointer()),
            ));
            body.push(Statement::Blank);
        }

        let mut args = vec![Expr::ident("ctx")];
        args.extend(
            endpoint
                .params
                .iter()
                .map(|param| Expr::ident("req").dot(upper_first(&param.name))),
        );
        let mut names: Vec<_> = endpoint.results.iter().map(|r| r.name.clone()).collect();
        names.push("err".to_string());
        body.push(Statement::define_many(
            names,
            [Expr::ident("service").dot(&endpoint.name).call(args)],
        ));
        body.push(Statement::Blank);

        let failed = || response_literal(response, endpoint, true);
        let business_error = IfStmt::new(
            Expr::from(errors_as)
                .call([Expr::ident("err"), Expr::ident("endpointErr").addr()])
                .and(Expr::ident("endpointErr").dot("EndpointError").call(Vec::new())),
        )
        .init(Statement::define(
            "endpointErr",
            Expr::ident(ENDPOINT_ERROR).call([Expr::Nil]),
        ))
        .then(Statement::ret([failed(), Expr::ident("err")]));

        body.push(
            IfStmt::new(Expr::ident("err").not_equal(Expr::Nil))
                .then(business_error.into())
                .then(Statement::Blank)
                .then(Statement::ret([failed(), Expr::Nil]))
                .into(),
        );
        body.push(Statement::Blank);
        body.push(Statement::ret([
            response_literal(response, endpoint, false),
            Expr::Nil,
        ]));

        let handler = Signature::new()
            .param(Param::new("ctx", Type::qual(context)))
            .param(Param::new("request", Type::empty_interface()))
            .returns(Type::empty_interface())
            .returns(Type::error());

        FuncDecl::new(&name)
            .doc(format!(
                "{name} returns an endpoint for the matching method of the underlying service."
            ))
            .param(Param::new("service", self.service_type.clone()))
            .returns(Type::qual(self.kit_endpoint.clone()))
            .statement(Statement::ret([Expr::func_lit(handler, body)]))
    }
}

/// `&Response{...}` holding the results, plus the error when `failed`.
fn response_literal(response: &str, endpoint: &Endpoint, failed: bool) -> Expr {
    let mut fields: Vec<(String, Expr)> = endpoint
        .results
        .iter()
        .map(|result| (upper_first(&result.name), Expr::ident(&result.name)))
        .collect();
    if failed {
        fields.push(("Err".to_string(), Expr::ident("err")));
    }
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let multiline = fields.len() > 1;
    let mut lit = CompositeLit::new(Type::named(response));
    for (key, value) in fields {
        lit = lit.field(key, value);
    }
    if multiline {
        lit = lit.multiline();
    }
    lit.addr()
}

#[cfg(test)]
mod tests {
    use mga_ir::PackageRef;

    use super::*;

    fn spec() -> FileSpec {
        FileSpec::new(PackageRef::new("example.com/app/todo/tododriver", "tododriver"))
    }

    fn todo() -> PackageRef {
        PackageRef::new("example.com/app/todo", "todo")
    }

    #[test]
    fn test_service_without_endpoints_is_rejected() {
        let service = Service::new("Service", todo());
        let err = EndpointFile::new(&service).build(&spec()).unwrap_err();
        assert_eq!(err.to_string(), "invalid service 'Service': service has no endpoints");
    }

    #[test]
    fn test_empty_package_path_is_rejected() {
        let service = Service::new("Service", PackageRef::new("", "todo"))
            .endpoint(Endpoint::new("List"));
        let err = EndpointFile::new(&service).build(&spec()).unwrap_err();
        assert!(err.to_string().contains("package path is empty"));
    }

    #[test]
    fn test_unrooted_param_type_is_rejected() {
        let ty = TypeRef::qualified(PackageRef::new("", "todo"), "NewTodo");
        let service = Service::new("Service", todo())
            .endpoint(Endpoint::new("Create").param(mga_ir::Param::new("newTodo", ty)));
        let err = EndpointFile::new(&service).build(&spec()).unwrap_err();
        assert!(err.to_string().contains("type 'NewTodo' of 'newTodo'"));
    }

    #[test]
    fn test_prefixed_names() {
        let service = Service::new("TodoService", todo()).endpoint(Endpoint::new("List"));
        let file = EndpointFile::new(&service).build(&spec()).unwrap();
        let names: Vec<_> = file.decls().iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            [
                "endpointError",
                "TodoEndpoints",
                "MakeTodoEndpoints",
                "TraceTodoEndpoints",
                "TodoListRequest",
                "TodoListResponse",
                "MakeTodoListEndpoint",
            ]
        );
    }

    #[test]
    fn test_operation_name() {
        let service = Service::new("Service", todo());
        let mut file = File::new(spec().package);
        let set = EndpointSet::new(&mut file, &service);

        assert_eq!(set.operation_name(&Endpoint::new("List")), "todo.List");
        assert_eq!(
            set.operation_name(&Endpoint::new("List").operation_name("todo.ListTodos")),
            "todo.ListTodos"
        );
    }
}
