//! go-kit endpoint generation against the reference output.

use mga_codegen::format_source;
use mga_core::WriteResult;
use mga_generate::{Producer, kit::EndpointFile};
use mga_ir::{Endpoint, FileSpec, PackageRef, Param, Service, TypeRef};
use tempfile::TempDir;

const SERVICE_WITH_STRUCT: &str =
    include_str!("testdata/service_with_struct/zz_generated.endpoint.go");

const SERVICE_PATH: &str =
    "sagikazarmark.dev/mga/internal/generate/kit/endpoint/testdata/generator/service_with_struct";

fn service_package() -> PackageRef {
    PackageRef::new(SERVICE_PATH, "service_with_struct")
}

fn file_spec() -> FileSpec {
    FileSpec::new(PackageRef::new(format!("{SERVICE_PATH}/pkgdriver"), "pkgdriver")).header(
        "Copyright 2020 Acme Inc.\nAll rights reserved.\n\nLicensed under \"Only for testing purposes\" license.",
    )
}

fn service_with_struct() -> Service {
    let package = service_package();
    Service::new("Service", package.clone()).endpoint(
        Endpoint::new("CreateTodo")
            .param(Param::new(
                "newTodo",
                TypeRef::qualified(package.clone(), "NewTodo"),
            ))
            .result(Param::new(
                "response",
                TypeRef::qualified(package, "CreatedTodo"),
            )),
    )
}

#[test]
fn test_service_with_struct_matches_reference() {
    let service = service_with_struct();
    let file = EndpointFile::new(&service).generate(&file_spec()).unwrap();

    assert_eq!(file.path().to_str(), Some("zz_generated.endpoint.go"));
    assert_eq!(file.text(), SERVICE_WITH_STRUCT);
}

#[test]
fn test_reference_is_canonical() {
    assert_eq!(format_source(SERVICE_WITH_STRUCT).unwrap(), SERVICE_WITH_STRUCT);
}

#[test]
fn test_generation_is_deterministic() {
    let service = service_with_struct();
    let first = EndpointFile::new(&service).generate(&file_spec()).unwrap();
    let second = EndpointFile::new(&service).generate(&file_spec()).unwrap();
    assert_eq!(first.content(), second.content());
}

#[test]
fn test_multiple_endpoints_are_aligned() {
    let package = PackageRef::new("example.com/app/todo", "todo");
    let service = Service::new("TodoService", package.clone())
        .endpoint(Endpoint::new("ListTodos").result(Param::new(
            "todos",
            TypeRef::qualified(package.clone(), "Todo").slice(),
        )))
        .endpoint(
            Endpoint::new("CreateTodo")
                .param(Param::new("text", TypeRef::local("string")))
                .result(Param::new("id", TypeRef::local("string"))),
        );
    let spec = FileSpec::new(PackageRef::new("example.com/app/todo/tododriver", "tododriver"));

    let file = EndpointFile::new(&service).generate(&spec).unwrap();
    let source = file.text();

    assert!(source.contains(
        "\treturn TodoEndpoints{\n\
         \t\tCreateTodo: kitxendpoint.OperationNameMiddleware(\"todo.CreateTodo\")(mw(MakeTodoCreateTodoEndpoint(service))),\n\
         \t\tListTodos:  kitxendpoint.OperationNameMiddleware(\"todo.ListTodos\")(mw(MakeTodoListTodosEndpoint(service))),\n\
         \t}\n"
    ));
    assert!(source.contains("type TodoEndpoints struct {\n\tListTodos  endpoint.Endpoint\n\tCreateTodo endpoint.Endpoint\n}\n"));
    assert!(source.contains("type TodoListTodosRequest struct{}\n"));
    assert!(source.contains("type TodoListTodosResponse struct {\n\tTodos []todo.Todo\n\tErr   error\n}\n"));
    assert!(source.contains("\t\ttodos, err := service.ListTodos(ctx)\n"));
    assert!(!source.contains("req := request.(*TodoListTodosRequest)"));
    assert!(source.contains("\t\tid, err := service.CreateTodo(ctx, req.Text)\n"));
}

#[test]
fn test_write_is_stable() {
    let dir = TempDir::new().unwrap();
    let service = service_with_struct();
    let file = EndpointFile::new(&service).generate(&file_spec()).unwrap();

    assert_eq!(file.write(dir.path()).unwrap(), WriteResult::Written);
    assert_eq!(file.write(dir.path()).unwrap(), WriteResult::Unchanged);

    let written = std::fs::read_to_string(dir.path().join("zz_generated.endpoint.go")).unwrap();
    assert_eq!(written, SERVICE_WITH_STRUCT);
}
