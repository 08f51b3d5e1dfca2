//! Parsing and validation of complete manifests.

use std::str::FromStr;

use mga_manifest::{Error, Manifest};
use tempfile::TempDir;

const PACKAGE: &str = r#"
[package]
path = "example.com/app/order/orderdriver"
name = "orderdriver"
"#;

fn parse(body: &str) -> mga_manifest::Result<Manifest> {
    Manifest::from_str(&format!("{PACKAGE}{body}"))
}

#[test]
fn test_minimal_manifest() {
    let manifest = parse("").unwrap();
    assert!(manifest.is_empty());
    assert_eq!(manifest.file_spec().package.name, "orderdriver");
    assert_eq!(manifest.file_spec().header_text, None);
}

#[test]
fn test_full_manifest() {
    let manifest = parse(
        r#"
[[event_dispatchers]]
name = "Order"

[[event_dispatchers.methods]]
name = "Notify"
event = { path = "example.com/app/order", package = "order", name = "OrderEvent" }

[[services]]
name = "TodoService"
package = { path = "example.com/app/todo", name = "todo" }

[[services.endpoints]]
name = "CreateTodo"
params = [{ name = "text", type = { name = "string" } }]
results = [{ name = "id", type = { name = "string" } }]
"#,
    )
    .unwrap();

    let dispatchers = manifest.dispatchers();
    assert_eq!(dispatchers[0].methods[0].event.to_string(), "order.OrderEvent");
    assert!(!dispatchers[0].methods[0].receives_context);

    let services = manifest.service_specs();
    assert_eq!(services[0].endpoints[0].params[0].ty.to_string(), "string");
}

#[test]
fn test_parse_error_has_span() {
    let err = parse("[[event_dispatchers]]\nname = \n").unwrap_err();
    match *err {
        Error::Parse { span, .. } => assert!(span.is_some()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unknown_field_is_rejected() {
    let err = parse("[[event_dispatchers]]\nname = \"Order\"\ncolor = \"blue\"\n").unwrap_err();
    assert!(matches!(*err, Error::Parse { .. }));
}

#[test]
fn test_keyword_name_is_rejected() {
    let err = parse("[[event_dispatchers]]\nname = \"func\"\n").unwrap_err();
    match *err {
        Error::ReservedKeyword { name, span, .. } => {
            assert_eq!(name, "func");
            assert!(span.is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_invalid_identifier_is_rejected() {
    let err = parse("[[event_dispatchers]]\nname = \"order-events\"\n").unwrap_err();
    assert_eq!(err.to_string(), "invalid event dispatcher name 'order-events'");
}

#[test]
fn test_duplicate_dispatchers_point_at_both() {
    let err = parse(
        "[[event_dispatchers]]\nname = \"Order\"\n\n[[event_dispatchers]]\nname = \"Order\"\n",
    )
    .unwrap_err();
    match *err {
        Error::Duplicate {
            first_span,
            second_span,
            ..
        } => {
            let (first, second) = (first_span.unwrap(), second_span.unwrap());
            assert!(first.offset() < second.offset());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unqualified_event_is_rejected() {
    let err = parse(
        r#"
[[event_dispatchers]]
name = "Order"

[[event_dispatchers.methods]]
name = "Created"
event = { name = "Created" }
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("must declare its package path"));
}

#[test]
fn test_empty_package_path_is_rejected() {
    let err = Manifest::from_str("[package]\npath = \"\"\nname = \"driver\"\n").unwrap_err();
    match *err {
        Error::Validation { message, span, .. } => {
            assert_eq!(message, "generated package path cannot be empty");
            assert!(span.is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_service_without_endpoints_is_rejected() {
    let err = parse(
        r#"
[[services]]
name = "Service"
package = { path = "example.com/app/todo", name = "todo" }
"#,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "service 'Service' has no endpoints");
}

#[test]
fn test_header_and_header_file_conflict() {
    let err = Manifest::from_str(&format!("header = \"a\"\nheader_file = \"b\"\n{PACKAGE}"))
        .unwrap_err();
    assert!(err.to_string().contains("cannot be used together"));
}

#[test]
fn test_header_file_is_read_relative_to_manifest() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("header.txt"), "Copyright 2020 Acme Inc.\n").unwrap();
    std::fs::write(
        dir.path().join("mga.toml"),
        format!("header_file = \"header.txt\"\n{PACKAGE}"),
    )
    .unwrap();

    let manifest = Manifest::from_file(dir.path().join("mga.toml")).unwrap();
    assert_eq!(
        manifest.file_spec().header_text.as_deref(),
        Some("Copyright 2020 Acme Inc.")
    );
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Manifest::from_file(dir.path().join("mga.toml")).unwrap_err();
    assert!(matches!(*err, Error::Io { .. }));
}
