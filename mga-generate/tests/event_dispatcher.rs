//! Event dispatcher generation scenarios.

use mga_generate::{Error, Producer, event::DispatcherFile};
use mga_ir::{EventDispatcher, EventMethod, FileSpec, PackageRef, TypeRef};

fn file_spec() -> FileSpec {
    FileSpec::new(PackageRef::new("example.com/app/order/orderdriver", "orderdriver"))
}

fn order_event(name: &str) -> TypeRef {
    TypeRef::qualified(PackageRef::new("example.com/app/order", "order"), name)
}

fn generate(dispatchers: &[EventDispatcher]) -> String {
    DispatcherFile::new(dispatchers)
        .generate(&file_spec())
        .unwrap()
        .text()
        .into_owned()
}

#[test]
fn test_order_dispatcher() {
    let dispatchers = [EventDispatcher::new("Order")
        .method(EventMethod::new("Notify", order_event("OrderEvent")))
        .method(
            EventMethod::new("Created", order_event("Created"))
                .receives_context()
                .returns_error(),
        )];

    insta::assert_snapshot!("order_dispatcher", generate(&dispatchers));
}

#[test]
fn test_fire_and_forget() {
    let dispatchers = [EventDispatcher::new("Order")
        .method(EventMethod::new("Notify", order_event("OrderEvent")))];
    let source = generate(&dispatchers);

    assert!(source.contains(
        "func (d OrderEventDispatcher) Notify(event order.OrderEvent) {\n\
         \tctx := context.Background()\n\
         \t_ = d.bus.Publish(ctx, event)\n\
         }\n"
    ));
    assert!(!source.contains("emperror.dev/errors"));
}

#[test]
fn test_error_path_with_context() {
    let dispatchers = [EventDispatcher::new("Order").method(
        EventMethod::new("Created", order_event("Created"))
            .receives_context()
            .returns_error(),
    )];
    let source = generate(&dispatchers);

    assert!(source.contains(
        "func (d OrderEventDispatcher) Created(ctx context.Context, event order.Created) error {\n\
         \terr := d.bus.Publish(ctx, event)\n\
         \tif err != nil {\n\
         \t\treturn errors.WithDetails(errors.WithMessage(err, \"failed to dispatch event\"), \"event\", \"Created\")\n\
         \t}\n\
         \n\
         \treturn nil\n\
         }\n"
    ));
    assert!(!source.contains("context.Background()"));
    assert!(source.contains("\t\"emperror.dev/errors\"\n"));
}

#[test]
fn test_errors_alias_collision_is_deterministic() {
    let package = PackageRef::new("example.com/app/errors", "errors");
    let dispatchers = [EventDispatcher::new("Failure").method(
        EventMethod::new("Failed", TypeRef::qualified(package, "Failed")).returns_error(),
    )];

    let first = generate(&dispatchers);
    assert!(first.contains("\t\"emperror.dev/errors\"\n"));
    assert!(first.contains("\terrors1 \"example.com/app/errors\"\n"));
    assert!(first.contains("Failed(event errors1.Failed) error {"));
    assert!(first.contains("return errors.WithDetails(errors.WithMessage(err,"));
    assert_eq!(generate(&dispatchers), first);
}

#[test]
fn test_multiple_dispatchers_share_event_bus() {
    let dispatchers = [
        EventDispatcher::new("Order").method(EventMethod::new("Created", order_event("Created"))),
        EventDispatcher::new("Audit").method(EventMethod::new("Logged", order_event("Logged"))),
    ];
    let source = generate(&dispatchers);

    assert_eq!(source.matches("type EventBus interface").count(), 1);
    assert!(source.contains("func NewAuditEventDispatcher(bus EventBus) AuditEventDispatcher {"));
}

#[test]
fn test_custom_header() {
    let spec = file_spec().header("Copyright 2020 Acme Inc.");
    let dispatchers = [EventDispatcher::new("Order")];
    let file = DispatcherFile::new(&dispatchers).generate(&spec).unwrap();

    assert!(file.text().starts_with(
        "// +build !ignore_autogenerated\n\n\
         // Copyright 2020 Acme Inc.\n\n\
         // Code generated by mga tool. DO NOT EDIT.\n\n\
         package orderdriver\n"
    ));
}

#[test]
fn test_invalid_event_produces_no_file() {
    let dispatchers = [EventDispatcher::new("Order")
        .method(EventMethod::new("Created", TypeRef::local("Created")))];

    let err = DispatcherFile::new(&dispatchers).generate(&file_spec()).unwrap_err();
    assert!(matches!(*err, Error::InvalidSpec { .. }));
}
