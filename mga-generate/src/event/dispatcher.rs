use mga_codegen::builder::{
    CompositeLit, Expr, Field, File, FuncDecl, IfStmt, InterfaceDecl, MethodSig, Param,
    Signature, Statement, StructDecl, Type,
};
use mga_ir::{EventDispatcher, EventMethod, FileSpec};

use crate::{Error, Producer, Result, new_file};

const EVENT_BUS: &str = "EventBus";
const BUS_FIELD: &str = "bus";
const ERRORS_PATH: &str = "emperror.dev/errors";

/// Event dispatchers publishing typed events through a generic event bus.
///
/// The file declares a single `EventBus` interface shared by every
/// dispatcher, then one struct, constructor and method set per dispatcher.
pub struct DispatcherFile<'a> {
    dispatchers: &'a [EventDispatcher],
}

impl<'a> DispatcherFile<'a> {
    pub fn new(dispatchers: &'a [EventDispatcher]) -> Self {
        Self { dispatchers }
    }

    fn validate(&self) -> Result<()> {
        for dispatcher in self.dispatchers {
            for method in &dispatcher.methods {
                if method.event.package_path().is_empty() {
                    return Err(Error::invalid_spec(
                        format!("event dispatcher '{}'", dispatcher.name),
                        format!(
                            "event type '{}' of method '{}' has no package path",
                            method.event.name, method.name
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Producer for DispatcherFile<'_> {
    fn file_name(&self) -> &'static str {
        "zz_generated.event_dispatcher.go"
    }

    fn build(&self, spec: &FileSpec) -> Result<File> {
        self.validate()?;

        let mut file = new_file(spec);
        file.import_name(ERRORS_PATH, "errors");
        push_event_bus(&mut file);
        for dispatcher in self.dispatchers {
            tracing::trace!(
                name = %dispatcher.name,
                methods = dispatcher.methods.len(),
                "event dispatcher"
            );
            push_dispatcher(&mut file, dispatcher);
        }
        Ok(file)
    }
}

fn push_event_bus(file: &mut File) {
    let context = file.qual("context", "Context");
    let publish = Signature::new()
        .param(Param::new("ctx", Type::qual(context)))
        .param(Param::new("event", Type::empty_interface()))
        .returns(Type::error());

    file.push_decl(
        InterfaceDecl::new(EVENT_BUS)
            .doc(format!("{EVENT_BUS} is a generic event bus."))
            .method(
                MethodSig::new("Publish", publish)
                    .doc("Publish sends an event to the underlying message bus."),
            ),
    );
}

fn push_dispatcher(file: &mut File, dispatcher: &EventDispatcher) {
    let type_name = format!("{}EventDispatcher", dispatcher.name);
    let constructor = format!("New{type_name}");

    file.push_decl(
        StructDecl::new(&type_name)
            .doc(format!(
                "{type_name} dispatches events through the underlying generic event bus."
            ))
            .field(Field::new(BUS_FIELD, Type::named(EVENT_BUS))),
    );

    let instance =
        CompositeLit::new(Type::named(&type_name)).field(BUS_FIELD, Expr::ident(BUS_FIELD));
    file.push_decl(
        FuncDecl::new(&constructor)
            .doc(format!("{constructor} returns a new {type_name} instance."))
            .param(Param::new(BUS_FIELD, Type::named(EVENT_BUS)))
            .returns(Type::named(&type_name))
            .statement(Statement::ret([Expr::from(instance)])),
    );

    for method in &dispatcher.methods {
        let decl = dispatch_method(file, &type_name, method);
        file.push_decl(decl);
    }
}

fn dispatch_method(file: &mut File, type_name: &str, method: &EventMethod) -> FuncDecl {
    let context = file.qual("context", "Context");
    let event = file.type_ref(&method.event);

    let mut decl = FuncDecl::new(&method.name)
        .doc(format!("{} dispatches a(n) {} event.", method.name, method.event.name))
        .receiver(Param::new("d", Type::named(type_name)));
    if method.receives_context {
        decl = decl.param(Param::new("ctx", Type::qual(context)));
    } else {
        let background = file.qual("context", "Background");
        decl = decl.statement(Statement::define(
            "ctx",
            Expr::from(background).call(Vec::new()),
        ));
    }
    decl = decl.param(Param::new("event", event));

    let publish = Expr::ident("d")
        .dot(BUS_FIELD)
        .dot("Publish")
        .call([Expr::ident("ctx"), Expr::ident("event")]);

    if !method.returns_error {
        return decl.statement(Statement::assign(Expr::ident("_"), publish));
    }

    let with_message = file.qual(ERRORS_PATH, "WithMessage");
    let with_details = file.qual(ERRORS_PATH, "WithDetails");
    let message = Expr::from(with_message)
        .call([Expr::ident("err"), Expr::string("failed to dispatch event")]);
    let wrapped = Expr::from(with_details).call([
        message,
        Expr::string("event"),
        Expr::string(&method.event.name),
    ]);

    decl.returns(Type::error()).statements([
        Statement::define("err", publish),
        IfStmt::new(Expr::ident("err").not_equal(Expr::Nil))
            .then(Statement::ret([wrapped]))
            .into(),
        Statement::Blank,
        Statement::ret([Expr::Nil]),
    ])
}

#[cfg(test)]
mod tests {
    use mga_ir::{PackageRef, TypeRef};

    use super::*;

    fn spec() -> FileSpec {
        FileSpec::new(PackageRef::new("example.com/app/order/orderdriver", "orderdriver"))
    }

    fn order_event(name: &str) -> TypeRef {
        TypeRef::qualified(PackageRef::new("example.com/app/order", "order"), name)
    }

    #[test]
    fn test_local_event_type_is_rejected() {
        let dispatchers = [EventDispatcher::new("Order")
            .method(EventMethod::new("Created", TypeRef::local("Created")))];

        let err = DispatcherFile::new(&dispatchers).build(&spec()).unwrap_err();
        assert!(matches!(*err, Error::InvalidSpec { .. }));
        assert!(err.to_string().contains("has no package path"));
    }

    #[test]
    fn test_declarations() {
        let dispatchers = [EventDispatcher::new("Order")
            .method(EventMethod::new("Created", order_event("Created")))
            .method(EventMethod::new("Deleted", order_event("Deleted")).returns_error())];

        let file = DispatcherFile::new(&dispatchers).build(&spec()).unwrap();
        let names: Vec<_> = file.decls().iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            ["EventBus", "OrderEventDispatcher", "NewOrderEventDispatcher", "Created", "Deleted"]
        );
    }

    #[test]
    fn test_errors_package_is_registered_first() {
        let package = PackageRef::new("example.com/app/errors", "errors");
        let event = TypeRef::qualified(package, "Failed");
        let dispatchers = [EventDispatcher::new("Error").method(EventMethod::new("Failed", event))];

        let file = DispatcherFile::new(&dispatchers).build(&spec()).unwrap();
        assert_eq!(file.registry().alias(ERRORS_PATH), Some("errors"));
        assert_eq!(file.registry().alias("example.com/app/errors"), Some("errors1"));
    }
}
