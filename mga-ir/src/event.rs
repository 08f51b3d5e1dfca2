use crate::TypeRef;

/// An event dispatcher to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDispatcher {
    /// Base name; the generated type is `{name}EventDispatcher`.
    pub name: String,
    /// Dispatcher methods in declaration order.
    pub methods: Vec<EventMethod>,
}

impl EventDispatcher {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, method: EventMethod) -> Self {
        self.methods.push(method);
        self
    }
}

/// A single dispatcher method publishing one event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMethod {
    /// Method name.
    pub name: String,
    /// Type of the dispatched event.
    pub event: TypeRef,
    /// Whether the method takes a `context.Context` first parameter.
    pub receives_context: bool,
    /// Whether the method returns an `error`.
    pub returns_error: bool,
}

impl EventMethod {
    pub fn new(name: impl Into<String>, event: TypeRef) -> Self {
        Self {
            name: name.into(),
            event,
            receives_context: false,
            returns_error: false,
        }
    }

    pub fn receives_context(mut self) -> Self {
        self.receives_context = true;
        self
    }

    pub fn returns_error(mut self) -> Self {
        self.returns_error = true;
        self
    }
}
