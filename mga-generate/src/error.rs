use miette::Diagnostic;
use thiserror::Error;

/// Result type for producers (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("invalid {context}: {message}")]
    #[diagnostic(code(mga::invalid_spec))]
    InvalidSpec { context: String, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(mga_codegen::Error),
}

impl Error {
    pub fn invalid_spec(context: impl Into<String>, message: impl Into<String>) -> Box<Self> {
        Box::new(Error::InvalidSpec {
            context: context.into(),
            message: message.into(),
        })
    }
}

impl From<Box<mga_codegen::Error>> for Box<Error> {
    fn from(err: Box<mga_codegen::Error>) -> Self {
        Box::new(Error::Engine(*err))
    }
}
