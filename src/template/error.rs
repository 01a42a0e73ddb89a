use thiserror::Error;

/// Failure to parse or execute a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template text is malformed.
    #[error("template: {name}:{line}: {message}")]
    Parse { name: String, line: usize, message: String },

    /// An action failed while the template was executing.
    #[error("template: {name}:{line}: executing {action:?}: {message}")]
    Exec { name: String, line: usize, action: String, message: String },

    /// A function was called with the wrong number of arguments.
    #[error("wrong number of args for {func}: want {want} got {got}")]
    Arity { func: &'static str, want: usize, got: usize },

    /// A function or field access received a value of the wrong type.
    #[error("wrong type for value; expected {expected}; got {got}")]
    Type { expected: &'static str, got: &'static str },

    /// Error raised by a user-registered function.
    #[error("{0}")]
    Func(String),
}

impl TemplateError {
    /// Creates an error for a user-registered function.
    #[inline]
    pub fn func(message: impl Into<String>) -> Self {
        Self::Func(message.into())
    }
}
