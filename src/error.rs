use thiserror::Error;

/// Failures raised while registering classes or shaping signatures.
///
/// All of these are recoverable at the class or member boundary: the
/// offending unit is reported and dropped, the run continues.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("{0} is not exposed to C++ via annotation or command line")]
    UnexposedType(String),

    #[error("C++ name {name} is already used by {owner}")]
    DuplicateNativeName { name: String, owner: String },

    #[error("C++ class name {name} is already used by {owner}")]
    DuplicateClassName { name: String, owner: String },

    #[error("annotation {annotation} is not configured correctly: {detail}")]
    MisconfiguredAnnotation { annotation: String, detail: String },

    #[error("cannot find class {0}")]
    UnknownClass(String),

    #[error("only classes, interfaces and enums can be annotated with {0}")]
    NotAClass(String),
}

/// A [`BindError`] annotated with the member it occurred in, raised while
/// extracting one class's content.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ContentError {
    pub member: String,
    #[source]
    pub source: BindError,
}

impl ContentError {
    pub fn new(member: impl Into<String>, source: BindError) -> Self {
        Self {
            member: member.into(),
            source,
        }
    }
}
