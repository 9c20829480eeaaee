//! Error types for the facts system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::types::Type;

/// Result type alias using the facts error type.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for facts operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Names the operation that failed, keeping any existing frames.
    #[must_use]
    pub fn in_operation(mut self, operation: &'static str) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_operation(operation));
        self
    }

    /// Creates a declaration error.
    #[must_use]
    pub fn declaration(error: DeclarationError) -> Self {
        Self::new(ErrorKind::Declaration(error))
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates a result type mismatch error.
    #[must_use]
    pub fn result_type_mismatch(expected: ResultKind, actual: Type) -> Self {
        Self::new(ErrorKind::ResultTypeMismatch { expected, actual })
    }

    /// Creates an annotation type mismatch error.
    #[must_use]
    pub fn annotation_type_mismatch(label: impl Into<String>, expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::AnnotationTypeMismatch {
            label: label.into(),
            expected,
            actual,
        })
    }

    /// Creates an illegal state error.
    #[must_use]
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalState(message.into()))
    }

    /// Creates an index out of bounds error.
    #[must_use]
    pub fn index_out_of_bounds(index: usize, length: usize) -> Self {
        Self::new(ErrorKind::IndexOutOfBounds { index, length })
    }

    /// Creates a label not found error.
    #[must_use]
    pub fn label_not_found(label: impl Into<String>, ty: Type) -> Self {
        Self::new(ErrorKind::LabelNotFound {
            label: label.into(),
            ty,
        })
    }

    /// Creates an unsupported operation error.
    #[must_use]
    pub fn unsupported(operation: &'static str, ty: Type) -> Self {
        Self::new(ErrorKind::UnsupportedOperation { operation, ty })
    }

    /// Returns true if this is a declaration error.
    #[must_use]
    pub const fn is_declaration(&self) -> bool {
        matches!(self.kind, ErrorKind::Declaration(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A declaration conflicts with the registry or uses a bad name.
    #[error("declaration error: {0}")]
    Declaration(DeclarationError),

    /// An inserted or assigned value is not a subtype of the declared bound.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The declared bound.
        expected: Type,
        /// The runtime type of the offending value.
        actual: Type,
    },

    /// The caller asked for one composite kind but the result is another.
    #[error("result type mismatch: expected a {expected}, got {actual}")]
    ResultTypeMismatch {
        /// The kind the caller asked for.
        expected: ResultKind,
        /// The computed result type.
        actual: Type,
    },

    /// An annotation value has the wrong type.
    #[error("annotation @{label}: expected {expected}, got {actual}")]
    AnnotationTypeMismatch {
        /// The annotation label.
        label: String,
        /// The declared (or previously set) annotation type.
        expected: Type,
        /// The type of the rejected value.
        actual: Type,
    },

    /// A sealed writer was mutated.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Index out of bounds.
    #[error("index out of bounds: {index} (length {length})")]
    IndexOutOfBounds {
        /// The index that was accessed.
        index: usize,
        /// The actual length.
        length: usize,
    },

    /// A field label does not exist on the type.
    #[error("label not found: {label} in {ty}")]
    LabelNotFound {
        /// The requested label.
        label: String,
        /// The type that was searched.
        ty: Type,
    },

    /// The operation does not apply to this type.
    #[error("unsupported operation {operation} on {ty}")]
    UnsupportedOperation {
        /// The attempted operation.
        operation: &'static str,
        /// The type it was attempted on.
        ty: Type,
    },
}

/// Ways a declaration can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// The name is not a valid identifier.
    #[error("not a valid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A named type was redeclared with a different aliased type.
    #[error("cannot redeclare {name} = {existing} as {requested}")]
    ConflictingAlias {
        /// The alias name.
        name: String,
        /// The type it already aliases.
        existing: Type,
        /// The type the redeclaration asked for.
        requested: Type,
    },

    /// The name is already taken by a declaration of another kind.
    #[error("{name} is already declared as a {existing}")]
    NameInUse {
        /// The contested name.
        name: String,
        /// What the name is already bound to ("sort" or "named type").
        existing: &'static str,
    },

    /// The sort was never declared in this universe.
    #[error("unknown sort: {0}")]
    UnknownSort(Type),

    /// A sort was expected.
    #[error("not a sort: {0}")]
    NotASort(Type),

    /// Constructor children must be given as a tuple type.
    #[error("constructor children must be a tuple type, got {0}")]
    ChildrenNotATuple(Type),

    /// The sort already has an anonymous constructor.
    #[error("sort {sort} already has an anonymous constructor")]
    DuplicateAnonymousConstructor {
        /// The sort.
        sort: Type,
    },

    /// An annotation was redeclared with a different type.
    #[error("annotation @{label} on {on} is already declared as {existing}, not {requested}")]
    ConflictingAnnotation {
        /// The type the annotation was declared on.
        on: Type,
        /// The annotation label.
        label: String,
        /// The type it was declared with before.
        existing: Type,
        /// The conflicting type.
        requested: Type,
    },
}

/// The composite kind a caller may force on a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// A set whose element type is not a tuple.
    Set,
    /// A set of tuples.
    Relation,
    /// A list of tuples.
    ListRelation,
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => write!(f, "set"),
            Self::Relation => write!(f, "relation"),
            Self::ListRelation => write!(f, "list relation"),
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that failed (e.g. `list.append`).
    pub operation: Option<&'static str>,
    /// Enclosing operations, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failing operation, pushing any previous one onto the stack.
    #[must_use]
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if let Some(previous) = self.operation.replace(operation) {
            self.stack.push(previous.to_string());
        }
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = self.operation {
            write!(f, "in {operation}")?;
        }
        for frame in &self.stack {
            write!(f, "\n  from {frame}")?;
        }
        Ok(())
    }
}
