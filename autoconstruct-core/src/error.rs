// Error types for autoconstruct

use crate::TypeDescriptor;
use thiserror::Error;

/// Boxed error returned by fallible constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("There are no public constructors for type {target}.")]
    NoPublicConstructor { target: TypeDescriptor },

    #[error(
        "There are more than one constructor for type {target}. Use with_parameter_types to disambiguate."
    )]
    AmbiguousConstructor { target: TypeDescriptor },

    #[error("No constructor of {target} matches ({})", join_types(.requested))]
    NoMatchingConstructor {
        target: TypeDescriptor,
        requested: Vec<TypeDescriptor>,
    },

    #[error("Named parameter {name} is not among formal parameters of constructor.")]
    UnknownParameterName { name: String },

    #[error("Named parameter {name} is not of type {expected}")]
    ParameterTypeMismatch {
        name: String,
        expected: TypeDescriptor,
        actual: TypeDescriptor,
    },

    #[error(
        "Cannot autoinject parameter of type {ty} as it is not used in any constructor of {target}"
    )]
    UnusedParameterType {
        ty: TypeDescriptor,
        target: TypeDescriptor,
    },

    #[error("Named parameter {name} has already been injected.")]
    DuplicateNamedInjection { name: String },

    #[error("Unnamed parameter of type {ty} has already been injected.")]
    DuplicateUnnamedInjection { ty: TypeDescriptor },

    #[error(
        "Cannot substitute parameter {parameter} of type {ty}: it is not a mockable capability type"
    )]
    UnmockableType {
        parameter: String,
        ty: TypeDescriptor,
    },

    #[error(
        "Injected value of type {ty} is not Clone and was already moved into another parameter. Inject it by name for each parameter."
    )]
    InjectionConsumed { ty: TypeDescriptor },

    #[error("You may only call build() once.")]
    AlreadyConstructed,

    #[error("Cannot instantiate {target}: argument {position} is not a {expected}")]
    Instantiation {
        target: TypeDescriptor,
        position: usize,
        expected: TypeDescriptor,
    },

    #[error("Constructor of {target} failed: {source}")]
    ConstructorFailed {
        target: TypeDescriptor,
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// Wrap the error returned by a fallible constructor of `T`.
    pub fn constructor_failed<T: 'static>(source: impl Into<BoxError>) -> Self {
        Error::ConstructorFailed {
            target: TypeDescriptor::of::<T>(),
            source: source.into(),
        }
    }

    /// Whether the error was raised while resolving a constructor signature.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Error::NoPublicConstructor { .. }
                | Error::AmbiguousConstructor { .. }
                | Error::NoMatchingConstructor { .. }
        )
    }

    /// Whether the error was raised while recording an injection.
    pub fn is_injection_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownParameterName { .. }
                | Error::ParameterTypeMismatch { .. }
                | Error::UnusedParameterType { .. }
                | Error::DuplicateNamedInjection { .. }
                | Error::DuplicateUnnamedInjection { .. }
        )
    }
}

fn join_types(types: &[TypeDescriptor]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    #[test]
    fn test_no_matching_constructor_lists_requested_types() {
        let err = Error::NoMatchingConstructor {
            target: TypeDescriptor::of::<Widget>(),
            requested: vec![TypeDescriptor::of::<String>(), TypeDescriptor::of::<i32>()],
        };
        assert_eq!(err.to_string(), "No constructor of Widget matches (String, i32)");
    }

    #[test]
    fn test_no_matching_constructor_with_empty_list() {
        let err = Error::NoMatchingConstructor {
            target: TypeDescriptor::of::<Widget>(),
            requested: vec![],
        };
        assert_eq!(err.to_string(), "No constructor of Widget matches ()");
    }

    #[test]
    fn test_error_categories() {
        assert!(
            Error::AmbiguousConstructor {
                target: TypeDescriptor::of::<Widget>()
            }
            .is_resolution_error()
        );
        assert!(
            Error::DuplicateNamedInjection {
                name: "value".to_string()
            }
            .is_injection_error()
        );
        assert!(!Error::AlreadyConstructed.is_injection_error());
        assert!(!Error::AlreadyConstructed.is_resolution_error());
        assert!(
            !Error::InjectionConsumed {
                ty: TypeDescriptor::of::<Widget>()
            }
            .is_injection_error()
        );
    }

    #[test]
    fn test_constructor_failed_keeps_source() {
        let err = Error::constructor_failed::<Widget>("service must not be empty");
        assert_eq!(
            err.to_string(),
            "Constructor of Widget failed: service must not be empty"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
