use super::Error;

/// Error when no parameter strategy can bind a type.
///
/// This is a configuration error: the type was never registered with a
/// strategy, or one of its properties has neither a wire type nor a custom
/// type handler. It is raised the first time the type is used and is never
/// retried.
#[derive(Debug)]
pub(super) struct UnsupportedParameterTypeError {
    type_name: Box<str>,
}

impl std::error::Error for UnsupportedParameterTypeError {}

impl core::fmt::Display for UnsupportedParameterTypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported parameter type: {}", self.type_name)
    }
}

impl Error {
    /// Creates an unsupported parameter type error.
    pub fn unsupported_parameter_type(type_name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedParameterType(
            UnsupportedParameterTypeError {
                type_name: type_name.into().into(),
            },
        ))
    }

    /// Returns `true` if this error, or any error it wraps, is an unsupported parameter type.
    pub fn is_unsupported_parameter_type(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnsupportedParameterType(_)))
    }
}
