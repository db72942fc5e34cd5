use super::Error;

/// Error when no result binder strategy can produce a type.
#[derive(Debug)]
pub(super) struct UnsupportedResultTypeError {
    type_name: Box<str>,
}

impl std::error::Error for UnsupportedResultTypeError {}

impl core::fmt::Display for UnsupportedResultTypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported result type: {}", self.type_name)
    }
}

impl Error {
    /// Creates an unsupported result type error.
    pub fn unsupported_result_type(type_name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedResultType(
            UnsupportedResultTypeError {
                type_name: type_name.into().into(),
            },
        ))
    }

    /// Returns `true` if this error, or any error it wraps, is an unsupported result type.
    pub fn is_unsupported_result_type(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnsupportedResultType(_)))
    }
}
