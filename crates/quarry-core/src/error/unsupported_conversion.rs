use super::Error;
use crate::Value;

/// Error when a wire value cannot be converted to the destination type.
///
/// Raised at bind time for the specific value that failed, for example a
/// text column holding `"abc"` bound to an integer property, or an integer
/// that does not fit the destination width.
#[derive(Debug)]
pub(super) struct UnsupportedConversionError {
    from: &'static str,
    to: Box<str>,
}

impl std::error::Error for UnsupportedConversionError {}

impl core::fmt::Display for UnsupportedConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot convert {} to {}", self.from, self.to)
    }
}

impl Error {
    /// Creates an unsupported conversion error for `value` and the named
    /// destination type.
    pub fn unsupported_conversion(value: &Value, to: impl core::fmt::Display) -> Error {
        Error::from(super::ErrorKind::UnsupportedConversion(
            UnsupportedConversionError {
                from: value.kind(),
                to: to.to_string().into(),
            },
        ))
    }

    /// Returns `true` if this error, or any error it wraps, is an unsupported conversion.
    pub fn is_unsupported_conversion(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnsupportedConversion(_)))
    }
}
