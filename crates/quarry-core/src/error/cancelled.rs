use super::Error;

/// Error when an operation observed its cancellation token firing.
#[derive(Debug)]
pub(super) struct CancelledError;

impl std::error::Error for CancelledError {}

impl core::fmt::Display for CancelledError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("operation cancelled")
    }
}

impl Error {
    /// Creates a cancellation error.
    pub fn cancelled() -> Error {
        Error::from(super::ErrorKind::Cancelled(CancelledError))
    }

    /// Returns `true` if this error, or any error it wraps, is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::Cancelled(_)))
    }
}
