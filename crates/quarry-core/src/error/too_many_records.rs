use super::Error;

/// Error when a query expected exactly one row and received more.
#[derive(Debug)]
pub(super) struct TooManyRecordsError {
    context: Box<str>,
}

impl std::error::Error for TooManyRecordsError {}

impl core::fmt::Display for TooManyRecordsError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "too many records: {}", self.context)
    }
}

impl Error {
    /// Creates a too-many-records error.
    pub fn too_many_records(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TooManyRecords(TooManyRecordsError {
            context: context.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a too-many-records error.
    pub fn is_too_many_records(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::TooManyRecords(_)))
    }
}
