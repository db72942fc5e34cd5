use super::{Error, ErrorKind};

/// A native error handed over by a driver.
#[derive(Debug)]
pub(super) struct DriverError {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut last = self.inner.to_string();
        f.write_str(&last)?;

        // Driver errors often repeat their source's message; print each
        // message once.
        let mut source = self.inner.source();
        while let Some(err) = source {
            let message = err.to_string();
            if !last.contains(&message) {
                write!(f, ": {message}")?;
            }
            last = message;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Wraps an error reported by a driver's native client.
    ///
    /// The mapping layer never rewrites these. Callers get the original back
    /// through [`driver_error`](Error::driver_error).
    pub fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(ErrorKind::Driver(DriverError {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, came from a driver.
    pub fn is_driver(&self) -> bool {
        self.any_kind(|kind| matches!(kind, ErrorKind::Driver(_)))
    }

    /// The driver's native error, if this error wraps one of type `E`.
    ///
    /// ```
    /// # use quarry_core::Error;
    /// let err = Error::driver(std::io::Error::other("disk full"));
    /// assert_eq!(err.driver_error::<std::io::Error>().unwrap().to_string(), "disk full");
    /// ```
    pub fn driver_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::Driver(driver) => driver.inner.downcast_ref::<E>(),
            _ => None,
        })
    }
}
