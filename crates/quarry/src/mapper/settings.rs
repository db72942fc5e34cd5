use std::time::Duration;

/// Execution defaults applied by the [`Mapper`](crate::Mapper).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Timeout for commands that do not set their own.
    pub command_timeout: Option<Duration>,

    /// Ask the driver to produce only the first result set.
    pub single_result: bool,

    /// Ask the driver for a single row in `query_first*`.
    pub single_row_for_first: bool,
}
