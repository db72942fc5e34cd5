/// Hints passed with `execute_reader`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Behavior {
    /// Close the connection when the reader is dropped.
    pub close_connection: bool,

    /// Only the first result set will be read.
    pub single_result: bool,

    /// Only the first row will be read.
    pub single_row: bool,
}

impl Behavior {
    pub const DEFAULT: Behavior = Behavior {
        close_connection: false,
        single_result: false,
        single_row: false,
    };

    pub const CLOSE_CONNECTION: Behavior = Behavior {
        close_connection: true,
        ..Behavior::DEFAULT
    };

    pub fn with_close_connection(self, close_connection: bool) -> Behavior {
        Behavior {
            close_connection,
            ..self
        }
    }

    pub fn with_single_result(self, single_result: bool) -> Behavior {
        Behavior {
            single_result,
            ..self
        }
    }

    pub fn with_single_row(self, single_row: bool) -> Behavior {
        Behavior { single_row, ..self }
    }
}
