/// Failure to convert an operator argument into a protocol value.
///
/// Produced by the value types in [`crate::types`]. A command that hits one of
/// these never reaches the device.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The argument was not a number.
    #[error("{field} must be a number, got {token:?}")]
    NotNumeric { field: &'static str, token: String },

    /// The argument was a number outside its domain.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The argument was not one of the accepted words.
    #[error("{field} must be one of {expected}, got {token:?}")]
    UnknownToken {
        field: &'static str,
        token: String,
        expected: &'static str,
    },
}

impl ValidationError {
    pub(crate) fn not_numeric(field: &'static str, token: &str) -> Self {
        ValidationError::NotNumeric {
            field,
            token: token.to_string(),
        }
    }

    pub(crate) fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    pub(crate) fn unknown_token(field: &'static str, token: &str, expected: &'static str) -> Self {
        ValidationError::UnknownToken {
            field,
            token: token.to_string(),
            expected,
        }
    }
}

/// All error types that can occur while driving the console.
///
/// Everything except [`Error::Io`] is recovered inside the current input turn:
/// the message is printed and the session state is left as it was.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A token that must be an integer was not one.
    #[error("{what} must be a number, got {token:?}")]
    Parse { what: &'static str, token: String },

    /// A selection or relay index outside its valid bounds.
    #[error("{what} {value} is not valid; choose between {min} and {max}")]
    Range {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Wrong number of arguments for a command.
    #[error("usage: {usage}")]
    Arity { usage: &'static str },

    /// The selected device lacks the feature a command needs.
    #[error("{device} does not support {capability}")]
    Capability {
        device: String,
        capability: &'static str,
    },

    /// No command is registered under this code.
    #[error("{0} is not a known command")]
    UnknownCommand(u32),

    /// An argument failed unit conversion.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Reading the console input failed.
    #[error("console {action} error: {err:?}")]
    Io { action: String, err: std::io::Error },
}

impl Error {
    /// Create a new parse error
    pub fn parse(what: &'static str, token: &str) -> Self {
        Error::Parse {
            what,
            token: token.to_string(),
        }
    }

    /// Create a new range error
    pub fn range(what: &'static str, value: i64, min: i64, max: i64) -> Self {
        Error::Range {
            what,
            value,
            min,
            max,
        }
    }

    /// Create a new capability error
    pub fn capability(device: &str, capability: &'static str) -> Self {
        Error::Capability {
            device: device.to_string(),
            capability,
        }
    }

    /// Create a new console io error
    pub fn io(action: &str, err: std::io::Error) -> Self {
        Error::Io {
            action: action.to_string(),
            err,
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
