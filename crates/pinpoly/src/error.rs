//! Error type shared by validation, synthesis and parsing.
//!
//! Task launch failures are not errors: the executor records them in `ExecReport`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Vertex count, batch size or worker count out of bounds.
    InvalidParameter { reason: String },
    /// Scratch buffers for synthesis could not be reserved.
    AllocationFailure { reason: String },
    /// Bracketed pair input could not be read.
    Parse { fragment: String, reason: String },
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    pub(crate) fn allocation(reason: impl Into<String>) -> Self {
        Self::AllocationFailure {
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { reason } => write!(f, "invalid parameter: {reason}"),
            Self::AllocationFailure { reason } => write!(f, "allocation failure: {reason}"),
            Self::Parse { fragment, reason } => {
                write!(f, "cannot parse `{fragment}`: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}
