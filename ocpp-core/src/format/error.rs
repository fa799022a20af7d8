use core::fmt;

/// Failures that are not reported by the peer as a CallError frame.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub enum GenericError {
    /// No response arrived within the call timeout.
    TimeOut,
    /// The transport was not open, or closed while the call was pending.
    Offline,
    /// The transport failed to open or to deliver a frame.
    Transport(String),
    /// A frame or payload could not be decoded.
    ParsingError,
    General,
}

impl fmt::Display for GenericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericError::TimeOut => write!(f, "timeout"),
            GenericError::Offline => write!(f, "transport offline"),
            GenericError::Transport(reason) => write!(f, "transport error: {reason}"),
            GenericError::ParsingError => write!(f, "malformed payload"),
            GenericError::General => write!(f, "general error"),
        }
    }
}

impl std::error::Error for GenericError {}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub enum OcppError<T> {
    /// The peer answered with a CallError frame.
    Protocol {
        code: T,
        description: String,
    },
    Other(GenericError),
}

impl<T: fmt::Display> fmt::Display for OcppError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OcppError::Protocol { code, description } if description.is_empty() => {
                write!(f, "{code}")
            }
            OcppError::Protocol { code, description } => write!(f, "{code}: {description}"),
            OcppError::Other(e) => e.fmt(f),
        }
    }
}

impl<T: fmt::Display + fmt::Debug> std::error::Error for OcppError<T> {}
