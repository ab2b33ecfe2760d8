use miette::Diagnostic;
use thiserror::Error;

/// Classification of a failed [`crate::twapi::Engine::execute`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Transport,
    Upstream,
    NotFound,
    Decode,
    Cancelled,
}

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("invalid parameters: {message}")]
    #[diagnostic(code(teamwork_mcp::twapi::invalid_argument))]
    InvalidArgument { message: String },

    #[error("failed to reach the Teamwork API")]
    #[diagnostic(
        code(teamwork_mcp::twapi::transport),
        help("Check TEAMWORK_SERVER and network connectivity; the request may be retried.")
    )]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream error: {status} {message}")]
    #[diagnostic(code(teamwork_mcp::twapi::upstream))]
    Upstream { status: u16, message: String },

    #[error("not found: {message}")]
    #[diagnostic(code(teamwork_mcp::twapi::not_found))]
    NotFound { message: String },

    #[error("invalid response from the Teamwork API: {message}")]
    #[diagnostic(code(teamwork_mcp::twapi::decode))]
    Decode { message: String },

    #[error("request cancelled")]
    #[diagnostic(code(teamwork_mcp::twapi::cancelled))]
    Cancelled,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Upstream { .. } => ErrorKind::Upstream,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode {
            message: e.to_string(),
        }
    }
}

impl From<crate::params::BindError> for Error {
    fn from(e: crate::params::BindError) -> Self {
        Error::InvalidArgument {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
