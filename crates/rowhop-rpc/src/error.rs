use rowhop_core::source::SourceError;
use thiserror::Error as ThisError;

///
/// RpcError
///
/// Transport and protocol failures of the object service. Mapped into
/// [`SourceError`] at the materializer boundary.
///

#[derive(Debug, ThisError)]
pub enum RpcError {
    #[error("invalid service url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("http status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("service error: {message}")]
    Service { message: String },

    #[error("authentication rejected for user '{username}'")]
    Auth { username: String },

    #[error("unexpected response shape: {message}")]
    Decode { message: String },
}

impl From<RpcError> for SourceError {
    fn from(err: RpcError) -> Self {
        match &err {
            RpcError::Auth { .. } => Self::auth(err.to_string()),
            RpcError::Service { .. } | RpcError::Decode { .. } => Self::protocol(err.to_string()),
            RpcError::InvalidUrl { .. } | RpcError::Http(_) | RpcError::Status { .. } => {
                Self::transport(err.to_string())
            }
        }
    }
}
