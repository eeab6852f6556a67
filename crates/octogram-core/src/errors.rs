/// Core error type for the relay.
///
/// Every failure is handled within its own request; nothing is retried or
/// queued. The HTTP layer maps variants to response codes through
/// [`Error::status_code`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Structurally invalid request: missing header, missing field, bad JSON.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("method not allowed")]
    MethodNotAllowed,

    /// Bad signature, bad shared key, or an undecodable chat token.
    /// Deliberately carries no detail about which check failed.
    #[error("unauthorized")]
    Auth,

    /// No chat target could be resolved for an otherwise valid request.
    #[error("routing error: {0}")]
    Routing(String),

    /// The chat platform reported a delivery failure (`ok: false`) or was
    /// unreachable; the description is passed through to the caller.
    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status the relay answers with for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) | Error::Json(_) => 400,
            Error::Auth => 401,
            Error::MethodNotAllowed => 405,
            Error::Routing(_) | Error::Upstream(_) => 422,
            Error::Config(_) | Error::Io(_) | Error::Internal(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
