use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No response from server")]
    NoResponse,

    #[error("Connection reset by peer")]
    ConnectionReset,

    #[error("Malformed HTTP message: {0}")]
    MalformedHttp(String),

    #[error("Invalid URL '{0}'. Should be http://<host>[:<port>][/<prefix>]")]
    InvalidUrl(String),

    #[error("Unsupported scheme '{0}', only plain http is available")]
    UnsupportedScheme(String),

    /// A non-2xx answer from the API. `message` is whatever the server put in
    /// `message` or `detail`, if anything.
    #[error("HTTP {status}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Http { status: u16, message: Option<String> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not logged in")]
    NoSession,

    #[error("A parallel request panicked")]
    WorkerPanicked,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error(transparent)]
    Routing(#[from] matchit::InsertError),
}

impl From<httparse::Error> for Error {
    fn from(err: httparse::Error) -> Self {
        Error::MalformedHttp(err.to_string())
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl Error {
    /// Status code of an HTTP failure, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message sent back by the server for an HTTP failure
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Pull a human readable message out of an error body.
///
/// The API answers either `{"message": "..."}` or, for validation and auth
/// errors, `{"detail": "..."}`.
pub fn message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}
