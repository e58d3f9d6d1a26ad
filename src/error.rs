//! Error taxonomy for session operations.
//!
//! Storage serialization problems never appear here: they degrade to an
//! absent value inside the client. Everything else is surfaced to the caller
//! and, for the login form, to the user.

/// Errors produced by session client operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A required form field was empty. No request was sent.
    #[error("{0}")]
    Validation(String),

    /// The server answered with a non-success status. `message` is the
    /// response body, or a generic fallback when the body was empty.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The server answered with success but the body carried no token.
    #[error("Invalid server response (missing token).")]
    MalformedResponse,

    /// The success body was not valid JSON.
    #[error("Invalid server response: {0}")]
    Parse(String),

    /// The request never produced a response (connection, DNS, TLS).
    #[error("Unable to reach the server: {0}")]
    Transport(String),

    /// A URL could not be parsed or built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header value (usually the bearer token) is not valid in HTTP.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// A configuration value could not be used.
    #[error("config error: {0}")]
    Config(String),
}

impl SessionError {
    /// Stable machine-readable code, used in structured log fields.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Http { .. } => "E_HTTP",
            Self::MalformedResponse => "E_MALFORMED_RESPONSE",
            Self::Parse(_) => "E_PARSE",
            Self::Transport(_) => "E_TRANSPORT",
            Self::InvalidUrl(_) => "E_INVALID_URL",
            Self::InvalidHeader(_) => "E_INVALID_HEADER",
            Self::Config(_) => "E_CONFIG",
        }
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderName> for SessionError {
    fn from(err: reqwest::header::InvalidHeaderName) -> Self {
        Self::Config(format!("invalid header name: {err}"))
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
