use thiserror::Error;

/// Every way a conversion or lookup can fail. Nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The body did not have any of the shapes the endpoint is allowed to return.
    #[error("Unexpected Response: {0}.")]
    UnexpectedResponse(String),

    /// The server answered with a `detail` field; surfaced verbatim.
    #[error("{0}")]
    ServerError(String),

    /// Rejected before anything was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request never produced a body to interpret.
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl ConversionError {
    pub fn is_server_error(&self) -> bool {
        matches!(self, ConversionError::ServerError(_))
    }
}

impl From<reqwest::Error> for ConversionError {
    fn from(e: reqwest::Error) -> Self {
        ConversionError::Transport(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}
