use thiserror::Error;

use suilens::RecordError;

/// Shown to users for every fetch failure. The detailed cause only goes to the logs.
pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch transaction details. Check the digest and try again.";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("fullnode returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("transaction {0} not found")]
    NotFound(String),
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

impl From<RecordError> for FetchError {
    fn from(err: RecordError) -> Self {
        FetchError::Malformed(err.to_string())
    }
}

/// Narrative service failure. Displayed verbatim in place of the narrative.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("Groq API Error: no API key configured")]
    NotConfigured,

    #[error("Groq API Error: {0}")]
    Http(String),

    #[error("Groq API Error: {0}")]
    Api(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}
