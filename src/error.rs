//! Error types for porkbun-ddns.

use crate::record::RecordType;
use thiserror::Error;

/// Result type alias for porkbun-ddns.
pub type Result<T> = std::result::Result<T, DdnsError>;

/// DDNS error types.
#[derive(Error, Debug)]
pub enum DdnsError {
    /// Request body could not be serialized.
    #[error("JSON encoding request data: {0}")]
    Encode(#[source] serde_json::Error),

    /// Sending the request or receiving the response failed.
    #[error("doing http request: {0}")]
    Transport(#[source] reqwest::Error),

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's deadline passed before the exchange completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The provider answered with a status other than 200 OK.
    #[error("HTTP status is not valid: {status}: {message}")]
    HttpStatus {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("JSON decoding response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Draining the response body failed after a successful status.
    #[error("closing response body: {0}")]
    ReleaseBody(#[source] reqwest::Error),

    /// Operation context: which record the failure concerns.
    #[error("for record type {record_type}{suffix}", suffix = record_id_suffix(.record_id))]
    Record {
        record_type: RecordType,
        record_id: Option<String>,
        #[source]
        source: Box<DdnsError>,
    },

    /// Unrecognized public IP echo provider name.
    #[error("unknown public IP echo DNS provider: {0}")]
    UnknownIpProvider(String),

    /// Timeout must be strictly positive.
    #[error("timeout must be strictly positive")]
    InvalidTimeout,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn record_id_suffix(record_id: &Option<String>) -> String {
    match record_id {
        Some(id) => format!(" and record id {id}"),
        None => String::new(),
    }
}

impl DdnsError {
    /// Wrap an error with the record type it concerns.
    pub fn for_record(record_type: RecordType, source: DdnsError) -> Self {
        DdnsError::Record {
            record_type,
            record_id: None,
            source: Box::new(source),
        }
    }

    /// Wrap an error with the record type and identifier it concerns.
    pub fn for_record_id(record_type: RecordType, record_id: &str, source: DdnsError) -> Self {
        DdnsError::Record {
            record_type,
            record_id: Some(record_id.to_string()),
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through record context.
    pub fn root_cause(&self) -> &DdnsError {
        match self {
            DdnsError::Record { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The HTTP status carried by a status failure, if any.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self.root_cause() {
            DdnsError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the provider rejected the request with a non-200 status.
    pub fn is_status(&self) -> bool {
        self.status().is_some()
    }

    /// Whether retrying the same call later could plausibly succeed.
    ///
    /// Network failures, deadlines and 5xx/429 answers are retryable;
    /// rejections, malformed payloads and configuration errors are not.
    pub fn is_retryable(&self) -> bool {
        match self.root_cause() {
            DdnsError::Transport(_) | DdnsError::ReleaseBody(_) | DdnsError::DeadlineExceeded => {
                true
            }
            DdnsError::HttpStatus { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

impl From<toml::de::Error> for DdnsError {
    fn from(e: toml::de::Error) -> Self {
        DdnsError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for DdnsError {
    fn from(e: toml::ser::Error) -> Self {
        DdnsError::Config(e.to_string())
    }
}
