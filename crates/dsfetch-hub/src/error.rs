use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("missing configuration: no credential file at {expected} and no fallback found in {searched:?}")]
    MissingCredentials {
        expected: PathBuf,
        searched: Vec<PathBuf>,
    },

    #[error("could not determine the home directory")]
    HomeDirUnknown,

    #[error("failed to create output directory {path}: {source}")]
    Bootstrap {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid dataset identifier {0:?}")]
    InvalidIdentifier(String),

    #[error("request to {url} failed with status {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("dataset {dataset} has several configurations and none is named default: {configs:?}")]
    AmbiguousConfig {
        dataset: String,
        configs: Vec<String>,
    },

    #[error("unexpected response for {dataset} split {split}: {reason}")]
    MalformedResponse {
        dataset: String,
        split: String,
        reason: String,
    },

    #[error("dataset {dataset} split {split} is incomplete: {reason}")]
    Incomplete {
        dataset: String,
        split: String,
        reason: String,
    },

    #[error("dataset {0} has no splits")]
    NoSplits(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl FetchError {
    /// Errors that end the whole run rather than a single dataset.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FetchError::MissingCredentials { .. }
                | FetchError::HomeDirUnknown
                | FetchError::Bootstrap { .. }
        )
    }

    /// Whether trying the same request again later could plausibly succeed.
    /// Only used for reporting; nothing is retried.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(e) => e.is_timeout() || e.is_connect(),
            FetchError::Status { status, .. } => {
                matches!(status, 408 | 429) || (500..600).contains(status)
            }
            _ => false,
        }
    }
}
