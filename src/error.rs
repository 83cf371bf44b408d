use thiserror::Error;

/// Failures of a single upload attempt.
///
/// The `Display` text is the description shown to the user in the
/// `Error:` message.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid JSON response: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid JSON response: cannot read properties of null (reading 'url')")]
    NullReply,

    #[error("Upload task failed: {0}")]
    Task(String),
}
