use std::env;
use std::time::Duration;

use url::Url;

use crate::error::UploadError;

/// How region writes from overlapping selections are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOrdering {
    /// Only the newest selection may write to the preview and message regions
    LatestSelection,
    /// Writes land in completion order, whichever selection they belong to
    Unordered,
}

impl WriteOrdering {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "latest" | "latest-selection" => Some(Self::LatestSelection),
            "unordered" => Some(Self::Unordered),
            _ => None,
        }
    }
}

/// Upload widget configuration
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    /// Origin the relative endpoint is resolved against (default: "http://localhost:8080")
    pub base_url: String,

    /// Relative endpoint path (default: "/upload")
    pub endpoint: String,

    /// Multipart field carrying the file (default: "image")
    pub field_name: String,

    /// Request timeout; `None` waits indefinitely (default: None)
    pub timeout: Option<Duration>,

    /// Region write policy for overlapping selections (default: latest selection)
    pub ordering: WriteOrdering,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            endpoint: "/upload".to_string(),
            field_name: "image".to_string(),
            timeout: None,
            ordering: WriteOrdering::LatestSelection,
        }
    }
}

impl UploaderConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            base_url: env::var("UPLOADER_BASE_URL").unwrap_or(default.base_url),

            endpoint: env::var("UPLOADER_ENDPOINT").unwrap_or(default.endpoint),

            field_name: env::var("UPLOADER_FIELD_NAME").unwrap_or(default.field_name),

            timeout: env::var("UPLOADER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .or(default.timeout),

            ordering: env::var("UPLOADER_ORDERING")
                .ok()
                .and_then(|v| WriteOrdering::parse(&v))
                .unwrap_or(default.ordering),
        }
    }

    /// Absolute URL of the upload endpoint
    pub fn endpoint_url(&self) -> Result<Url, UploadError> {
        let base = Url::parse(&self.base_url)?;
        Ok(base.join(&self.endpoint)?)
    }
}
