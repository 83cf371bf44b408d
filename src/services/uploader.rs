use reqwest::multipart::{Form, Part};
use url::Url;

use crate::config::UploaderConfig;
use crate::error::UploadError;
use crate::models::{SelectedFile, UploadOutcome, UploadReply};

/// File name browsers send for anonymous blobs
const DEFAULT_FILE_NAME: &str = "blob";

/// Transport that delivers a selected file to the upload endpoint
#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Sends the file and returns the parsed JSON reply
    async fn upload(&self, file: &SelectedFile) -> Result<UploadReply, UploadError>;
}

/// Multipart POST over HTTP
pub struct HttpUploader {
    client: reqwest::Client,
    endpoint: Url,
    field_name: String,
}

impl HttpUploader {
    pub fn new(config: &UploaderConfig) -> Result<Self, UploadError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint_url()?,
            field_name: config.field_name.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_form(&self, file: &SelectedFile) -> Result<Form, UploadError> {
        let file_name = if file.name.is_empty() {
            DEFAULT_FILE_NAME.to_string()
        } else {
            file.name.clone()
        };
        let media_type = if file.media_type.is_empty() {
            mime::APPLICATION_OCTET_STREAM.to_string()
        } else {
            file.media_type.clone()
        };

        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file_name)
            .mime_str(&media_type)?;

        Ok(Form::new().part(self.field_name.clone(), part))
    }
}

#[async_trait::async_trait]
impl Uploader for HttpUploader {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadReply, UploadError> {
        let form = self.build_form(file)?;

        tracing::debug!(
            "Uploading {} ({} bytes) to {}",
            file.name,
            file.size(),
            self.endpoint
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        // The reply is interpreted from its body alone; status is informational.
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!("Upload endpoint answered {} with {} bytes", status, body.len());

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Runs one upload attempt and folds every result into an outcome.
pub async fn upload_file(uploader: &dyn Uploader, file: &SelectedFile) -> UploadOutcome {
    match uploader.upload(file).await {
        // A literal `null` body has no fields to read at all
        Ok(reply) if reply.is_null() => {
            let e = UploadError::NullReply;
            tracing::warn!("Upload of {} failed: {}", file.name, e);
            UploadOutcome::from_error(&e)
        }
        Ok(reply) => UploadOutcome::from_reply(&reply),
        Err(e) => {
            tracing::warn!("Upload of {} failed: {}", file.name, e);
            UploadOutcome::from_error(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    struct CannedUploader(Result<Value, String>);

    #[async_trait::async_trait]
    impl Uploader for CannedUploader {
        async fn upload(&self, _file: &SelectedFile) -> Result<Value, UploadError> {
            self.0.clone().map_err(UploadError::Task)
        }
    }

    fn sample_file() -> SelectedFile {
        SelectedFile::new("cat.png", "image/png", vec![0x89u8, 0x50, 0x4E, 0x47])
    }

    #[test]
    fn test_http_uploader_resolves_endpoint() {
        let config = UploaderConfig {
            base_url: "http://example.test:8080/index.html".to_string(),
            ..UploaderConfig::default()
        };
        let uploader = HttpUploader::new(&config).unwrap();
        assert_eq!(uploader.endpoint().as_str(), "http://example.test:8080/upload");
    }

    #[test]
    fn test_invalid_media_type_is_reported() {
        let uploader = HttpUploader::new(&UploaderConfig::default()).unwrap();
        let file = SelectedFile::new("x", "not a mime", vec![1u8]);
        assert!(matches!(
            uploader.build_form(&file),
            Err(UploadError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_file_success() {
        let uploader = CannedUploader(Ok(json!({ "url": "/media/1.png" })));
        let outcome = upload_file(&uploader, &sample_file()).await;
        assert_eq!(
            outcome,
            UploadOutcome::Uploaded {
                url: "/media/1.png".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_upload_file_null_reply_fails() {
        let uploader = CannedUploader(Ok(Value::Null));
        let outcome = upload_file(&uploader, &sample_file()).await;
        assert_eq!(
            outcome,
            UploadOutcome::Failed {
                description: "Invalid JSON response: cannot read properties of null (reading 'url')"
                    .to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_upload_file_error_carries_description() {
        let uploader = CannedUploader(Err("connection reset".to_string()));
        let outcome = upload_file(&uploader, &sample_file()).await;
        assert_eq!(
            outcome,
            UploadOutcome::Failed {
                description: "Upload task failed: connection reset".to_string()
            }
        );
    }
}
