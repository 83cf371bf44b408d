pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod widget;

use std::sync::Arc;

use crate::config::UploaderConfig;
use crate::error::UploadError;
use crate::services::uploader::HttpUploader;
use crate::widget::{RenderTarget, UploadWidget};

/// Wires an HTTP-backed widget from configuration and the two output regions.
pub fn create_widget(
    config: &UploaderConfig,
    preview: Arc<dyn RenderTarget>,
    message: Arc<dyn RenderTarget>,
) -> Result<UploadWidget, UploadError> {
    let uploader = HttpUploader::new(config)?;
    Ok(UploadWidget::new(
        Arc::new(uploader),
        preview,
        message,
        config.ordering,
    ))
}
