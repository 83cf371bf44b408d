use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::UploadError;
use crate::models::SelectedFile;

/// Builds a `data:` URI for the file, the way a browser file reader does.
pub fn to_data_uri(file: &SelectedFile) -> String {
    let media_type = if file.media_type.is_empty() {
        mime::APPLICATION_OCTET_STREAM.to_string()
    } else {
        file.media_type.clone()
    };

    format!("data:{};base64,{}", media_type, BASE64.encode(&file.bytes))
}

/// Encodes the preview on the blocking pool so large files don't stall the runtime.
pub async fn encode_preview(file: SelectedFile) -> Result<String, UploadError> {
    tokio::task::spawn_blocking(move || to_data_uri(&file))
        .await
        .map_err(|e| UploadError::Task(e.to_string()))
}
