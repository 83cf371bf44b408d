//! Markup written into the preview and message regions.
//!
//! Values are interpolated verbatim, without HTML escaping.

use crate::models::UploadOutcome;

pub const SUCCESS_COLOR: &str = "green";
pub const FAILURE_COLOR: &str = "red";

pub fn preview(data_uri: &str) -> String {
    format!(r#"<img src="{}" alt="Preview">"#, data_uri)
}

pub fn uploaded(url: &str) -> String {
    format!(
        r#"<span style="color: {};">Uploaded successfully: <a href="{}" target="_blank">View Image</a></span>"#,
        SUCCESS_COLOR, url
    )
}

pub fn rejected(message: &str) -> String {
    format!(
        r#"<span style="color: {};">Upload failed: {}</span>"#,
        FAILURE_COLOR, message
    )
}

pub fn failed(description: &str) -> String {
    format!(
        r#"<span style="color: {};">Error: {}</span>"#,
        FAILURE_COLOR, description
    )
}

pub fn outcome(outcome: &UploadOutcome) -> String {
    match outcome {
        UploadOutcome::Uploaded { url } => uploaded(url),
        UploadOutcome::Rejected { message } => rejected(message),
        UploadOutcome::Failed { description } => failed(description),
    }
}
