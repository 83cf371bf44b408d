use std::path::Path;

use bytes::Bytes;
use serde_json::Value;

use crate::error::UploadError;

/// Parsed JSON body returned by the upload endpoint
pub type UploadReply = Value;

/// Text a missing field turns into when interpolated into markup.
pub const UNDEFINED_TEXT: &str = "undefined";

/// A file picked by the user. Lives for one selection event.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    /// Media type as reported by the picker; empty when unknown
    pub media_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, sniffing its media type from the content.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let media_type = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_default();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name, media_type, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// One selection event: zero or more files, of which only the first is used.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub files: Vec<SelectedFile>,
}

impl Selection {
    pub fn new(files: Vec<SelectedFile>) -> Self {
        Self { files }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn first(&self) -> Option<&SelectedFile> {
        self.files.first()
    }

    pub fn into_first(self) -> Option<SelectedFile> {
        self.files.into_iter().next()
    }
}

impl From<SelectedFile> for Selection {
    fn from(file: SelectedFile) -> Self {
        Self::new(vec![file])
    }
}

/// How an upload attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Server returned a usable `url`
    Uploaded { url: String },
    /// Server replied with JSON lacking a usable `url`
    Rejected { message: String },
    /// Request or body parsing failed
    Failed { description: String },
}

impl UploadOutcome {
    /// Interprets a parsed JSON reply from the upload endpoint.
    pub fn from_reply(reply: &UploadReply) -> Self {
        match reply.get("url") {
            Some(url) if is_truthy(url) => Self::Uploaded {
                url: to_display_string(url),
            },
            _ => Self::Rejected {
                message: reply
                    .get("message")
                    .map(to_display_string)
                    .unwrap_or_else(|| UNDEFINED_TEXT.to_string()),
            },
        }
    }

    pub fn from_error(err: &UploadError) -> Self {
        Self::Failed {
            description: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Uploaded { .. })
    }
}

/// Loose truthiness over JSON: null, false, 0, NaN and "" are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String form a JSON value takes when interpolated into text.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
                format!("{:.0}", f)
            }
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        // Nested nulls collapse to empty strings inside arrays
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("/media/1.png")));
        assert!(is_truthy(&json!(7)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_display_string() {
        assert_eq!(to_display_string(&json!("too large")), "too large");
        assert_eq!(to_display_string(&json!(null)), "null");
        assert_eq!(to_display_string(&json!(3.0)), "3");
        assert_eq!(to_display_string(&json!(2.5)), "2.5");
        assert_eq!(to_display_string(&json!([1, null, "a"])), "1,,a");
        assert_eq!(to_display_string(&json!({"a": 1})), "[object Object]");
    }

    #[test]
    fn test_outcome_from_url_reply() {
        let outcome = UploadOutcome::from_reply(&json!({
            "message": "File uploaded successfully",
            "url": "/media/123.png"
        }));
        assert_eq!(
            outcome,
            UploadOutcome::Uploaded {
                url: "/media/123.png".to_string()
            }
        );
        assert!(outcome.is_success());
    }

    #[test]
    fn test_outcome_from_message_reply() {
        let outcome = UploadOutcome::from_reply(&json!({ "message": "too large" }));
        assert_eq!(
            outcome,
            UploadOutcome::Rejected {
                message: "too large".to_string()
            }
        );
    }

    #[test]
    fn test_empty_url_is_rejected() {
        let outcome = UploadOutcome::from_reply(&json!({ "url": "", "message": "nope" }));
        assert_eq!(
            outcome,
            UploadOutcome::Rejected {
                message: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_missing_message_is_undefined() {
        let outcome = UploadOutcome::from_reply(&json!({}));
        assert_eq!(
            outcome,
            UploadOutcome::Rejected {
                message: "undefined".to_string()
            }
        );

        // Non-object bodies have no fields either
        let outcome = UploadOutcome::from_reply(&json!("plain string"));
        assert_eq!(
            outcome,
            UploadOutcome::Rejected {
                message: "undefined".to_string()
            }
        );
    }

    #[test]
    fn test_selection_first() {
        let selection = Selection::new(vec![
            SelectedFile::new("a.png", "image/png", vec![1u8]),
            SelectedFile::new("b.png", "image/png", vec![2u8]),
        ]);
        assert_eq!(selection.first().map(|f| f.name.as_str()), Some("a.png"));
        assert!(Selection::empty().into_first().is_none());
    }
}
