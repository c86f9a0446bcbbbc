//! Wire format shared by the front-end and the worker.
use serde::{Deserialize, Serialize};

/// One translation task posted to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub src_lang: String,
    pub tgt_lang: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        src_lang: impl Into<String>,
        tgt_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            src_lang: src_lang.into(),
            tgt_lang: tgt_lang.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Worker to UI notification, tagged on `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Notification {
    /// A resource download started.
    Initiate { file: String },
    /// Download percentage for an initiated resource.
    Progress { file: String, progress: f64 },
    /// A resource finished loading.
    Done { file: String },
    /// The pipeline is constructed. Sent once per worker lifetime.
    Ready,
    /// Replacement output text for the running task.
    Update { output: String },
    /// The running task finished.
    Complete,
    /// The running task failed; terminal like `Complete`.
    Error { message: String },
    /// Any status this build does not know about.
    #[serde(other)]
    Unknown,
}

impl Notification {
    pub fn initiate(file: impl Into<String>) -> Self {
        Self::Initiate { file: file.into() }
    }

    pub fn progress(file: impl Into<String>, progress: f64) -> Self {
        Self::Progress {
            file: file.into(),
            progress,
        }
    }

    pub fn done(file: impl Into<String>) -> Self {
        Self::Done { file: file.into() }
    }

    pub fn update(output: impl Into<String>) -> Self {
        Self::Update {
            output: output.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// True for notifications that end a task.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error { .. })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_snake_case_language_fields() {
        let request = TranslationRequest::new("I love walking my dog.", "eng_Latn", "fra_Latn");
        let json = request.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"text":"I love walking my dog.","src_lang":"eng_Latn","tgt_lang":"fra_Latn"}"#
        );
    }

    #[test]
    fn progress_is_tagged_on_status() {
        let json = Notification::progress("model.onnx", 42.5).to_json().unwrap();
        assert_eq!(json, r#"{"status":"progress","file":"model.onnx","progress":42.5}"#);
    }

    #[test]
    fn unit_statuses_decode_without_payload() {
        assert_eq!(
            Notification::from_json(r#"{"status":"ready"}"#).unwrap(),
            Notification::Ready
        );
        assert_eq!(
            Notification::from_json(r#"{"status":"complete"}"#).unwrap(),
            Notification::Complete
        );
    }

    #[test]
    fn unknown_status_decodes_to_unknown() {
        let decoded = Notification::from_json(r#"{"status":"warmup","file":"x"}"#).unwrap();
        assert_eq!(decoded, Notification::Unknown);
    }

    #[test]
    fn missing_status_is_a_decode_error() {
        assert!(Notification::from_json(r#"{"file":"x"}"#).is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(Notification::Complete.is_terminal());
        assert!(Notification::error("boom").is_terminal());
        assert!(!Notification::Ready.is_terminal());
        assert!(!Notification::update("x").is_terminal());
    }
}
