use crate::TranslationRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Post the request to the worker; the UI stays locked until a terminal notification.
    PostRequest(TranslationRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundEffect {
    /// Run background removal over `sources`, one at a time, in order.
    ProcessImages { sources: Vec<String> },
    /// Package every entry as `image-<n>.png` into `images.zip`.
    ExportZip { entries: Vec<ExportEntry> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub original: String,
    pub processed: Option<String>,
}

impl ExportEntry {
    /// The processed output when present, the original otherwise.
    pub fn preferred_source(&self) -> &str {
        self.processed.as_deref().unwrap_or(&self.original)
    }
}
