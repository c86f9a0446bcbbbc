use crate::Notification;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the source text.
    InputChanged(String),
    /// User picked a source language tag.
    SourceLanguageChanged(String),
    /// User picked a target language tag.
    TargetLanguageChanged(String),
    /// User clicked Translate.
    TranslateClicked,
    /// Notification relayed from the worker.
    Worker(Notification),
    /// Fallback for placeholder wiring.
    NoOp,
}

impl From<Notification> for Msg {
    fn from(notification: Notification) -> Self {
        Msg::Worker(notification)
    }
}
