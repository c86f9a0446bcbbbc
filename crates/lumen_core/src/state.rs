use crate::progress::{ProgressItem, ProgressList};
use crate::protocol::TranslationRequest;
use crate::view_model::{ProgressRowView, TranslatorViewModel};

pub const DEFAULT_INPUT: &str = "I love walking my dog.";
pub const DEFAULT_SOURCE_LANGUAGE: &str = "eng_Latn";
pub const DEFAULT_TARGET_LANGUAGE: &str = "fra_Latn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Readiness {
    /// No resource activity observed yet.
    #[default]
    Unknown,
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslatorState {
    readiness: Readiness,
    progress: ProgressList,
    input: String,
    source_language: String,
    target_language: String,
    output: String,
    locked: bool,
    last_error: Option<String>,
    dirty: bool,
}

impl Default for TranslatorState {
    fn default() -> Self {
        Self {
            readiness: Readiness::Unknown,
            progress: ProgressList::new(),
            input: DEFAULT_INPUT.to_string(),
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            output: String::new(),
            locked: false,
            last_error: None,
            dirty: false,
        }
    }
}

impl TranslatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    pub fn active_progress_items(&self) -> &[ProgressItem] {
        self.progress.items()
    }

    pub fn current_output(&self) -> &str {
        &self.output
    }

    pub fn is_input_locked(&self) -> bool {
        self.locked
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn view(&self) -> TranslatorViewModel {
        TranslatorViewModel {
            readiness: self.readiness,
            show_loading_banner: self.readiness == Readiness::Loading,
            progress_rows: self
                .progress
                .items()
                .iter()
                .map(ProgressRowView::from_item)
                .collect(),
            input: self.input.clone(),
            source_language: self.source_language.clone(),
            target_language: self.target_language.clone(),
            output: self.output.clone(),
            translate_enabled: !self.locked,
            error: self.last_error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_source_language(&mut self, tag: String) {
        if self.source_language != tag {
            self.source_language = tag;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_target_language(&mut self, tag: String) {
        if self.target_language != tag {
            self.target_language = tag;
            self.mark_dirty();
        }
    }

    /// Locks input and snapshots the request to post. `None` while a task is in flight.
    pub(crate) fn begin_request(&mut self) -> Option<TranslationRequest> {
        if self.locked {
            return None;
        }
        self.locked = true;
        self.last_error = None;
        self.mark_dirty();
        Some(TranslationRequest::new(
            self.input.clone(),
            self.source_language.clone(),
            self.target_language.clone(),
        ))
    }

    pub(crate) fn apply_initiate(&mut self, file: &str) {
        self.readiness = Readiness::Loading;
        self.progress.initiate(file);
        self.mark_dirty();
    }

    pub(crate) fn apply_progress(&mut self, file: &str, progress: f64) {
        if self.progress.set_progress(file, progress) {
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_done(&mut self, file: &str) {
        if self.progress.finish(file) {
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_ready(&mut self) {
        if self.readiness != Readiness::Ready {
            self.readiness = Readiness::Ready;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_output(&mut self, output: String) {
        if self.output != output {
            self.output = output;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_complete(&mut self) {
        if self.locked {
            self.locked = false;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_error(&mut self, message: String) {
        self.locked = false;
        self.last_error = Some(message);
        self.mark_dirty();
    }
}
