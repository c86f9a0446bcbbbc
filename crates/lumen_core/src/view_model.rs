use crate::progress::ProgressItem;
use crate::Readiness;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslatorViewModel {
    pub readiness: Readiness,
    /// "Loading models..." banner, shown only while resources load.
    pub show_loading_banner: bool,
    pub progress_rows: Vec<ProgressRowView>,
    pub input: String,
    pub source_language: String,
    pub target_language: String,
    pub output: String,
    pub translate_enabled: bool,
    pub error: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRowView {
    pub file: String,
    pub percentage: f64,
    /// Two decimals, e.g. `"42.00%"`.
    pub label: String,
}

impl ProgressRowView {
    pub(crate) fn from_item(item: &ProgressItem) -> Self {
        let percentage = if item.progress.is_finite() {
            item.progress
        } else {
            0.0
        };
        Self {
            file: item.file.clone(),
            percentage,
            label: format!("{percentage:.2}%"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DropStats {
    pub accepted: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackgroundViewModel {
    pub model: crate::ModelStatus,
    pub images: Vec<ImageTileView>,
    pub process_enabled: bool,
    pub process_label: &'static str,
    pub download_enabled: bool,
    pub last_drop: Option<DropStats>,
    pub failure: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTileView {
    pub index: usize,
    /// Processed output when available, the original otherwise.
    pub display_source: String,
    pub processed: bool,
}
