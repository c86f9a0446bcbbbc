use crate::effect::{BackgroundEffect, ExportEntry};
use crate::intake::{DroppedFile, ImageIntake};
use crate::view_model::{BackgroundViewModel, DropStats, ImageTileView};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelStatus {
    #[default]
    Loading,
    Ready,
    /// Initialisation failed; the page shows the message and stays disabled.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundMsg {
    ModelLoaded,
    ModelFailed(String),
    FilesDropped(Vec<DroppedFile>),
    RemoveImage(usize),
    ClearAll,
    ProcessClicked,
    ImageProcessed { index: usize, output: String },
    ImageSkipped { index: usize, reason: String },
    ProcessingFinished,
    /// The batch aborted; images not yet reported stay unprocessed.
    ProcessingFailed(String),
    DownloadClicked,
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackgroundState {
    model: ModelStatus,
    intake: ImageIntake,
    is_processing: bool,
    is_download_ready: bool,
    last_drop: Option<DropStats>,
    failure: Option<String>,
    dirty: bool,
}

impl BackgroundState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self) -> &ModelStatus {
        &self.model
    }

    pub fn intake(&self) -> &ImageIntake {
        &self.intake
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn is_download_ready(&self) -> bool {
        self.is_download_ready
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn can_process(&self) -> bool {
        self.model == ModelStatus::Ready && !self.is_processing && !self.intake.is_empty()
    }

    pub fn view(&self) -> BackgroundViewModel {
        let images = self
            .intake
            .sources()
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let processed = self.intake.processed(index);
                ImageTileView {
                    index,
                    display_source: processed.unwrap_or(source).to_string(),
                    processed: processed.is_some(),
                }
            })
            .collect();
        BackgroundViewModel {
            model: self.model.clone(),
            images,
            process_enabled: self.can_process(),
            process_label: if self.is_processing {
                "Processing..."
            } else {
                "Process"
            },
            download_enabled: self.is_download_ready,
            last_drop: self.last_drop.clone(),
            failure: self.failure.clone(),
            dirty: self.dirty,
        }
    }
}

/// Pure update for the background-removal page.
pub fn update_background(
    mut state: BackgroundState,
    msg: BackgroundMsg,
) -> (BackgroundState, Vec<BackgroundEffect>) {
    let effects = match msg {
        BackgroundMsg::ModelLoaded => {
            state.model = ModelStatus::Ready;
            state.dirty = true;
            Vec::new()
        }
        BackgroundMsg::ModelFailed(message) => {
            state.model = ModelStatus::Failed(message);
            state.dirty = true;
            Vec::new()
        }
        BackgroundMsg::FilesDropped(files) => {
            let (accepted, rejected) = state.intake.accept(files);
            state.last_drop = Some(DropStats { accepted, rejected });
            state.dirty = true;
            Vec::new()
        }
        BackgroundMsg::RemoveImage(index) => {
            // Indices of in-flight work would shift under the worker.
            if !state.is_processing && state.intake.remove(index).is_some() {
                state.dirty = true;
            }
            Vec::new()
        }
        BackgroundMsg::ClearAll => {
            if !state.is_processing {
                state.intake.clear();
                state.is_download_ready = false;
                state.last_drop = None;
                state.failure = None;
                state.dirty = true;
            }
            Vec::new()
        }
        BackgroundMsg::ProcessClicked => {
            if state.can_process() {
                state.is_processing = true;
                state.failure = None;
                state.intake.clear_processed();
                state.dirty = true;
                vec![BackgroundEffect::ProcessImages {
                    sources: state.intake.sources().to_vec(),
                }]
            } else {
                Vec::new()
            }
        }
        BackgroundMsg::ImageProcessed { index, output } => {
            if state.is_processing && state.intake.set_processed(index, output) {
                state.dirty = true;
            }
            Vec::new()
        }
        BackgroundMsg::ImageSkipped { .. } => Vec::new(),
        BackgroundMsg::ProcessingFinished => {
            if state.is_processing {
                state.is_processing = false;
                state.is_download_ready = true;
                state.dirty = true;
            }
            Vec::new()
        }
        BackgroundMsg::ProcessingFailed(reason) => {
            if state.is_processing {
                state.is_processing = false;
                state.failure = Some(reason);
                state.dirty = true;
            }
            Vec::new()
        }
        BackgroundMsg::DownloadClicked => {
            if state.is_download_ready {
                let entries = state
                    .intake
                    .sources()
                    .iter()
                    .enumerate()
                    .map(|(index, source)| ExportEntry {
                        original: source.clone(),
                        processed: state.intake.processed(index).map(ToOwned::to_owned),
                    })
                    .collect();
                vec![BackgroundEffect::ExportZip { entries }]
            } else {
                Vec::new()
            }
        }
        BackgroundMsg::NoOp => Vec::new(),
    };

    (state, effects)
}
