//! Lumen core: wire protocol, pure state machines and view-model helpers.
mod background;
mod effect;
mod intake;
mod msg;
mod progress;
mod protocol;
mod state;
mod update;
mod view_model;

pub use background::{update_background, BackgroundMsg, BackgroundState, ModelStatus};
pub use effect::{BackgroundEffect, Effect, ExportEntry};
pub use intake::{is_accepted_image, mime_from_name, DroppedFile, ImageIntake, ACCEPTED_EXTENSIONS};
pub use msg::Msg;
pub use progress::{ProgressItem, ProgressList};
pub use protocol::{Notification, TranslationRequest};
pub use state::{
    Readiness, TranslatorState, DEFAULT_INPUT, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE,
};
pub use update::{apply, update};
pub use view_model::{
    BackgroundViewModel, DropStats, ImageTileView, ProgressRowView, TranslatorViewModel,
};
