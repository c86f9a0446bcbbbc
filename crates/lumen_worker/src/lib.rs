//! Lumen worker: pipeline hosting, resource loading and image IO.
mod export;
mod fetch;
mod filename;
mod matte;
mod persist;
mod pipeline;
mod remover;
mod runner;
mod sink;
mod translator;
mod types;

pub use export::{build_zip_archive, entry_name, export_zip, ExportError, ExportSummary, ARCHIVE_FILENAME};
pub use fetch::{FetchSettings, ReqwestResourceFetcher, ResourceFetcher};
pub use filename::{cache_filename, processed_filename};
pub use matte::{apply_alpha_matte, BorderColorMatte, MatteModel};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{PipelineBuilder, ResourcePipelineBuilder};
pub use remover::{BackgroundRemover, ImageEvent, ImageEventSink};
pub use runner::WorkerHandle;
pub use sink::{ChannelSink, NotificationSink};
pub use translator::{PhrasebookFactory, PhrasebookTranslator, Translator, TranslatorFactory};
pub use types::{FailureKind, FetchError, LoadedResource, ModelResource, PipelineError};
