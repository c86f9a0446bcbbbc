mod app;
mod config;
mod effects;
mod render;

pub use app::{run_remove_background, run_translate, TranslateOptions};
pub use config::{load_config, CONFIG_FILENAME};
