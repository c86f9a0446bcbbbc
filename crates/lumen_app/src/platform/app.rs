use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use lumen_core::{
    mime_from_name, update, update_background, BackgroundEffect, BackgroundMsg, BackgroundState,
    DroppedFile, Effect, Msg, TranslatorState,
};
use lumen_logging::{lumen_info, lumen_warn};
use lumen_worker::{ensure_output_dir, ExportSummary};

use super::config::AppConfig;
use super::effects::{BackgroundRunner, EffectRunner};
use super::render::{render_background, render_translator, Terminal};

const POLL_INTERVAL: Duration = Duration::from_millis(75);

pub struct TranslateOptions {
    pub text: Option<String>,
    pub src_lang: Option<String>,
    pub tgt_lang: Option<String>,
}

/// Runs one translation through the worker and prints the final output.
pub fn run_translate(config: &AppConfig, options: TranslateOptions) -> anyhow::Result<()> {
    let runner = EffectRunner::new(config);
    let mut page = TranslatorPage::new();

    let mut msgs = Vec::new();
    if let Some(text) = options.text {
        msgs.push(Msg::InputChanged(text));
    }
    if let Some(tag) = options.src_lang {
        msgs.push(Msg::SourceLanguageChanged(tag));
    }
    if let Some(tag) = options.tgt_lang {
        msgs.push(Msg::TargetLanguageChanged(tag));
    }
    msgs.push(Msg::TranslateClicked);
    for msg in msgs {
        runner.enqueue(page.dispatch(msg));
    }

    let timeout = config.task_timeout();
    let started = Instant::now();
    while page.state.is_input_locked() {
        match runner.next_notification(POLL_INTERVAL) {
            Some(notification) => {
                runner.enqueue(page.dispatch(Msg::Worker(notification)));
            }
            None if started.elapsed() >= timeout => {
                bail!("worker did not finish within {timeout:?}");
            }
            None => {}
        }
    }
    runner.shutdown();

    if let Some(error) = page.state.last_error() {
        bail!("translation failed: {error}");
    }
    println!("{}", page.state.current_output());
    Ok(())
}

struct TranslatorPage {
    state: TranslatorState,
    terminal: Terminal,
}

impl TranslatorPage {
    fn new() -> Self {
        Self {
            state: TranslatorState::new(),
            terminal: Terminal::new(),
        }
    }

    fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            for line in self.terminal.frame(render_translator(&state.view())) {
                eprintln!("{line}");
            }
        }
        self.state = state;
        effects
    }
}

/// Removes the background of every accepted file, then writes `images.zip`.
pub fn run_remove_background(
    config: &AppConfig,
    files: &[PathBuf],
    output_dir: Option<PathBuf>,
) -> anyhow::Result<ExportSummary> {
    let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
    ensure_output_dir(&output_dir)
        .with_context(|| format!("cannot prepare output directory {output_dir:?}"))?;

    let (msg_tx, msg_rx) = mpsc::channel();
    let runner = BackgroundRunner::new(config.matte.model(), output_dir, msg_tx);
    let mut page = BackgroundPage::new(runner);

    page.dispatch(BackgroundMsg::ModelLoaded)?;
    page.dispatch(BackgroundMsg::FilesDropped(
        files.iter().map(|path| dropped_file(path)).collect(),
    ))?;
    if page.state.intake().is_empty() {
        bail!("none of the {} file(s) is a png or jpeg image", files.len());
    }

    page.dispatch(BackgroundMsg::ProcessClicked)?;
    let timeout = config.task_timeout();
    let mut last_event = Instant::now();
    while page.state.is_processing() {
        match msg_rx.recv_timeout(POLL_INTERVAL) {
            Ok(msg) => {
                if let BackgroundMsg::ImageSkipped { index, reason } = &msg {
                    lumen_warn!("Image {} was skipped: {}", index + 1, reason);
                }
                page.dispatch(msg)?;
                last_event = Instant::now();
            }
            Err(mpsc::RecvTimeoutError::Timeout) if last_event.elapsed() >= timeout => {
                bail!("image processing stalled for {timeout:?}");
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                bail!("image processing stopped before finishing");
            }
        }
    }

    if let Some(failure) = page.state.failure() {
        bail!("{failure}");
    }

    match page.dispatch(BackgroundMsg::DownloadClicked)? {
        Some(summary) => {
            lumen_info!(
                "Exported {} image(s), {} skipped",
                summary.written,
                summary.skipped
            );
            Ok(summary)
        }
        None => bail!("nothing to download"),
    }
}

fn dropped_file(path: &Path) -> DroppedFile {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = mime_from_name(&name);
    DroppedFile::new(name, mime, path.to_string_lossy())
}

struct BackgroundPage {
    state: BackgroundState,
    runner: BackgroundRunner,
    terminal: Terminal,
}

impl BackgroundPage {
    fn new(runner: BackgroundRunner) -> Self {
        Self {
            state: BackgroundState::new(),
            runner,
            terminal: Terminal::new(),
        }
    }

    fn dispatch(&mut self, msg: BackgroundMsg) -> anyhow::Result<Option<ExportSummary>> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects): (BackgroundState, Vec<BackgroundEffect>) =
            update_background(state, msg);
        if state.consume_dirty() {
            for line in self.terminal.frame(render_background(&state.view())) {
                eprintln!("{line}");
            }
        }
        self.state = state;
        self.runner.enqueue(effects)
    }
}
