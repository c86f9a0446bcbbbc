use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use lumen_core::{BackgroundEffect, BackgroundMsg, Effect, Notification};
use lumen_logging::{lumen_error, lumen_info};
use lumen_worker::{
    export_zip, BackgroundRemover, BorderColorMatte, ExportSummary, ImageEvent, MatteModel,
    PhrasebookFactory, ReqwestResourceFetcher, ResourcePipelineBuilder, WorkerHandle,
};

use super::config::AppConfig;

/// Runs translator effects against the worker and hands back its notifications.
pub struct EffectRunner {
    worker: WorkerHandle,
}

impl EffectRunner {
    pub fn new(config: &AppConfig) -> Self {
        let fetcher = ReqwestResourceFetcher::new(config.fetch.settings(), config.cache_dir.clone());
        let builder = ResourcePipelineBuilder::new(
            Arc::new(fetcher),
            config.translator.resources.clone(),
            Arc::new(PhrasebookFactory::new(config.translator.phrasebook.clone())),
        );
        Self {
            worker: WorkerHandle::new(Arc::new(builder)),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PostRequest(request) => {
                    lumen_info!(
                        "PostRequest {} -> {} text_len={}",
                        request.src_lang,
                        request.tgt_lang,
                        request.text.len()
                    );
                    self.worker.post(request);
                }
            }
        }
    }

    pub fn next_notification(&self, wait: Duration) -> Option<Notification> {
        self.worker.recv_timeout(wait)
    }

    pub fn shutdown(self) {
        self.worker.shutdown();
    }
}

/// Runs background-removal effects; batch progress comes back as [`BackgroundMsg`]s.
pub struct BackgroundRunner {
    model: BorderColorMatte,
    output_dir: PathBuf,
    msg_tx: mpsc::Sender<BackgroundMsg>,
}

impl BackgroundRunner {
    pub fn new(model: BorderColorMatte, output_dir: PathBuf, msg_tx: mpsc::Sender<BackgroundMsg>) -> Self {
        Self {
            model,
            output_dir,
            msg_tx,
        }
    }

    /// Processing runs on its own thread. Exports are written before this returns.
    pub fn enqueue(&self, effects: Vec<BackgroundEffect>) -> anyhow::Result<Option<ExportSummary>> {
        let mut exported = None;
        for effect in effects {
            match effect {
                BackgroundEffect::ProcessImages { sources } => {
                    lumen_info!("ProcessImages count={}", sources.len());
                    self.spawn_batch(sources)?;
                }
                BackgroundEffect::ExportZip { entries } => {
                    lumen_info!("ExportZip count={}", entries.len());
                    exported = Some(export_zip(&entries, &self.output_dir)?);
                }
            }
        }
        Ok(exported)
    }

    fn spawn_batch(&self, sources: Vec<String>) -> anyhow::Result<()> {
        let remover = BackgroundRemover::new(self.model, self.output_dir.clone());
        let msg_tx = self.msg_tx.clone();
        thread::Builder::new()
            .name("lumen-images".to_string())
            .spawn(move || run_batch(&remover, &sources, &msg_tx))?;
        Ok(())
    }
}

/// Runs one batch to completion. A panic inside decoding or the model ends
/// the batch with `ProcessingFailed` so the page never waits on a dead thread.
fn run_batch<M: MatteModel>(
    remover: &BackgroundRemover<M>,
    sources: &[String],
    msg_tx: &mpsc::Sender<BackgroundMsg>,
) {
    let send = |msg: BackgroundMsg| {
        if msg_tx.send(msg).is_err() {
            lumen_error!("Front-end is gone; dropping image event");
        }
    };
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        remover.process(sources, &|event: ImageEvent| send(map_image_event(event)));
    }));
    if let Err(payload) = outcome {
        let reason = panic_message(payload.as_ref());
        lumen_error!("Image batch panicked: {}", reason);
        send(BackgroundMsg::ProcessingFailed(format!(
            "image processing panicked: {reason}"
        )));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn map_image_event(event: ImageEvent) -> BackgroundMsg {
    match event {
        ImageEvent::Processed { index, output } => BackgroundMsg::ImageProcessed { index, output },
        ImageEvent::Skipped { index, reason } => BackgroundMsg::ImageSkipped { index, reason },
        ImageEvent::Finished { .. } => BackgroundMsg::ProcessingFinished,
    }
}
