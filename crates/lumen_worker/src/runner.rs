use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use futures_util::FutureExt;

use lumen_core::{Notification, TranslationRequest};
use lumen_logging::{lumen_error, lumen_info, lumen_warn};

use crate::pipeline::PipelineBuilder;
use crate::sink::{ChannelSink, NotificationSink};
use crate::translator::Translator;

enum WorkerCommand {
    Translate(TranslationRequest),
}

/// Owned handle to the background worker.
///
/// Created when a page mounts and dropped when it unmounts. Dropping closes
/// the command channel; the worker thread exits after its current task.
pub struct WorkerHandle {
    cmd_tx: Option<mpsc::Sender<WorkerCommand>>,
    event_rx: mpsc::Receiver<Notification>,
    thread: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn new(builder: Arc<dyn PipelineBuilder>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("lumen-worker".to_string())
            .spawn(move || run_worker(builder, cmd_rx, ChannelSink::new(event_tx)))
            .map_err(|err| lumen_error!("Failed to spawn worker thread: {}", err))
            .ok();

        Self {
            cmd_tx: Some(cmd_tx),
            event_rx,
            thread,
        }
    }

    /// Fire-and-forget. Ordering across overlapping tasks is the caller's
    /// problem; the UI keeps at most one in flight.
    pub fn post(&self, request: TranslationRequest) {
        let sent = self
            .cmd_tx
            .as_ref()
            .map(|tx| tx.send(WorkerCommand::Translate(request)).is_ok())
            .unwrap_or(false);
        if !sent {
            lumen_warn!("Worker is gone; request dropped");
        }
    }

    /// Decodes an inbound `{text, src_lang, tgt_lang}` message and posts it.
    pub fn post_json(&self, raw: &str) -> Result<(), serde_json::Error> {
        let request = TranslationRequest::from_json(raw)?;
        self.post(request);
        Ok(())
    }

    pub fn try_recv(&self) -> Option<Notification> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Notification> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Stops accepting work and waits for the current task to finish.
    pub fn shutdown(mut self) {
        self.cmd_tx.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                lumen_error!("Worker thread panicked");
            }
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.cmd_tx.take();
    }
}

fn run_worker(
    builder: Arc<dyn PipelineBuilder>,
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    sink: ChannelSink,
) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            lumen_error!("Worker runtime failed to start: {}", err);
            // Fail every task instead of leaving the UI locked.
            while cmd_rx.recv().is_ok() {
                sink.emit(Notification::error(format!(
                    "worker runtime unavailable: {err}"
                )));
            }
            return;
        }
    };

    let mut worker = Worker::new(builder);
    // Tasks run strictly one after another in arrival order.
    while let Ok(command) = cmd_rx.recv() {
        match command {
            WorkerCommand::Translate(request) => {
                let task = AssertUnwindSafe(worker.handle(request, &sink)).catch_unwind();
                if let Err(payload) = runtime.block_on(task) {
                    // A cached translator is kept; only `translate(&self)` could have run.
                    let reason = panic_message(payload.as_ref());
                    lumen_error!("Worker task panicked: {}", reason);
                    sink.emit(Notification::error(format!("worker panicked: {reason}")));
                }
            }
        }
    }
    lumen_info!("Worker command channel closed; exiting");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Pipeline singleton for one worker lifetime.
struct Worker {
    builder: Arc<dyn PipelineBuilder>,
    translator: Option<Box<dyn Translator>>,
}

impl Worker {
    fn new(builder: Arc<dyn PipelineBuilder>) -> Self {
        Self {
            builder,
            translator: None,
        }
    }

    async fn handle(&mut self, request: TranslationRequest, sink: &dyn NotificationSink) {
        if self.translator.is_none() {
            match self.builder.build(sink).await {
                Ok(translator) => {
                    self.translator = Some(translator);
                    sink.emit(Notification::Ready);
                }
                Err(err) => {
                    // The pipeline stays unbuilt; the next task retries the load.
                    lumen_error!("Pipeline construction failed: {}", err);
                    sink.emit(Notification::error(err.to_string()));
                    return;
                }
            }
        }
        let Some(translator) = self.translator.as_ref() else {
            return;
        };

        let mut updates = 0usize;
        let result = translator.translate(&request, &mut |output| {
            updates += 1;
            sink.emit(Notification::update(output));
        });

        match result {
            Ok(output) => {
                if updates == 0 {
                    sink.emit(Notification::update(output));
                }
                sink.emit(Notification::Complete);
            }
            Err(err) => {
                lumen_warn!("Translation failed: {}", err);
                sink.emit(Notification::error(err.to_string()));
            }
        }
    }
}
