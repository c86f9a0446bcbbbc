use std::sync::mpsc;

use lumen_core::Notification;
use lumen_logging::lumen_trace;

pub trait NotificationSink: Send + Sync {
    fn emit(&self, notification: Notification);
}

/// Forwards notifications to the UI side of the worker channel.
pub struct ChannelSink {
    tx: mpsc::Sender<Notification>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Notification>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelSink {
    fn emit(&self, notification: Notification) {
        lumen_trace!("worker -> ui {:?}", notification);
        // A closed receiver means the UI unmounted; later notifications are dropped.
        let _ = self.tx.send(notification);
    }
}
