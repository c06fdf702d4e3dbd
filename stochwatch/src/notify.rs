use crate::signal::Alert;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Notification sink failure. Recoverable: the scanner leaves the ledger
/// unrecorded so the alert retries on the next cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("delivery failure: {0}")]
pub struct DeliveryError(pub String);

/// Outbound notification sink.
///
/// The engine hands over a structured [`Alert`]; formatting, markup and
/// transport are entirely the sink's concern. Delivery may block on network
/// I/O - callers wrap it in a timeout if required.
#[async_trait]
pub trait Notifier {
    async fn notify(&self, alert: &Alert) -> Result<(), DeliveryError>;
}

/// [`Notifier`] that forwards alerts over an in-process channel, for tests and
/// for decoupling delivery transport from the scan cycle.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Alert>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Alert>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, alert: &Alert) -> Result<(), DeliveryError> {
        self.tx
            .send(alert.clone())
            .map_err(|error| DeliveryError(error.to_string()))
    }
}
