use std::sync::Mutex;

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::warn;

use crate::models::notification::Notification;
use crate::state::AppState;

#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct DeliveryError(pub String);

pub trait NotificationSink: Send + Sync {
    fn deliver(&self, notification: Notification) -> Result<(), DeliveryError>;
}

pub fn send(state: &AppState, notification: Notification) {
    let ride_id = notification.ride_id;
    let recipient = notification.recipient;

    match state.notifier.deliver(notification) {
        Ok(()) => {
            state
                .metrics
                .notifications_total
                .with_label_values(&["sent"])
                .inc();
        }
        Err(err) => {
            warn!(ride_id = %ride_id, recipient = %recipient, error = %err, "notification delivery failed");
            state
                .metrics
                .notifications_total
                .with_label_values(&["failed"])
                .inc();
        }
    }
}

pub struct ChannelSink {
    tx: broadcast::Sender<Notification>,
}

impl ChannelSink {
    pub fn new(tx: broadcast::Sender<Notification>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelSink {
    fn deliver(&self, notification: Notification) -> Result<(), DeliveryError> {
        let _ = self.tx.send(notification);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .lock()
            .map(|delivered| delivered.clone())
            .unwrap_or_default()
    }
}

impl NotificationSink for MemorySink {
    fn deliver(&self, notification: Notification) -> Result<(), DeliveryError> {
        self.delivered
            .lock()
            .map_err(|_| DeliveryError("memory sink lock poisoned".to_string()))?
            .push(notification);
        Ok(())
    }
}
