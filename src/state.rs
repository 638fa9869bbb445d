use std::sync::Arc;

use tokio::sync::broadcast;

use crate::models::notification::Notification;
use crate::notify::{ChannelSink, NotificationSink};
use crate::observability::metrics::Metrics;
use crate::store::drivers::DriverPool;
use crate::store::rides::RideStore;

pub struct AppState {
    pub drivers: DriverPool,
    pub rides: RideStore,
    pub notifier: Arc<dyn NotificationSink>,
    pub notification_events_tx: broadcast::Sender<Notification>,
    pub search_radius_km: f64,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(search_radius_km: f64, event_buffer_size: usize) -> Self {
        let (notification_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            drivers: DriverPool::new(),
            rides: RideStore::new(),
            notifier: Arc::new(ChannelSink::new(notification_events_tx.clone())),
            notification_events_tx,
            search_radius_km,
            metrics: Metrics::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }
}
