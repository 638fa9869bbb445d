use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ride::Ride;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    RideRequested,
    RideAccepted,
    RideStatus,
    RideCancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub recipient: Uuid,
    pub ride_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub patient_id: Uuid,
}

impl Notification {
    pub fn for_ride(
        kind: NotificationKind,
        recipient: Uuid,
        ride: &Ride,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            recipient,
            ride_id: ride.id,
            driver_id: ride.driver_id,
            patient_id: ride.patient_id,
        }
    }
}
