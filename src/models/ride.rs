use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::driver::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Requested,
    Accepted,
    DriverArriving,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RideStatus::Requested => "requested",
            RideStatus::Accepted => "accepted",
            RideStatus::DriverArriving => "driver_arriving",
            RideStatus::InProgress => "in_progress",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Patient,
    Driver,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub origin_address: String,
    pub origin: GeoPoint,
    pub destination_address: String,
    pub destination: GeoPoint,
    pub facility_id: Option<Uuid>,
    pub appointment_at: Option<DateTime<Utc>>,
    pub status: RideStatus,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub price: Option<f64>,
    pub rating: Option<u8>,
    pub rating_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct RideDraft {
    pub patient_id: Uuid,
    pub origin_address: String,
    pub origin: GeoPoint,
    pub destination_address: String,
    pub destination: GeoPoint,
    pub facility_id: Option<Uuid>,
    pub appointment_at: Option<DateTime<Utc>>,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct RidePatch {
    pub status: Option<RideStatus>,
    // Some(None) clears the assignment (cancellation of an assigned ride).
    pub driver_id: Option<Option<Uuid>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub rating: Option<u8>,
    pub rating_comment: Option<String>,
}
