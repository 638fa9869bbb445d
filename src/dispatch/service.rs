use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::notification::{Notification, NotificationKind};
use crate::models::ride::{Ride, RideDraft};
use crate::notify;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub ride: Ride,
    pub candidate_driver_ids: Vec<Uuid>,
}

#[derive(Clone)]
pub struct DispatchService {
    state: Arc<AppState>,
}

impl DispatchService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn request_ride(&self, draft: RideDraft) -> Result<DispatchOutcome, AppError> {
        let ride = match self.state.rides.create(draft) {
            Ok(ride) => ride,
            Err(err) => {
                self.state
                    .metrics
                    .rides_requested_total
                    .with_label_values(&["rejected"])
                    .inc();
                return Err(err);
            }
        };
        self.state.metrics.open_rides.inc();

        let radius_km = self.state.search_radius_km;
        let candidate_driver_ids = self
            .state
            .drivers
            .find_available_within(&ride.origin, radius_km);
        self.state
            .metrics
            .candidate_drivers
            .observe(candidate_driver_ids.len() as f64);

        let outcome = if candidate_driver_ids.is_empty() {
            warn!(ride_id = %ride.id, radius_km, "no available drivers within radius");
            "no_candidates"
        } else {
            "dispatched"
        };
        self.state
            .metrics
            .rides_requested_total
            .with_label_values(&[outcome])
            .inc();

        for driver_id in &candidate_driver_ids {
            notify::send(
                &self.state,
                Notification {
                    kind: NotificationKind::RideRequested,
                    title: "New ride request".to_string(),
                    body: format!("Pickup at {}", ride.origin_address),
                    recipient: *driver_id,
                    ride_id: ride.id,
                    driver_id: Some(*driver_id),
                    patient_id: ride.patient_id,
                },
            );
        }

        info!(
            ride_id = %ride.id,
            patient_id = %ride.patient_id,
            candidates = candidate_driver_ids.len(),
            "ride requested"
        );

        Ok(DispatchOutcome {
            ride,
            candidate_driver_ids,
        })
    }
}
