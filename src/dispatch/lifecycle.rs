use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::dispatch::transitions;
use crate::error::AppError;
use crate::models::notification::{Notification, NotificationKind};
use crate::models::ride::{Ride, RidePatch, RideStatus};
use crate::notify;
use crate::state::AppState;

#[derive(Clone)]
pub struct LifecycleController {
    state: Arc<AppState>,
}

impl LifecycleController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn accept(&self, ride_id: Uuid, driver_id: Uuid) -> Result<Ride, AppError> {
        let driver = self.state.drivers.get(driver_id)?;
        if !driver.is_available {
            self.count_accept("conflict");
            return Err(AppError::Conflict(format!(
                "driver {driver_id} is not available"
            )));
        }

        let patch = RidePatch {
            status: Some(RideStatus::Accepted),
            driver_id: Some(Some(driver_id)),
            ..RidePatch::default()
        };
        let ride = match self
            .state
            .rides
            .conditional_update(ride_id, RideStatus::Requested, patch)
        {
            Ok(ride) => ride,
            Err(err) => {
                match &err {
                    AppError::Conflict(_) => self.count_accept("conflict"),
                    _ => self.count_accept("not_found"),
                }
                return Err(err);
            }
        };

        self.state.drivers.set_availability(driver_id, false)?;
        self.count_accept("won");

        notify::send(
            &self.state,
            Notification::for_ride(
                NotificationKind::RideAccepted,
                ride.patient_id,
                &ride,
                "Ride accepted",
                format!("{} is on the way", driver.name),
            ),
        );

        info!(ride_id = %ride.id, driver_id = %driver_id, "ride accepted");
        Ok(ride)
    }

    pub async fn update_status(
        &self,
        ride_id: Uuid,
        target: RideStatus,
        user_id: Uuid,
    ) -> Result<Ride, AppError> {
        match target {
            RideStatus::Cancelled => self.cancel(ride_id, user_id).await,
            RideStatus::DriverArriving | RideStatus::InProgress | RideStatus::Completed => {
                self.progress(ride_id, target, user_id).await
            }
            // Assignment goes through accept(); rides never return to requested.
            RideStatus::Requested | RideStatus::Accepted => {
                let current = self.state.rides.get(ride_id)?;
                Err(AppError::IllegalTransition {
                    from: current.status,
                    to: target,
                })
            }
        }
    }

    pub async fn cancel(&self, ride_id: Uuid, user_id: Uuid) -> Result<Ride, AppError> {
        let current = self.state.rides.get(ride_id)?;
        ensure_participant(&current, user_id)?;

        if !transitions::is_legal(current.status, RideStatus::Cancelled) {
            return Err(AppError::IllegalTransition {
                from: current.status,
                to: RideStatus::Cancelled,
            });
        }

        let patch = RidePatch {
            status: Some(RideStatus::Cancelled),
            driver_id: Some(None),
            ..RidePatch::default()
        };
        let ride = self
            .state
            .rides
            .conditional_update(ride_id, current.status, patch)?;
        self.state.metrics.open_rides.dec();

        if let Some(driver_id) = current.driver_id {
            self.state.drivers.set_availability(driver_id, true)?;
        }

        if let Some(recipient) = counterpart_of(&current, user_id) {
            notify::send(
                &self.state,
                Notification {
                    kind: NotificationKind::RideCancelled,
                    title: "Ride cancelled".to_string(),
                    body: format!("Ride to {} was cancelled", ride.destination_address),
                    recipient,
                    ride_id: ride.id,
                    driver_id: current.driver_id,
                    patient_id: ride.patient_id,
                },
            );
        }

        info!(ride_id = %ride.id, by = %user_id, "ride cancelled");
        Ok(ride)
    }

    pub async fn rate(
        &self,
        ride_id: Uuid,
        patient_id: Uuid,
        rating: u8,
        comment: Option<String>,
    ) -> Result<Ride, AppError> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::InvalidInput(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }

        let current = self.state.rides.get(ride_id)?;
        if current.patient_id != patient_id {
            return Err(AppError::InvalidInput(format!(
                "user {patient_id} is not the patient of ride {ride_id}"
            )));
        }
        if current.rating.is_some() {
            return Err(AppError::Conflict(format!(
                "ride {ride_id} has already been rated"
            )));
        }

        let patch = RidePatch {
            rating: Some(rating),
            rating_comment: comment,
            ..RidePatch::default()
        };
        let ride = self
            .state
            .rides
            .conditional_update(ride_id, RideStatus::Completed, patch)?;

        info!(ride_id = %ride.id, rating, "ride rated");
        Ok(ride)
    }

    async fn progress(
        &self,
        ride_id: Uuid,
        target: RideStatus,
        user_id: Uuid,
    ) -> Result<Ride, AppError> {
        let current = self.state.rides.get(ride_id)?;
        ensure_participant(&current, user_id)?;

        if !transitions::is_legal(current.status, target) {
            return Err(AppError::IllegalTransition {
                from: current.status,
                to: target,
            });
        }

        let mut patch = RidePatch {
            status: Some(target),
            ..RidePatch::default()
        };
        if target == RideStatus::Completed {
            patch.completed_at = Some(Utc::now());
        }
        let ride = self
            .state
            .rides
            .conditional_update(ride_id, current.status, patch)?;

        if target == RideStatus::Completed {
            if let Some(driver_id) = ride.driver_id {
                self.state.drivers.set_availability(driver_id, true)?;
            }
            self.state.metrics.open_rides.dec();
        }

        if let Some(recipient) = counterpart_of(&ride, user_id) {
            let title = match target {
                RideStatus::DriverArriving => "Driver arriving",
                RideStatus::InProgress => "Ride in progress",
                _ => "Ride completed",
            };
            notify::send(
                &self.state,
                Notification::for_ride(
                    NotificationKind::RideStatus,
                    recipient,
                    &ride,
                    title,
                    format!("Ride to {} is now {}", ride.destination_address, target),
                ),
            );
        }

        info!(ride_id = %ride.id, status = %target, by = %user_id, "ride status updated");
        Ok(ride)
    }

    fn count_accept(&self, outcome: &str) {
        self.state
            .metrics
            .accept_attempts_total
            .with_label_values(&[outcome])
            .inc();
    }
}

fn ensure_participant(ride: &Ride, user_id: Uuid) -> Result<(), AppError> {
    if ride.patient_id == user_id || ride.driver_id == Some(user_id) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "user {user_id} is not a participant of ride {}",
            ride.id
        )))
    }
}

fn counterpart_of(ride: &Ride, user_id: Uuid) -> Option<Uuid> {
    if user_id == ride.patient_id {
        ride.driver_id
    } else {
        Some(ride.patient_id)
    }
}
