use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::ride::{Ride, RideDraft, RidePatch, RideStatus, UserRole};

pub struct RideStore {
    rides: DashMap<Uuid, Ride>,
}

impl RideStore {
    pub fn new() -> Self {
        Self {
            rides: DashMap::new(),
        }
    }

    pub fn create(&self, draft: RideDraft) -> Result<Ride, AppError> {
        if draft.origin_address.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "origin address cannot be empty".to_string(),
            ));
        }
        if draft.destination_address.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "destination address cannot be empty".to_string(),
            ));
        }
        if !draft.origin.in_bounds() {
            return Err(AppError::InvalidInput(
                "origin coordinates are out of bounds".to_string(),
            ));
        }
        if !draft.destination.in_bounds() {
            return Err(AppError::InvalidInput(
                "destination coordinates are out of bounds".to_string(),
            ));
        }
        if draft.patient_id.is_nil() {
            return Err(AppError::InvalidInput(
                "patient id cannot be nil".to_string(),
            ));
        }

        let now = Utc::now();
        let ride = Ride {
            id: Uuid::new_v4(),
            patient_id: draft.patient_id,
            driver_id: None,
            origin_address: draft.origin_address,
            origin: draft.origin,
            destination_address: draft.destination_address,
            destination: draft.destination,
            facility_id: draft.facility_id,
            appointment_at: draft.appointment_at,
            status: RideStatus::Requested,
            distance_km: draft.distance_km,
            duration_minutes: draft.duration_minutes,
            price: draft.price,
            rating: None,
            rating_comment: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };

        self.rides.insert(ride.id, ride.clone());
        Ok(ride)
    }

    pub fn get(&self, ride_id: Uuid) -> Result<Ride, AppError> {
        self.rides
            .get(&ride_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::NotFound(format!("ride {ride_id} not found")))
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }

    // The only mutation path for ride records.
    pub fn conditional_update(
        &self,
        ride_id: Uuid,
        expected: RideStatus,
        patch: RidePatch,
    ) -> Result<Ride, AppError> {
        let mut ride = self
            .rides
            .get_mut(&ride_id)
            .ok_or_else(|| AppError::NotFound(format!("ride {ride_id} not found")))?;

        if ride.status != expected {
            return Err(AppError::Conflict(format!(
                "ride {ride_id} is {}, expected {expected}",
                ride.status
            )));
        }

        if let Some(status) = patch.status {
            ride.status = status;
        }
        if let Some(driver_id) = patch.driver_id {
            ride.driver_id = driver_id;
        }
        if let Some(completed_at) = patch.completed_at {
            ride.completed_at = Some(completed_at);
        }
        if let Some(rating) = patch.rating {
            ride.rating = Some(rating);
        }
        if let Some(comment) = patch.rating_comment {
            ride.rating_comment = Some(comment);
        }
        ride.updated_at = Utc::now();

        Ok(ride.clone())
    }

    pub fn list_for_user(&self, user_id: Uuid, role: UserRole) -> Vec<Ride> {
        let mut rides: Vec<Ride> = self
            .rides
            .iter()
            .filter(|entry| match role {
                UserRole::Patient => entry.value().patient_id == user_id,
                UserRole::Driver => entry.value().driver_id == Some(user_id),
            })
            .map(|entry| entry.value().clone())
            .collect();

        rides.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rides
    }
}
