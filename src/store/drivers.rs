use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::geo::haversine_km;
use crate::models::driver::{Driver, GeoPoint};

pub struct DriverPool {
    drivers: DashMap<Uuid, Driver>,
}

impl DriverPool {
    pub fn new() -> Self {
        Self {
            drivers: DashMap::new(),
        }
    }

    pub fn register(&self, name: String, position: Option<GeoPoint>) -> Result<Driver, AppError> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "driver name cannot be empty".to_string(),
            ));
        }
        if let Some(point) = &position {
            if !point.in_bounds() {
                return Err(AppError::InvalidInput(
                    "driver position is out of bounds".to_string(),
                ));
            }
        }

        let driver = Driver {
            id: Uuid::new_v4(),
            name,
            position,
            is_available: true,
            updated_at: Utc::now(),
        };

        self.drivers.insert(driver.id, driver.clone());
        Ok(driver)
    }

    pub fn get(&self, driver_id: Uuid) -> Result<Driver, AppError> {
        self.drivers
            .get(&driver_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::NotFound(format!("driver {driver_id} not found")))
    }

    pub fn list(&self) -> Vec<Driver> {
        self.drivers
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn find_available_within(&self, origin: &GeoPoint, radius_km: f64) -> Vec<Uuid> {
        self.drivers
            .iter()
            .filter(|entry| {
                let driver = entry.value();
                driver.is_available
                    && driver
                        .position
                        .as_ref()
                        .is_some_and(|position| haversine_km(position, origin) <= radius_km)
            })
            .map(|entry| *entry.key())
            .collect()
    }

    pub fn set_availability(&self, driver_id: Uuid, available: bool) -> Result<Driver, AppError> {
        let mut driver = self
            .drivers
            .get_mut(&driver_id)
            .ok_or_else(|| AppError::NotFound(format!("driver {driver_id} not found")))?;

        driver.is_available = available;
        driver.updated_at = Utc::now();

        Ok(driver.clone())
    }

    pub fn update_position(&self, driver_id: Uuid, position: GeoPoint) -> Result<Driver, AppError> {
        if !position.in_bounds() {
            return Err(AppError::InvalidInput(
                "driver position is out of bounds".to_string(),
            ));
        }

        let mut driver = self
            .drivers
            .get_mut(&driver_id)
            .ok_or_else(|| AppError::NotFound(format!("driver {driver_id} not found")))?;

        driver.position = Some(position);
        driver.updated_at = Utc::now();

        Ok(driver.clone())
    }
}
