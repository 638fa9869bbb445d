use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dispatch::lifecycle::LifecycleController;
use crate::dispatch::service::DispatchService;
use crate::error::AppError;
use crate::models::driver::GeoPoint;
use crate::models::ride::{Ride, RideDraft, RideStatus, UserRole};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rides", post(create_ride))
        .route("/rides/:id", get(get_ride))
        .route("/rides/:id/accept", post(accept_ride))
        .route("/rides/:id/status", patch(update_ride_status))
        .route("/rides/:id/rating", post(rate_ride))
        .route("/users/:id/rides", get(list_user_rides))
}

#[derive(Deserialize)]
pub struct CreateRideRequest {
    pub patient_id: Uuid,
    pub origin_address: String,
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub destination_address: String,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub facility_id: Option<Uuid>,
    pub appointment_date: Option<DateTime<Utc>>,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub price: Option<f64>,
}

#[derive(Serialize)]
pub struct CreateRideResponse {
    pub ride: Ride,
    pub available_drivers: usize,
}

#[derive(Serialize)]
pub struct RideResponse {
    pub ride: Ride,
}

#[derive(Serialize)]
pub struct RidesResponse {
    pub rides: Vec<Ride>,
}

#[derive(Deserialize)]
pub struct AcceptRideRequest {
    pub driver_id: Uuid,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: RideStatus,
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct RateRideRequest {
    pub user_id: Uuid,
    pub rating: u8,
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct UserRidesQuery {
    pub user_type: UserRole,
}

async fn create_ride(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRideRequest>,
) -> Result<Json<CreateRideResponse>, AppError> {
    let draft = RideDraft {
        patient_id: payload.patient_id,
        origin_address: payload.origin_address,
        origin: GeoPoint {
            lat: payload.origin_lat,
            lng: payload.origin_lng,
        },
        destination_address: payload.destination_address,
        destination: GeoPoint {
            lat: payload.destination_lat,
            lng: payload.destination_lng,
        },
        facility_id: payload.facility_id,
        appointment_at: payload.appointment_date,
        distance_km: payload.distance_km,
        duration_minutes: payload.duration_minutes,
        price: payload.price,
    };

    let outcome = DispatchService::new(state).request_ride(draft).await?;

    Ok(Json(CreateRideResponse {
        available_drivers: outcome.candidate_driver_ids.len(),
        ride: outcome.ride,
    }))
}

async fn get_ride(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<RideResponse>, AppError> {
    let ride = state.rides.get(id)?;
    Ok(Json(RideResponse { ride }))
}

async fn accept_ride(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AcceptRideRequest>,
) -> Result<Json<RideResponse>, AppError> {
    let ride = LifecycleController::new(state)
        .accept(id, payload.driver_id)
        .await?;
    Ok(Json(RideResponse { ride }))
}

async fn update_ride_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<RideResponse>, AppError> {
    let ride = LifecycleController::new(state)
        .update_status(id, payload.status, payload.user_id)
        .await?;
    Ok(Json(RideResponse { ride }))
}

async fn rate_ride(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RateRideRequest>,
) -> Result<Json<RideResponse>, AppError> {
    let ride = LifecycleController::new(state)
        .rate(id, payload.user_id, payload.rating, payload.comment)
        .await?;
    Ok(Json(RideResponse { ride }))
}

async fn list_user_rides(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserRidesQuery>,
) -> Json<RidesResponse> {
    let rides = state.rides.list_for_user(id, query.user_type);
    Json(RidesResponse { rides })
}
