use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{patch, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::driver::{Driver, GeoPoint};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", post(register_driver).get(list_drivers))
        .route("/drivers/:id/position", patch(update_driver_position))
}

#[derive(Deserialize)]
pub struct RegisterDriverRequest {
    pub name: String,
    pub position: Option<GeoPoint>,
}

#[derive(Deserialize)]
pub struct UpdatePositionRequest {
    pub position: GeoPoint,
}

async fn register_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterDriverRequest>,
) -> Result<Json<Driver>, AppError> {
    let driver = state.drivers.register(payload.name, payload.position)?;
    Ok(Json(driver))
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Json<Vec<Driver>> {
    Json(state.drivers.list())
}

async fn update_driver_position(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePositionRequest>,
) -> Result<Json<Driver>, AppError> {
    let driver = state.drivers.update_position(id, payload.position)?;
    Ok(Json(driver))
}
