// libs/schedule-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{CreateScheduleRequest, ScheduleError, SetScheduleActiveRequest};
use crate::services::catalog::ScheduleCatalogService;

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        match e {
            ScheduleError::NotFound => AppError::NotFound("Schedule not found".to_string()),
            ScheduleError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
            ScheduleError::Validation(msg) => AppError::Validation(msg),
            ScheduleError::CapacityExceeded => {
                AppError::CapacityExceeded("Schedule is full, please pick another slot".to_string())
            }
            ScheduleError::OutstandingBookings => AppError::Conflict(
                "Schedule has outstanding bookings and cannot be deleted".to_string(),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScheduleListQuery {
    pub date: NaiveDate,
}

#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let catalog = ScheduleCatalogService::new(state.store.clone());
    let schedule = catalog.create_schedule(request).await?;
    Ok(Json(json!({ "schedule": schedule })))
}

#[axum::debug_handler]
pub async fn list_schedules_by_date(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScheduleListQuery>,
) -> Result<Json<Value>, AppError> {
    let catalog = ScheduleCatalogService::new(state.store.clone());
    let schedules = catalog.list_by_date(query.date).await;
    Ok(Json(json!({ "schedules": schedules })))
}

#[axum::debug_handler]
pub async fn list_schedules_by_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let catalog = ScheduleCatalogService::new(state.store.clone());
    let schedules = catalog.list_by_doctor(doctor_id).await;
    Ok(Json(json!({ "schedules": schedules })))
}

#[axum::debug_handler]
pub async fn list_bookable_schedules(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let catalog = ScheduleCatalogService::new(state.store.clone());
    let schedules = catalog.list_bookable(doctor_id, Utc::now()).await;
    Ok(Json(json!({ "schedules": schedules })))
}

#[axum::debug_handler]
pub async fn set_schedule_active(
    State(state): State<Arc<AppState>>,
    Path(schedule_id): Path<Uuid>,
    Json(request): Json<SetScheduleActiveRequest>,
) -> Result<Json<Value>, AppError> {
    let catalog = ScheduleCatalogService::new(state.store.clone());
    let schedule = catalog.set_active(schedule_id, request.active).await?;
    Ok(Json(json!({ "schedule": schedule })))
}

#[axum::debug_handler]
pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    Path(schedule_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let catalog = ScheduleCatalogService::new(state.store.clone());
    catalog.delete_schedule(schedule_id).await?;
    Ok(Json(json!({ "success": true })))
}
