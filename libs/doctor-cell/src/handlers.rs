// libs/doctor-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{CreateDepartmentRequest, CreateDoctorRequest, DirectoryError};
use crate::services::directory::DirectoryService;

impl From<DirectoryError> for AppError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::DepartmentNotFound => AppError::NotFound("Department not found".to_string()),
            DirectoryError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
            DirectoryError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn create_department(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateDepartmentRequest>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(state.store.clone());
    let department = directory.create_department(request).await?;
    Ok(Json(json!({ "department": department })))
}

#[axum::debug_handler]
pub async fn list_departments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(state.store.clone());
    let departments = directory.list_departments().await;
    Ok(Json(json!({ "departments": departments })))
}

#[axum::debug_handler]
pub async fn list_department_doctors(
    State(state): State<Arc<AppState>>,
    Path(department_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(state.store.clone());
    let doctors = directory.list_doctors(department_id).await?;
    Ok(Json(json!({ "doctors": doctors })))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(state.store.clone());
    let doctor = directory.create_doctor(request).await?;
    Ok(Json(json!({ "doctor": doctor })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(state.store.clone());
    let doctor = directory.get_doctor(doctor_id).await?;
    Ok(Json(json!({ "doctor": doctor })))
}
