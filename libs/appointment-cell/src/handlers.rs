// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{
    AppointmentError, CancelAppointmentRequest, CompleteAppointmentRequest,
    CreateAppointmentRequest, CreateAppointmentResponse,
};
use crate::services::booking::AppointmentBookingService;
use crate::services::policy::CancellationPolicy;

impl From<AppointmentError> for AppError {
    fn from(e: AppointmentError) -> Self {
        match e {
            AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            AppointmentError::PatientNotFound => AppError::NotFound("Patient not found".to_string()),
            AppointmentError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
            AppointmentError::ScheduleNotFound => AppError::NotFound("Schedule not found".to_string()),
            AppointmentError::DoctorScheduleMismatch => {
                AppError::Validation("Doctor does not match the selected schedule".to_string())
            }
            AppointmentError::DuplicateBooking => {
                AppError::Conflict("Patient already holds a live booking for this slot".to_string())
            }
            AppointmentError::CapacityExceeded => {
                AppError::CapacityExceeded("Schedule is full, please pick another slot".to_string())
            }
            AppointmentError::InvalidTransition { from } => AppError::InvalidTransition(format!(
                "Appointment cannot move from {} status",
                from
            )),
            AppointmentError::CancellationWindowClosed { cutoff_minutes } => {
                AppError::PolicyViolation(format!(
                    "Less than {} minutes to the appointment, too late to cancel",
                    cutoff_minutes
                ))
            }
            AppointmentError::NotAppointmentDoctor => {
                AppError::Forbidden("Only the appointment's doctor may complete it".to_string())
            }
            AppointmentError::Storage(msg) => AppError::Internal(msg),
        }
    }
}

fn booking_service(state: &AppState) -> AppointmentBookingService {
    let policy = CancellationPolicy::new(state.config.cancellation_cutoff_minutes);
    AppointmentBookingService::new(state.store.clone(), policy)
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = booking_service(&state);
    let appointment = service.create(request).await?;
    let response = CreateAppointmentResponse {
        appointment_id: appointment.id,
        appointment_time: appointment.appointment_time,
    };
    Ok(Json(json!({
        "success": true,
        "appointment": response,
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = booking_service(&state);
    let appointment = service.get(appointment_id).await?;
    Ok(Json(json!({ "appointment": appointment })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = booking_service(&state);
    let appointment = service.cancel(appointment_id, request, Utc::now()).await?;
    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CompleteAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = booking_service(&state);
    let appointment = service.complete(appointment_id, request.doctor_id).await?;
    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
    })))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = booking_service(&state);
    let appointments = service.list_by_patient(patient_id).await;
    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = booking_service(&state);
    let appointments = service.list_by_doctor(doctor_id).await;
    Ok(Json(json!({ "appointments": appointments })))
}
