// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use shared_models::{Appointment, AppointmentStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub schedule_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentResponse {
    pub appointment_id: Uuid,
    pub appointment_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: String,
    pub cancelled_by: CancelledBy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelledBy {
    Patient,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteAppointmentRequest {
    /// The acting doctor; must be the appointment's doctor.
    pub doctor_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Schedule not found")]
    ScheduleNotFound,

    #[error("Doctor does not match the selected schedule")]
    DoctorScheduleMismatch,

    #[error("Patient already holds a live booking for this slot")]
    DuplicateBooking,

    #[error("Schedule is full, please pick another slot")]
    CapacityExceeded,

    #[error("Appointment cannot move from {from} status")]
    InvalidTransition { from: AppointmentStatus },

    #[error("Less than {cutoff_minutes} minutes to the appointment, too late to cancel")]
    CancellationWindowClosed { cutoff_minutes: i64 },

    #[error("Only the appointment's doctor may complete it")]
    NotAppointmentDoctor,

    #[error("Storage error: {0}")]
    Storage(String),
}
