// libs/schedule-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use shared_models::Schedule;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub max_capacity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetScheduleActiveRequest {
    pub active: bool,
}

/// A schedule as offered to a patient picking a slot, with the remaining
/// capacity computed at listing time. The count is advisory only: it can go
/// stale the moment it is produced, and the allocation engine re-validates
/// at claim time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookableSchedule {
    pub schedule_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub remaining: u32,
}

impl From<&Schedule> for BookableSchedule {
    fn from(s: &Schedule) -> Self {
        Self {
            schedule_id: s.id,
            date: s.date,
            start_time: s.start_time,
            end_time: s.end_time,
            remaining: s.remaining(),
        }
    }
}

/// Proof that one capacity unit was claimed on a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotClaim {
    pub schedule_id: Uuid,
    pub remaining: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Schedule not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Schedule is full or closed")]
    CapacityExceeded,

    #[error("Schedule has outstanding bookings and cannot be deleted")]
    OutstandingBookings,
}
