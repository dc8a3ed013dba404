// libs/schedule-cell/src/services/catalog.rs
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use shared_store::{MemoryStore, StoreError};

use crate::models::{BookableSchedule, CreateScheduleRequest, Schedule, ScheduleError};

/// Owns schedule records and their queries. Never touches `claimed`; that
/// column belongs to the allocation engine.
pub struct ScheduleCatalogService {
    store: Arc<MemoryStore>,
}

impl ScheduleCatalogService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub async fn create_schedule(
        &self,
        request: CreateScheduleRequest,
    ) -> Result<Schedule, ScheduleError> {
        if request.max_capacity == 0 {
            return Err(ScheduleError::Validation(
                "max_capacity must be greater than zero".to_string(),
            ));
        }
        if request.start_time >= request.end_time {
            return Err(ScheduleError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }

        let now = Utc::now();
        let schedule = Schedule {
            id: Uuid::new_v4(),
            doctor_id: request.doctor_id,
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            max_capacity: request.max_capacity,
            claimed: 0,
            active: true,
            created_at: now,
            updated_at: now,
        };

        self.store
            .insert_schedule(schedule.clone())
            .await
            .map_err(|e| match e {
                StoreError::DoctorNotFound => ScheduleError::DoctorNotFound,
                other => ScheduleError::Validation(other.to_string()),
            })?;

        info!(
            "Schedule {} created for doctor {} on {} ({} slots)",
            schedule.id, schedule.doctor_id, schedule.date, schedule.max_capacity
        );
        Ok(schedule)
    }

    pub async fn get_schedule(&self, id: Uuid) -> Result<Schedule, ScheduleError> {
        self.store
            .get_schedule(id)
            .await
            .map_err(|_| ScheduleError::NotFound)
    }

    pub async fn list_by_date(&self, date: NaiveDate) -> Vec<Schedule> {
        self.store.list_schedules_by_date(date).await
    }

    pub async fn list_by_doctor(&self, doctor_id: Uuid) -> Vec<Schedule> {
        self.store.list_schedules_by_doctor(doctor_id).await
    }

    /// Schedules a patient may currently be offered: active, strictly in the
    /// future, not yet at capacity. Claim-time re-validation still applies
    /// since listing and claiming are not atomic with respect to each other.
    pub async fn list_bookable(
        &self,
        doctor_id: Uuid,
        now: DateTime<Utc>,
    ) -> Vec<BookableSchedule> {
        let schedules = self.store.list_schedules_by_doctor(doctor_id).await;
        let bookable: Vec<BookableSchedule> = schedules
            .iter()
            .filter(|s| s.is_bookable(now))
            .map(BookableSchedule::from)
            .collect();
        debug!(
            "{} of {} schedules bookable for doctor {}",
            bookable.len(),
            schedules.len(),
            doctor_id
        );
        bookable
    }

    pub async fn delete_schedule(&self, id: Uuid) -> Result<(), ScheduleError> {
        self.store.remove_schedule(id).await.map_err(|e| match e {
            StoreError::ScheduleNotFound => ScheduleError::NotFound,
            StoreError::OutstandingClaims => ScheduleError::OutstandingBookings,
            other => ScheduleError::Validation(other.to_string()),
        })?;
        info!("Schedule {} deleted", id);
        Ok(())
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<Schedule, ScheduleError> {
        let schedule = self
            .store
            .set_schedule_active(id, active)
            .await
            .map_err(|_| ScheduleError::NotFound)?;
        info!("Schedule {} active set to {}", id, active);
        Ok(schedule)
    }
}
