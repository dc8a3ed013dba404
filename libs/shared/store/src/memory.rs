// libs/shared/store/src/memory.rs
use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::{Appointment, AppointmentStatus, Department, Doctor, Patient, Schedule};

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Department not found")]
    DepartmentNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Schedule not found")]
    ScheduleNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Schedule is full or closed")]
    CapacityExhausted,

    #[error("Patient already holds a live booking for this slot")]
    DuplicateBooking,

    #[error("Schedule has outstanding bookings")]
    OutstandingClaims,

    #[error("Appointment status is {actual}, not {expected}")]
    StatusChanged {
        expected: AppointmentStatus,
        actual: AppointmentStatus,
    },
}

#[derive(Default)]
struct State {
    departments: HashMap<Uuid, Department>,
    doctors: HashMap<Uuid, Doctor>,
    patients: HashMap<Uuid, Patient>,
    schedules: HashMap<Uuid, Schedule>,
    appointments: HashMap<Uuid, Appointment>,
}

/// In-memory backing store for the booking core.
///
/// All mutations run under a single writer lock, so each operation below is
/// one indivisible critical section: `try_claim` is a conditional
/// check-and-increment with no read-then-write gap, and
/// `transition_appointment` is a compare-and-set on the status column.
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    // ----- directory ---------------------------------------------------

    pub async fn insert_department(&self, department: Department) {
        let mut state = self.state.write().await;
        state.departments.insert(department.id, department);
    }

    pub async fn get_department(&self, id: Uuid) -> Result<Department, StoreError> {
        let state = self.state.read().await;
        state
            .departments
            .get(&id)
            .cloned()
            .ok_or(StoreError::DepartmentNotFound)
    }

    pub async fn list_departments(&self) -> Vec<Department> {
        let state = self.state.read().await;
        let mut departments: Vec<_> = state.departments.values().cloned().collect();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        departments
    }

    pub async fn insert_doctor(&self, doctor: Doctor) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.departments.contains_key(&doctor.department_id) {
            return Err(StoreError::DepartmentNotFound);
        }
        state.doctors.insert(doctor.id, doctor);
        Ok(())
    }

    pub async fn get_doctor(&self, id: Uuid) -> Result<Doctor, StoreError> {
        let state = self.state.read().await;
        state
            .doctors
            .get(&id)
            .cloned()
            .ok_or(StoreError::DoctorNotFound)
    }

    pub async fn list_doctors_by_department(&self, department_id: Uuid) -> Vec<Doctor> {
        let state = self.state.read().await;
        let mut doctors: Vec<_> = state
            .doctors
            .values()
            .filter(|d| d.department_id == department_id)
            .cloned()
            .collect();
        doctors.sort_by(|a, b| a.last_name.cmp(&b.last_name));
        doctors
    }

    pub async fn insert_patient(&self, patient: Patient) {
        let mut state = self.state.write().await;
        state.patients.insert(patient.id, patient);
    }

    pub async fn get_patient(&self, id: Uuid) -> Result<Patient, StoreError> {
        let state = self.state.read().await;
        state
            .patients
            .get(&id)
            .cloned()
            .ok_or(StoreError::PatientNotFound)
    }

    // ----- schedules ----------------------------------------------------

    pub async fn insert_schedule(&self, schedule: Schedule) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.doctors.contains_key(&schedule.doctor_id) {
            return Err(StoreError::DoctorNotFound);
        }
        state.schedules.insert(schedule.id, schedule);
        Ok(())
    }

    pub async fn get_schedule(&self, id: Uuid) -> Result<Schedule, StoreError> {
        let state = self.state.read().await;
        state
            .schedules
            .get(&id)
            .cloned()
            .ok_or(StoreError::ScheduleNotFound)
    }

    pub async fn list_schedules_by_date(&self, date: NaiveDate) -> Vec<Schedule> {
        let state = self.state.read().await;
        let mut schedules: Vec<_> = state
            .schedules
            .values()
            .filter(|s| s.date == date)
            .cloned()
            .collect();
        schedules.sort_by_key(|s| s.start_time);
        schedules
    }

    pub async fn list_schedules_by_doctor(&self, doctor_id: Uuid) -> Vec<Schedule> {
        let state = self.state.read().await;
        let mut schedules: Vec<_> = state
            .schedules
            .values()
            .filter(|s| s.doctor_id == doctor_id)
            .cloned()
            .collect();
        schedules.sort_by_key(|s| (s.date, s.start_time));
        schedules
    }

    /// Removes a schedule, refused while any capacity unit is claimed.
    pub async fn remove_schedule(&self, id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let schedule = state
            .schedules
            .get(&id)
            .ok_or(StoreError::ScheduleNotFound)?;
        if schedule.claimed > 0 {
            return Err(StoreError::OutstandingClaims);
        }
        state.schedules.remove(&id);
        Ok(())
    }

    pub async fn set_schedule_active(&self, id: Uuid, active: bool) -> Result<Schedule, StoreError> {
        let mut state = self.state.write().await;
        let schedule = state
            .schedules
            .get_mut(&id)
            .ok_or(StoreError::ScheduleNotFound)?;
        schedule.active = active;
        schedule.updated_at = Utc::now();
        Ok(schedule.clone())
    }

    // ----- capacity units ----------------------------------------------

    /// Conditionally claims one capacity unit: succeeds only while the
    /// schedule is active and below capacity. Check and increment happen
    /// under the same write lock, so under N concurrent callers against
    /// remaining capacity C exactly C succeed.
    pub async fn try_claim(&self, schedule_id: Uuid) -> Result<u32, StoreError> {
        let mut state = self.state.write().await;
        let schedule = state
            .schedules
            .get_mut(&schedule_id)
            .ok_or(StoreError::ScheduleNotFound)?;
        if !schedule.active || schedule.claimed >= schedule.max_capacity {
            return Err(StoreError::CapacityExhausted);
        }
        schedule.claimed += 1;
        schedule.updated_at = Utc::now();
        debug!(
            "Claimed unit on schedule {} ({} remaining)",
            schedule_id,
            schedule.remaining()
        );
        Ok(schedule.remaining())
    }

    /// Returns one capacity unit to the pool, floored at zero. Callers are
    /// responsible for invoking this exactly once per released claim.
    pub async fn release(&self, schedule_id: Uuid) -> Result<u32, StoreError> {
        let mut state = self.state.write().await;
        let schedule = state
            .schedules
            .get_mut(&schedule_id)
            .ok_or(StoreError::ScheduleNotFound)?;
        schedule.claimed = schedule.claimed.saturating_sub(1);
        schedule.updated_at = Utc::now();
        debug!(
            "Released unit on schedule {} ({} claimed)",
            schedule_id, schedule.claimed
        );
        Ok(schedule.claimed)
    }

    // ----- appointments -------------------------------------------------

    /// Inserts a freshly booked appointment. The caller must already hold a
    /// claim on the schedule. The duplicate guard runs under the same write
    /// lock as the insert: a patient may not hold two live bookings on one
    /// schedule, nor two live bookings at the same appointment time.
    pub async fn insert_booked_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, StoreError> {
        let mut state = self.state.write().await;
        let duplicate = state.appointments.values().any(|a| {
            a.patient_id == appointment.patient_id
                && a.status == AppointmentStatus::Booked
                && (a.schedule_id == appointment.schedule_id
                    || a.appointment_time == appointment.appointment_time)
        });
        if duplicate {
            return Err(StoreError::DuplicateBooking);
        }
        state.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    pub async fn get_appointment(&self, id: Uuid) -> Result<Appointment, StoreError> {
        let state = self.state.read().await;
        state
            .appointments
            .get(&id)
            .cloned()
            .ok_or(StoreError::AppointmentNotFound)
    }

    pub async fn list_appointments_by_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        let state = self.state.read().await;
        let mut appointments: Vec<_> = state
            .appointments
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        appointments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        appointments
    }

    pub async fn list_appointments_by_doctor(&self, doctor_id: Uuid) -> Vec<Appointment> {
        let state = self.state.read().await;
        let mut appointments: Vec<_> = state
            .appointments
            .values()
            .filter(|a| a.doctor_id == doctor_id)
            .cloned()
            .collect();
        appointments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        appointments
    }

    /// Compare-and-set status transition. Fails with `StatusChanged` when
    /// the stored status no longer matches `expected_from`, which is what
    /// makes side effects keyed to a transition (capacity release on
    /// cancellation) fire exactly once under concurrent attempts.
    pub async fn transition_appointment(
        &self,
        id: Uuid,
        expected_from: AppointmentStatus,
        to: AppointmentStatus,
        cancel_reason: Option<String>,
    ) -> Result<Appointment, StoreError> {
        let mut state = self.state.write().await;
        let appointment = state
            .appointments
            .get_mut(&id)
            .ok_or(StoreError::AppointmentNotFound)?;
        if appointment.status != expected_from {
            return Err(StoreError::StatusChanged {
                expected: expected_from,
                actual: appointment.status,
            });
        }
        appointment.status = to;
        if let Some(reason) = cancel_reason {
            appointment.cancel_reason = Some(reason);
        }
        appointment.updated_at = Utc::now();
        Ok(appointment.clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
