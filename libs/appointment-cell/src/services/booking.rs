// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use schedule_cell::models::ScheduleError;
use schedule_cell::services::allocation::SlotAllocationService;
use shared_store::{MemoryStore, StoreError};

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, CancelAppointmentRequest,
    CreateAppointmentRequest,
};
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::policy::CancellationPolicy;

/// Drives the appointment lifecycle on top of the allocation engine.
///
/// An appointment comes into existence only when a capacity claim succeeds,
/// and a claim is returned exactly once per cancellation; the status
/// compare-and-set in the store is what pins both down under concurrency.
pub struct AppointmentBookingService {
    store: Arc<MemoryStore>,
    allocation: SlotAllocationService,
    lifecycle: AppointmentLifecycleService,
    policy: CancellationPolicy,
}

impl AppointmentBookingService {
    pub fn new(store: Arc<MemoryStore>, policy: CancellationPolicy) -> Self {
        let allocation = SlotAllocationService::new(store.clone());
        Self {
            store,
            allocation,
            lifecycle: AppointmentLifecycleService::new(),
            policy,
        }
    }

    /// Books one capacity unit for the patient. A failed claim is terminal
    /// for the whole operation: no appointment record is written.
    pub async fn create(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for patient {} on schedule {}",
            request.patient_id, request.schedule_id
        );

        self.store
            .get_patient(request.patient_id)
            .await
            .map_err(|_| AppointmentError::PatientNotFound)?;
        self.store
            .get_doctor(request.doctor_id)
            .await
            .map_err(|_| AppointmentError::DoctorNotFound)?;
        let schedule = self
            .store
            .get_schedule(request.schedule_id)
            .await
            .map_err(|_| AppointmentError::ScheduleNotFound)?;

        if schedule.doctor_id != request.doctor_id {
            return Err(AppointmentError::DoctorScheduleMismatch);
        }

        // The claim re-validates capacity and active state atomically; the
        // bookable listing the caller saw may already be stale.
        let claim = self
            .allocation
            .claim(request.schedule_id)
            .await
            .map_err(|e| match e {
                ScheduleError::NotFound => AppointmentError::ScheduleNotFound,
                ScheduleError::CapacityExceeded => AppointmentError::CapacityExceeded,
                other => AppointmentError::Storage(other.to_string()),
            })?;

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            schedule_id: request.schedule_id,
            appointment_time: schedule.starts_at(),
            status: AppointmentStatus::Booked,
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        };

        match self.store.insert_booked_appointment(appointment).await {
            Ok(appointment) => {
                info!(
                    "Appointment {} booked, {} slots remaining on schedule {}",
                    appointment.id, claim.remaining, claim.schedule_id
                );
                Ok(appointment)
            }
            Err(StoreError::DuplicateBooking) => {
                // Hand the unit back before reporting; the claim must not
                // leak when the insert is refused.
                if let Err(e) = self.allocation.release(request.schedule_id).await {
                    warn!(
                        "Failed to release claim on schedule {} after duplicate booking: {}",
                        request.schedule_id, e
                    );
                }
                Err(AppointmentError::DuplicateBooking)
            }
            Err(other) => Err(AppointmentError::Storage(other.to_string())),
        }
    }

    /// Cancels a Booked appointment, releasing its capacity unit exactly
    /// once. The policy is checked against `now` at the moment of the call.
    pub async fn cancel(
        &self,
        appointment_id: Uuid,
        request: CancelAppointmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Cancelling appointment {}", appointment_id);

        let appointment = self
            .store
            .get_appointment(appointment_id)
            .await
            .map_err(|_| AppointmentError::NotFound)?;

        // Resolved appointments fail the transition check; still-Booked ones
        // inside the cutoff fail the policy. The two are distinct errors so
        // callers can present "too late to cancel" vs "already resolved".
        self.lifecycle
            .validate_transition(appointment.status, AppointmentStatus::Cancelled)?;
        if !self.policy.is_cancellable(&appointment, now) {
            return Err(AppointmentError::CancellationWindowClosed {
                cutoff_minutes: self.policy.cutoff_minutes(),
            });
        }

        let cancelled = self
            .store
            .transition_appointment(
                appointment_id,
                AppointmentStatus::Booked,
                AppointmentStatus::Cancelled,
                Some(request.reason),
            )
            .await
            .map_err(|e| match e {
                StoreError::AppointmentNotFound => AppointmentError::NotFound,
                StoreError::StatusChanged { actual, .. } => {
                    AppointmentError::InvalidTransition { from: actual }
                }
                other => AppointmentError::Storage(other.to_string()),
            })?;

        // Only the winner of the compare-and-set reaches this point, so the
        // unit goes back exactly once.
        if let Err(e) = self.allocation.release(cancelled.schedule_id).await {
            warn!(
                "Cancelled appointment {} but failed to release schedule {}: {}",
                appointment_id, cancelled.schedule_id, e
            );
        }

        info!(
            "Appointment {} cancelled by {:?}",
            appointment_id, request.cancelled_by
        );
        Ok(cancelled)
    }

    /// Marks a Booked appointment Completed. The capacity unit stays
    /// claimed permanently: a completed visit still counts against the
    /// historical slot. No temporal guard applies.
    pub async fn complete(
        &self,
        appointment_id: Uuid,
        actor_doctor_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Completing appointment {}", appointment_id);

        let appointment = self
            .store
            .get_appointment(appointment_id)
            .await
            .map_err(|_| AppointmentError::NotFound)?;

        if appointment.doctor_id != actor_doctor_id {
            return Err(AppointmentError::NotAppointmentDoctor);
        }
        self.lifecycle
            .validate_transition(appointment.status, AppointmentStatus::Completed)?;

        let completed = self
            .store
            .transition_appointment(
                appointment_id,
                AppointmentStatus::Booked,
                AppointmentStatus::Completed,
                None,
            )
            .await
            .map_err(|e| match e {
                StoreError::AppointmentNotFound => AppointmentError::NotFound,
                StoreError::StatusChanged { actual, .. } => {
                    AppointmentError::InvalidTransition { from: actual }
                }
                other => AppointmentError::Storage(other.to_string()),
            })?;

        info!("Appointment {} completed", appointment_id);
        Ok(completed)
    }

    pub async fn get(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.store
            .get_appointment(appointment_id)
            .await
            .map_err(|_| AppointmentError::NotFound)
    }

    pub async fn list_by_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        self.store.list_appointments_by_patient(patient_id).await
    }

    pub async fn list_by_doctor(&self, doctor_id: Uuid) -> Vec<Appointment> {
        self.store.list_appointments_by_doctor(doctor_id).await
    }
}
