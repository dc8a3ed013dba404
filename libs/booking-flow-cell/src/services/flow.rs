// libs/booking-flow-cell/src/services/flow.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use appointment_cell::models::{AppointmentError, CreateAppointmentRequest};
use appointment_cell::services::booking::AppointmentBookingService;
use appointment_cell::services::policy::CancellationPolicy;
use doctor_cell::models::Doctor;
use doctor_cell::services::directory::DirectoryService;
use schedule_cell::models::BookableSchedule;
use schedule_cell::services::catalog::ScheduleCatalogService;
use shared_store::MemoryStore;

use crate::error::BookingFlowError;
use crate::models::{BookingFlow, BookingStage, ConfirmOutcome};

/// Drives a `BookingFlow` through its stages. Each forward transition
/// narrows the query for the next stage; the flow struct itself stays on
/// the caller's side.
pub struct BookingFlowService {
    directory: DirectoryService,
    catalog: ScheduleCatalogService,
    booking: AppointmentBookingService,
}

impl BookingFlowService {
    pub fn new(store: Arc<MemoryStore>, policy: CancellationPolicy) -> Self {
        Self {
            directory: DirectoryService::new(store.clone()),
            catalog: ScheduleCatalogService::new(store.clone()),
            booking: AppointmentBookingService::new(store, policy),
        }
    }

    fn expect_stage(flow: &BookingFlow, expected: BookingStage) -> Result<(), BookingFlowError> {
        if flow.stage != expected {
            return Err(BookingFlowError::StageMismatch {
                expected,
                actual: flow.stage,
            });
        }
        Ok(())
    }

    /// Rewind to an earlier stage, clearing later selections. Moving
    /// forward this way is refused; forward motion only happens through
    /// the select/confirm calls.
    pub fn back(&self, flow: &mut BookingFlow, target: BookingStage) -> Result<(), BookingFlowError> {
        if target > flow.stage {
            return Err(BookingFlowError::ForwardNavigation {
                target,
                current: flow.stage,
            });
        }
        flow.back_to(target);
        debug!("Booking flow rewound to {}", target);
        Ok(())
    }

    pub async fn select_department(
        &self,
        flow: &mut BookingFlow,
        department_id: Uuid,
    ) -> Result<Vec<Doctor>, BookingFlowError> {
        Self::expect_stage(flow, BookingStage::SelectDepartment)?;

        let doctors = self.directory.list_doctors(department_id).await?;
        flow.selection.department_id = Some(department_id);
        flow.stage = BookingStage::SelectDoctor;
        Ok(doctors)
    }

    pub async fn select_doctor(
        &self,
        flow: &mut BookingFlow,
        doctor_id: Uuid,
    ) -> Result<Vec<BookableSchedule>, BookingFlowError> {
        Self::expect_stage(flow, BookingStage::SelectDoctor)?;

        let doctor = self.directory.get_doctor(doctor_id).await?;
        if flow.selection.department_id != Some(doctor.department_id) {
            return Err(BookingFlowError::DoctorOutsideDepartment);
        }

        let schedules = self.catalog.list_bookable(doctor_id, Utc::now()).await;
        flow.selection.doctor_id = Some(doctor_id);
        flow.stage = BookingStage::SelectSchedule;
        Ok(schedules)
    }

    pub async fn select_schedule(
        &self,
        flow: &mut BookingFlow,
        schedule_id: Uuid,
    ) -> Result<(), BookingFlowError> {
        Self::expect_stage(flow, BookingStage::SelectSchedule)?;

        let schedule = self.catalog.get_schedule(schedule_id).await?;
        if flow.selection.doctor_id != Some(schedule.doctor_id) {
            return Err(BookingFlowError::ScheduleOutsideDoctor);
        }

        flow.selection.schedule_id = Some(schedule_id);
        flow.stage = BookingStage::Confirm;
        Ok(())
    }

    /// Attempts the booking. A lost capacity race rewinds the flow to the
    /// schedule stage and returns a freshly fetched list; no client-side
    /// capacity prediction, no silent retry against the same schedule.
    pub async fn confirm(&self, flow: &mut BookingFlow) -> Result<ConfirmOutcome, BookingFlowError> {
        Self::expect_stage(flow, BookingStage::Confirm)?;

        // The stage machine guarantees these are present at Confirm.
        let doctor_id = flow
            .selection
            .doctor_id
            .ok_or(BookingFlowError::StageMismatch {
                expected: BookingStage::SelectDoctor,
                actual: flow.stage,
            })?;
        let schedule_id = flow
            .selection
            .schedule_id
            .ok_or(BookingFlowError::StageMismatch {
                expected: BookingStage::SelectSchedule,
                actual: flow.stage,
            })?;

        let request = CreateAppointmentRequest {
            patient_id: flow.patient_id,
            doctor_id,
            schedule_id,
        };

        match self.booking.create(request).await {
            Ok(appointment) => {
                flow.stage = BookingStage::Result;
                info!(
                    "Booking flow completed: appointment {} for patient {}",
                    appointment.id, flow.patient_id
                );
                Ok(ConfirmOutcome::Booked(appointment))
            }
            Err(AppointmentError::CapacityExceeded) => {
                flow.selection.schedule_id = None;
                flow.stage = BookingStage::SelectSchedule;
                let alternatives = self.catalog.list_bookable(doctor_id, Utc::now()).await;
                info!(
                    "Slot on schedule {} taken under contention, {} alternatives offered",
                    schedule_id,
                    alternatives.len()
                );
                Ok(ConfirmOutcome::SlotTaken { alternatives })
            }
            Err(other) => Err(other.into()),
        }
    }
}
