// libs/booking-flow-cell/src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use appointment_cell::models::Appointment;
use schedule_cell::models::BookableSchedule;

/// The four selection stages plus the terminal one. Ordering matters:
/// backward navigation clears everything captured after the target stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStage {
    SelectDepartment,
    SelectDoctor,
    SelectSchedule,
    Confirm,
    Result,
}

impl fmt::Display for BookingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStage::SelectDepartment => write!(f, "select_department"),
            BookingStage::SelectDoctor => write!(f, "select_doctor"),
            BookingStage::SelectSchedule => write!(f, "select_schedule"),
            BookingStage::Confirm => write!(f, "confirm"),
            BookingStage::Result => write!(f, "result"),
        }
    }
}

/// What the patient has picked so far. Fields fill in stage order and are
/// cleared in reverse on backward navigation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingSelection {
    pub department_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub schedule_id: Option<Uuid>,
}

/// Client-held booking state. The server never stores one of these; a flow
/// lives for one booking attempt on the caller's side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingFlow {
    pub patient_id: Uuid,
    pub stage: BookingStage,
    pub selection: BookingSelection,
}

impl BookingFlow {
    pub fn start(patient_id: Uuid) -> Self {
        Self {
            patient_id,
            stage: BookingStage::SelectDepartment,
            selection: BookingSelection::default(),
        }
    }

    /// Pure backward transition: rewinds to `target` and discards every
    /// selection belonging to the stages after it.
    pub fn back_to(&mut self, target: BookingStage) {
        if target < BookingStage::SelectDoctor {
            self.selection.department_id = None;
        }
        if target < BookingStage::SelectSchedule {
            self.selection.doctor_id = None;
        }
        if target < BookingStage::Confirm {
            self.selection.schedule_id = None;
        }
        self.stage = target;
    }
}

/// Outcome of a confirm attempt. A stolen slot is an expected result, not
/// an error: the flow has already been rewound and the schedule list
/// re-fetched, because the remaining counts shown earlier are stale by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConfirmOutcome {
    Booked(Appointment),
    SlotTaken { alternatives: Vec<BookableSchedule> },
}
