use thiserror::Error;

use crate::models::BookingStage;

#[derive(Error, Debug)]
pub enum BookingFlowError {
    #[error("Flow is at the {actual} stage, expected {expected}")]
    StageMismatch {
        expected: BookingStage,
        actual: BookingStage,
    },

    #[error("Cannot navigate forward to {target} from {current}")]
    ForwardNavigation {
        target: BookingStage,
        current: BookingStage,
    },

    #[error("Doctor does not belong to the selected department")]
    DoctorOutsideDepartment,

    #[error("Schedule does not belong to the selected doctor")]
    ScheduleOutsideDoctor,

    #[error(transparent)]
    Directory(#[from] doctor_cell::models::DirectoryError),

    #[error(transparent)]
    Schedule(#[from] schedule_cell::models::ScheduleError),

    #[error(transparent)]
    Booking(#[from] appointment_cell::models::AppointmentError),
}
