// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::{AppointmentError, AppointmentStatus};

/// Guards the appointment status machine. Status only moves forward:
/// Booked may become Completed or Cancelled, both of which are terminal.
/// Repeating a terminal transition is rejected, not silently accepted, so
/// the record's history stays trustworthy for audit.
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_transition(
        &self,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition {} -> {}", from, to);

        if !self.valid_transitions(from).contains(&to) {
            warn!("Invalid status transition attempted: {} -> {}", from, to);
            return Err(AppointmentError::InvalidTransition { from });
        }
        Ok(())
    }

    pub fn valid_transitions(&self, from: AppointmentStatus) -> &'static [AppointmentStatus] {
        match from {
            AppointmentStatus::Booked => {
                &[AppointmentStatus::Completed, AppointmentStatus::Cancelled]
            }
            // Terminal states
            AppointmentStatus::Completed => &[],
            AppointmentStatus::Cancelled => &[],
        }
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
