// libs/appointment-cell/src/services/policy.rs
use chrono::{DateTime, Duration, Utc};

use crate::models::{Appointment, AppointmentStatus};

/// Time-gated cancellation rule: a booking may be cancelled only while the
/// appointment is still at least `cutoff` away. Evaluated against the wall
/// clock at the moment of the cancel call, never at request submission.
#[derive(Debug, Clone)]
pub struct CancellationPolicy {
    cutoff: Duration,
}

impl CancellationPolicy {
    pub fn new(cutoff_minutes: i64) -> Self {
        Self {
            cutoff: Duration::minutes(cutoff_minutes),
        }
    }

    pub fn cutoff_minutes(&self) -> i64 {
        self.cutoff.num_minutes()
    }

    /// True iff the appointment is still Booked and the cutoff window has
    /// not been entered. Exactly on the boundary counts as cancellable.
    pub fn is_cancellable(&self, appointment: &Appointment, now: DateTime<Utc>) -> bool {
        appointment.status == AppointmentStatus::Booked
            && appointment.appointment_time - now >= self.cutoff
    }
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self::new(60)
    }
}
