// libs/schedule-cell/src/services/allocation.rs
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use shared_store::{MemoryStore, StoreError};

use crate::models::{ScheduleError, SlotClaim};

/// The only code path permitted to mutate a schedule's `claimed` count.
///
/// Both operations map to a single conditional update inside the store's
/// writer lock, so there is no read-then-write gap: under N simultaneous
/// `claim` calls against remaining capacity C, exactly C succeed and N-C
/// fail, regardless of arrival order. No fairness among racing claimants
/// is promised and callers must not rely on any.
pub struct SlotAllocationService {
    store: Arc<MemoryStore>,
}

impl SlotAllocationService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Claims one capacity unit. Fails with `CapacityExceeded` when the
    /// schedule is full or has been closed by an administrator.
    pub async fn claim(&self, schedule_id: Uuid) -> Result<SlotClaim, ScheduleError> {
        match self.store.try_claim(schedule_id).await {
            Ok(remaining) => {
                debug!(
                    "Claim on schedule {} succeeded, {} remaining",
                    schedule_id, remaining
                );
                Ok(SlotClaim {
                    schedule_id,
                    remaining,
                })
            }
            Err(StoreError::ScheduleNotFound) => Err(ScheduleError::NotFound),
            Err(StoreError::CapacityExhausted) => {
                debug!("Claim on schedule {} rejected: at capacity", schedule_id);
                Err(ScheduleError::CapacityExceeded)
            }
            Err(other) => Err(ScheduleError::Validation(other.to_string())),
        }
    }

    /// Returns one previously claimed unit to the pool, floored at zero.
    /// The lifecycle guarantees exactly one call per cancellation via its
    /// compare-and-set status transition.
    pub async fn release(&self, schedule_id: Uuid) -> Result<u32, ScheduleError> {
        match self.store.release(schedule_id).await {
            Ok(claimed) => Ok(claimed),
            Err(StoreError::ScheduleNotFound) => {
                warn!("Release on missing schedule {}", schedule_id);
                Err(ScheduleError::NotFound)
            }
            Err(other) => Err(ScheduleError::Validation(other.to_string())),
        }
    }
}
