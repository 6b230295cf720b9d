//! Reversible action model for the undo stack.

use serde::{Deserialize, Serialize};

use crate::{
    types::{Plate, SlotIndex},
    vehicle::Vehicle,
};

/// One reversible mutation, pushed when the forward action completes and
/// popped (most recent first) by undo. Each variant carries exactly the
/// payload its inverse needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UndoAction {
    /// A vehicle was parked. Inverse: clear the slot.
    CheckedIn {
        /// Slot the vehicle was assigned.
        slot: SlotIndex,
    },
    /// An arrival was appended to the waiting queue. Inverse: remove the
    /// first queue entry with this plate (value match; the queue may have
    /// changed shape since the action was recorded).
    Enqueued {
        /// Queued plate.
        plate: Plate,
        /// Queued vehicle type.
        vehicle_type: String,
    },
    /// A vehicle departed. Inverse: restore the snapshot into its original
    /// slot and delete the matching history record.
    CheckedOut {
        /// Slot the vehicle departed from.
        slot: SlotIndex,
        /// Full vehicle snapshot, including the original check-in time.
        vehicle: Vehicle,
    },
}
