//! Runtime event stream payloads.

use crate::types::{Plate, Rupiah, SlotIndex};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParkingEvent {
    /// A vehicle was parked in a slot.
    CheckedIn {
        /// Parked plate.
        plate: Plate,
        /// Assigned slot.
        slot: SlotIndex,
    },
    /// An arrival found every slot occupied and joined the queue.
    Queued {
        /// Queued plate.
        plate: Plate,
    },
    /// A vehicle departed and was billed.
    CheckedOut {
        /// Departed plate.
        plate: Plate,
        /// Freed slot.
        slot: SlotIndex,
        /// Fee charged.
        fee: Rupiah,
    },
    /// A queued vehicle was moved into a freed slot during checkout.
    Promoted {
        /// Promoted plate.
        plate: Plate,
        /// Slot it received.
        slot: SlotIndex,
    },
    /// One undo step was applied.
    UndoApplied,
}
