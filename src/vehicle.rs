//! Vehicle domain records and plate normalization.

use serde::{Deserialize, Serialize};

use crate::types::{Plate, Rupiah, SlotIndex, TsMs};

/// A vehicle occupying a slot. Immutable after creation; owned by the slot
/// array while parked, snapshotted into a [`HistoryRecord`] on checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Normalized plate (see [`normalize_plate`]).
    pub plate: Plate,
    /// Operator-entered vehicle type, e.g. "Matic".
    pub vehicle_type: String,
    /// Check-in timestamp in milliseconds since epoch.
    pub checked_in_ms: TsMs,
}

/// One waiting-queue entry: an arrival that found every slot occupied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueTicket {
    /// Normalized plate.
    pub plate: Plate,
    /// Vehicle type captured at arrival.
    pub vehicle_type: String,
}

/// A completed parking session, appended on checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Normalized plate.
    pub plate: Plate,
    /// Vehicle type.
    pub vehicle_type: String,
    /// Check-in timestamp in milliseconds since epoch.
    pub checked_in_ms: TsMs,
    /// Checkout timestamp in milliseconds since epoch.
    pub checked_out_ms: TsMs,
    /// Whole seconds parked.
    pub duration_secs: u64,
    /// Fee charged for the session.
    pub fee: Rupiah,
}

/// Where a checked-in vehicle ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutcome {
    /// Assigned the lowest-index free slot.
    Parked {
        /// Assigned slot.
        slot: SlotIndex,
    },
    /// All slots occupied; appended to the waiting queue.
    Queued {
        /// Zero-based position in the queue at enqueue time.
        position: usize,
    },
}

/// Uppercases and trims `raw`, returning the normalized plate or `None` when
/// the format is invalid.
///
/// A valid plate is at least two characters, starts with a letter, and
/// contains at least one letter and one digit (e.g. `B12A`).
pub fn normalize_plate(raw: &str) -> Option<Plate> {
    let plate: Plate = raw.trim().to_uppercase();

    if plate.chars().count() < 2 {
        return None;
    }
    if !plate.chars().next().is_some_and(char::is_alphabetic) {
        return None;
    }

    let has_digit = plate.chars().any(|c| c.is_ascii_digit());
    let has_letter = plate.chars().any(char::is_alphabetic);
    if !has_digit || !has_letter {
        return None;
    }

    Some(plate)
}
