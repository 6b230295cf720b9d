use std::{
    collections::VecDeque,
    num::NonZeroUsize,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    billing,
    op::UndoAction,
    types::{Plate, SlotIndex, TsMs},
    vehicle::{CheckInOutcome, HistoryRecord, QueueTicket, Vehicle, normalize_plate},
};

use super::indices::PlateSet;

/// Recoverable outcomes of the mutating operations. Callers branch on the
/// variant; the `Display` text is suitable for showing to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Plate failed normalization rules.
    #[error("invalid plate format, expected letters and digits like B12A")]
    InvalidFormat,
    /// Plate already occupies a slot or sits in the waiting queue.
    #[error("plate {0} is already registered")]
    Duplicate(Plate),
    /// Checkout targeted an empty (or nonexistent) slot.
    #[error("slot {0} is not occupied")]
    NotOccupied(SlotIndex),
    /// Undo was called with no recorded actions left.
    #[error("nothing to undo")]
    EmptyUndoLog,
}

/// One-call read snapshot of the whole display state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSnapshot {
    /// Fixed slot count.
    pub capacity: usize,
    /// Slot array in index order.
    pub slots: Vec<Option<Vehicle>>,
    /// Waiting queue in FIFO order.
    pub queue: Vec<QueueTicket>,
    /// Completed sessions in append order.
    pub history: Vec<HistoryRecord>,
}

/// A vehicle promoted out of the queue during checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    /// Promoted plate.
    pub plate: Plate,
    /// Where the promoted vehicle ended up (a slot, in practice).
    pub outcome: CheckInOutcome,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutReceipt {
    /// Slot the vehicle departed from.
    pub slot: SlotIndex,
    /// The session just appended to history; `record.fee` is the amount due.
    pub record: HistoryRecord,
    /// Queue head re-admitted into the freed capacity, if the queue was
    /// non-empty.
    pub promoted: Option<Promotion>,
}

/// Fixed-capacity parking state: slot array, FIFO overflow queue, append-only
/// session history, and a LIFO undo stack over all mutations.
///
/// The sole mutating entry points are [`check_in`](Self::check_in),
/// [`check_out`](Self::check_out), and [`undo`](Self::undo). A plate is
/// present in at most one of the slot array and the queue at any time.
#[derive(Debug)]
pub struct ParkingStore {
    slots: Vec<Option<Vehicle>>,
    queue: VecDeque<QueueTicket>,
    history: Vec<HistoryRecord>,
    undo: Vec<UndoAction>,
    active: PlateSet,
}

impl ParkingStore {
    /// Creates an empty store with `capacity` slots.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            slots: vec![None; capacity.get()],
            queue: VecDeque::new(),
            history: Vec::new(),
            undo: Vec::new(),
            active: PlateSet::new(),
        }
    }

    /// Checks a vehicle in using the current wall clock.
    pub fn check_in(
        &mut self,
        plate_raw: &str,
        vehicle_type: &str,
    ) -> Result<CheckInOutcome, StoreError> {
        self.check_in_at(plate_raw, vehicle_type, now_ms())
    }

    /// Checks a vehicle in at an explicit timestamp.
    ///
    /// Normalizes and validates the plate, rejects duplicates, then assigns
    /// the lowest-index free slot or, with every slot occupied, appends to
    /// the waiting queue. Both paths record an [`UndoAction`].
    pub fn check_in_at(
        &mut self,
        plate_raw: &str,
        vehicle_type: &str,
        now: TsMs,
    ) -> Result<CheckInOutcome, StoreError> {
        let plate = normalize_plate(plate_raw).ok_or(StoreError::InvalidFormat)?;
        if self.active.contains(&plate) {
            return Err(StoreError::Duplicate(plate));
        }

        if let Some(slot) = self.slots.iter().position(Option::is_none) {
            self.active.insert(plate.clone());
            self.slots[slot] = Some(Vehicle {
                plate,
                vehicle_type: vehicle_type.to_string(),
                checked_in_ms: now,
            });
            self.undo.push(UndoAction::CheckedIn { slot });
            return Ok(CheckInOutcome::Parked { slot });
        }

        let position = self.queue.len();
        self.active.insert(plate.clone());
        self.queue.push_back(QueueTicket {
            plate: plate.clone(),
            vehicle_type: vehicle_type.to_string(),
        });
        self.undo.push(UndoAction::Enqueued {
            plate,
            vehicle_type: vehicle_type.to_string(),
        });
        Ok(CheckInOutcome::Queued { position })
    }

    /// Checks the vehicle in `slot` out using the current wall clock.
    pub fn check_out(&mut self, slot: SlotIndex) -> Result<CheckOutReceipt, StoreError> {
        self.check_out_at(slot, now_ms())
    }

    /// Checks the vehicle in `slot` out at an explicit timestamp.
    ///
    /// Computes the fee from the elapsed duration, appends a
    /// [`HistoryRecord`], records a `CheckedOut` undo action carrying the
    /// vehicle snapshot, clears the slot, and finally re-runs the full
    /// check-in algorithm for the queue head if one is waiting. The
    /// promotion logs its own undo action after the checkout's, so undoing
    /// in reverse order stays correct.
    pub fn check_out_at(
        &mut self,
        slot: SlotIndex,
        now: TsMs,
    ) -> Result<CheckOutReceipt, StoreError> {
        let vehicle = self
            .slots
            .get_mut(slot)
            .and_then(Option::take)
            .ok_or(StoreError::NotOccupied(slot))?;

        let elapsed_ms = now.saturating_sub(vehicle.checked_in_ms);
        let record = HistoryRecord {
            plate: vehicle.plate.clone(),
            vehicle_type: vehicle.vehicle_type.clone(),
            checked_in_ms: vehicle.checked_in_ms,
            checked_out_ms: now,
            duration_secs: elapsed_ms / 1000,
            fee: billing::fee_for_ms(elapsed_ms),
        };
        self.history.push(record.clone());
        self.active.remove(&vehicle.plate);
        self.undo.push(UndoAction::CheckedOut { slot, vehicle });

        let promoted = match self.queue.pop_front() {
            Some(ticket) => {
                self.active.remove(&ticket.plate);
                let outcome = self
                    .check_in_at(&ticket.plate, &ticket.vehicle_type, now)
                    .expect("queue head must re-admit: it left the queue and holds no slot");
                Some(Promotion {
                    plate: ticket.plate,
                    outcome,
                })
            }
            None => None,
        };

        Ok(CheckOutReceipt {
            slot,
            record,
            promoted,
        })
    }

    /// Reverts the most recent mutating action and returns it.
    ///
    /// Actions revert strictly in reverse chronological order across the
    /// whole store. Undoing a checkout restores the vehicle snapshot into
    /// its original slot, overwriting any occupant that arrived there since
    /// (reference behavior; undo the later check-in first to avoid it), and
    /// deletes the matching history record.
    ///
    /// # Panics
    ///
    /// Panics if undoing a checkout finds no history record for the plate.
    /// That means the undo stack and the history ledger have desynchronized,
    /// which is a bug, not an input error.
    pub fn undo(&mut self) -> Result<UndoAction, StoreError> {
        let action = self.undo.pop().ok_or(StoreError::EmptyUndoLog)?;

        match &action {
            UndoAction::CheckedIn { slot } => {
                if let Some(vehicle) = self.slots[*slot].take() {
                    self.active.remove(&vehicle.plate);
                }
            }
            UndoAction::Enqueued { plate, .. } => {
                if let Some(pos) = self.queue.iter().position(|t| &t.plate == plate) {
                    self.queue.remove(pos);
                    self.active.remove(plate);
                }
            }
            UndoAction::CheckedOut { slot, vehicle } => {
                self.remove_most_recent_history(&vehicle.plate);
                if let Some(displaced) = self.slots[*slot].replace(vehicle.clone()) {
                    self.active.remove(&displaced.plate);
                }
                self.active.insert(vehicle.plate.clone());
            }
        }

        Ok(action)
    }

    /// Fixed slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot array in index order.
    pub fn slots(&self) -> &[Option<Vehicle>] {
        &self.slots
    }

    /// Owned copy of the slot array.
    pub fn slots_cloned(&self) -> Vec<Option<Vehicle>> {
        self.slots.clone()
    }

    /// Vehicle in `slot`, if any.
    pub fn slot(&self, slot: SlotIndex) -> Option<&Vehicle> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Number of unoccupied slots.
    pub fn free_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// Waiting queue in FIFO order.
    pub fn queue(&self) -> impl Iterator<Item = &QueueTicket> {
        self.queue.iter()
    }

    /// Owned copy of the waiting queue in FIFO order.
    pub fn queue_cloned(&self) -> Vec<QueueTicket> {
        self.queue.iter().cloned().collect()
    }

    /// Completed sessions in append order.
    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    /// Owned copy of the session history.
    pub fn history_cloned(&self) -> Vec<HistoryRecord> {
        self.history.clone()
    }

    /// Number of actions currently revertible.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Exports the full display state in one call.
    pub fn export_snapshot(&self) -> ParkingSnapshot {
        ParkingSnapshot {
            capacity: self.slots.len(),
            slots: self.slots.clone(),
            queue: self.queue_cloned(),
            history: self.history.clone(),
        }
    }

    fn remove_most_recent_history(&mut self, plate: &str) {
        let Some(pos) = self.history.iter().rposition(|r| r.plate == plate) else {
            panic!("undo desync: no history record for plate {plate}");
        };
        self.history.remove(pos);
    }
}

fn now_ms() -> TsMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
