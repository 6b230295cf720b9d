use std::num::NonZeroUsize;

use parkflow::{
    core::store::{ParkingStore, StoreError},
    vehicle::CheckInOutcome,
};

fn store(capacity: usize) -> ParkingStore {
    ParkingStore::new(NonZeroUsize::new(capacity).expect("capacity"))
}

#[test]
fn check_in_assigns_lowest_free_slot() {
    let mut lot = store(3);

    let a = lot.check_in_at("B12A", "Matic", 1).unwrap();
    let b = lot.check_in_at("C34D", "Bebek", 2).unwrap();
    assert_eq!(a, CheckInOutcome::Parked { slot: 0 });
    assert_eq!(b, CheckInOutcome::Parked { slot: 1 });

    // Free the lower slot; the next arrival must reuse it, not slot 2.
    lot.check_out_at(0, 10).unwrap();
    let c = lot.check_in_at("D56E", "Sport", 11).unwrap();
    assert_eq!(c, CheckInOutcome::Parked { slot: 0 });
}

#[test]
fn check_in_normalizes_plate() {
    let mut lot = store(1);

    lot.check_in_at("  b12a ", "Matic", 1).unwrap();
    let parked = lot.slot(0).expect("occupied");
    assert_eq!(parked.plate, "B12A");
    assert_eq!(parked.checked_in_ms, 1);
}

#[test]
fn invalid_plates_are_rejected() {
    let mut lot = store(1);

    for raw in ["1", "AB", "12", "1A2", "", "  ", "B"] {
        assert_eq!(
            lot.check_in_at(raw, "Matic", 1),
            Err(StoreError::InvalidFormat),
            "plate {raw:?} should be rejected",
        );
    }
    assert_eq!(lot.undo_len(), 0);
}

#[test]
fn duplicate_plate_is_rejected_in_slot_and_queue() {
    let mut lot = store(1);

    lot.check_in_at("B12A", "Matic", 1).unwrap();
    assert_eq!(
        lot.check_in_at("b12a", "Sport", 2),
        Err(StoreError::Duplicate("B12A".to_string())),
    );

    let queued = lot.check_in_at("C34D", "Bebek", 3).unwrap();
    assert_eq!(queued, CheckInOutcome::Queued { position: 0 });
    assert_eq!(
        lot.check_in_at("C34D", "Bebek", 4),
        Err(StoreError::Duplicate("C34D".to_string())),
    );
}

#[test]
fn full_lot_queues_in_arrival_order() {
    let mut lot = store(1);

    lot.check_in_at("B12A", "Matic", 1).unwrap();
    assert_eq!(
        lot.check_in_at("C34D", "Bebek", 2).unwrap(),
        CheckInOutcome::Queued { position: 0 },
    );
    assert_eq!(
        lot.check_in_at("D56E", "Sport", 3).unwrap(),
        CheckInOutcome::Queued { position: 1 },
    );

    let queue = lot.queue_cloned();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0].plate, "C34D");
    assert_eq!(queue[1].plate, "D56E");

    // Slot 0 still belongs to the first arrival.
    assert_eq!(lot.slot(0).unwrap().plate, "B12A");
}

#[test]
fn check_out_promotes_queue_head_into_freed_slot() {
    let mut lot = store(1);

    lot.check_in_at("B12A", "Matic", 1).unwrap();
    lot.check_in_at("C34D", "Bebek", 2).unwrap();

    let receipt = lot.check_out_at(0, 100).unwrap();
    assert_eq!(receipt.record.plate, "B12A");

    let promotion = receipt.promoted.expect("queue head promoted");
    assert_eq!(promotion.plate, "C34D");
    assert_eq!(promotion.outcome, CheckInOutcome::Parked { slot: 0 });

    assert_eq!(lot.slot(0).unwrap().plate, "C34D");
    assert_eq!(lot.slot(0).unwrap().checked_in_ms, 100);
    assert_eq!(lot.queue_cloned().len(), 0);
}

#[test]
fn check_out_of_empty_or_unknown_slot_fails() {
    let mut lot = store(2);

    assert_eq!(lot.check_out_at(1, 5), Err(StoreError::NotOccupied(1)));
    assert_eq!(lot.check_out_at(7, 5), Err(StoreError::NotOccupied(7)));

    lot.check_in_at("B12A", "Matic", 1).unwrap();
    lot.check_out_at(0, 5).unwrap();
    assert_eq!(lot.check_out_at(0, 6), Err(StoreError::NotOccupied(0)));
}

#[test]
fn check_out_records_full_session() {
    let mut lot = store(2);

    lot.check_in_at("B12A", "Matic", 10_000).unwrap();
    let receipt = lot.check_out_at(0, 95_000).unwrap();

    let rec = &receipt.record;
    assert_eq!(rec.plate, "B12A");
    assert_eq!(rec.vehicle_type, "Matic");
    assert_eq!(rec.checked_in_ms, 10_000);
    assert_eq!(rec.checked_out_ms, 95_000);
    assert_eq!(rec.duration_secs, 85);
    assert_eq!(rec.fee, 2000);

    assert_eq!(lot.history(), &[receipt.record.clone()]);
    assert!(receipt.promoted.is_none());
}

#[test]
fn snapshot_mirrors_store_state() {
    let mut lot = store(2);

    lot.check_in_at("B12A", "Matic", 1).unwrap();
    lot.check_in_at("C34D", "Bebek", 2).unwrap();
    lot.check_in_at("D56E", "Sport", 3).unwrap();
    lot.check_out_at(1, 50).unwrap();

    let snap = lot.export_snapshot();
    assert_eq!(snap.capacity, 2);
    assert_eq!(snap.slots.len(), 2);
    assert_eq!(snap.slots[0].as_ref().unwrap().plate, "B12A");
    assert_eq!(snap.slots[1].as_ref().unwrap().plate, "D56E");
    assert!(snap.queue.is_empty());
    assert_eq!(snap.history.len(), 1);
    assert_eq!(snap.history[0].plate, "C34D");
}
