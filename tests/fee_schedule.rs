use parkflow::billing::{BASE_FEE, HOURLY_INCREMENT, fee_for_ms};

const MIN: u64 = 60_000;

#[test]
fn first_hour_or_fraction_bills_base_fee() {
    assert_eq!(fee_for_ms(0), BASE_FEE);
    assert_eq!(fee_for_ms(1), BASE_FEE);
    assert_eq!(fee_for_ms(500), BASE_FEE);
    assert_eq!(fee_for_ms(30 * MIN), BASE_FEE);
    assert_eq!(fee_for_ms(60 * MIN), BASE_FEE);
}

#[test]
fn additional_hours_round_up() {
    assert_eq!(fee_for_ms(60 * MIN + 1), BASE_FEE + HOURLY_INCREMENT);
    assert_eq!(fee_for_ms(61 * MIN), 3000);
    assert_eq!(fee_for_ms(120 * MIN), 3000);
    assert_eq!(fee_for_ms(125 * MIN), 4000);
    assert_eq!(fee_for_ms(24 * 60 * MIN), BASE_FEE + 23 * HOURLY_INCREMENT);
}

#[test]
fn fee_is_monotonic_in_duration() {
    let mut last = 0;
    for minutes in 0..300 {
        let fee = fee_for_ms(minutes * MIN);
        assert!(fee >= last, "fee dropped at {minutes} minutes");
        last = fee;
    }
}
