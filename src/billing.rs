//! Stateless fee schedule.

use crate::types::Rupiah;

/// Flat fee covering the first hour or any fraction of it.
pub const BASE_FEE: Rupiah = 2000;

/// Increment per additional whole hour, rounded up.
pub const HOURLY_INCREMENT: Rupiah = 1000;

const MS_PER_HOUR: u64 = 60 * 60 * 1000;

/// Computes the fee for an elapsed parked duration in milliseconds.
///
/// Hour-ceiling policy: the first hour or fraction costs [`BASE_FEE`], each
/// additional started hour adds [`HOURLY_INCREMENT`]. Zero or sub-second
/// durations bill as the first hour.
pub fn fee_for_ms(elapsed_ms: u64) -> Rupiah {
    let hours = elapsed_ms.div_ceil(MS_PER_HOUR).max(1);
    BASE_FEE + (hours - 1) * HOURLY_INCREMENT
}
