//! Shared primitive aliases.

/// Zero-based parking slot index. The index is the slot's durable identity:
/// assigned at construction, never shifted or resized.
pub type SlotIndex = usize;

/// Monetary amount in rupiah.
pub type Rupiah = u64;

/// Timestamp in milliseconds since the Unix epoch.
pub type TsMs = u64;

/// Normalized plate text (uppercase, trimmed).
pub type Plate = String;
