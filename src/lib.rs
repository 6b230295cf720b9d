//! Fixed-capacity parking counter with FIFO overflow, time-based billing,
//! and reverse-chronological undo.
//!
//! # Examples
//!
//! In-memory usage with [`core::store::ParkingStore`]:
//! ```
//! use std::num::NonZeroUsize;
//!
//! use parkflow::{core::store::ParkingStore, vehicle::CheckInOutcome};
//!
//! let mut lot = ParkingStore::new(NonZeroUsize::new(2).unwrap());
//! let outcome = lot.check_in("b12a", "Matic").expect("check in");
//! assert_eq!(outcome, CheckInOutcome::Parked { slot: 0 });
//!
//! let receipt = lot.check_out(0).expect("check out");
//! assert_eq!(receipt.record.fee, 2000);
//! ```
//!
//! Serialized access through the single-writer runtime:
//! ```no_run
//! use std::num::NonZeroUsize;
//!
//! use parkflow::{
//!     core::store::ParkingStore,
//!     runtime::handle::{RuntimeConfig, spawn_parkflow},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = ParkingStore::new(NonZeroUsize::new(10).unwrap());
//! let handle = spawn_parkflow(store, RuntimeConfig::default());
//! let _outcome = handle.check_in("B12A", "Matic").await.expect("check in");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Stateless fee schedule.
pub mod billing;
/// In-memory authoritative parking state.
pub mod core;
/// Reversible action model for the undo stack.
pub mod op;
/// Single-writer async runtime and event stream.
pub mod runtime;
/// Shared primitive aliases.
pub mod types;
/// Vehicle domain records and plate normalization.
pub mod vehicle;
