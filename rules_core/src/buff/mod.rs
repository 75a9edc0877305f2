//! Buff system - per-actor slot arrays, the global ledger and the stacking engine

mod engine;
mod ledger;
mod totals;
mod track;

pub use engine::{BuffApplication, BuffEngine};
pub use ledger::{Bucket, InMemoryLedger, LedgerBucket, LedgerEntry, LedgerStore};
pub use totals::BuffTotals;
pub use track::{BuffFamily, BuffSlots, BuffTrack, SLOT_COUNT};

use thiserror::Error;

/// Rejected buff application
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuffError {
    #[error("Max stack reached on {track:?}")]
    MaxStackReached { track: BuffTrack },
}
