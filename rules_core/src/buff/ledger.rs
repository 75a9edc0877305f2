//! Global buff ledger - field-wide friendly/hostile totals
//!
//! The ledger lives outside any single actor. The engine reaches it through
//! [`LedgerStore`] so hosts can back it with their own settings storage.

use super::BuffTrack;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Which side of the field a bucket tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    #[serde(rename = "friendly_effects")]
    Friendly,
    #[serde(rename = "hostile_effects")]
    Hostile,
}

impl Bucket {
    pub fn for_side(friendly: bool) -> Self {
        if friendly {
            Bucket::Friendly
        } else {
            Bucket::Hostile
        }
    }

    /// Stable settings key
    pub fn key(self) -> &'static str {
        match self {
            Bucket::Friendly => "friendly_effects",
            Bucket::Hostile => "hostile_effects",
        }
    }
}

/// One track's ledger value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LedgerEntry {
    /// Slot policy: running amount and filled slot count (0-4)
    Slots { amount: i64, count: u8 },
    /// Tug-of-war policy: a single clamped amount
    Clamped(i64),
}

impl LedgerEntry {
    pub fn amount(self) -> i64 {
        match self {
            LedgerEntry::Slots { amount, .. } => amount,
            LedgerEntry::Clamped(amount) => amount,
        }
    }
}

/// All entries of one bucket, read and written as a whole
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerBucket {
    entries: BTreeMap<BuffTrack, LedgerEntry>,
}

impl LedgerBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, track: BuffTrack) -> Option<LedgerEntry> {
        self.entries.get(&track).copied()
    }

    pub fn set(&mut self, track: BuffTrack, entry: LedgerEntry) {
        self.entries.insert(track, entry);
    }

    /// Amount recorded for a track, 0 when absent
    pub fn amount(&self, track: BuffTrack) -> i64 {
        self.get(track).map(LedgerEntry::amount).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BuffTrack, LedgerEntry)> + '_ {
        self.entries.iter().map(|(t, e)| (*t, *e))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Storage port for the ledger
pub trait LedgerStore: Send + Sync {
    /// Read a whole bucket; an unknown bucket reads as empty
    fn load(&self, bucket: Bucket) -> LedgerBucket;

    /// Replace a whole bucket
    fn store(&self, bucket: Bucket, contents: LedgerBucket);
}

/// Ledger held in memory
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    buckets: Mutex<HashMap<Bucket, LedgerBucket>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedger {
    fn load(&self, bucket: Bucket) -> LedgerBucket {
        self.buckets.lock().get(&bucket).cloned().unwrap_or_default()
    }

    fn store(&self, bucket: Bucket, contents: LedgerBucket) {
        self.buckets.lock().insert(bucket, contents);
    }
}
