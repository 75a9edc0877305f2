//! Affinity - Damage-type and bad-status resistances
//!
//! Every actor carries two tables: an elemental/physical table keyed by
//! [`AffinityKey`] and a bad-status table keyed by [`BadStatus`]. Gear and
//! passive traits contribute overrides; an override only replaces the
//! current entry when it has strictly higher priority:
//!
//! `normal(0) < weak(1) < resist(2) < null(3) < drain(4) < repel(5)`

use crate::types::BadStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resistance classification for one damage or status type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affinity {
    #[default]
    Normal,
    Weak,
    Resist,
    Null,
    Drain,
    Repel,
}

impl Affinity {
    /// Override priority (higher wins)
    pub fn priority(self) -> u8 {
        match self {
            Affinity::Normal => 0,
            Affinity::Weak => 1,
            Affinity::Resist => 2,
            Affinity::Null => 3,
            Affinity::Drain => 4,
            Affinity::Repel => 5,
        }
    }

    /// Whether this affinity replaces `current` when applied as an override
    pub fn outranks(self, current: Affinity) -> bool {
        self.priority() > current.priority()
    }

    /// Damage multiplier for this affinity. Negative means the hit heals.
    pub fn multiplier(self) -> f64 {
        match self {
            Affinity::Normal => 1.0,
            Affinity::Weak => 2.0,
            Affinity::Resist => 0.5,
            Affinity::Null | Affinity::Repel => 0.0,
            Affinity::Drain => -1.0,
        }
    }

    /// Get all affinities in priority order
    pub fn all() -> &'static [Affinity] {
        &[
            Affinity::Normal,
            Affinity::Weak,
            Affinity::Resist,
            Affinity::Null,
            Affinity::Drain,
            Affinity::Repel,
        ]
    }
}

/// Damage category keys: eleven elemental/physical types plus the magic umbrella
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffinityKey {
    Strike,
    Gun,
    Fire,
    Ice,
    Electric,
    Wind,
    Psychic,
    Nuclear,
    Bless,
    Curse,
    Almighty,
    /// Umbrella category checked alongside every magical element
    Magic,
}

impl AffinityKey {
    /// Get all keys
    pub fn all() -> &'static [AffinityKey] {
        &[
            AffinityKey::Strike,
            AffinityKey::Gun,
            AffinityKey::Fire,
            AffinityKey::Ice,
            AffinityKey::Electric,
            AffinityKey::Wind,
            AffinityKey::Psychic,
            AffinityKey::Nuclear,
            AffinityKey::Bless,
            AffinityKey::Curse,
            AffinityKey::Almighty,
            AffinityKey::Magic,
        ]
    }

    /// Physical damage is checked against physical defense
    pub fn is_physical(self) -> bool {
        matches!(self, AffinityKey::Strike | AffinityKey::Gun)
    }

    /// Elements that also consult the magic umbrella entry
    pub fn is_magical(self) -> bool {
        !matches!(
            self,
            AffinityKey::Strike | AffinityKey::Gun | AffinityKey::Almighty | AffinityKey::Magic
        )
    }
}

/// A full affinity table. Keys not present read as [`Affinity::Normal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AffinityTable<K: Ord> {
    entries: BTreeMap<K, Affinity>,
}

/// Elemental/physical affinity table
pub type ElementTable = AffinityTable<AffinityKey>;

/// Bad-status affinity table
pub type StatusTable = AffinityTable<BadStatus>;

impl<K: Ord + Copy> Default for AffinityTable<K> {
    fn default() -> Self {
        AffinityTable {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> AffinityTable<K> {
    /// Create a table where everything is normal
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style entry
    pub fn with(mut self, key: K, affinity: Affinity) -> Self {
        self.set(key, affinity);
        self
    }

    pub fn get(&self, key: K) -> Affinity {
        self.entries.get(&key).copied().unwrap_or_default()
    }

    pub fn set(&mut self, key: K, affinity: Affinity) {
        if affinity == Affinity::Normal {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, affinity);
        }
    }

    /// Non-normal entries
    pub fn iter(&self) -> impl Iterator<Item = (K, Affinity)> + '_ {
        self.entries.iter().map(|(k, a)| (*k, *a))
    }

    /// Merge an override into this table, entry by entry, keeping the higher priority
    pub fn apply_override(&mut self, overrides: &AffinityOverride<K>) {
        for (key, affinity) in overrides.iter() {
            if affinity.outranks(self.get(key)) {
                self.set(key, affinity);
            }
        }
    }
}

/// Affinity override declared by an item or passive trait.
/// Keys that are absent are "none" and leave the table untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AffinityOverride<K: Ord> {
    entries: BTreeMap<K, Affinity>,
}

impl<K: Ord + Copy> Default for AffinityOverride<K> {
    fn default() -> Self {
        AffinityOverride {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> AffinityOverride<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: K, affinity: Affinity) -> Self {
        self.entries.insert(key, affinity);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, Affinity)> + '_ {
        self.entries.iter().map(|(k, a)| (*k, *a))
    }
}

/// Resolve a base table against an ordered list of overrides.
///
/// Application order never matters for the outcome: only a strictly higher
/// priority replaces an entry.
pub fn resolve<'a, K, I>(base: &AffinityTable<K>, overrides: I) -> AffinityTable<K>
where
    K: Ord + Copy + 'a,
    I: IntoIterator<Item = &'a AffinityOverride<K>>,
{
    let mut resolved = base.clone();
    for layer in overrides {
        resolved.apply_override(layer);
    }
    resolved
}

/// Damage multiplier for a hit of type `key` against `table`.
///
/// Magical elements are checked twice, once for the element and once for the
/// magic umbrella, and the two multipliers are multiplied together.
pub fn combined_multiplier(table: &ElementTable, key: AffinityKey) -> f64 {
    let element = table.get(key).multiplier();
    if key.is_magical() {
        element * table.get(AffinityKey::Magic).multiplier()
    } else {
        element
    }
}

/// Whether either applicable entry repels the hit
pub fn is_repelled(table: &ElementTable, key: AffinityKey) -> bool {
    table.get(key) == Affinity::Repel
        || (key.is_magical() && table.get(AffinityKey::Magic) == Affinity::Repel)
}
