//! BuffTotals - the buff sums a derivation pass reads

use super::{BuffFamily, BuffSlots, BuffTrack, LedgerBucket};
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Net buff amounts per family, plus the separately supplied spell-power buff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffTotals {
    pub accuracy: i64,
    pub power: i64,
    pub physical_defense: i64,
    pub magic_defense: i64,
    /// Only read when power buffs do not already cover spells
    pub spell_power: i64,
}

impl BuffTotals {
    /// Net totals from an actor's own slot arrays
    pub fn from_slots(slots: &BuffSlots) -> Self {
        BuffTotals {
            accuracy: slots.net(BuffFamily::Accuracy),
            power: slots.net(BuffFamily::Power),
            physical_defense: slots.net(BuffFamily::PhysicalDefense),
            magic_defense: slots.net(BuffFamily::MagicDefense),
            spell_power: 0,
        }
    }

    /// Net totals from a ledger bucket. Tug-of-war buckets only hold the
    /// buff-direction key, so the debuff read is 0 there.
    pub fn from_bucket(bucket: &LedgerBucket) -> Self {
        let net = |family| {
            bucket.amount(BuffTrack::new(family, false)) - bucket.amount(BuffTrack::new(family, true))
        };
        BuffTotals {
            accuracy: net(BuffFamily::Accuracy),
            power: net(BuffFamily::Power),
            physical_defense: net(BuffFamily::PhysicalDefense),
            magic_defense: net(BuffFamily::MagicDefense),
            spell_power: 0,
        }
    }

    pub fn with_spell_power(mut self, spell_power: i64) -> Self {
        self.spell_power = spell_power;
        self
    }

    pub fn get(&self, family: BuffFamily) -> i64 {
        match family {
            BuffFamily::Accuracy => self.accuracy,
            BuffFamily::Power => self.power,
            BuffFamily::PhysicalDefense => self.physical_defense,
            BuffFamily::MagicDefense => self.magic_defense,
        }
    }
}

/// Field-wide and per-actor totals add up family by family
impl Add for BuffTotals {
    type Output = BuffTotals;

    fn add(self, other: BuffTotals) -> BuffTotals {
        BuffTotals {
            accuracy: self.accuracy + other.accuracy,
            power: self.power + other.power,
            physical_defense: self.physical_defense + other.physical_defense,
            magic_defense: self.magic_defense + other.magic_defense,
            spell_power: self.spell_power + other.spell_power,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::LedgerEntry;

    #[test]
    fn test_from_slots_nets_debuffs() {
        let mut slots = BuffSlots::new();
        slots.apply(&[3, 2], &[BuffTrack::AccuracyUp], false).unwrap();
        slots.apply(&[1], &[BuffTrack::AccuracyDown], false).unwrap();

        let totals = BuffTotals::from_slots(&slots);
        assert_eq!(totals.accuracy, 4);
        assert_eq!(totals.get(BuffFamily::Power), 0);
    }

    #[test]
    fn test_from_bucket() {
        let mut bucket = LedgerBucket::new();
        bucket.set(BuffTrack::PowerUp, LedgerEntry::Slots { amount: 6, count: 2 });
        bucket.set(BuffTrack::PowerDown, LedgerEntry::Slots { amount: 2, count: 1 });
        bucket.set(BuffTrack::MagicDefenseUp, LedgerEntry::Clamped(-3));

        let totals = BuffTotals::from_bucket(&bucket).with_spell_power(2);
        assert_eq!(totals.power, 4);
        assert_eq!(totals.magic_defense, -3);
        assert_eq!(totals.spell_power, 2);
    }

    #[test]
    fn test_add_sums_every_family() {
        let field = BuffTotals {
            accuracy: 2,
            ..Default::default()
        };
        let mut slots = BuffSlots::new();
        slots.apply(&[3], &[BuffTrack::AccuracyDown, BuffTrack::PowerUp], false).unwrap();

        let totals = field + BuffTotals::from_slots(&slots).with_spell_power(1);
        assert_eq!(totals.accuracy, -1);
        assert_eq!(totals.power, 3);
        assert_eq!(totals.spell_power, 1);
    }
}
