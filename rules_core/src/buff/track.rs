//! Buff tracks and the per-actor 4-slot arrays

use super::BuffError;
use crate::config::{BuffPolicy, RuleConfig};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Number of increments a track can hold
pub const SLOT_COUNT: usize = 4;

/// The four buffable statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffFamily {
    Accuracy,
    Power,
    PhysicalDefense,
    MagicDefense,
}

/// A family paired with a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffTrack {
    AccuracyUp,
    AccuracyDown,
    PowerUp,
    PowerDown,
    PhysicalDefenseUp,
    PhysicalDefenseDown,
    MagicDefenseUp,
    MagicDefenseDown,
}

impl BuffTrack {
    pub fn all() -> &'static [BuffTrack] {
        &[
            BuffTrack::AccuracyUp,
            BuffTrack::AccuracyDown,
            BuffTrack::PowerUp,
            BuffTrack::PowerDown,
            BuffTrack::PhysicalDefenseUp,
            BuffTrack::PhysicalDefenseDown,
            BuffTrack::MagicDefenseUp,
            BuffTrack::MagicDefenseDown,
        ]
    }

    pub fn new(family: BuffFamily, debuff: bool) -> Self {
        match (family, debuff) {
            (BuffFamily::Accuracy, false) => BuffTrack::AccuracyUp,
            (BuffFamily::Accuracy, true) => BuffTrack::AccuracyDown,
            (BuffFamily::Power, false) => BuffTrack::PowerUp,
            (BuffFamily::Power, true) => BuffTrack::PowerDown,
            (BuffFamily::PhysicalDefense, false) => BuffTrack::PhysicalDefenseUp,
            (BuffFamily::PhysicalDefense, true) => BuffTrack::PhysicalDefenseDown,
            (BuffFamily::MagicDefense, false) => BuffTrack::MagicDefenseUp,
            (BuffFamily::MagicDefense, true) => BuffTrack::MagicDefenseDown,
        }
    }

    pub fn family(self) -> BuffFamily {
        match self {
            BuffTrack::AccuracyUp | BuffTrack::AccuracyDown => BuffFamily::Accuracy,
            BuffTrack::PowerUp | BuffTrack::PowerDown => BuffFamily::Power,
            BuffTrack::PhysicalDefenseUp | BuffTrack::PhysicalDefenseDown => {
                BuffFamily::PhysicalDefense
            }
            BuffTrack::MagicDefenseUp | BuffTrack::MagicDefenseDown => BuffFamily::MagicDefense,
        }
    }

    pub fn is_debuff(self) -> bool {
        matches!(
            self,
            BuffTrack::AccuracyDown
                | BuffTrack::PowerDown
                | BuffTrack::PhysicalDefenseDown
                | BuffTrack::MagicDefenseDown
        )
    }

    /// The buff-direction track of the same family
    pub fn paired_buff(self) -> BuffTrack {
        BuffTrack::new(self.family(), false)
    }
}

/// Per-actor buff and debuff arrays, one fixed 4-slot array per track.
/// A slot holding 0 is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuffSlots {
    tracks: BTreeMap<BuffTrack, [i64; SLOT_COUNT]>,
}

impl BuffSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self, track: BuffTrack) -> [i64; SLOT_COUNT] {
        self.tracks.get(&track).copied().unwrap_or_default()
    }

    /// Filled slots on a track
    pub fn count(&self, track: BuffTrack) -> usize {
        self.slots(track).iter().filter(|v| **v != 0).count()
    }

    pub fn sum(&self, track: BuffTrack) -> i64 {
        self.slots(track).iter().sum()
    }

    /// Buff sum minus debuff sum for a family
    pub fn net(&self, family: BuffFamily) -> i64 {
        self.sum(BuffTrack::new(family, false)) - self.sum(BuffTrack::new(family, true))
    }

    /// Place the non-zero `values` into every targeted track.
    ///
    /// All-or-nothing: if any value does not fit and `ride` is off, nothing
    /// changes and the full track is reported. With `ride` on, overflow is
    /// dropped.
    pub fn apply(
        &mut self,
        values: &[i64],
        targets: &[BuffTrack],
        ride: bool,
    ) -> Result<(), BuffError> {
        let mut staged = self.tracks.clone();
        for track in targets {
            let slots = staged.entry(*track).or_insert([0; SLOT_COUNT]);
            for value in values.iter().copied().filter(|v| *v != 0) {
                match slots.iter_mut().find(|slot| **slot == 0) {
                    Some(slot) => *slot = value,
                    None if ride => break,
                    None => return Err(BuffError::MaxStackReached { track: *track }),
                }
            }
        }
        self.tracks = staged;
        Ok(())
    }

    /// Apply `values` under the configured stacking policy
    pub fn stack(
        &mut self,
        values: &[i64],
        targets: &[BuffTrack],
        config: &RuleConfig,
    ) -> Result<(), BuffError> {
        match config.buff_policy {
            BuffPolicy::Slots => self.apply(values, targets, config.let_buffs_ride),
            BuffPolicy::TugOfWar => {
                self.pull(values, targets, config.tug_of_war_min, config.tug_of_war_max);
                Ok(())
            }
        }
    }

    /// Tug-of-war: one running total per family, clamped to `[min, max]`
    /// after every value. Debuff tracks pull the total down.
    ///
    /// A positive total is kept in the buff track's first slot and a
    /// negative one in the debuff track's, so `net` reads the total back and
    /// clearing buffs or debuffs removes the matching side.
    pub fn pull(&mut self, values: &[i64], targets: &[BuffTrack], min: i64, max: i64) {
        for track in targets {
            let family = track.family();
            let sign = if track.is_debuff() { -1 } else { 1 };
            let mut total = self.net(family);
            for value in values.iter().copied().filter(|v| *v != 0) {
                total = (total + sign * value).clamp(min, max);
            }
            self.set_total(family, total);
        }
    }

    fn set_total(&mut self, family: BuffFamily, total: i64) {
        let up = BuffTrack::new(family, false);
        let down = BuffTrack::new(family, true);
        self.tracks.remove(&up);
        self.tracks.remove(&down);
        match total.cmp(&0) {
            Ordering::Greater => {
                self.tracks.insert(up, [total, 0, 0, 0]);
            }
            Ordering::Less => {
                self.tracks.insert(down, [-total, 0, 0, 0]);
            }
            Ordering::Equal => {}
        }
    }

    /// Zero every buff-direction array (dekaja)
    pub fn clear_buffs(&mut self) {
        self.tracks.retain(|track, _| track.is_debuff());
    }

    /// Zero every debuff-direction array (dekunda)
    pub fn clear_debuffs(&mut self) {
        self.tracks.retain(|track, _| !track.is_debuff());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_paired_buff() {
        assert_eq!(BuffTrack::AccuracyDown.paired_buff(), BuffTrack::AccuracyUp);
        assert_eq!(BuffTrack::PowerUp.paired_buff(), BuffTrack::PowerUp);
        assert!(BuffTrack::MagicDefenseDown.is_debuff());
    }

    #[test]
    fn test_fill_then_overflow() {
        let mut slots = BuffSlots::new();
        slots.apply(&[3, 2], &[BuffTrack::PowerUp], false).unwrap();
        slots.apply(&[3, 2], &[BuffTrack::PowerUp], false).unwrap();
        assert_eq!(slots.slots(BuffTrack::PowerUp), [3, 2, 3, 2]);

        let before = slots.clone();
        let err = slots.apply(&[1], &[BuffTrack::PowerUp], false).unwrap_err();
        assert_eq!(
            err,
            BuffError::MaxStackReached {
                track: BuffTrack::PowerUp
            }
        );
        assert_eq!(slots, before);

        slots.apply(&[1], &[BuffTrack::PowerUp], true).unwrap();
        assert_eq!(slots.slots(BuffTrack::PowerUp), [3, 2, 3, 2]);
    }

    #[test]
    fn test_rejection_leaves_other_tracks_untouched() {
        let mut slots = BuffSlots::new();
        slots
            .apply(&[1, 1, 1, 1], &[BuffTrack::AccuracyUp], false)
            .unwrap();

        let result = slots.apply(&[2], &[BuffTrack::PowerUp, BuffTrack::AccuracyUp], false);
        assert!(result.is_err());
        assert_eq!(slots.count(BuffTrack::PowerUp), 0);
    }

    #[test]
    fn test_clear_buffs_and_debuffs() {
        let mut slots = BuffSlots::new();
        slots
            .apply(&[2], &[BuffTrack::PowerUp, BuffTrack::PowerDown], false)
            .unwrap();
        assert_eq!(slots.net(BuffFamily::Power), 0);

        slots.clear_buffs();
        assert_eq!(slots.sum(BuffTrack::PowerUp), 0);
        assert_eq!(slots.net(BuffFamily::Power), -2);

        slots.clear_debuffs();
        assert_eq!(slots, BuffSlots::new());
    }

    fn tug_config(min: i64, max: i64) -> RuleConfig {
        RuleConfig {
            buff_policy: BuffPolicy::TugOfWar,
            tug_of_war_min: min,
            tug_of_war_max: max,
            ..Default::default()
        }
    }

    #[test]
    fn test_stack_uses_slots_by_default() {
        let mut slots = BuffSlots::new();
        let config = RuleConfig::default();
        for _ in 0..4 {
            slots.stack(&[1], &[BuffTrack::PowerUp], &config).unwrap();
        }
        assert_eq!(
            slots.stack(&[1], &[BuffTrack::PowerUp], &config),
            Err(BuffError::MaxStackReached {
                track: BuffTrack::PowerUp
            })
        );
    }

    #[test]
    fn test_tug_of_war_never_rejects() {
        let mut slots = BuffSlots::new();
        let config = tug_config(-10, 10);
        for _ in 0..5 {
            slots.stack(&[1], &[BuffTrack::PowerUp], &config).unwrap();
        }
        assert_eq!(slots.net(BuffFamily::Power), 5);

        // 5 - 3 - 3 - 3 - 3 = -7
        slots
            .stack(&[3, 3, 3, 3], &[BuffTrack::PowerDown], &config)
            .unwrap();
        assert_eq!(slots.net(BuffFamily::Power), -7);
        assert_eq!(slots.sum(BuffTrack::PowerUp), 0);
    }

    #[test]
    fn test_tug_of_war_clamps_each_step() {
        let mut slots = BuffSlots::new();
        // 0 -> 4 -> 7 clamped to 5, then 5 - 2 = 3
        slots.pull(&[4, 3], &[BuffTrack::AccuracyUp], -5, 5);
        assert_eq!(slots.net(BuffFamily::Accuracy), 5);
        slots.pull(&[2], &[BuffTrack::AccuracyDown], -5, 5);
        assert_eq!(slots.net(BuffFamily::Accuracy), 3);

        slots.pull(&[9], &[BuffTrack::AccuracyDown], -5, 5);
        assert_eq!(slots.net(BuffFamily::Accuracy), -5);
    }

    #[test]
    fn test_tug_of_war_clear_removes_matching_side() {
        let mut slots = BuffSlots::new();
        let config = tug_config(-10, 10);
        slots.stack(&[4], &[BuffTrack::PowerUp], &config).unwrap();
        slots.stack(&[2], &[BuffTrack::MagicDefenseDown], &config).unwrap();

        slots.clear_debuffs();
        assert_eq!(slots.net(BuffFamily::Power), 4);
        assert_eq!(slots.net(BuffFamily::MagicDefense), 0);

        slots.clear_buffs();
        assert_eq!(slots, BuffSlots::new());
    }

    proptest! {
        #[test]
        fn prop_never_more_than_four(batches in prop::collection::vec(prop::collection::vec(1i64..5, 0..4), 0..8)) {
            let mut slots = BuffSlots::new();
            for batch in &batches {
                let _ = slots.apply(batch, &[BuffTrack::MagicDefenseUp], true);
                prop_assert!(slots.count(BuffTrack::MagicDefenseUp) <= SLOT_COUNT);
            }
        }

        #[test]
        fn prop_tug_of_war_stays_in_range(batches in prop::collection::vec((prop::collection::vec(1i64..6, 0..4), any::<bool>()), 0..10)) {
            let mut slots = BuffSlots::new();
            for (batch, debuff) in &batches {
                let track = BuffTrack::new(BuffFamily::Power, *debuff);
                slots.pull(batch, &[track], -6, 6);
                let net = slots.net(BuffFamily::Power);
                prop_assert!((-6..=6).contains(&net));
            }
        }
    }
}
