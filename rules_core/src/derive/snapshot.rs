//! DerivedStats - one actor's computed combat numbers for a single pass

use super::LevelProgress;
use crate::actor::AttributeScores;
use crate::affinity::{ElementTable, StatusTable};
use crate::buff::{BuffFamily, BuffTotals};
use crate::types::{Attribute, ResourceKind};

/// Output of a derivation pass.
///
/// A pure function of the sheet, the buff totals and the rule config at
/// the time it was computed. Nothing in here is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedStats {
    pub attributes: AttributeScores,
    pub level: LevelProgress,

    // === Defenses ===
    pub physical_defense: i64,
    pub magic_defense: i64,

    // === Offense ===
    pub melee_power: i64,
    pub ranged_power: i64,
    pub spell_power: i64,
    pub initiative: i64,

    // === Target numbers ===
    pub dodge_tn: i64,
    pub talk_tn: i64,

    // === Resource maxima ===
    pub hp_max: i64,
    pub mp_max: i64,
    pub fate_max: i64,

    // === Final affinities ===
    pub affinities: ElementTable,
    pub status_affinities: StatusTable,

    /// Buff sums this pass read
    pub buffs: BuffTotals,
}

impl DerivedStats {
    /// Check target number for an attribute
    pub fn tn(&self, attr: Attribute) -> i64 {
        self.attributes.get(attr).tn
    }

    pub fn value(&self, attr: Attribute) -> i64 {
        self.attributes.value(attr)
    }

    pub fn resource_max(&self, kind: ResourceKind) -> i64 {
        match kind {
            ResourceKind::Hp => self.hp_max,
            ResourceKind::Mp => self.mp_max,
        }
    }

    /// Accuracy buff sum, added to every check this actor makes
    pub fn accuracy_bonus(&self) -> i64 {
        self.buffs.get(BuffFamily::Accuracy)
    }
}
