//! StatAccumulator - Collects source contributions before the formula stages

use crate::actor::StatBonuses;
use crate::affinity::{ElementTable, StatusTable};
use crate::types::Attribute;

/// Running totals for the equip/passive pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatAccumulator {
    /// Attribute bonuses, indexed by [`Attribute::index`]
    attribute_bonuses: [i64; 5],

    // === Flat totals ===
    pub physical_defense: i64,
    pub magic_defense: i64,
    pub melee_power: i64,
    pub ranged_power: i64,
    pub spell_power: i64,
    pub initiative: i64,

    // === Final affinity tables ===
    pub affinities: ElementTable,
    pub status_affinities: StatusTable,
}

impl StatAccumulator {
    /// Start from the actor's own (unmodified) affinity tables
    pub fn new(affinities: ElementTable, status_affinities: StatusTable) -> Self {
        StatAccumulator {
            affinities,
            status_affinities,
            ..Default::default()
        }
    }

    /// Add an item's flat bonuses
    pub fn add_bonuses(&mut self, bonuses: &StatBonuses) {
        for attr in Attribute::all() {
            self.attribute_bonuses[attr.index()] += bonuses.attribute(*attr);
        }
        self.physical_defense += bonuses.physical_defense;
        self.magic_defense += bonuses.magic_defense;
        self.melee_power += bonuses.melee_power;
        self.ranged_power += bonuses.ranged_power;
        self.spell_power += bonuses.spell_power;
        self.initiative += bonuses.initiative;
    }

    pub fn attribute_bonus(&self, attr: Attribute) -> i64 {
        self.attribute_bonuses[attr.index()]
    }
}
