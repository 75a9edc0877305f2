//! Items - gear, passive traits and weapons carried by an actor

use crate::affinity::AffinityOverride;
use crate::affinity::AffinityKey;
use crate::types::{Attribute, BadStatus};
use serde::{Deserialize, Serialize};

/// How an item takes part in derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Flat stat bonuses and affinity overrides
    Armor,
    /// Affinity overrides only
    Passive,
    /// Supplies `weapon.*` bindings to power formulas
    Weapon,
}

/// Flat bonuses an armor item adds to a derivation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBonuses {
    pub strength: i64,
    pub magic: i64,
    pub vitality: i64,
    pub agility: i64,
    pub luck: i64,
    pub physical_defense: i64,
    pub magic_defense: i64,
    pub melee_power: i64,
    pub ranged_power: i64,
    pub spell_power: i64,
    pub initiative: i64,
}

impl StatBonuses {
    pub fn attribute(&self, attr: Attribute) -> i64 {
        match attr {
            Attribute::Strength => self.strength,
            Attribute::Magic => self.magic,
            Attribute::Vitality => self.vitality,
            Attribute::Agility => self.agility,
            Attribute::Luck => self.luck,
        }
    }
}

/// An item owned by an actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    #[serde(default = "default_equipped")]
    pub equipped: bool,
    #[serde(default)]
    pub bonuses: StatBonuses,
    /// Weapon power
    #[serde(default)]
    pub power: i64,
    /// Weapon accuracy modifier
    #[serde(default)]
    pub accuracy: i64,
    #[serde(default)]
    pub affinities: AffinityOverride<AffinityKey>,
    #[serde(default)]
    pub status_affinities: AffinityOverride<BadStatus>,
}

fn default_equipped() -> bool {
    true
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Item {
            name: name.into(),
            kind,
            equipped: true,
            bonuses: StatBonuses::default(),
            power: 0,
            accuracy: 0,
            affinities: AffinityOverride::default(),
            status_affinities: AffinityOverride::default(),
        }
    }

    pub fn with_bonuses(mut self, bonuses: StatBonuses) -> Self {
        self.bonuses = bonuses;
        self
    }

    pub fn with_affinities(mut self, affinities: AffinityOverride<AffinityKey>) -> Self {
        self.affinities = affinities;
        self
    }

    pub fn with_status_affinities(mut self, affinities: AffinityOverride<BadStatus>) -> Self {
        self.status_affinities = affinities;
        self
    }
}
