//! Core enums shared across the rules engine

use serde::{Deserialize, Serialize};

/// One of the five base attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Strength,
    Magic,
    Vitality,
    Agility,
    Luck,
}

impl Attribute {
    /// Get all attributes in sheet order
    pub fn all() -> &'static [Attribute] {
        &[
            Attribute::Strength,
            Attribute::Magic,
            Attribute::Vitality,
            Attribute::Agility,
            Attribute::Luck,
        ]
    }

    /// Position in the fixed attribute array
    pub fn index(self) -> usize {
        match self {
            Attribute::Strength => 0,
            Attribute::Magic => 1,
            Attribute::Vitality => 2,
            Attribute::Agility => 3,
            Attribute::Luck => 4,
        }
    }

    /// Long binding name used in formulas
    pub fn key(self) -> &'static str {
        match self {
            Attribute::Strength => "strength",
            Attribute::Magic => "magic",
            Attribute::Vitality => "vitality",
            Attribute::Agility => "agility",
            Attribute::Luck => "luck",
        }
    }

    /// Two-letter binding name used in formulas
    pub fn short_key(self) -> &'static str {
        match self {
            Attribute::Strength => "st",
            Attribute::Magic => "ma",
            Attribute::Vitality => "vi",
            Attribute::Agility => "ag",
            Attribute::Luck => "lu",
        }
    }
}

/// Whether the actor uses the human or the demon defense formulas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nature {
    #[default]
    Human,
    Demon,
}

/// Player character or non-player actor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    #[default]
    Character,
    Npc,
}

/// Resource pool an action can drain or restore
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    #[default]
    Hp,
    Mp,
}

/// Bad status conditions an actor can suffer (at most one at a time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadStatus {
    Burn,
    Freeze,
    Shock,
    Dizzy,
    Forget,
    Sleep,
    Confuse,
    /// Forced flight: every attribute but Agility drops to 1
    Fear,
    Despair,
    Rage,
    Brainwash,
    Poison,
    Charm,
    Curse,
}

impl BadStatus {
    /// Get all bad statuses
    pub fn all() -> &'static [BadStatus] {
        &[
            BadStatus::Burn,
            BadStatus::Freeze,
            BadStatus::Shock,
            BadStatus::Dizzy,
            BadStatus::Forget,
            BadStatus::Sleep,
            BadStatus::Confuse,
            BadStatus::Fear,
            BadStatus::Despair,
            BadStatus::Rage,
            BadStatus::Brainwash,
            BadStatus::Poison,
            BadStatus::Charm,
            BadStatus::Curse,
        ]
    }

    /// Statuses that turn physical hits into automatic criticals
    pub fn exposes_to_crits(self) -> bool {
        matches!(self, BadStatus::Freeze | BadStatus::Shock)
    }
}
