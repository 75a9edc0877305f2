//! ActorSheet - the persistent record of a character or monster

mod attributes;
mod item;

pub use attributes::{AttributeScore, AttributeScores, BaseAttributes};
pub use item::{Item, ItemKind, StatBonuses};

use crate::affinity::{ElementTable, StatusTable};
use crate::buff::BuffSlots;
use crate::types::{ActorKind, BadStatus, Nature, ResourceKind};
use serde::{Deserialize, Serialize};

/// Experience split across the three growth tiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub tier_one: u64,
    pub tier_two: u64,
    pub tier_three: u64,
}

impl Experience {
    pub fn total(&self) -> u64 {
        self.tier_one + self.tier_two + self.tier_three
    }
}

/// Current resource values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub hp: i64,
    pub mp: i64,
    pub fate: i64,
}

impl Resources {
    pub fn get(&self, kind: ResourceKind) -> i64 {
        match kind {
            ResourceKind::Hp => self.hp,
            ResourceKind::Mp => self.mp,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut i64 {
        match kind {
            ResourceKind::Hp => &mut self.hp,
            ResourceKind::Mp => &mut self.mp,
        }
    }
}

/// Persistent actor data. Derived values live in [`crate::derive::DerivedStats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSheet {
    pub name: String,
    #[serde(default)]
    pub kind: ActorKind,
    #[serde(default)]
    pub nature: Nature,
    #[serde(default)]
    pub is_boss: bool,
    #[serde(default)]
    pub player_controlled: bool,
    #[serde(default)]
    pub attributes: BaseAttributes,
    #[serde(default)]
    pub experience: Experience,
    /// Fixed level for NPCs; characters compute theirs from experience
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub affinities: ElementTable,
    #[serde(default)]
    pub status_affinities: StatusTable,
    #[serde(default)]
    pub bad_status: Option<BadStatus>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub buffs: BuffSlots,
}

fn default_level() -> u32 {
    1
}

impl ActorSheet {
    pub fn new(name: impl Into<String>, kind: ActorKind) -> Self {
        ActorSheet {
            name: name.into(),
            kind,
            nature: Nature::default(),
            is_boss: false,
            player_controlled: kind == ActorKind::Character,
            attributes: BaseAttributes::default(),
            experience: Experience::default(),
            level: default_level(),
            resources: Resources::default(),
            affinities: ElementTable::default(),
            status_affinities: StatusTable::default(),
            bad_status: None,
            items: Vec::new(),
            buffs: BuffSlots::default(),
        }
    }

    pub fn has_status(&self, status: BadStatus) -> bool {
        self.bad_status == Some(status)
    }

    pub fn is_cursed(&self) -> bool {
        self.has_status(BadStatus::Curse)
    }

    pub fn is_alive(&self) -> bool {
        self.resources.hp > 0
    }

    /// Equipped items of a given kind, in sheet order
    pub fn equipped(&self, kind: ItemKind) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(move |item| item.equipped && item.kind == kind)
    }

    /// First equipped weapon, if any
    pub fn weapon(&self) -> Option<&Item> {
        self.equipped(ItemKind::Weapon).next()
    }

    /// Add `delta` to a resource, never going below 0
    pub fn adjust_resource(&mut self, kind: ResourceKind, delta: i64) -> i64 {
        let slot = self.resources.get_mut(kind);
        *slot = (*slot + delta).max(0);
        *slot
    }

    /// Spend up to `points` fate, returning what was actually spent
    pub fn spend_fate(&mut self, points: i64) -> i64 {
        let spent = points.clamp(0, self.resources.fate.max(0));
        self.resources.fate -= spent;
        spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_resource_floors_at_zero() {
        let mut sheet = ActorSheet::new("Pixie", ActorKind::Npc);
        sheet.resources.hp = 10;
        assert_eq!(sheet.adjust_resource(ResourceKind::Hp, -25), 0);
        assert_eq!(sheet.adjust_resource(ResourceKind::Hp, 7), 7);
        assert!(sheet.is_alive());
    }

    #[test]
    fn test_spend_fate_is_capped_by_pool() {
        let mut sheet = ActorSheet::new("Yu", ActorKind::Character);
        sheet.resources.fate = 2;
        assert_eq!(sheet.spend_fate(5), 2);
        assert_eq!(sheet.resources.fate, 0);
        assert_eq!(sheet.spend_fate(1), 0);
    }

    #[test]
    fn test_weapon_lookup_skips_unequipped() {
        let mut sheet = ActorSheet::new("Yu", ActorKind::Character);
        let mut spare = Item::new("Spare Katana", ItemKind::Weapon);
        spare.equipped = false;
        sheet.items.push(spare);
        assert!(sheet.weapon().is_none());

        sheet.items.push(Item::new("Golf Club", ItemKind::Weapon));
        assert_eq!(sheet.weapon().map(|w| w.name.as_str()), Some("Golf Club"));
    }

    #[test]
    fn test_parse_minimal_sheet() {
        let toml = r#"
name = "Jack Frost"
kind = "npc"
nature = "demon"
level = 7
bad_status = "sleep"

[attributes]
magic = 9

[affinities]
ice = "null"
fire = "weak"
"#;

        let sheet: ActorSheet = toml::from_str(toml).unwrap();
        assert_eq!(sheet.kind, ActorKind::Npc);
        assert_eq!(sheet.attributes.magic, 9);
        assert_eq!(sheet.attributes.luck, 1);
        assert_eq!(sheet.bad_status, Some(BadStatus::Sleep));
        assert!(!sheet.player_controlled);
    }
}
