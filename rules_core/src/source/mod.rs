//! StatSource - Trait and implementations for derivation contributors

mod armor;
mod passive;

pub use armor::ArmorSource;
pub use passive::PassiveSource;

use crate::actor::{ActorSheet, ItemKind};
use crate::derive::StatAccumulator;

/// Trait for anything that contributes to a derivation pass
pub trait StatSource: Send + Sync {
    /// Identifier for logs and breakdowns
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Default priority is 0.
    /// - Armor: 0
    /// - Passive traits: 100
    fn priority(&self) -> i32 {
        0
    }

    /// Apply this source's contribution to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}

/// Every source an actor's equipped items contribute, in application order
pub fn sources_for(sheet: &ActorSheet) -> Vec<Box<dyn StatSource + '_>> {
    let mut sources: Vec<Box<dyn StatSource + '_>> = Vec::new();
    for item in sheet.items.iter().filter(|item| item.equipped) {
        match item.kind {
            ItemKind::Armor => sources.push(Box::new(ArmorSource::new(item))),
            ItemKind::Passive => sources.push(Box::new(PassiveSource::new(item))),
            ItemKind::Weapon => {}
        }
    }
    // stable: sheet order is kept within a priority
    sources.sort_by_key(|source| source.priority());
    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Item;
    use crate::types::ActorKind;

    #[test]
    fn test_passives_sort_after_armor() {
        let mut sheet = ActorSheet::new("Yu", ActorKind::Character);
        sheet.items.push(Item::new("Regenerate 1", ItemKind::Passive));
        sheet.items.push(Item::new("Tin Mail", ItemKind::Armor));
        sheet.items.push(Item::new("Pipe", ItemKind::Weapon));
        let mut stowed = Item::new("Spare Vest", ItemKind::Armor);
        stowed.equipped = false;
        sheet.items.push(stowed);

        let ids: Vec<_> = sources_for(&sheet).iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids, vec!["Tin Mail", "Regenerate 1"]);
    }
}
