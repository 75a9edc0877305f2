//! PassiveSource - Affinity overrides from passive traits

use crate::actor::Item;
use crate::derive::StatAccumulator;
use crate::source::StatSource;

/// Affinity overrides from one passive trait. Passives carry no flat bonuses.
pub struct PassiveSource<'a> {
    item: &'a Item,
}

impl<'a> PassiveSource<'a> {
    pub fn new(item: &'a Item) -> Self {
        PassiveSource { item }
    }
}

impl StatSource for PassiveSource<'_> {
    fn id(&self) -> &str {
        &self.item.name
    }

    fn priority(&self) -> i32 {
        100 // Passives apply after armor
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.affinities.apply_override(&self.item.affinities);
        stats.status_affinities.apply_override(&self.item.status_affinities);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ItemKind, StatBonuses};
    use crate::affinity::{Affinity, AffinityOverride, ElementTable, StatusTable};
    use crate::types::{Attribute, BadStatus};

    #[test]
    fn test_passive_ignores_bonuses() {
        let item = Item::new("Dodge Charm", ItemKind::Passive)
            .with_bonuses(StatBonuses {
                strength: 5,
                ..Default::default()
            })
            .with_status_affinities(AffinityOverride::new().with(BadStatus::Charm, Affinity::Null));

        let mut acc = StatAccumulator::new(ElementTable::new(), StatusTable::new());
        PassiveSource::new(&item).apply(&mut acc);

        assert_eq!(acc.attribute_bonus(Attribute::Strength), 0);
        assert_eq!(acc.status_affinities.get(BadStatus::Charm), Affinity::Null);
    }
}
