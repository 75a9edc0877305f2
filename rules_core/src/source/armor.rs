//! ArmorSource - Flat bonuses and affinity overrides from equipped armor

use crate::actor::Item;
use crate::derive::StatAccumulator;
use crate::source::StatSource;

/// Stats from one equipped armor item
pub struct ArmorSource<'a> {
    item: &'a Item,
}

impl<'a> ArmorSource<'a> {
    pub fn new(item: &'a Item) -> Self {
        ArmorSource { item }
    }
}

impl StatSource for ArmorSource<'_> {
    fn id(&self) -> &str {
        &self.item.name
    }

    fn priority(&self) -> i32 {
        0 // Armor applies at default priority
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.add_bonuses(&self.item.bonuses);
        stats.affinities.apply_override(&self.item.affinities);
        stats.status_affinities.apply_override(&self.item.status_affinities);
    }
}
