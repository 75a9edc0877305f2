//! FormulaContext - the explicit set of names a formula may reference

use crate::actor::{AttributeScores, Item};
use crate::types::Attribute;
use std::collections::BTreeMap;

/// Variable bindings for formula evaluation.
///
/// Built field by field; nothing is looked up by reflection. Unbound names
/// are an evaluation error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulaContext {
    bindings: BTreeMap<String, f64>,
}

impl FormulaContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every attribute value under its long and short name
    /// (`strength`/`st`, ...), plus `<name>.base` for the unmodified base.
    pub fn with_attributes(mut self, attributes: &AttributeScores) -> Self {
        for attr in Attribute::all() {
            let score = attributes.get(*attr);
            let value = score.value as f64;
            self.insert(attr.key(), value);
            self.insert(attr.short_key(), value);
            self.insert(&format!("{}.base", attr.key()), score.base as f64);
            self.insert(&format!("{}.tn", attr.key()), score.tn as f64);
        }
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.insert("level", level as f64);
        self
    }

    /// Bind the three power ratings
    pub fn with_powers(mut self, melee: i64, ranged: i64, spell: i64) -> Self {
        self.insert("melee_power", melee as f64);
        self.insert("ranged_power", ranged as f64);
        self.insert("spell_power", spell as f64);
        self
    }

    /// Bind current and maximum resources
    pub fn with_resources(mut self, hp: i64, hp_max: i64, mp: i64, mp_max: i64) -> Self {
        self.insert("hp", hp as f64);
        self.insert("hp_max", hp_max as f64);
        self.insert("mp", mp as f64);
        self.insert("mp_max", mp_max as f64);
        self
    }

    /// Bind an item's numeric fields under `<prefix>.<field>`
    pub fn with_item(mut self, prefix: &str, item: &Item) -> Self {
        let bonuses = &item.bonuses;
        self.insert(&format!("{prefix}.power"), item.power as f64);
        self.insert(&format!("{prefix}.accuracy"), item.accuracy as f64);
        self.insert(&format!("{prefix}.melee_power"), bonuses.melee_power as f64);
        self.insert(&format!("{prefix}.ranged_power"), bonuses.ranged_power as f64);
        self.insert(&format!("{prefix}.spell_power"), bonuses.spell_power as f64);
        self
    }

    /// Bind one explicitly named extra value
    pub fn with_value(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.bindings.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn insert(&mut self, name: &str, value: f64) {
        self.bindings.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{AttributeScore, ItemKind};

    #[test]
    fn test_attribute_bindings() {
        let mut scores = AttributeScores::default();
        *scores.get_mut(Attribute::Luck) = AttributeScore {
            base: 6,
            temp: 2,
            value: 8,
            tn: 45,
        };

        let ctx = FormulaContext::new().with_attributes(&scores).with_level(3);
        assert_eq!(ctx.get("luck"), Some(8.0));
        assert_eq!(ctx.get("lu"), Some(8.0));
        assert_eq!(ctx.get("luck.base"), Some(6.0));
        assert_eq!(ctx.get("luck.tn"), Some(45.0));
        assert_eq!(ctx.get("level"), Some(3.0));
        assert_eq!(ctx.get("charisma"), None);
    }

    #[test]
    fn test_item_bindings() {
        let mut item = Item::new("Rusty Pipe", ItemKind::Weapon);
        item.power = 12;
        let ctx = FormulaContext::new().with_item("weapon", &item);
        assert_eq!(ctx.get("weapon.power"), Some(12.0));
        assert_eq!(ctx.get("weapon.accuracy"), Some(0.0));
    }
}
