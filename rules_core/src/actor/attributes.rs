//! Attribute scores - persistent base plus per-pass derived parts

use crate::types::Attribute;
use serde::{Deserialize, Serialize};

/// Persistent base attributes as entered by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAttributes {
    #[serde(default = "default_base")]
    pub strength: i64,
    #[serde(default = "default_base")]
    pub magic: i64,
    #[serde(default = "default_base")]
    pub vitality: i64,
    #[serde(default = "default_base")]
    pub agility: i64,
    #[serde(default = "default_base")]
    pub luck: i64,
}

fn default_base() -> i64 {
    1
}

impl Default for BaseAttributes {
    fn default() -> Self {
        BaseAttributes {
            strength: default_base(),
            magic: default_base(),
            vitality: default_base(),
            agility: default_base(),
            luck: default_base(),
        }
    }
}

impl BaseAttributes {
    pub fn get(&self, attr: Attribute) -> i64 {
        match attr {
            Attribute::Strength => self.strength,
            Attribute::Magic => self.magic,
            Attribute::Vitality => self.vitality,
            Attribute::Agility => self.agility,
            Attribute::Luck => self.luck,
        }
    }
}

/// One attribute as seen by a derivation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeScore {
    /// Persistent base
    pub base: i64,
    /// Equipment bonus for this pass
    pub temp: i64,
    /// `base + temp`, capped
    pub value: i64,
    /// Check target number
    pub tn: i64,
}

/// All five attribute scores, indexed by [`Attribute::index`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeScores([AttributeScore; 5]);

impl AttributeScores {
    /// Fresh scores: value = base, temp and tn zeroed
    pub fn from_base(base: &BaseAttributes) -> Self {
        let mut scores = AttributeScores::default();
        for attr in Attribute::all() {
            let score = scores.get_mut(*attr);
            score.base = base.get(*attr);
            score.value = score.base;
        }
        scores
    }

    pub fn get(&self, attr: Attribute) -> &AttributeScore {
        &self.0[attr.index()]
    }

    pub fn get_mut(&mut self, attr: Attribute) -> &mut AttributeScore {
        &mut self.0[attr.index()]
    }

    pub fn value(&self, attr: Attribute) -> i64 {
        self.get(attr).value
    }
}
