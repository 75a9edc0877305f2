//! Tunable rule constants

use serde::{Deserialize, Serialize};

/// Tunable rule constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConstants {
    #[serde(default)]
    pub attributes: AttributeConstants,
    #[serde(default)]
    pub boss: BossConstants,
    #[serde(default)]
    pub checks: CheckConstants,
    #[serde(default)]
    pub experience: ExperienceConstants,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeConstants {
    /// Maximum attribute value after equipment bonuses
    #[serde(default = "default_attribute_cap")]
    pub cap: i64,
}

impl Default for AttributeConstants {
    fn default() -> Self {
        AttributeConstants {
            cap: default_attribute_cap(),
        }
    }
}

fn default_attribute_cap() -> i64 {
    40
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossConstants {
    /// Extra HP factor for bosses
    #[serde(default = "default_boss_hp_factor")]
    pub hp_factor: f64,
    /// Extra MP factor for bosses
    #[serde(default = "default_boss_mp_factor")]
    pub mp_factor: f64,
}

impl Default for BossConstants {
    fn default() -> Self {
        BossConstants {
            hp_factor: default_boss_hp_factor(),
            mp_factor: default_boss_mp_factor(),
        }
    }
}

fn default_boss_hp_factor() -> f64 {
    5.0
}
fn default_boss_mp_factor() -> f64 {
    2.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckConstants {
    /// Lowest roll that always fails
    #[serde(default = "default_auto_fail_floor")]
    pub auto_fail_floor: u32,
    /// Lowest roll that always fails while cursed
    #[serde(default = "default_cursed_auto_fail_floor")]
    pub cursed_auto_fail_floor: u32,
    #[serde(default = "default_dodge_base")]
    pub dodge_base: i64,
    #[serde(default = "default_talk_base")]
    pub talk_base: i64,
}

impl Default for CheckConstants {
    fn default() -> Self {
        CheckConstants {
            auto_fail_floor: default_auto_fail_floor(),
            cursed_auto_fail_floor: default_cursed_auto_fail_floor(),
            dodge_base: default_dodge_base(),
            talk_base: default_talk_base(),
        }
    }
}

fn default_auto_fail_floor() -> u32 {
    96
}
fn default_cursed_auto_fail_floor() -> u32 {
    86
}
fn default_dodge_base() -> i64 {
    10
}
fn default_talk_base() -> i64 {
    20
}

/// Level curve multipliers by experience tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceConstants {
    #[serde(default = "default_tier_one")]
    pub tier_one: f64,
    #[serde(default = "default_tier_two")]
    pub tier_two: f64,
    #[serde(default = "default_tier_three")]
    pub tier_three: f64,
}

impl Default for ExperienceConstants {
    fn default() -> Self {
        ExperienceConstants {
            tier_one: default_tier_one(),
            tier_two: default_tier_two(),
            tier_three: default_tier_three(),
        }
    }
}

fn default_tier_one() -> f64 {
    0.8
}
fn default_tier_two() -> f64 {
    1.0
}
fn default_tier_three() -> f64 {
    1.3
}
