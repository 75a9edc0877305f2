//! RuleConfig - formulas and house-rule toggles

use super::{ConfigError, RuleConstants};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Named formula strings consulted by the derivation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaSet {
    #[serde(default = "default_human_physical_defense")]
    pub human_physical_defense: String,
    #[serde(default = "default_human_magic_defense")]
    pub human_magic_defense: String,
    #[serde(default = "default_demon_physical_defense")]
    pub demon_physical_defense: String,
    #[serde(default = "default_demon_magic_defense")]
    pub demon_magic_defense: String,
    #[serde(default = "default_initiative")]
    pub initiative: String,
    #[serde(default = "default_hp")]
    pub hp: String,
    #[serde(default = "default_mp")]
    pub mp: String,
    #[serde(default = "default_fate")]
    pub fate: String,
}

impl Default for FormulaSet {
    fn default() -> Self {
        FormulaSet {
            human_physical_defense: default_human_physical_defense(),
            human_magic_defense: default_human_magic_defense(),
            demon_physical_defense: default_demon_physical_defense(),
            demon_magic_defense: default_demon_magic_defense(),
            initiative: default_initiative(),
            hp: default_hp(),
            mp: default_mp(),
            fate: default_fate(),
        }
    }
}

fn default_human_physical_defense() -> String {
    "floor(vitality / 2)".to_string()
}
fn default_human_magic_defense() -> String {
    "floor(magic / 2)".to_string()
}
fn default_demon_physical_defense() -> String {
    "vitality".to_string()
}
fn default_demon_magic_defense() -> String {
    "floor((magic + vitality) / 2)".to_string()
}
fn default_initiative() -> String {
    "agility + floor(luck / 2)".to_string()
}
fn default_hp() -> String {
    "vitality * 5 + level * 2 + 20".to_string()
}
fn default_mp() -> String {
    "magic * 3 + level + 10".to_string()
}
fn default_fate() -> String {
    "floor(luck / 4) + 1".to_string()
}

/// Buff stacking policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffPolicy {
    /// Up to four discrete increments per track
    #[default]
    Slots,
    /// One clamped running total per track; buffs and debuffs offset
    TugOfWar,
}

/// Critical band as a fraction of the target number, e.g. "1/10"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CritRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl Default for CritRate {
    fn default() -> Self {
        CritRate {
            numerator: 1,
            denominator: 10,
        }
    }
}

impl CritRate {
    /// Parse an "N/D" string
    pub fn parse(text: &str) -> Option<Self> {
        let (num, den) = text.split_once('/')?;
        let numerator: u32 = num.trim().parse().ok()?;
        let denominator: u32 = den.trim().parse().ok()?;
        if denominator == 0 {
            return None;
        }
        Some(CritRate {
            numerator,
            denominator,
        })
    }

    /// Whether `roll <= target * fraction`, computed without rounding
    pub fn is_critical(self, roll: u32, target: i64) -> bool {
        (roll as i64) * (self.denominator as i64) <= target * (self.numerator as i64)
    }
}

/// Persisted rule configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub formulas: FormulaSet,
    #[serde(default = "default_multiplier")]
    pub hp_multiplier: f64,
    #[serde(default = "default_multiplier")]
    pub mp_multiplier: f64,
    /// Add level to ranged power
    #[serde(default)]
    pub add_level_to_ranged_power: bool,
    /// Power buffs also raise spell power
    #[serde(default)]
    pub taru_only: bool,
    /// Apply resist multipliers after subtracting defense
    #[serde(default)]
    pub resist_after_defense: bool,
    /// Silently drop buff applications past the fourth
    #[serde(default)]
    pub let_buffs_ride: bool,
    #[serde(default)]
    pub buff_policy: BuffPolicy,
    #[serde(default = "default_tug_of_war_min")]
    pub tug_of_war_min: i64,
    #[serde(default = "default_tug_of_war_max")]
    pub tug_of_war_max: i64,
    /// NPCs may also spend fate to reduce damage
    #[serde(default)]
    pub fate_for_npcs: bool,
    #[serde(default)]
    pub show_floating_damage: bool,
    #[serde(default = "default_crit_rate")]
    pub crit_rate: String,
    #[serde(default)]
    pub constants: RuleConstants,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            formulas: FormulaSet::default(),
            hp_multiplier: default_multiplier(),
            mp_multiplier: default_multiplier(),
            add_level_to_ranged_power: false,
            taru_only: false,
            resist_after_defense: false,
            let_buffs_ride: false,
            buff_policy: BuffPolicy::default(),
            tug_of_war_min: default_tug_of_war_min(),
            tug_of_war_max: default_tug_of_war_max(),
            fate_for_npcs: false,
            show_floating_damage: false,
            crit_rate: default_crit_rate(),
            constants: RuleConstants::default(),
        }
    }
}

fn default_multiplier() -> f64 {
    1.0
}
fn default_tug_of_war_min() -> i64 {
    -10
}
fn default_tug_of_war_max() -> i64 {
    10
}
fn default_crit_rate() -> String {
    "1/10".to_string()
}

impl RuleConfig {
    /// Load and validate a rule configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: RuleConfig = super::load_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a rule configuration string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: RuleConfig = super::parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tug_of_war_min > self.tug_of_war_max {
            return Err(ConfigError::ValidationError(format!(
                "tug_of_war_min ({}) exceeds tug_of_war_max ({})",
                self.tug_of_war_min, self.tug_of_war_max
            )));
        }
        if self.hp_multiplier <= 0.0 || self.mp_multiplier <= 0.0 {
            return Err(ConfigError::ValidationError(
                "resource multipliers must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed critical rate; malformed strings fall back to 1/10
    pub fn crit_rate(&self) -> CritRate {
        CritRate::parse(&self.crit_rate).unwrap_or_else(|| {
            warn!(crit_rate = %self.crit_rate, "malformed crit rate, using 1/10");
            CritRate::default()
        })
    }
}
