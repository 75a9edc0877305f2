//! Encounter files - two combatants, their actions and the table rules

use anyhow::{Context, Result};
use rules_core::action::ActionSpec;
use rules_core::actor::ActorSheet;
use rules_core::buff::{BuffTrack, SLOT_COUNT};
use rules_core::config::RuleConfig;
use serde::Deserialize;
use std::path::Path;

/// Bundled encounter used when no path is given
pub const DEFAULT_ENCOUNTER: &str = include_str!("../config/encounter.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Combatant {
    pub sheet: ActorSheet,
    pub action: ActionSpec,
}

/// Buff cast on one side of the field before the first round
#[derive(Debug, Clone, Deserialize)]
pub struct OpeningBuff {
    pub values: [i64; SLOT_COUNT],
    pub tracks: Vec<BuffTrack>,
    #[serde(default = "default_friendly")]
    pub friendly: bool,
}

fn default_friendly() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct Encounter {
    #[serde(default)]
    pub rules: RuleConfig,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default)]
    pub opening_buff: Option<OpeningBuff>,
    pub hero: Combatant,
    pub foe: Combatant,
}

fn default_seed() -> u64 {
    42
}
fn default_max_rounds() -> u32 {
    20
}

impl Encounter {
    pub fn parse(content: &str) -> Result<Self> {
        let encounter: Encounter = toml::from_str(content).context("invalid encounter file")?;
        encounter
            .rules
            .validate()
            .context("invalid rules in encounter file")?;
        Ok(encounter)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content)
    }
}
