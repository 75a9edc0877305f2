//! rules_core - Rules engine for a percentile tabletop RPG
//!
//! This library provides:
//! - Stat derivation: base attributes + equipment + buffs into combat stats
//! - Affinity resolution for elemental and bad-status tables
//! - Buff stacking under slot or tug-of-war policies, with a shared ledger
//! - Checks, power rolls, damage application and status infliction
//! - Multi-target action orchestration over an async prompt port

pub mod action;
pub mod actor;
pub mod affinity;
pub mod buff;
pub mod check;
pub mod config;
pub mod damage;
pub mod derive;
pub mod formula;
pub mod power;
pub mod prelude;
pub mod prompt;
pub mod source;
pub mod status;
pub mod types;

// Re-export core types for convenience
pub use action::{resolve_action, ActionKind, ActionReport, ActionSpec, ActionTarget, TargetOutcome};
pub use actor::{ActorSheet, Item, ItemKind, StatBonuses};
pub use affinity::{Affinity, AffinityKey, AffinityOverride, AffinityTable, ElementTable, StatusTable};
pub use buff::{BuffEngine, BuffError, BuffSlots, BuffTotals, BuffTrack, InMemoryLedger, LedgerStore};
pub use check::{resolve_check, CheckOutcome, CheckRequest, CheckResult};
pub use config::{ConfigError, RuleConfig};
pub use damage::{apply_damage, apply_damage_with_fate, DamageReport, DamageRequest};
pub use derive::{derive, DerivedStats};
pub use formula::{DiceEvaluator, FormulaContext, FormulaEvaluator};
pub use power::{resolve_power, PowerRequest, PowerRoll};
pub use prompt::{PromptPort, PromptResponse, ScriptedPrompt};
pub use types::{ActorKind, Attribute, BadStatus, Nature, ResourceKind};
