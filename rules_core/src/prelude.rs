//! Prelude module for convenient imports
//!
//! ```rust
//! use rules_core::prelude::*;
//! ```

// Sheets and derivation
pub use crate::actor::{ActorSheet, Item, ItemKind, StatBonuses};
pub use crate::derive::{derive, BuffTotals, DerivedStats};
pub use crate::types::{ActorKind, Attribute, BadStatus, Nature, ResourceKind};

// Affinities
pub use crate::affinity::{combined_multiplier, Affinity, AffinityKey, AffinityOverride};

// Resolution
pub use crate::action::{resolve_action, ActionKind, ActionReport, ActionSpec, ActionTarget};
pub use crate::check::{CheckOutcome, CheckRequest};
pub use crate::damage::{apply_damage, DamageRequest};
pub use crate::power::PowerRequest;

// Buffs
pub use crate::buff::{BuffEngine, BuffTrack, InMemoryLedger};

// Formulas, prompts and config
pub use crate::config::RuleConfig;
pub use crate::formula::{DiceEvaluator, FormulaContext, FormulaEvaluator};
pub use crate::prompt::{PromptPort, ScriptedPrompt};
