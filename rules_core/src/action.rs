//! Action orchestration - one skill or attack against any number of targets
//!
//! The power roll is made once and shared. Each target gets its own
//! accuracy check, affinity multiplier, fate prompt and status roll, and a
//! problem with one target never stops the others.

use crate::actor::ActorSheet;
use crate::affinity::{combined_multiplier, AffinityKey};
use crate::buff::{BuffError, BuffTrack, SLOT_COUNT};
use crate::check::{resolve_check_with_rng, CheckRequest, CheckResult};
use crate::config::RuleConfig;
use crate::damage::{apply_damage, apply_damage_with_fate, DamageReport, DamageRequest};
use crate::derive::DerivedStats;
use crate::formula::{FormulaContext, FormulaEvaluator};
use crate::power::{resolve_power, PowerRequest, PowerRoll};
use crate::prompt::{PromptField, PromptPort, PromptRequest, PromptResponse};
use crate::status::{inflict_status_with_rng, InflictionOutcome};
use crate::types::{Attribute, BadStatus, ResourceKind};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const MODIFIER_FIELD: &str = "modifier";
const SPLIT_FIELD: &str = "split";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Weapon attack; halved while poisoned
    #[default]
    Attack,
    Spell,
    /// Restores the target's resource; never checked, never resisted
    Healing,
    /// Stacks buff values on the targets' `buff_tracks` under the
    /// configured policy
    Support,
    /// Dekaja: wipes the targets' buffs
    ClearBuffs,
    /// Dekunda: wipes the targets' debuffs
    ClearDebuffs,
}

/// Status an action may inflict on hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRider {
    pub status: BadStatus,
    /// Base infliction chance in percent
    pub chance: i64,
}

/// A skill, spell or attack definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub name: String,
    #[serde(default)]
    pub kind: ActionKind,
    pub affinity: AffinityKey,
    pub power: PowerRequest,
    /// Attribute whose target number the accuracy check uses
    #[serde(default = "default_accuracy_attribute")]
    pub accuracy_attribute: Attribute,
    #[serde(default)]
    pub accuracy_modifier: i64,
    #[serde(default = "default_split")]
    pub split: u32,
    /// Skip the accuracy check entirely
    #[serde(default)]
    pub auto_hit: bool,
    #[serde(default)]
    pub ignore_defense: bool,
    #[serde(default)]
    pub half_defense: bool,
    #[serde(default)]
    pub resource: ResourceKind,
    #[serde(default)]
    pub status: Option<StatusRider>,
    /// Tracks a support action fills
    #[serde(default)]
    pub buff_tracks: Vec<BuffTrack>,
    /// Ask the user for a modifier and split count before rolling
    #[serde(default)]
    pub ask_modifiers: bool,
}

fn default_accuracy_attribute() -> Attribute {
    Attribute::Strength
}
fn default_split() -> u32 {
    1
}

impl ActionSpec {
    pub fn new(name: impl Into<String>, affinity: AffinityKey, power: PowerRequest) -> Self {
        ActionSpec {
            name: name.into(),
            kind: ActionKind::default(),
            affinity,
            power,
            accuracy_attribute: default_accuracy_attribute(),
            accuracy_modifier: 0,
            split: default_split(),
            auto_hit: false,
            ignore_defense: false,
            half_defense: false,
            resource: ResourceKind::Hp,
            status: None,
            buff_tracks: Vec::new(),
            ask_modifiers: false,
        }
    }

    fn modifier_request(&self) -> PromptRequest {
        PromptRequest {
            title: self.name.clone(),
            fields: vec![
                PromptField::Numeric {
                    key: MODIFIER_FIELD.to_string(),
                    label: "Modifier".to_string(),
                    default: self.accuracy_modifier,
                },
                PromptField::Numeric {
                    key: SPLIT_FIELD.to_string(),
                    label: "Split".to_string(),
                    default: self.split as i64,
                },
            ],
        }
    }
}

/// A resolved target: its sheet and the stats derived for it this pass
#[derive(Debug)]
pub struct ActionTarget<'a> {
    pub sheet: &'a mut ActorSheet,
    pub stats: &'a DerivedStats,
}

/// What happened to one target slot
#[derive(Debug, Clone, PartialEq)]
pub enum TargetOutcome {
    /// The target lookup resolved to nothing
    Missing,
    Missed {
        target: String,
        check: CheckResult,
    },
    /// The target's fate prompt was cancelled; nothing was applied
    Skipped { target: String },
    Buffed {
        target: String,
        result: Result<(), BuffError>,
    },
    Cleared { target: String },
    Hit {
        target: String,
        check: Option<CheckResult>,
        hits: Vec<DamageReport>,
        status: Option<InflictionOutcome>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionReport {
    /// Cancelled before anything was rolled
    Cancelled,
    Resolved {
        action: String,
        power: PowerRoll,
        targets: Vec<TargetOutcome>,
    },
}

/// Variables a user's action formulas may read. An unequipped weapon
/// reads as 0.
pub fn user_context(user: &ActorSheet, stats: &DerivedStats) -> FormulaContext {
    let context = FormulaContext::new()
        .with_attributes(&stats.attributes)
        .with_level(stats.level.level)
        .with_powers(stats.melee_power, stats.ranged_power, stats.spell_power)
        .with_resources(
            user.resources.hp,
            stats.hp_max,
            user.resources.mp,
            stats.mp_max,
        );
    match user.weapon() {
        Some(weapon) => context.with_item("weapon", weapon),
        None => context
            .with_value("weapon.power", 0.0)
            .with_value("weapon.accuracy", 0.0),
    }
}

/// Resolve `spec` from `user` against every target slot
#[allow(clippy::too_many_arguments)]
pub async fn resolve_action(
    spec: &ActionSpec,
    user: &ActorSheet,
    user_stats: &DerivedStats,
    targets: Vec<Option<ActionTarget<'_>>>,
    config: &RuleConfig,
    evaluator: &mut dyn FormulaEvaluator,
    prompt: &dyn PromptPort,
    rng: &mut impl Rng,
) -> ActionReport {
    let mut modifier = spec.accuracy_modifier;
    let mut split = spec.split;
    if spec.ask_modifiers {
        match prompt.prompt(spec.modifier_request()).await {
            PromptResponse::Cancelled => {
                debug!(action = %spec.name, "action cancelled");
                return ActionReport::Cancelled;
            }
            PromptResponse::Filled(values) => {
                modifier = values.number(MODIFIER_FIELD).unwrap_or(modifier);
                split = values
                    .number(SPLIT_FIELD)
                    .and_then(|s| u32::try_from(s).ok())
                    .unwrap_or(split);
            }
        }
    }

    let mut power_request = spec.power.clone();
    power_request.is_attack = spec.kind == ActionKind::Attack;
    power_request.poisoned = user.has_status(BadStatus::Poison);
    let power = resolve_power(&power_request, &user_context(user, user_stats), evaluator);

    let check_request = CheckRequest::new(user_stats.tn(spec.accuracy_attribute))
        .with_modifier(modifier)
        .with_split(split)
        .cursed(user.is_cursed());

    let mut outcomes = Vec::with_capacity(targets.len());
    for slot in targets {
        let Some(target) = slot else {
            debug!(action = %spec.name, "target lookup resolved to nothing");
            outcomes.push(TargetOutcome::Missing);
            continue;
        };
        let outcome = resolve_target(spec, &check_request, &power, target, config, prompt, rng).await;
        outcomes.push(outcome);
    }

    ActionReport::Resolved {
        action: spec.name.clone(),
        power,
        targets: outcomes,
    }
}

async fn resolve_target(
    spec: &ActionSpec,
    check_request: &CheckRequest,
    power: &PowerRoll,
    target: ActionTarget<'_>,
    config: &RuleConfig,
    prompt: &dyn PromptPort,
    rng: &mut impl Rng,
) -> TargetOutcome {
    let ActionTarget { sheet, stats } = target;
    let name = sheet.name.clone();

    match spec.kind {
        ActionKind::Support => {
            let mut values = [0; SLOT_COUNT];
            values[0] = power.base;
            let values = power.buff_values.unwrap_or(values);
            let result = sheet.buffs.stack(&values, &spec.buff_tracks, config);
            if let Err(err) = &result {
                warn!(actor = %name, error = %err, "buff not applied");
            }
            return TargetOutcome::Buffed {
                target: name,
                result,
            };
        }
        ActionKind::ClearBuffs => {
            sheet.buffs.clear_buffs();
            return TargetOutcome::Cleared { target: name };
        }
        ActionKind::ClearDebuffs => {
            sheet.buffs.clear_debuffs();
            return TargetOutcome::Cleared { target: name };
        }
        ActionKind::Attack | ActionKind::Spell | ActionKind::Healing => {}
    }

    // Healing always lands once, at base power
    if spec.kind == ActionKind::Healing {
        let mut request = DamageRequest::new(power.base, spec.affinity).with_multiplier(-1.0);
        request.ignore_defense = true;
        request.resource = spec.resource;
        let report = apply_damage(sheet, stats, &request, config);
        return TargetOutcome::Hit {
            target: name,
            check: None,
            hits: vec![report],
            status: None,
        };
    }

    // One entry per landed part: whether it was critical
    let (check, landed) = if spec.auto_hit {
        (None, vec![false])
    } else {
        let check = resolve_check_with_rng(check_request, config, rng);
        let landed: Vec<bool> = check
            .parts
            .iter()
            .filter(|part| part.outcome.is_success())
            .map(|part| part.outcome.is_critical())
            .collect();
        if landed.is_empty() {
            return TargetOutcome::Missed {
                target: name,
                check,
            };
        }
        (Some(check), landed)
    };

    let multiplier = combined_multiplier(&stats.affinities, spec.affinity);
    let mut hits = Vec::with_capacity(landed.len());
    for (index, critical) in landed.into_iter().enumerate() {
        let amount = if critical { power.critical } else { power.base };
        let request = DamageRequest {
            amount,
            multiplier,
            affinity: spec.affinity,
            ignore_defense: spec.ignore_defense,
            half_defense: spec.half_defense,
            critical,
            resource: spec.resource,
        };

        // Fate is offered once, before the first hit touches anything
        if index == 0 {
            match apply_damage_with_fate(sheet, stats, &request, config, prompt).await {
                Some(report) => hits.push(report),
                None => return TargetOutcome::Skipped { target: name },
            }
        } else {
            hits.push(apply_damage(sheet, stats, &request, config));
        }
    }

    let repelled = hits.iter().any(|hit| hit.repelled);
    let status = match spec.status {
        Some(rider) if !repelled => Some(inflict_status_with_rng(
            sheet,
            stats,
            rider.status,
            rider.chance,
            rng,
        )),
        _ => None,
    };

    TargetOutcome::Hit {
        target: name,
        check,
        hits,
        status,
    }
}
