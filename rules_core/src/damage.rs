//! Damage application - defense, affinity sign, fate and status side effects

use crate::actor::ActorSheet;
use crate::affinity::{is_repelled, AffinityKey};
use crate::config::RuleConfig;
use crate::derive::DerivedStats;
use crate::prompt::{PromptPort, PromptRequest, PromptResponse, FATE_FIELD};
use crate::types::{BadStatus, ResourceKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One hit against one target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRequest {
    pub amount: i64,
    /// Affinity multiplier; negative heals
    pub multiplier: f64,
    pub affinity: AffinityKey,
    #[serde(default)]
    pub ignore_defense: bool,
    #[serde(default)]
    pub half_defense: bool,
    #[serde(default)]
    pub critical: bool,
    #[serde(default)]
    pub resource: ResourceKind,
}

impl DamageRequest {
    pub fn new(amount: i64, affinity: AffinityKey) -> Self {
        DamageRequest {
            amount,
            multiplier: 1.0,
            affinity,
            ignore_defense: false,
            half_defense: false,
            critical: false,
            resource: ResourceKind::Hp,
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }
}

/// What a hit actually did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    pub target: String,
    pub resource: ResourceKind,
    /// Defense subtracted from the hit
    pub defense: i64,
    /// Signed effective amount; negative was healing
    pub amount: i64,
    pub before: i64,
    pub after: i64,
    pub critical: bool,
    pub repelled: bool,
    pub healed: bool,
    /// Target was asleep and woke up
    pub woke: bool,
    pub fate_spent: i64,
    pub floating_text: Option<String>,
}

/// Final amount after defense and multiplier.
///
/// The multiplier's sign is kept out of the formula and restored afterwards,
/// so drain always heals.
pub fn damage_after_defense(
    amount: i64,
    multiplier: f64,
    defense: i64,
    resist_after_defense: bool,
) -> i64 {
    let magnitude = multiplier.abs();
    let value = if resist_after_defense && magnitude < 1.0 {
        (((amount - defense) as f64) * magnitude).floor() as i64
    } else {
        ((amount as f64) * magnitude).floor() as i64 - defense
    };
    let value = value.max(0);
    if multiplier < 0.0 {
        -value
    } else {
        value
    }
}

/// Defense applicable to a hit on `stats`
pub fn defense_against(stats: &DerivedStats, request: &DamageRequest, critical: bool) -> i64 {
    if request.ignore_defense || critical {
        return 0;
    }
    let defense = if request.affinity.is_physical() {
        stats.physical_defense
    } else {
        stats.magic_defense
    };
    if request.half_defense {
        defense.div_euclid(2)
    } else {
        defense
    }
}

/// Apply a hit to `target`. HP and MP never go below 0; maxima are
/// enforced by the next derivation pass.
pub fn apply_damage(
    target: &mut ActorSheet,
    stats: &DerivedStats,
    request: &DamageRequest,
    config: &RuleConfig,
) -> DamageReport {
    let exposed = target.bad_status.is_some_and(BadStatus::exposes_to_crits);
    let critical = request.critical || (exposed && request.affinity.is_physical());

    let defense = defense_against(stats, request, critical);
    let amount = damage_after_defense(
        request.amount,
        request.multiplier,
        defense,
        config.resist_after_defense,
    );

    let before = target.resources.get(request.resource);
    let after = target.adjust_resource(request.resource, -amount);

    let woke = amount > 0 && target.has_status(BadStatus::Sleep);
    if woke {
        target.bad_status = None;
    }

    let floating_text = config.show_floating_damage.then(|| floating(amount));

    debug!(
        actor = %target.name,
        amount,
        defense,
        critical,
        before,
        after,
        "damage applied"
    );

    DamageReport {
        target: target.name.clone(),
        resource: request.resource,
        defense,
        amount,
        before,
        after,
        critical,
        repelled: is_repelled(&stats.affinities, request.affinity),
        healed: amount < 0,
        woke,
        fate_spent: 0,
        floating_text,
    }
}

/// Whether `target` gets to spend fate against a hit
pub fn may_spend_fate(target: &ActorSheet, request: &DamageRequest, config: &RuleConfig) -> bool {
    (target.player_controlled || config.fate_for_npcs)
        && target.resources.fate > 0
        && request.amount > 0
        && request.multiplier > 0.0
}

/// Apply a hit, first offering the target a chance to spend fate.
///
/// Each fate point spent divides the incoming amount by two per point
/// (`amount / (points * 2)`). A cancelled prompt returns `None` and leaves
/// the target untouched.
pub async fn apply_damage_with_fate(
    target: &mut ActorSheet,
    stats: &DerivedStats,
    request: &DamageRequest,
    config: &RuleConfig,
    prompt: &dyn PromptPort,
) -> Option<DamageReport> {
    let mut request = *request;
    let mut points = 0;

    if may_spend_fate(target, &request, config) {
        let asked = PromptRequest::fate(&target.name, target.resources.fate);
        match prompt.prompt(asked).await {
            PromptResponse::Cancelled => {
                debug!(actor = %target.name, "fate prompt cancelled");
                return None;
            }
            PromptResponse::Filled(values) => {
                points = values.number(FATE_FIELD).unwrap_or(0).max(0);
            }
        }
    }

    let spent = target.spend_fate(points);
    if spent > 0 {
        request.amount = request.amount.div_euclid(spent * 2);
    }

    let mut report = apply_damage(target, stats, &request, config);
    report.fate_spent = spent;
    Some(report)
}

fn floating(amount: i64) -> String {
    match amount {
        a if a > 0 => format!("-{a}"),
        a if a < 0 => format!("+{}", -a),
        _ => "0".to_string(),
    }
}
