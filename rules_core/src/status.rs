//! Bad-status infliction against a target's status affinities

use crate::actor::ActorSheet;
use crate::affinity::Affinity;
use crate::derive::DerivedStats;
use crate::types::BadStatus;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of an infliction attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InflictionOutcome {
    /// Null, repel or drain: no roll is made
    Immune,
    Resisted { roll: u32, tn: i64 },
    Inflicted { roll: u32, tn: i64 },
}

impl InflictionOutcome {
    pub fn landed(self) -> bool {
        matches!(self, InflictionOutcome::Inflicted { .. })
    }
}

/// Infliction target number after the status affinity, or `None` if immune
pub fn infliction_tn(chance: i64, affinity: Affinity) -> Option<i64> {
    match affinity {
        Affinity::Normal => Some(chance),
        Affinity::Weak => Some(chance * 2),
        Affinity::Resist => Some(chance.div_euclid(2)),
        Affinity::Null | Affinity::Drain | Affinity::Repel => None,
    }
}

pub fn inflict_status(
    target: &mut ActorSheet,
    stats: &DerivedStats,
    status: BadStatus,
    chance: i64,
) -> InflictionOutcome {
    let mut rng = rand::thread_rng();
    inflict_status_with_rng(target, stats, status, chance, &mut rng)
}

/// Roll `status` onto `target`. A landed status replaces whatever the
/// target had before.
pub fn inflict_status_with_rng(
    target: &mut ActorSheet,
    stats: &DerivedStats,
    status: BadStatus,
    chance: i64,
    rng: &mut impl Rng,
) -> InflictionOutcome {
    let Some(tn) = infliction_tn(chance, stats.status_affinities.get(status)) else {
        debug!(actor = %target.name, ?status, "immune to status");
        return InflictionOutcome::Immune;
    };

    let roll: u32 = rng.gen_range(1..=100);
    if (roll as i64) <= tn {
        target.bad_status = Some(status);
        debug!(actor = %target.name, ?status, roll, tn, "status inflicted");
        InflictionOutcome::Inflicted { roll, tn }
    } else {
        InflictionOutcome::Resisted { roll, tn }
    }
}
