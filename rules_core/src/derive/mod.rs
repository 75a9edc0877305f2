//! Stat derivation - turns a sheet into [`DerivedStats`]
//!
//! Stages run in a fixed order over a working [`StatAccumulator`]:
//! sources, attribute caps, status overrides, level, buffs, formulas,
//! resource maxima. Nothing a later stage computes is visible to an
//! earlier one.

mod accumulator;
mod level;
mod pipeline;
mod snapshot;

pub use accumulator::StatAccumulator;
pub use level::{compute_level, threshold, tier_multiplier, LevelProgress};
pub use pipeline::derive;
pub use snapshot::DerivedStats;

pub use crate::buff::BuffTotals;
