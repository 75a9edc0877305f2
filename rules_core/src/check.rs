//! Check resolution - percentile rolls against a target number

use crate::config::{CheckConstants, CritRate, RuleConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of one percentile roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckOutcome {
    CriticalSuccess,
    Success,
    Failure,
    AutomaticFailure,
    Fumble,
}

impl CheckOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, CheckOutcome::CriticalSuccess | CheckOutcome::Success)
    }

    pub fn is_critical(self) -> bool {
        self == CheckOutcome::CriticalSuccess
    }
}

/// A check to resolve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckRequest {
    pub target_number: i64,
    pub modifier: i64,
    /// Number of equal parts the target number is split into. 0 is read as 1.
    pub split: u32,
    /// Cursed actors auto-fail on a wider band
    pub cursed: bool,
}

impl CheckRequest {
    pub fn new(target_number: i64) -> Self {
        CheckRequest {
            target_number,
            modifier: 0,
            split: 1,
            cursed: false,
        }
    }

    pub fn with_modifier(mut self, modifier: i64) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn with_split(mut self, split: u32) -> Self {
        self.split = split;
        self
    }

    pub fn cursed(mut self, cursed: bool) -> Self {
        self.cursed = cursed;
        self
    }

    /// Each part's share; the remainder is dropped
    pub fn part_tn(&self) -> i64 {
        let split = self.split.max(1) as i64;
        (self.target_number + self.modifier).div_euclid(split)
    }
}

/// One rolled part of a (possibly split) check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckPart {
    pub part_tn: i64,
    pub roll: u32,
    pub outcome: CheckOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub parts: Vec<CheckPart>,
}

impl CheckResult {
    pub fn successes(&self) -> usize {
        self.parts.iter().filter(|p| p.outcome.is_success()).count()
    }

    pub fn criticals(&self) -> usize {
        self.parts.iter().filter(|p| p.outcome.is_critical()).count()
    }

    /// First part's outcome, the whole result for unsplit checks
    pub fn first(&self) -> Option<CheckOutcome> {
        self.parts.first().map(|p| p.outcome)
    }
}

/// Classify a single roll in 1..=100.
///
/// Order matters: a natural 1 is always critical, a natural 100 always a
/// fumble, and the auto-fail band beats any target number.
pub fn classify_roll(
    roll: u32,
    part_tn: i64,
    cursed: bool,
    crit_rate: CritRate,
    constants: &CheckConstants,
) -> CheckOutcome {
    let auto_fail_floor = if cursed {
        constants.cursed_auto_fail_floor
    } else {
        constants.auto_fail_floor
    };

    if roll == 1 {
        CheckOutcome::CriticalSuccess
    } else if roll >= 100 {
        CheckOutcome::Fumble
    } else if roll >= auto_fail_floor {
        CheckOutcome::AutomaticFailure
    } else if crit_rate.is_critical(roll, part_tn) {
        CheckOutcome::CriticalSuccess
    } else if (roll as i64) <= part_tn {
        CheckOutcome::Success
    } else {
        CheckOutcome::Failure
    }
}

/// Resolve a check using the thread RNG
pub fn resolve_check(request: &CheckRequest, config: &RuleConfig) -> CheckResult {
    let mut rng = rand::thread_rng();
    resolve_check_with_rng(request, config, &mut rng)
}

/// Resolve a check with a provided RNG (for deterministic testing)
pub fn resolve_check_with_rng(
    request: &CheckRequest,
    config: &RuleConfig,
    rng: &mut impl Rng,
) -> CheckResult {
    let crit_rate = config.crit_rate();
    let part_tn = request.part_tn();

    let parts = (0..request.split.max(1))
        .map(|_| {
            let roll = rng.gen_range(1..=100);
            let outcome = classify_roll(
                roll,
                part_tn,
                request.cursed,
                crit_rate,
                &config.constants.checks,
            );
            CheckPart {
                part_tn,
                roll,
                outcome,
            }
        })
        .collect();

    let result = CheckResult { parts };
    debug!(
        part_tn,
        parts = result.parts.len(),
        successes = result.successes(),
        "check resolved"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn classify(roll: u32, tn: i64, cursed: bool) -> CheckOutcome {
        classify_roll(roll, tn, cursed, CritRate::default(), &CheckConstants::default())
    }

    #[test]
    fn test_crit_band_is_inclusive() {
        assert_eq!(classify(5, 50, false), CheckOutcome::CriticalSuccess);
        assert_eq!(classify(6, 50, false), CheckOutcome::Success);
        assert_eq!(classify(50, 50, false), CheckOutcome::Success);
        assert_eq!(classify(51, 50, false), CheckOutcome::Failure);
    }

    #[test]
    fn test_natural_rolls() {
        assert_eq!(classify(1, -20, true), CheckOutcome::CriticalSuccess);
        assert_eq!(classify(100, 100, false), CheckOutcome::Fumble);
        assert_eq!(classify(100, 400, true), CheckOutcome::Fumble);
    }

    #[test]
    fn test_auto_fail_band() {
        assert_eq!(classify(96, 200, false), CheckOutcome::AutomaticFailure);
        assert_eq!(classify(95, 200, false), CheckOutcome::Success);
        assert_eq!(classify(86, 200, true), CheckOutcome::AutomaticFailure);
        assert_eq!(classify(85, 200, true), CheckOutcome::Success);
        assert_eq!(classify(99, 2000, false), CheckOutcome::AutomaticFailure);
    }

    #[test]
    fn test_custom_crit_rate() {
        let rate = CritRate::parse("1/5").unwrap();
        let constants = CheckConstants::default();
        assert_eq!(
            classify_roll(10, 50, false, rate, &constants),
            CheckOutcome::CriticalSuccess
        );
        assert_eq!(
            classify_roll(11, 50, false, rate, &constants),
            CheckOutcome::Success
        );
    }

    #[test]
    fn test_split_drops_remainder() {
        let request = CheckRequest::new(55).with_modifier(4).with_split(3);
        assert_eq!(request.part_tn(), 19);

        let mut rng = StdRng::seed_from_u64(42);
        let result = resolve_check_with_rng(&request, &RuleConfig::default(), &mut rng);
        assert_eq!(result.parts.len(), 3);
        assert!(result.parts.iter().all(|p| p.part_tn == 19));
    }

    #[test]
    fn test_zero_split_is_one_part() {
        let request = CheckRequest::new(60).with_split(0);
        let mut rng = StdRng::seed_from_u64(7);
        let result = resolve_check_with_rng(&request, &RuleConfig::default(), &mut rng);
        assert_eq!(result.parts.len(), 1);
        assert_eq!(result.parts[0].part_tn, 60);
    }

    #[test]
    fn test_seeded_checks_repeat() {
        let request = CheckRequest::new(70).with_split(2);
        let config = RuleConfig::default();
        let a = resolve_check_with_rng(&request, &config, &mut StdRng::seed_from_u64(3));
        let b = resolve_check_with_rng(&request, &config, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_parts_share_floored_tn(
            tn in -50i64..300,
            modifier in -40i64..40,
            split in 1u32..6,
            seed in any::<u64>(),
        ) {
            let request = CheckRequest::new(tn).with_modifier(modifier).with_split(split);
            let mut rng = StdRng::seed_from_u64(seed);
            let result = resolve_check_with_rng(&request, &RuleConfig::default(), &mut rng);

            prop_assert_eq!(result.parts.len(), split as usize);
            let expected = ((tn + modifier) as f64 / split as f64).floor() as i64;
            for part in &result.parts {
                prop_assert_eq!(part.part_tn, expected);
                prop_assert!((1..=100).contains(&part.roll));
            }
        }

        #[test]
        fn prop_success_implies_roll_within_tn(roll in 2u32..100, tn in -10i64..200, cursed: bool) {
            let outcome = classify(roll, tn, cursed);
            if outcome.is_success() {
                prop_assert!((roll as i64) <= tn);
            }
        }
    }
}
