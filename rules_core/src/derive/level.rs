//! Level curve - cubic experience thresholds scaled by growth tier

use crate::actor::Experience;
use crate::config::RuleConstants;
use serde::{Deserialize, Serialize};

/// Result of the level computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub total_experience: u64,
    /// Experience still needed for the next level
    pub experience_to_next: u64,
}

/// Multiplier of the highest tier holding any experience
pub fn tier_multiplier(experience: &Experience, constants: &RuleConstants) -> f64 {
    let tiers = &constants.experience;
    if experience.tier_three > 0 {
        tiers.tier_three
    } else if experience.tier_two > 0 {
        tiers.tier_two
    } else {
        tiers.tier_one
    }
}

/// Experience needed to reach `level`
pub fn threshold(level: u32, multiplier: f64) -> u64 {
    let cube = (level as f64).powi(3);
    (cube * multiplier).floor() as u64
}

/// Largest level L >= 1 with `threshold(L) <= total`, stepping up from 1
pub fn compute_level(experience: &Experience, constants: &RuleConstants) -> LevelProgress {
    let total = experience.total();
    let multiplier = tier_multiplier(experience, constants);

    let mut level = 1;
    while threshold(level + 1, multiplier) <= total {
        level += 1;
    }

    LevelProgress {
        level,
        total_experience: total,
        experience_to_next: threshold(level + 1, multiplier) - total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_experience_is_level_one() {
        let progress = compute_level(&Experience::default(), &RuleConstants::default());
        assert_eq!(progress.level, 1);
        // floor(8 * 0.8)
        assert_eq!(progress.experience_to_next, 6);
    }

    #[test]
    fn test_tier_two_example() {
        let exp = Experience {
            tier_one: 4,
            tier_two: 6,
            tier_three: 0,
        };
        let progress = compute_level(&exp, &RuleConstants::default());
        assert_eq!(progress.total_experience, 10);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.experience_to_next, 17);
    }

    #[test]
    fn test_tier_one_curve() {
        // thresholds at 0.8: L2 = 6, L3 = 21, L4 = 51
        let exp = Experience {
            tier_one: 27,
            ..Default::default()
        };
        let progress = compute_level(&exp, &RuleConstants::default());
        assert_eq!(progress.level, 3);
        assert_eq!(progress.experience_to_next, 24);
    }

    #[test]
    fn test_highest_tier_wins() {
        let exp = Experience {
            tier_one: 100,
            tier_two: 0,
            tier_three: 1,
        };
        assert!((tier_multiplier(&exp, &RuleConstants::default()) - 1.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exact_threshold_reaches_level() {
        let exp = Experience {
            tier_two: 27,
            ..Default::default()
        };
        let progress = compute_level(&exp, &RuleConstants::default());
        assert_eq!(progress.level, 3);
        assert_eq!(progress.experience_to_next, 64 - 27);
    }
}
