//! The ordered derivation stages

use super::{compute_level, DerivedStats, LevelProgress, StatAccumulator};
use crate::actor::{ActorSheet, AttributeScores};
use crate::buff::BuffTotals;
use crate::config::RuleConfig;
use crate::formula::{evaluate_or_zero, FormulaContext, FormulaEvaluator};
use crate::source::sources_for;
use crate::types::{ActorKind, Attribute, BadStatus, Nature};
use tracing::debug;

/// Run every derivation stage for one actor.
///
/// The sheet is only read. Malformed formulas count as 0 (see
/// [`evaluate_or_zero`]).
pub fn derive(
    sheet: &ActorSheet,
    buffs: &BuffTotals,
    config: &RuleConfig,
    evaluator: &mut dyn FormulaEvaluator,
) -> DerivedStats {
    // Initialize
    let mut attributes = AttributeScores::from_base(&sheet.attributes);
    let mut acc = StatAccumulator::new(sheet.affinities.clone(), sheet.status_affinities.clone());

    // Equip/passive pass
    for source in sources_for(sheet) {
        source.apply(&mut acc);
    }

    // Attribute values, capped before anything reads them
    let cap = config.constants.attributes.cap;
    for attr in Attribute::all() {
        let score = attributes.get_mut(*attr);
        score.temp = acc.attribute_bonus(*attr);
        score.value = (score.base + score.temp).min(cap);
    }

    // Forced flight pins everything but agility
    if sheet.has_status(BadStatus::Fear) {
        for attr in Attribute::all() {
            if *attr != Attribute::Agility {
                attributes.get_mut(*attr).value = 1;
            }
        }
    }

    let level = match sheet.kind {
        ActorKind::Character => compute_level(&sheet.experience, &config.constants),
        ActorKind::Npc => LevelProgress {
            level: sheet.level.max(1),
            total_experience: sheet.experience.total(),
            experience_to_next: 0,
        },
    };
    let lvl = level.level as i64;

    // Target numbers
    for attr in Attribute::all() {
        let score = attributes.get_mut(*attr);
        score.tn = score.value * 5 + lvl + buffs.accuracy;
    }

    let context = FormulaContext::new()
        .with_attributes(&attributes)
        .with_level(level.level);

    let formulas = &config.formulas;
    let (physical_formula, magic_formula) = match sheet.nature {
        Nature::Human => (&formulas.human_physical_defense, &formulas.human_magic_defense),
        Nature::Demon => (&formulas.demon_physical_defense, &formulas.demon_magic_defense),
    };
    let mut eval = |formula: &str| evaluate_or_zero(evaluator, formula, &context).total.floor() as i64;

    let physical_defense = acc.physical_defense + eval(physical_formula.as_str()) + buffs.physical_defense;
    let magic_defense = acc.magic_defense + eval(magic_formula.as_str()) + buffs.magic_defense;
    let initiative = acc.initiative + eval(formulas.initiative.as_str());

    let melee_power = acc.melee_power + attributes.value(Attribute::Strength) + lvl + buffs.power;
    let ranged_level = if config.add_level_to_ranged_power { lvl } else { 0 };
    let ranged_power =
        acc.ranged_power + attributes.value(Attribute::Agility) + ranged_level + buffs.power;
    let spell_buff = if config.taru_only {
        buffs.power
    } else {
        buffs.spell_power
    };
    let spell_power = acc.spell_power + attributes.value(Attribute::Magic) + lvl + spell_buff;

    let checks = &config.constants.checks;
    let dodge_tn = checks.dodge_base + attributes.value(Attribute::Agility) + buffs.accuracy;
    let talk_tn = checks.talk_base + attributes.value(Attribute::Luck) * 2 + buffs.accuracy;

    // Resource maxima
    let boss = &config.constants.boss;
    let (hp_factor, mp_factor) = if sheet.is_boss {
        (boss.hp_factor, boss.mp_factor)
    } else {
        (1.0, 1.0)
    };
    let hp_max = scaled(eval(formulas.hp.as_str()), config.hp_multiplier * hp_factor);
    let mp_max = scaled(eval(formulas.mp.as_str()), config.mp_multiplier * mp_factor);
    let fate_max = eval(formulas.fate.as_str()).max(0);

    debug!(
        actor = %sheet.name,
        level = level.level,
        hp_max,
        mp_max,
        "derived stats"
    );

    DerivedStats {
        attributes,
        level,
        physical_defense,
        magic_defense,
        melee_power,
        ranged_power,
        spell_power,
        initiative,
        dodge_tn,
        talk_tn,
        hp_max,
        mp_max,
        fate_max,
        affinities: acc.affinities,
        status_affinities: acc.status_affinities,
        buffs: *buffs,
    }
}

fn scaled(value: i64, factor: f64) -> i64 {
    ((value as f64) * factor).floor().max(0.0) as i64
}

impl ActorSheet {
    /// Derive stats and clamp current HP, MP and fate to the new maxima
    pub fn prepare(
        &mut self,
        buffs: &BuffTotals,
        config: &RuleConfig,
        evaluator: &mut dyn FormulaEvaluator,
    ) -> DerivedStats {
        let derived = derive(self, buffs, config, evaluator);
        let resources = &mut self.resources;
        resources.hp = resources.hp.min(derived.hp_max);
        resources.mp = resources.mp.min(derived.mp_max);
        resources.fate = resources.fate.min(derived.fate_max);
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Experience, Item, ItemKind, StatBonuses};
    use crate::affinity::{Affinity, AffinityKey, AffinityOverride};
    use crate::formula::DiceEvaluator;

    fn hero() -> ActorSheet {
        let mut sheet = ActorSheet::new("Yu", ActorKind::Character);
        sheet.attributes.strength = 7;
        sheet.attributes.magic = 8;
        sheet.attributes.vitality = 10;
        sheet.attributes.agility = 6;
        sheet.attributes.luck = 4;
        sheet.experience = Experience {
            tier_one: 0,
            tier_two: 10,
            tier_three: 0,
        };
        sheet
    }

    fn run(sheet: &ActorSheet, buffs: &BuffTotals, config: &RuleConfig) -> DerivedStats {
        derive(sheet, buffs, config, &mut DiceEvaluator::seeded(1))
    }

    #[test]
    fn test_default_formulas() {
        let stats = run(&hero(), &BuffTotals::default(), &RuleConfig::default());

        assert_eq!(stats.level.level, 2);
        assert_eq!(stats.physical_defense, 5);
        assert_eq!(stats.magic_defense, 4);
        assert_eq!(stats.initiative, 8);
        assert_eq!(stats.melee_power, 9);
        assert_eq!(stats.ranged_power, 6);
        assert_eq!(stats.spell_power, 10);
        assert_eq!(stats.dodge_tn, 16);
        assert_eq!(stats.talk_tn, 28);
        // 10 * 5 + 2 * 2 + 20
        assert_eq!(stats.hp_max, 74);
        // 8 * 3 + 2 + 10
        assert_eq!(stats.mp_max, 36);
        assert_eq!(stats.fate_max, 2);
        assert_eq!(stats.tn(Attribute::Strength), 37);
    }

    #[test]
    fn test_check_tn_includes_level_and_accuracy() {
        let mut sheet = ActorSheet::new("Pixie", ActorKind::Npc);
        sheet.level = 5;
        sheet.attributes.vitality = 10;
        let buffs = BuffTotals {
            accuracy: 3,
            ..Default::default()
        };

        let stats = run(&sheet, &buffs, &RuleConfig::default());
        assert_eq!(stats.tn(Attribute::Vitality), 58);
    }

    #[test]
    fn test_equipment_bonus_and_cap() {
        let mut sheet = hero();
        sheet.attributes.strength = 38;
        sheet.items.push(Item::new("Power Belt", ItemKind::Armor).with_bonuses(StatBonuses {
            strength: 5,
            physical_defense: 3,
            ..Default::default()
        }));
        let mut spare = Item::new("Spare Vest", ItemKind::Armor).with_bonuses(StatBonuses {
            physical_defense: 50,
            ..Default::default()
        });
        spare.equipped = false;
        sheet.items.push(spare);

        let stats = run(&sheet, &BuffTotals::default(), &RuleConfig::default());
        let strength = stats.attributes.get(Attribute::Strength);
        assert_eq!(strength.temp, 5);
        assert_eq!(strength.value, 40);
        assert_eq!(stats.physical_defense, 8);
    }

    #[test]
    fn test_passive_affinity_reaches_snapshot() {
        let mut sheet = hero();
        sheet.affinities.set(AffinityKey::Fire, Affinity::Weak);
        sheet.items.push(
            Item::new("Fire Wall", ItemKind::Passive)
                .with_affinities(AffinityOverride::new().with(AffinityKey::Fire, Affinity::Null)),
        );

        let stats = run(&sheet, &BuffTotals::default(), &RuleConfig::default());
        assert_eq!(stats.affinities.get(AffinityKey::Fire), Affinity::Null);
        // The sheet keeps its own table
        assert_eq!(sheet.affinities.get(AffinityKey::Fire), Affinity::Weak);
    }

    #[test]
    fn test_forced_flight_feeds_same_pass() {
        let mut sheet = hero();
        sheet.bad_status = Some(BadStatus::Fear);

        let stats = run(&sheet, &BuffTotals::default(), &RuleConfig::default());
        assert_eq!(stats.value(Attribute::Strength), 1);
        assert_eq!(stats.value(Attribute::Agility), 6);
        assert_eq!(stats.tn(Attribute::Strength), 5 + 2);
        assert_eq!(stats.tn(Attribute::Agility), 30 + 2);
        assert_eq!(stats.melee_power, 1 + 2);
    }

    #[test]
    fn test_buff_totals_and_toggles() {
        let buffs = BuffTotals {
            accuracy: 0,
            power: 4,
            physical_defense: 2,
            magic_defense: 1,
            spell_power: 7,
        };
        let mut config = RuleConfig::default();

        let stats = run(&hero(), &buffs, &config);
        assert_eq!(stats.melee_power, 9 + 4);
        assert_eq!(stats.spell_power, 10 + 7);
        assert_eq!(stats.physical_defense, 5 + 2);
        assert_eq!(stats.magic_defense, 4 + 1);

        config.taru_only = true;
        config.add_level_to_ranged_power = true;
        let stats = run(&hero(), &buffs, &config);
        assert_eq!(stats.spell_power, 10 + 4);
        assert_eq!(stats.ranged_power, 6 + 2 + 4);
    }

    #[test]
    fn test_boss_and_multipliers() {
        let mut sheet = hero();
        sheet.is_boss = true;
        let config = RuleConfig {
            hp_multiplier: 1.5,
            ..Default::default()
        };

        let stats = run(&sheet, &BuffTotals::default(), &config);
        // floor(74 * 1.5 * 5)
        assert_eq!(stats.hp_max, 555);
        assert_eq!(stats.mp_max, 72);
    }

    #[test]
    fn test_bad_formula_counts_as_zero() {
        let mut config = RuleConfig::default();
        config.formulas.human_physical_defense = "vitality +".to_string();
        config.formulas.initiative = "charisma".to_string();

        let stats = run(&hero(), &BuffTotals::default(), &config);
        assert_eq!(stats.physical_defense, 0);
        assert_eq!(stats.initiative, 0);
        assert_eq!(stats.magic_defense, 4);
    }

    #[test]
    fn test_demon_formulas() {
        let mut sheet = hero();
        sheet.nature = Nature::Demon;
        let stats = run(&sheet, &BuffTotals::default(), &RuleConfig::default());
        assert_eq!(stats.physical_defense, 10);
        assert_eq!(stats.magic_defense, 9);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let sheet = hero();
        let buffs = BuffTotals {
            accuracy: 2,
            ..Default::default()
        };
        let config = RuleConfig::default();
        assert_eq!(run(&sheet, &buffs, &config), run(&sheet, &buffs, &config));
    }

    #[test]
    fn test_prepare_clamps_current_resources() {
        let mut sheet = hero();
        sheet.resources.hp = 500;
        sheet.resources.mp = 3;
        sheet.resources.fate = 9;

        let stats = sheet.prepare(
            &BuffTotals::default(),
            &RuleConfig::default(),
            &mut DiceEvaluator::seeded(1),
        );
        assert_eq!(sheet.resources.hp, stats.hp_max);
        assert_eq!(sheet.resources.mp, 3);
        assert_eq!(sheet.resources.fate, 2);
    }
}
