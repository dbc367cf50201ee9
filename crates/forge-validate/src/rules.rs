//! Per-step validation rules.
//!
//! Entry points clamp individual values (ability increases, speed), so these
//! rules only look at presence, lengths and aggregate sums.

use std::collections::BTreeMap;

use serde::Serialize;

use forge_model::{
    BackgroundContent, ClassContent, ContentBody, ContentRecord, MAX_LEVEL, RACE_INCREASE_TOTAL,
    RaceContent,
};

use crate::step::{WizardStep, step_at};

/// Minimum description length for classes and races, counted in characters
/// after surrounding whitespace is trimmed.
pub const MIN_DESCRIPTION_LEN: usize = 20;

/// Outcome of checking one step: whether the wizard may advance, and a
/// message per offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepValidation {
    pub can_proceed: bool,
    pub errors: BTreeMap<String, String>,
}

impl StepValidation {
    pub fn passed() -> Self {
        Self::from_errors(BTreeMap::new())
    }

    fn from_errors(errors: BTreeMap<String, String>) -> Self {
        Self {
            can_proceed: errors.is_empty(),
            errors,
        }
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

/// Collects the first failure per field.
#[derive(Default)]
struct Checks {
    errors: BTreeMap<String, String>,
}

impl Checks {
    fn require(&mut self, ok: bool, field: &str, message: impl FnOnce() -> String) {
        if !ok {
            self.errors
                .entry(field.to_string())
                .or_insert_with(message);
        }
    }

    fn finish(self) -> StepValidation {
        StepValidation::from_errors(self.errors)
    }
}

/// Validate the step at `step_index` (1-based) of the record's wizard.
pub fn validate_step(step_index: usize, record: &ContentRecord) -> StepValidation {
    match step_at(record.kind(), step_index) {
        Some(step) => validate(step, record),
        None => {
            let mut checks = Checks::default();
            checks.require(false, "step", || {
                format!(
                    "{} has no step {step_index}",
                    record.kind().label().to_lowercase()
                )
            });
            checks.finish()
        }
    }
}

/// Validate one step against a record snapshot. Steps that do not apply to
/// the record's kind have no rules and pass.
pub fn validate(step: WizardStep, record: &ContentRecord) -> StepValidation {
    let mut checks = Checks::default();
    match (step, &record.content) {
        (WizardStep::BasicInfo, body) => basic_info(&mut checks, record, body),
        (WizardStep::CoreStats, ContentBody::Class(class)) => core_stats(&mut checks, class),
        (WizardStep::Proficiencies, ContentBody::Class(class)) => {
            class_proficiencies(&mut checks, class);
        }
        (WizardStep::Proficiencies, ContentBody::Background(background)) => {
            checks.require(
                !background.skill_proficiencies.is_empty(),
                "skillProficiencies",
                || "Choose at least one skill proficiency".to_string(),
            );
        }
        (WizardStep::Equipment, ContentBody::Class(class)) => {
            let complete = class.starting_equipment.options.iter().all(|option| {
                !option.option_a.trim().is_empty() && !option.option_b.trim().is_empty()
            });
            checks.require(complete, "equipment", || {
                "Every equipment choice needs both options filled in".to_string()
            });
        }
        (WizardStep::Features, ContentBody::Class(class)) => features(&mut checks, class),
        (WizardStep::Abilities, ContentBody::Race(race)) => abilities(&mut checks, race),
        (WizardStep::Languages, ContentBody::Race(race)) => {
            checks.require(!race.languages.is_empty(), "languages", || {
                "Select at least one language".to_string()
            });
        }
        (WizardStep::Details, ContentBody::Background(background)) => {
            details(&mut checks, background);
        }
        _ => {}
    }
    let result = checks.finish();
    if !result.can_proceed {
        tracing::debug!(
            step = step.title(),
            fields = ?result.errors.keys().collect::<Vec<_>>(),
            "step validation blocked"
        );
    }
    result
}

fn basic_info(checks: &mut Checks, record: &ContentRecord, body: &ContentBody) {
    checks.require(!record.name.trim().is_empty(), "name", || {
        "Name is required".to_string()
    });
    if matches!(body, ContentBody::Class(_) | ContentBody::Race(_)) {
        let length = record.description.trim().chars().count();
        checks.require(length >= MIN_DESCRIPTION_LEN, "description", || {
            format!("Description must be at least {MIN_DESCRIPTION_LEN} characters")
        });
    }
}

fn core_stats(checks: &mut Checks, class: &ClassContent) {
    checks.require(class.hit_die.is_some(), "hitDie", || {
        "Choose a hit die".to_string()
    });
    checks.require(!class.primary_ability.is_empty(), "primaryAbility", || {
        "Choose at least one primary ability".to_string()
    });
    checks.require(!class.saving_throws.is_empty(), "savingThrows", || {
        "Choose at least one saving throw proficiency".to_string()
    });
}

fn class_proficiencies(checks: &mut Checks, class: &ClassContent) {
    let choices = &class.skill_choices;
    checks.require(choices.count >= 1, "skillChoices", || {
        "Choose how many skills the class grants".to_string()
    });
    let listed = choices.options.len();
    checks.require(choices.count as usize <= listed, "skillChoices", || {
        format!(
            "Skill choice count ({}) exceeds the {listed} listed options",
            choices.count
        )
    });
}

fn features(checks: &mut Checks, class: &ClassContent) {
    let out_of_range = class
        .features
        .keys()
        .find(|level| !(1..=MAX_LEVEL).contains(*level));
    checks.require(out_of_range.is_none(), "features", || {
        format!(
            "Feature levels must be between 1 and {MAX_LEVEL} (found {})",
            out_of_range.copied().unwrap_or_default()
        )
    });
    let unnamed = class
        .features_in_order()
        .any(|(_, feature)| feature.name.trim().is_empty());
    checks.require(!unnamed, "features", || {
        "Every feature needs a name".to_string()
    });

    if let Some(spellcasting) = class.active_spellcasting() {
        checks.require(spellcasting.ability.is_some(), "spellcasting", || {
            "Choose a spellcasting ability".to_string()
        });
        checks.require(
            (1..=MAX_LEVEL).contains(&spellcasting.start_level),
            "spellcasting",
            || format!("Spellcasting must start between level 1 and {MAX_LEVEL}"),
        );
    }
}

fn abilities(checks: &mut Checks, race: &RaceContent) {
    let total = race.ability_score_increases.total();
    checks.require(RACE_INCREASE_TOTAL.contains(&total), "abilities", || {
        format!(
            "Ability score increases must total between {} and {} (currently {total})",
            RACE_INCREASE_TOTAL.start(),
            RACE_INCREASE_TOTAL.end()
        )
    });
}

fn details(checks: &mut Checks, background: &BackgroundContent) {
    let named = background
        .feature
        .as_ref()
        .is_none_or(|feature| !feature.name.trim().is_empty());
    checks.require(named, "feature", || {
        "The background feature needs a name".to_string()
    });
}

#[cfg(test)]
mod tests {
    use forge_model::{Ability, ContentKind, EquipmentOption, Feature, Spellcasting};

    use super::*;

    const LONG_DESCRIPTION: &str = "A description comfortably over twenty characters.";

    fn race() -> ContentRecord {
        ContentRecord::new(ContentKind::Race)
            .with_name("Dragonborn")
            .with_description(LONG_DESCRIPTION)
    }

    fn class() -> ContentRecord {
        ContentRecord::new(ContentKind::Class)
            .with_name("Warden")
            .with_description(LONG_DESCRIPTION)
    }

    #[test]
    fn basic_info_requires_name_and_long_description() {
        let record = ContentRecord::new(ContentKind::Race).with_description("short");
        let result = validate_step(1, &record);
        assert!(!result.can_proceed);
        assert_eq!(result.error("name"), Some("Name is required"));
        assert!(result.error("description").is_some());

        assert!(validate_step(1, &race()).can_proceed);
    }

    #[test]
    fn description_length_ignores_padding() {
        let record = race().with_description(format!("   {}   ", "x".repeat(19)));
        assert!(!validate_step(1, &record).can_proceed);
        let record = race().with_description(format!("\n{}\t", "x".repeat(20)));
        assert!(validate_step(1, &record).can_proceed);
    }

    #[test]
    fn background_basic_info_only_needs_a_name() {
        let record = ContentRecord::new(ContentKind::Background).with_name("Sage");
        assert!(validate_step(1, &record).can_proceed);
    }

    #[test]
    fn race_abilities_gate_on_total() {
        let mut record = race();
        let blocked = validate_step(2, &record);
        assert!(!blocked.can_proceed);
        assert!(blocked.error("abilities").unwrap().contains("currently 0"));

        let scores = &mut record.as_race_mut().unwrap().ability_score_increases;
        scores.set(Ability::Strength, 2);
        scores.set(Ability::Charisma, 1);
        assert!(validate_step(2, &record).can_proceed);

        scores_mut(&mut record).set(Ability::Wisdom, 1);
        assert!(!validate_step(2, &record).can_proceed);
    }

    fn scores_mut(record: &mut ContentRecord) -> &mut forge_model::AbilityScores {
        &mut record.as_race_mut().unwrap().ability_score_increases
    }

    #[test]
    fn race_languages_must_not_be_empty() {
        let mut record = race();
        assert!(validate_step(3, &record).can_proceed);
        record.as_race_mut().unwrap().languages.clear();
        assert_eq!(
            validate_step(3, &record).error("languages"),
            Some("Select at least one language")
        );
    }

    #[test]
    fn optional_race_steps_always_pass() {
        let record = ContentRecord::new(ContentKind::Race);
        for step in 4..=6 {
            assert!(validate_step(step, &record).can_proceed, "step {step}");
        }
    }

    #[test]
    fn out_of_range_step_is_blocked() {
        let result = validate_step(7, &race());
        assert!(!result.can_proceed);
        assert!(result.error("step").is_some());
        assert!(!validate_step(0, &race()).can_proceed);
    }

    #[test]
    fn class_core_stats_require_hit_die_and_abilities() {
        let mut record = class();
        record.as_class_mut().unwrap().hit_die = None;
        let result = validate_step(2, &record);
        assert_eq!(
            result.errors.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["hitDie", "primaryAbility", "savingThrows"]
        );
    }

    #[test]
    fn class_skill_count_must_fit_options() {
        let mut record = class();
        let choices = &mut record.as_class_mut().unwrap().skill_choices;
        choices.count = 2;
        choices.options = vec!["Athletics".to_string()];
        assert!(
            validate_step(3, &record)
                .error("skillChoices")
                .unwrap()
                .contains("exceeds")
        );
        record
            .as_class_mut()
            .unwrap()
            .skill_choices
            .options
            .push("Survival".to_string());
        assert!(validate_step(3, &record).can_proceed);
    }

    #[test]
    fn class_equipment_pairs_need_both_sides() {
        let mut record = class();
        record
            .as_class_mut()
            .unwrap()
            .starting_equipment
            .options
            .push(EquipmentOption::new("a longsword", " "));
        assert!(validate_step(4, &record).error("equipment").is_some());
    }

    #[test]
    fn class_features_check_levels_and_spellcasting() {
        let mut record = class();
        let class = record.as_class_mut().unwrap();
        class.add_feature(21, Feature::new("Apotheosis", "Become a god."));
        class.spellcasting = Some(Spellcasting {
            enabled: true,
            ..Spellcasting::default()
        });
        let result = validate_step(5, &record);
        assert!(result.error("features").unwrap().contains("found 21"));
        assert_eq!(
            result.error("spellcasting"),
            Some("Choose a spellcasting ability")
        );
    }

    #[test]
    fn background_steps() {
        let mut record = ContentRecord::new(ContentKind::Background).with_name("Sage");
        assert!(validate_step(2, &record).error("skillProficiencies").is_some());
        let background = record.as_background_mut().unwrap();
        background.skill_proficiencies.push("Arcana".to_string());
        background.feature = Some(Feature::new("", "Researcher"));
        assert!(validate_step(2, &record).can_proceed);
        assert!(validate_step(3, &record).error("feature").is_some());
    }
}
