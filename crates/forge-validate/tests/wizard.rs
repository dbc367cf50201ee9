//! Wizard flows against the in-memory store.

use proptest::prelude::*;

use forge_model::{Ability, ContentKind, ContentRecord};
use forge_store::{ContentStore, MemoryStore};
use forge_validate::{Transition, Wizard, WizardStep, validate_step};

fn dragonborn() -> ContentRecord {
    let mut record = ContentRecord::new(ContentKind::Race)
        .with_name("Dragonborn")
        .with_description(format!("A {}", "x".repeat(25)));
    let race = record.as_race_mut().unwrap();
    race.ability_score_increases.set(Ability::Strength, 2);
    race.ability_score_increases.set(Ability::Charisma, 1);
    race.languages = vec!["Common".to_string(), "Draconic".to_string()];
    record
}

#[test]
fn dragonborn_passes_the_first_three_steps() {
    let record = dragonborn();
    for step in 1..=3 {
        let result = validate_step(step, &record);
        assert!(result.can_proceed, "step {step}: {:?}", result.errors);
        assert!(result.errors.is_empty());
    }
}

#[test]
fn blocked_next_keeps_position_and_shows_errors() {
    let mut wizard = Wizard::start(ContentKind::Race);
    match wizard.next() {
        Transition::Blocked(result) => {
            assert!(result.error("name").is_some());
            assert!(result.error("description").is_some());
        }
        other => panic!("expected a blocked transition, got {other:?}"),
    }
    assert_eq!(wizard.step(), WizardStep::BasicInfo);
    assert!(wizard.errors().contains_key("name"));
}

#[test]
fn prev_is_unconditional_and_clears_errors() {
    let mut wizard = Wizard::resume(dragonborn());
    assert!(matches!(wizard.next(), Transition::Moved { .. }));
    wizard.edit(|record| {
        if let Some(race) = record.as_race_mut() {
            race.ability_score_increases = Default::default();
        }
    });
    assert!(matches!(wizard.next(), Transition::Blocked(_)));
    assert!(!wizard.errors().is_empty());

    assert_eq!(
        wizard.prev(),
        Transition::Moved {
            from: WizardStep::Abilities,
            to: WizardStep::BasicInfo
        }
    );
    assert!(wizard.errors().is_empty());
    assert_eq!(wizard.prev(), Transition::AtBoundary);
}

#[test]
fn save_creates_then_updates() {
    let mut store = MemoryStore::new();
    let mut wizard = Wizard::start(ContentKind::Race);
    let draft = dragonborn();
    wizard.edit(|record| {
        record.name = draft.name.clone();
        record.description = draft.description.clone();
        record.content = draft.content.clone();
    });
    while let Transition::Moved { .. } = wizard.next() {}
    assert!(wizard.is_last_step());
    assert_eq!(wizard.step_number(), 6);

    let id = wizard.save(&mut store).unwrap();
    assert_eq!(&id, wizard.record().id());

    wizard.edit(|record| record.name = "Dragonkin".to_string());
    let again = wizard.save(&mut store).unwrap();
    assert_eq!(again, id);
    assert_eq!(store.len(), 1);
    assert_eq!(store.read(&id).unwrap().unwrap().name, "Dragonkin");
}

proptest! {
    #[test]
    fn race_ability_step_follows_the_sum_law(
        values in proptest::collection::vec(0i32..=3, 6)
    ) {
        let mut record = dragonborn();
        let race = record.as_race_mut().unwrap();
        for (ability, value) in Ability::ALL.into_iter().zip(&values) {
            race.ability_score_increases.set(ability, *value);
        }
        let total: i32 = values.iter().sum();
        let result = validate_step(2, &record);
        prop_assert_eq!(result.can_proceed, (1..=3).contains(&total));
        if total == 0 {
            prop_assert!(result.error("abilities").is_some());
        }
    }
}
