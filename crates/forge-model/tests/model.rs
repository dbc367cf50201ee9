//! Integration tests for the content record JSON shape.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_json::json;

use forge_model::{
    Ability, ContentKind, ContentRecord, CreatureSize, Feature, HitDie, RaceContent, Subrace,
};

fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

#[test]
fn record_serializes_with_camel_case_and_variant_tag() {
    let mut record = ContentRecord::new_at(ContentKind::Class, fixed_time()).with_name("Warden");
    let class = record.as_class_mut().unwrap();
    class.hit_die = Some(HitDie::D10);
    class.primary_ability = vec![Ability::Strength, Ability::Wisdom];
    class.add_feature(1, Feature::new("Vigil", "You do not sleep."));

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["name"], "Warden");
    assert_eq!(json["createdAt"], "2024-01-15T12:00:00Z");
    assert_eq!(json["content"]["class"]["hitDie"], 10);
    assert_eq!(json["content"]["class"]["primaryAbility"], json!(["STR", "WIS"]));
    assert_eq!(
        json["content"]["class"]["features"]["1"][0]["name"],
        "Vigil"
    );
}

#[test]
fn record_without_hit_die_parses_as_missing() {
    let json = json!({
        "id": "abc",
        "name": "Witch",
        "description": "",
        "createdAt": "2024-01-15T12:00:00Z",
        "updatedAt": "2024-01-15T12:00:00Z",
        "content": {"class": {}}
    });
    let record: ContentRecord = serde_json::from_value(json).unwrap();
    assert_eq!(record.id().as_str(), "abc");
    assert_eq!(record.as_class().unwrap().hit_die, None);
    assert_eq!(record.missing_required_field(), Some("hitDie"));
}

#[test]
fn update_refreshes_updated_at() {
    let mut record = ContentRecord::new_at(ContentKind::Race, fixed_time());
    record.update(|record| record.name = "Tiefling".to_string());
    assert_eq!(record.name, "Tiefling");
    assert!(record.updated_at() > fixed_time());
    assert_eq!(record.created_at(), fixed_time());
}

#[test]
fn subrace_keeps_its_own_increases() {
    let mut record = ContentRecord::new_at(ContentKind::Race, fixed_time()).with_name("Elf");
    let race = record.as_race_mut().unwrap();
    race.size = Some(CreatureSize::Medium);
    let mut high_elf = Subrace::new("High Elf", "Keen minds.");
    high_elf.ability_score_increases.set(Ability::Intelligence, 1);
    race.subraces.push(high_elf);

    let json = serde_json::to_string(&record).unwrap();
    let back: ContentRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
    assert_eq!(
        back.as_race().unwrap().subraces[0]
            .ability_score_increases
            .get(Ability::Intelligence),
        1
    );
}

proptest! {
    #[test]
    fn speed_entry_always_lands_on_a_legal_value(feet in -100i64..200) {
        let mut race = RaceContent::default();
        let speed = race.set_speed(feet);
        prop_assert!((10..=60).contains(&speed));
        prop_assert_eq!(speed % 5, 0);
    }

    #[test]
    fn ability_entry_is_clamped(value in -50i32..50) {
        let mut record = ContentRecord::new_at(ContentKind::Race, fixed_time());
        let race = record.as_race_mut().unwrap();
        let stored = race.ability_score_increases.set(Ability::Dexterity, value);
        prop_assert!(stored <= 3);
    }
}
