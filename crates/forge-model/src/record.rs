//! The canonical content record and its variant bodies.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{BackgroundContent, ClassContent, ModelError, RaceContent, RecordId, Result};

/// Which kind of content a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Class,
    Race,
    Background,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [ContentKind::Class, ContentKind::Race, ContentKind::Background];

    /// Lowercase tag used in filenames and JSON.
    pub const fn tag(self) -> &'static str {
        match self {
            ContentKind::Class => "class",
            ContentKind::Race => "race",
            ContentKind::Background => "background",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ContentKind::Class => "Class",
            ContentKind::Race => "Race",
            ContentKind::Background => "Background",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContentKind {
    type Err = ModelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ContentKind::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownKind(s.to_string()))
    }
}

/// A named entry with prose: class features, racial traits, background features.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Feature {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Variant-specific part of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentBody {
    Class(ClassContent),
    Race(RaceContent),
    Background(BackgroundContent),
}

impl ContentBody {
    pub fn empty(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Class => ContentBody::Class(ClassContent::default()),
            ContentKind::Race => ContentBody::Race(RaceContent::default()),
            ContentKind::Background => ContentBody::Background(BackgroundContent::default()),
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ContentBody::Class(_) => ContentKind::Class,
            ContentBody::Race(_) => ContentKind::Race,
            ContentBody::Background(_) => ContentKind::Background,
        }
    }
}

/// One authored class, race or background.
///
/// `id` and `created_at` are fixed at creation; `updated_at` moves forward on
/// every mutation made through [`ContentRecord::update`] or
/// [`ContentRecord::merge_patch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    pub content: ContentBody,
}

impl ContentRecord {
    /// Start an empty draft of the given kind.
    pub fn new(kind: ContentKind) -> Self {
        Self::new_at(kind, Utc::now())
    }

    pub fn new_at(kind: ContentKind, now: DateTime<Utc>) -> Self {
        Self::from_body(ContentBody::empty(kind), now)
    }

    pub fn from_body(content: ContentBody, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::generate(),
            name: String::new(),
            description: String::new(),
            created_at: now,
            updated_at: now,
            content,
        }
    }

    /// Builder-style name setter for fixtures and CLI construction.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn kind(&self) -> ContentKind {
        self.content.kind()
    }

    pub fn touch(&mut self) {
        self.touch_at(Utc::now());
    }

    pub fn touch_at(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    /// Apply an edit and refresh `updated_at`.
    pub fn update<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut Self),
    {
        edit(self);
        self.touch();
    }

    pub fn as_class(&self) -> Option<&ClassContent> {
        match &self.content {
            ContentBody::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassContent> {
        match &mut self.content {
            ContentBody::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_race(&self) -> Option<&RaceContent> {
        match &self.content {
            ContentBody::Race(race) => Some(race),
            _ => None,
        }
    }

    pub fn as_race_mut(&mut self) -> Option<&mut RaceContent> {
        match &mut self.content {
            ContentBody::Race(race) => Some(race),
            _ => None,
        }
    }

    pub fn as_background(&self) -> Option<&BackgroundContent> {
        match &self.content {
            ContentBody::Background(background) => Some(background),
            _ => None,
        }
    }

    pub fn as_background_mut(&mut self) -> Option<&mut BackgroundContent> {
        match &mut self.content {
            ContentBody::Background(background) => Some(background),
            _ => None,
        }
    }

    /// First required field this record lacks for its variant, if any.
    ///
    /// Only `name`, a class `hitDie` and a race `size` are required; every
    /// other field has a documented empty rendering.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            return Some("name");
        }
        match &self.content {
            ContentBody::Class(class) if class.hit_die.is_none() => Some("hitDie"),
            ContentBody::Race(race) if race.size.is_none() => Some("size"),
            _ => None,
        }
    }

    /// Merge a JSON merge patch (RFC 7386) into the whole record.
    pub fn merge_patch(&mut self, patch: &Value) -> Result<()> {
        self.merge_patch_at(patch, Utc::now())
    }

    pub fn merge_patch_at(&mut self, patch: &Value, now: DateTime<Utc>) -> Result<()> {
        let Value::Object(fields) = patch else {
            return Err(ModelError::PatchNotObject);
        };
        for field in ["id", "createdAt", "updatedAt"] {
            if fields.contains_key(field) {
                return Err(ModelError::ImmutableField { field });
            }
        }

        let mut merged = serde_json::to_value(&*self)?;
        apply_merge(&mut merged, patch);
        let mut merged: ContentRecord = serde_json::from_value(merged)?;
        if merged.kind() != self.kind() {
            return Err(ModelError::KindChange { from: self.kind() });
        }
        if let Some(race) = merged.as_race_mut() {
            race.clamp_entries();
        }
        merged.touch_at(now);
        *self = merged;
        Ok(())
    }
}

fn apply_merge(target: &mut Value, patch: &Value) {
    let Value::Object(patch_fields) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(target_fields) = target {
        for (key, value) in patch_fields {
            if value.is_null() {
                target_fields.remove(key);
            } else {
                apply_merge(
                    target_fields.entry(key.clone()).or_insert(Value::Null),
                    value,
                );
            }
        }
    }
}

/// Insert into an insertion-ordered set of names.
///
/// Blank values and case-insensitive duplicates are ignored. Returns whether
/// the value was added.
pub fn push_unique(list: &mut Vec<String>, value: impl Into<String>) -> bool {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() || list.iter().any(|item| item.eq_ignore_ascii_case(trimmed)) {
        return false;
    }
    list.push(trimmed.to_string());
    true
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::Ability;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn push_unique_keeps_insertion_order() {
        let mut languages = Vec::new();
        assert!(push_unique(&mut languages, "Draconic"));
        assert!(push_unique(&mut languages, "Common"));
        assert!(!push_unique(&mut languages, "common"));
        assert!(!push_unique(&mut languages, "  "));
        assert_eq!(languages, vec!["Draconic", "Common"]);
    }

    #[test]
    fn touch_never_moves_backwards() {
        let mut record = ContentRecord::new_at(ContentKind::Race, at(10));
        record.touch_at(at(9));
        assert_eq!(record.updated_at(), at(10));
        record.touch_at(at(11));
        assert_eq!(record.updated_at(), at(11));
        assert_eq!(record.created_at(), at(10));
    }

    #[test]
    fn merge_patch_updates_nested_fields() {
        let mut record = ContentRecord::new_at(ContentKind::Race, at(10)).with_name("Elf");
        let id = record.id().clone();
        record
            .merge_patch_at(
                &json!({"description": "Graceful", "content": {"race": {"speed": 35}}}),
                at(12),
            )
            .unwrap();
        assert_eq!(record.description, "Graceful");
        assert_eq!(record.as_race().unwrap().speed, 35);
        assert_eq!(record.name, "Elf");
        assert_eq!(record.id(), &id);
        assert_eq!(record.updated_at(), at(12));
    }

    #[test]
    fn merge_patch_clamps_race_entries() {
        let mut record = ContentRecord::new_at(ContentKind::Race, at(10)).with_name("Elf");
        record
            .merge_patch_at(
                &json!({"content": {"race": {
                    "speed": 7,
                    "abilityScoreIncreases": {"DEX": 2, "CON": 9},
                    "subraces": [{
                        "name": "High Elf",
                        "abilityScoreIncreases": {"INT": 3, "WIS": 3, "CHA": 200}
                    }]
                }}}),
                at(11),
            )
            .unwrap();
        let race = record.as_race().unwrap();
        assert_eq!(race.speed, 10);
        assert_eq!(race.ability_score_increases.get(Ability::Dexterity), 2);
        assert_eq!(race.ability_score_increases.get(Ability::Constitution), 3);
        let high_elf = &race.subraces[0].ability_score_increases;
        assert_eq!(high_elf.total(), 2);
        assert_eq!(high_elf.get(Ability::Intelligence), 2);
        assert_eq!(high_elf.get(Ability::Charisma), 0);
    }

    #[test]
    fn merge_patch_null_removes_optional_field() {
        let mut record = ContentRecord::new_at(ContentKind::Class, at(10)).with_name("Witch");
        record
            .merge_patch_at(&json!({"content": {"class": {"hitDie": null}}}), at(11))
            .unwrap();
        assert_eq!(record.as_class().unwrap().hit_die, None);
        assert_eq!(record.missing_required_field(), Some("hitDie"));
    }

    #[test]
    fn merge_patch_rejects_immutable_fields() {
        let mut record = ContentRecord::new_at(ContentKind::Race, at(10));
        let err = record
            .merge_patch_at(&json!({"id": "other"}), at(11))
            .unwrap_err();
        assert!(matches!(err, ModelError::ImmutableField { field: "id" }));
        assert_eq!(record.updated_at(), at(10));
    }

    #[test]
    fn merge_patch_rejects_kind_change() {
        let mut record = ContentRecord::new_at(ContentKind::Race, at(10)).with_name("Elf");
        let before = record.clone();
        let result = record.merge_patch_at(
            &json!({"content": {"race": null, "class": {"hitDie": 8}}}),
            at(11),
        );
        assert!(matches!(result, Err(ModelError::KindChange { .. })));
        assert_eq!(record, before);
    }

    #[test]
    fn merge_patch_requires_object() {
        let mut record = ContentRecord::new_at(ContentKind::Background, at(10));
        assert!(matches!(
            record.merge_patch_at(&json!([1, 2]), at(11)),
            Err(ModelError::PatchNotObject)
        ));
    }

    #[test]
    fn required_fields_per_variant() {
        let record = ContentRecord::new_at(ContentKind::Background, at(10));
        assert_eq!(record.missing_required_field(), Some("name"));

        let mut race = ContentRecord::new_at(ContentKind::Race, at(10)).with_name("Orc");
        assert_eq!(race.missing_required_field(), None);
        race.as_race_mut().unwrap().size = None;
        assert_eq!(race.missing_required_field(), Some("size"));
    }

    #[test]
    fn kind_parses_from_tag() {
        assert_eq!("Race".parse::<ContentKind>().unwrap(), ContentKind::Race);
        assert!("monster".parse::<ContentKind>().is_err());
    }
}
