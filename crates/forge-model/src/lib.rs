//! Content record model for homebrew tabletop content.
//!
//! A [`ContentRecord`] carries the fields every kind shares (id, name,
//! description, timestamps) and a [`ContentBody`] with the class, race or
//! background specific data. Every nested collection keeps insertion order so
//! renderers produce deterministic output.

pub mod ability;
pub mod background;
pub mod class;
pub mod error;
pub mod ids;
pub mod race;
pub mod record;

pub use ability::{Ability, AbilityScores, HitDie, MAX_ABILITY_INCREASE};
pub use background::{BackgroundContent, Characteristics};
pub use class::{
    CasterType, ClassContent, EquipmentOption, MAX_LEVEL, Proficiencies, SkillChoices,
    Spellcasting, StartingEquipment,
};
pub use error::{ModelError, Result};
pub use ids::RecordId;
pub use race::{
    AgeInfo, CreatureSize, RACE_INCREASE_TOTAL, RaceContent, SPEED_MAX, SPEED_MIN, SPEED_STEP,
    SUBRACE_INCREASE_MAX, Subrace, Vision,
};
pub use record::{ContentBody, ContentKind, ContentRecord, Feature, push_unique};
