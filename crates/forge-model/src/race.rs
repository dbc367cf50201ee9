use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Ability, AbilityScores, Feature, ModelError};

pub const SPEED_MIN: u32 = 10;
pub const SPEED_MAX: u32 = 60;
pub const SPEED_STEP: u32 = 5;

/// Allowed total of a race's ability score increases before it can be finalized.
pub const RACE_INCREASE_TOTAL: RangeInclusive<u32> = 1..=3;

/// Largest total a subrace may add on top of its parent race.
pub const SUBRACE_INCREASE_MAX: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceContent {
    #[serde(default)]
    pub size: Option<CreatureSize>,
    /// Walking speed in feet.
    #[serde(default = "default_speed")]
    pub speed: u32,
    #[serde(default)]
    pub ability_score_increases: AbilityScores,
    #[serde(default)]
    pub age: AgeInfo,
    #[serde(default)]
    pub alignment: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub vision: Vision,
    #[serde(default)]
    pub traits: Vec<Feature>,
    #[serde(default)]
    pub subraces: Vec<Subrace>,
}

fn default_speed() -> u32 {
    30
}

impl Default for RaceContent {
    fn default() -> Self {
        Self {
            size: Some(CreatureSize::Medium),
            speed: default_speed(),
            ability_score_increases: AbilityScores::default(),
            age: AgeInfo::default(),
            alignment: String::new(),
            languages: vec!["Common".to_string()],
            vision: Vision::default(),
            traits: Vec::new(),
            subraces: Vec::new(),
        }
    }
}

impl RaceContent {
    /// Set the walking speed, clamped to the allowed range and snapped to the step.
    pub fn set_speed(&mut self, feet: i64) -> u32 {
        let clamped = feet.clamp(i64::from(SPEED_MIN), i64::from(SPEED_MAX)) as u32;
        self.speed = clamped - clamped % SPEED_STEP;
        self.speed
    }

    /// Pull stored values back into their entry ranges: speed, the race's
    /// increases and every subrace budget.
    pub fn clamp_entries(&mut self) {
        self.set_speed(i64::from(self.speed));
        self.ability_score_increases.clamp_all();
        for subrace in &mut self.subraces {
            subrace.clamp_increases();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureSize {
    Tiny,
    Small,
    Medium,
    Large,
}

impl CreatureSize {
    pub const ALL: [CreatureSize; 4] = [
        CreatureSize::Tiny,
        CreatureSize::Small,
        CreatureSize::Medium,
        CreatureSize::Large,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CreatureSize::Tiny => "Tiny",
            CreatureSize::Small => "Small",
            CreatureSize::Medium => "Medium",
            CreatureSize::Large => "Large",
        }
    }
}

impl fmt::Display for CreatureSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreatureSize {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CreatureSize::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownSize(s.to_string()))
    }
}

/// Free-text age description, e.g. "Adult at 15" / "Up to 80 years".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeInfo {
    #[serde(default)]
    pub maturity: String,
    #[serde(default)]
    pub lifespan: String,
}

impl AgeInfo {
    pub fn is_empty(&self) -> bool {
        self.maturity.trim().is_empty() && self.lifespan.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vision {
    #[serde(default)]
    pub darkvision: bool,
    /// Darkvision range in feet; ignored when darkvision is off.
    #[serde(default)]
    pub range: u32,
}

impl Default for Vision {
    fn default() -> Self {
        Self {
            darkvision: false,
            range: 60,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subrace {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ability_score_increases: AbilityScores,
    #[serde(default)]
    pub traits: Vec<Feature>,
}

impl Subrace {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Set one subrace increase. The value is clamped so the subrace total
    /// never exceeds [`SUBRACE_INCREASE_MAX`]. Returns the stored value.
    pub fn set_increase(&mut self, ability: Ability, value: i32) -> u8 {
        let current = self.ability_score_increases.get(ability);
        let others = self.ability_score_increases.total() - u32::from(current);
        let room = SUBRACE_INCREASE_MAX.saturating_sub(others);
        let capped = value.min(room as i32);
        self.ability_score_increases.set(ability, capped)
    }

    /// Re-enter every increase in ability order, so earlier abilities keep
    /// their share of the budget.
    pub fn clamp_increases(&mut self) {
        let entered = std::mem::take(&mut self.ability_score_increases);
        for (ability, value) in entered.iter() {
            self.set_increase(ability, i32::from(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_is_clamped_and_snapped() {
        let mut race = RaceContent::default();
        assert_eq!(race.set_speed(5), 10);
        assert_eq!(race.set_speed(90), 60);
        assert_eq!(race.set_speed(33), 30);
        assert_eq!(race.set_speed(35), 35);
    }

    #[test]
    fn new_race_defaults() {
        let race = RaceContent::default();
        assert_eq!(race.size, Some(CreatureSize::Medium));
        assert_eq!(race.speed, 30);
        assert_eq!(race.languages, vec!["Common".to_string()]);
        assert_eq!(race.ability_score_increases.total(), 0);
    }

    #[test]
    fn subrace_increases_share_a_budget_of_two() {
        let mut subrace = Subrace::new("Hill Dwarf", "");
        assert_eq!(subrace.set_increase(Ability::Wisdom, 3), 2);
        assert_eq!(subrace.set_increase(Ability::Strength, 1), 0);
        assert_eq!(subrace.set_increase(Ability::Wisdom, 1), 1);
        assert_eq!(subrace.set_increase(Ability::Strength, 5), 1);
        assert_eq!(subrace.ability_score_increases.total(), 2);
    }

    #[test]
    fn size_parses_case_insensitively() {
        assert_eq!("large".parse::<CreatureSize>().unwrap(), CreatureSize::Large);
        assert!("Gargantuan".parse::<CreatureSize>().is_err());
    }
}
