//! Ability codes, hit dice and per-ability score increases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Largest increase a single ability may receive at the point of entry.
pub const MAX_ABILITY_INCREASE: u8 = 3;

/// The six fixed ability codes, in canonical sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    #[serde(rename = "STR")]
    Strength,
    #[serde(rename = "DEX")]
    Dexterity,
    #[serde(rename = "CON")]
    Constitution,
    #[serde(rename = "INT")]
    Intelligence,
    #[serde(rename = "WIS")]
    Wisdom,
    #[serde(rename = "CHA")]
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Three-letter code as printed on a character sheet.
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub const fn full_name(self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for Ability {
    type Err = ModelError;

    /// Accepts either the three-letter code or the full name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ability::ALL
            .into_iter()
            .find(|ability| {
                trimmed.eq_ignore_ascii_case(ability.abbreviation())
                    || trimmed.eq_ignore_ascii_case(ability.full_name())
            })
            .ok_or_else(|| ModelError::UnknownAbility(s.to_string()))
    }
}

/// Hit die sizes a class may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HitDie {
    D6,
    D8,
    D10,
    D12,
}

impl HitDie {
    pub const ALL: [HitDie; 4] = [HitDie::D6, HitDie::D8, HitDie::D10, HitDie::D12];

    pub const fn sides(self) -> u8 {
        match self {
            HitDie::D6 => 6,
            HitDie::D8 => 8,
            HitDie::D10 => 10,
            HitDie::D12 => 12,
        }
    }
}

impl TryFrom<u8> for HitDie {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        HitDie::ALL
            .into_iter()
            .find(|die| die.sides() == value)
            .ok_or(ModelError::InvalidHitDie(value))
    }
}

impl From<HitDie> for u8 {
    fn from(die: HitDie) -> Self {
        die.sides()
    }
}

impl fmt::Display for HitDie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Increase applied to each of the six abilities.
///
/// Values are clamped to `0..=MAX_ABILITY_INCREASE` by [`AbilityScores::set`];
/// aggregate limits are the validator's concern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(rename = "STR", default)]
    pub strength: u8,
    #[serde(rename = "DEX", default)]
    pub dexterity: u8,
    #[serde(rename = "CON", default)]
    pub constitution: u8,
    #[serde(rename = "INT", default)]
    pub intelligence: u8,
    #[serde(rename = "WIS", default)]
    pub wisdom: u8,
    #[serde(rename = "CHA", default)]
    pub charisma: u8,
}

impl AbilityScores {
    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// Set one ability, clamping the entered value. Returns the stored value.
    pub fn set(&mut self, ability: Ability, value: i32) -> u8 {
        let clamped = value.clamp(0, i32::from(MAX_ABILITY_INCREASE)) as u8;
        let slot = match ability {
            Ability::Strength => &mut self.strength,
            Ability::Dexterity => &mut self.dexterity,
            Ability::Constitution => &mut self.constitution,
            Ability::Intelligence => &mut self.intelligence,
            Ability::Wisdom => &mut self.wisdom,
            Ability::Charisma => &mut self.charisma,
        };
        *slot = clamped;
        clamped
    }

    /// Re-apply the entry clamp to every ability.
    pub fn clamp_all(&mut self) {
        for ability in Ability::ALL {
            self.set(ability, i32::from(self.get(ability)));
        }
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, value)| u32::from(value)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, u8)> + '_ {
        Ability::ALL.into_iter().map(|ability| (ability, self.get(ability)))
    }

    /// Abilities with a non-zero increase, in canonical order.
    pub fn increased(&self) -> impl Iterator<Item = (Ability, u8)> + '_ {
        self.iter().filter(|(_, value)| *value > 0)
    }
}
