use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Ability, Feature, HitDie};

/// Highest character level a feature may be granted at.
pub const MAX_LEVEL: u8 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassContent {
    #[serde(default)]
    pub hit_die: Option<HitDie>,
    #[serde(default)]
    pub primary_ability: Vec<Ability>,
    #[serde(default)]
    pub saving_throws: Vec<Ability>,
    #[serde(default)]
    pub proficiencies: Proficiencies,
    #[serde(default)]
    pub skill_choices: SkillChoices,
    #[serde(default)]
    pub starting_equipment: StartingEquipment,
    /// Features keyed by the level they are gained at.
    #[serde(default)]
    pub features: BTreeMap<u8, Vec<Feature>>,
    #[serde(default)]
    pub spellcasting: Option<Spellcasting>,
}

impl Default for ClassContent {
    fn default() -> Self {
        Self {
            hit_die: Some(HitDie::D8),
            primary_ability: Vec::new(),
            saving_throws: Vec::new(),
            proficiencies: Proficiencies::default(),
            skill_choices: SkillChoices::default(),
            starting_equipment: StartingEquipment::default(),
            features: BTreeMap::new(),
            spellcasting: None,
        }
    }
}

impl ClassContent {
    /// Append a feature to a level, keeping stored order within the level.
    pub fn add_feature(&mut self, level: u8, feature: Feature) {
        self.features.entry(level).or_default().push(feature);
    }

    /// All features in ascending level order.
    pub fn features_in_order(&self) -> impl Iterator<Item = (u8, &Feature)> {
        self.features
            .iter()
            .flat_map(|(level, features)| features.iter().map(move |feature| (*level, feature)))
    }

    pub fn feature_count(&self) -> usize {
        self.features.values().map(Vec::len).sum()
    }

    /// Spellcasting block, only when it is switched on.
    pub fn active_spellcasting(&self) -> Option<&Spellcasting> {
        self.spellcasting.as_ref().filter(|spellcasting| spellcasting.enabled)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proficiencies {
    #[serde(default)]
    pub armor: Vec<String>,
    #[serde(default)]
    pub weapons: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    /// Number of extra languages granted; zero means none.
    #[serde(default)]
    pub languages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillChoices {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub options: Vec<String>,
}

impl Default for SkillChoices {
    fn default() -> Self {
        Self {
            count: 2,
            options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartingEquipment {
    #[serde(default)]
    pub standard: Vec<String>,
    #[serde(default)]
    pub options: Vec<EquipmentOption>,
}

impl StartingEquipment {
    pub fn is_empty(&self) -> bool {
        self.standard.is_empty() && self.options.is_empty()
    }
}

/// A choice between two equipment packages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentOption {
    pub option_a: String,
    pub option_b: String,
}

impl EquipmentOption {
    pub fn new(option_a: impl Into<String>, option_b: impl Into<String>) -> Self {
        Self {
            option_a: option_a.into(),
            option_b: option_b.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spellcasting {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub ability: Option<Ability>,
    #[serde(rename = "type", default)]
    pub caster_type: CasterType,
    #[serde(default = "default_start_level")]
    pub start_level: u8,
}

fn default_start_level() -> u8 {
    1
}

impl Default for Spellcasting {
    fn default() -> Self {
        Self {
            enabled: false,
            ability: None,
            caster_type: CasterType::default(),
            start_level: default_start_level(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasterType {
    #[default]
    Full,
    Half,
    Third,
    Pact,
}

impl CasterType {
    pub const fn label(self) -> &'static str {
        match self {
            CasterType::Full => "Full Caster",
            CasterType::Half => "Half Caster",
            CasterType::Third => "Third Caster",
            CasterType::Pact => "Pact Magic",
        }
    }
}

impl fmt::Display for CasterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_iterate_by_ascending_level_then_insertion() {
        let mut class = ClassContent::default();
        class.add_feature(3, Feature::new("Subclass", "Pick a path."));
        class.add_feature(1, Feature::new("Rage", "Enter a rage."));
        class.add_feature(1, Feature::new("Unarmored Defense", "AC bonus."));
        let names: Vec<_> = class
            .features_in_order()
            .map(|(level, feature)| (level, feature.name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![(1, "Rage"), (1, "Unarmored Defense"), (3, "Subclass")]
        );
        assert_eq!(class.feature_count(), 3);
    }

    #[test]
    fn disabled_spellcasting_is_not_active() {
        let mut class = ClassContent::default();
        class.spellcasting = Some(Spellcasting::default());
        assert!(class.active_spellcasting().is_none());
        class.spellcasting.as_mut().unwrap().enabled = true;
        assert!(class.active_spellcasting().is_some());
    }

    #[test]
    fn feature_levels_serialize_as_string_keys() {
        let mut class = ClassContent::default();
        class.add_feature(2, Feature::new("Action Surge", "Act again."));
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["features"]["2"][0]["name"], "Action Surge");
        let back: ClassContent = serde_json::from_value(json).unwrap();
        assert_eq!(back, class);
    }
}
