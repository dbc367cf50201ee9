use serde::{Deserialize, Serialize};

use crate::Feature;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundContent {
    #[serde(default)]
    pub skill_proficiencies: Vec<String>,
    #[serde(default)]
    pub tool_proficiencies: Vec<String>,
    /// Number of extra languages granted; zero means none.
    #[serde(default)]
    pub languages: u32,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub feature: Option<Feature>,
    #[serde(default)]
    pub characteristics: Characteristics,
}

/// Suggested roleplaying prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Characteristics {
    #[serde(default)]
    pub personality_traits: Vec<String>,
    #[serde(default)]
    pub ideals: Vec<String>,
    #[serde(default)]
    pub bonds: Vec<String>,
    #[serde(default)]
    pub flaws: Vec<String>,
}

impl Characteristics {
    pub fn is_empty(&self) -> bool {
        self.personality_traits.is_empty()
            && self.ideals.is_empty()
            && self.bonds.is_empty()
            && self.flaws.is_empty()
    }
}
