//! Wizard steps and the per-kind step tables.

use std::fmt;

use serde::Serialize;

use forge_model::ContentKind;

/// One page of the creation wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    BasicInfo,
    CoreStats,
    Proficiencies,
    Equipment,
    Features,
    Abilities,
    Languages,
    Traits,
    Subraces,
    Details,
    Preview,
}

impl WizardStep {
    pub const fn title(self) -> &'static str {
        match self {
            WizardStep::BasicInfo => "Basic Info",
            WizardStep::CoreStats => "Core Stats",
            WizardStep::Proficiencies => "Proficiencies",
            WizardStep::Equipment => "Equipment",
            WizardStep::Features => "Features",
            WizardStep::Abilities => "Abilities",
            WizardStep::Languages => "Languages",
            WizardStep::Traits => "Traits",
            WizardStep::Subraces => "Subraces",
            WizardStep::Details => "Feature & Equipment",
            WizardStep::Preview => "Preview",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

const CLASS_STEPS: [WizardStep; 6] = [
    WizardStep::BasicInfo,
    WizardStep::CoreStats,
    WizardStep::Proficiencies,
    WizardStep::Equipment,
    WizardStep::Features,
    WizardStep::Preview,
];

const RACE_STEPS: [WizardStep; 6] = [
    WizardStep::BasicInfo,
    WizardStep::Abilities,
    WizardStep::Languages,
    WizardStep::Traits,
    WizardStep::Subraces,
    WizardStep::Preview,
];

const BACKGROUND_STEPS: [WizardStep; 4] = [
    WizardStep::BasicInfo,
    WizardStep::Proficiencies,
    WizardStep::Details,
    WizardStep::Preview,
];

/// Ordered steps of the wizard for one kind of content. The last entry is
/// always [`WizardStep::Preview`].
pub fn steps_for(kind: ContentKind) -> &'static [WizardStep] {
    match kind {
        ContentKind::Class => &CLASS_STEPS,
        ContentKind::Race => &RACE_STEPS,
        ContentKind::Background => &BACKGROUND_STEPS,
    }
}

/// Step at a 1-based index, if the index is inside the table.
pub fn step_at(kind: ContentKind, step_index: usize) -> Option<WizardStep> {
    step_index
        .checked_sub(1)
        .and_then(|position| steps_for(kind).get(position).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_ends_with_preview() {
        for kind in ContentKind::ALL {
            assert_eq!(steps_for(kind).last(), Some(&WizardStep::Preview));
            assert_eq!(steps_for(kind).first(), Some(&WizardStep::BasicInfo));
        }
    }

    #[test]
    fn race_has_six_steps() {
        assert_eq!(steps_for(ContentKind::Race).len(), 6);
        assert_eq!(step_at(ContentKind::Race, 2), Some(WizardStep::Abilities));
        assert_eq!(step_at(ContentKind::Race, 3), Some(WizardStep::Languages));
    }

    #[test]
    fn indices_are_one_based() {
        assert_eq!(step_at(ContentKind::Background, 0), None);
        assert_eq!(step_at(ContentKind::Background, 1), Some(WizardStep::BasicInfo));
        assert_eq!(step_at(ContentKind::Background, 5), None);
    }
}
