//! Format-independent layout of a content record.
//!
//! Every renderer consumes a [`ContentDocument`], so section order, the
//! omission of empty sections and the `None` placeholder are decided here
//! once.

use forge_model::{
    Ability, AbilityScores, BackgroundContent, ClassContent, ContentBody, ContentKind,
    ContentRecord, Feature, RaceContent,
};

use crate::error::{RenderError, Result};

/// Placeholder for an empty collection inside a rendered section.
pub const NONE: &str = "None";

/// How ability scores are spelled in rendered output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AbilityNames {
    /// Three-letter codes (`STR`).
    #[default]
    Abbreviated,
    /// Full names (`Strength`), used for previews.
    Full,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub ability_names: AbilityNames,
}

impl RenderOptions {
    pub fn preview() -> Self {
        Self {
            ability_names: AbilityNames::Full,
        }
    }

    fn ability(self, ability: Ability) -> &'static str {
        match self.ability_names {
            AbilityNames::Abbreviated => ability.abbreviation(),
            AbilityNames::Full => ability.full_name(),
        }
    }
}

/// Smallest renderable unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `Label: value`
    Field { label: String, value: String },
    /// A paragraph.
    Text(String),
    /// Bulleted items; never empty.
    List(Vec<String>),
    /// A named entry with prose, e.g. a feature or trait.
    Entry { name: String, description: String },
    /// A nested heading with its own blocks, e.g. one feature level.
    Subsection { heading: String, blocks: Vec<Block> },
}

impl Block {
    fn field(label: &str, value: impl Into<String>) -> Self {
        Block::Field {
            label: label.to_string(),
            value: value.into(),
        }
    }

    fn entry(feature: &Feature) -> Self {
        Block::Entry {
            name: feature.name.clone(),
            description: feature.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub blocks: Vec<Block>,
}

impl Section {
    fn new(heading: &str, blocks: Vec<Block>) -> Self {
        Self {
            heading: heading.to_string(),
            blocks,
        }
    }
}

/// A record laid out as a title, optional description and ordered sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDocument {
    pub title: String,
    /// Kind label, e.g. `Race`.
    pub subtitle: String,
    pub description: Option<String>,
    pub sections: Vec<Section>,
}

impl ContentDocument {
    /// Lay out a record. Fails when the record lacks a field its kind
    /// requires; optional fields fall back to their empty rendering.
    pub fn from_record(record: &ContentRecord, options: &RenderOptions) -> Result<Self> {
        if let Some(field) = record.missing_required_field() {
            return Err(RenderError::MissingField {
                kind: record.kind(),
                field,
            });
        }
        let sections = match &record.content {
            ContentBody::Class(class) => class_sections(class, *options)?,
            ContentBody::Race(race) => race_sections(race, *options)?,
            ContentBody::Background(background) => background_sections(background),
        };
        let description = record.description.trim();
        Ok(Self {
            title: record.name.trim().to_string(),
            subtitle: record.kind().label().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            sections,
        })
    }

    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.heading == heading)
    }

    /// Names of every entry in the document, depth first.
    pub fn entry_names(&self) -> Vec<&str> {
        fn collect<'a>(blocks: &'a [Block], out: &mut Vec<&'a str>) {
            for block in blocks {
                match block {
                    Block::Entry { name, .. } => out.push(name),
                    Block::Subsection { blocks, .. } => collect(blocks, out),
                    _ => {}
                }
            }
        }
        let mut names = Vec::new();
        for section in &self.sections {
            collect(&section.blocks, &mut names);
        }
        names
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        NONE.to_string()
    } else {
        values.join(", ")
    }
}

fn abilities(values: &[Ability], options: RenderOptions) -> String {
    if values.is_empty() {
        return NONE.to_string();
    }
    values
        .iter()
        .map(|ability| options.ability(*ability))
        .collect::<Vec<_>>()
        .join(", ")
}

fn increases(scores: &AbilityScores, options: RenderOptions) -> String {
    let parts: Vec<String> = scores
        .increased()
        .map(|(ability, value)| format!("{} +{value}", options.ability(ability)))
        .collect();
    if parts.is_empty() {
        NONE.to_string()
    } else {
        parts.join(", ")
    }
}

fn class_sections(class: &ClassContent, options: RenderOptions) -> Result<Vec<Section>> {
    let hit_die = class.hit_die.ok_or(RenderError::MissingField {
        kind: ContentKind::Class,
        field: "hitDie",
    })?;
    let mut sections = vec![Section::new(
        "Class Details",
        vec![
            Block::field("Hit Die", hit_die.to_string()),
            Block::field("Primary Ability", abilities(&class.primary_ability, options)),
            Block::field("Saving Throws", abilities(&class.saving_throws, options)),
        ],
    )];

    let proficiencies = &class.proficiencies;
    let choices = &class.skill_choices;
    let has_proficiencies = !proficiencies.armor.is_empty()
        || !proficiencies.weapons.is_empty()
        || !proficiencies.tools.is_empty()
        || proficiencies.languages > 0
        || !choices.options.is_empty();
    if has_proficiencies {
        let mut blocks = vec![
            Block::field("Armor", join_or_none(&proficiencies.armor)),
            Block::field("Weapons", join_or_none(&proficiencies.weapons)),
            Block::field("Tools", join_or_none(&proficiencies.tools)),
        ];
        if proficiencies.languages > 0 {
            blocks.push(Block::field(
                "Languages",
                format!("Choose {}", proficiencies.languages),
            ));
        }
        let skills = if choices.options.is_empty() {
            NONE.to_string()
        } else {
            format!("Choose {} from {}", choices.count, choices.options.join(", "))
        };
        blocks.push(Block::field("Skills", skills));
        sections.push(Section::new("Proficiencies", blocks));
    }

    let equipment = &class.starting_equipment;
    if !equipment.is_empty() {
        let mut items: Vec<String> = equipment
            .options
            .iter()
            .map(|option| format!("(a) {} or (b) {}", option.option_a, option.option_b))
            .collect();
        items.extend(equipment.standard.iter().cloned());
        sections.push(Section::new("Equipment", vec![Block::List(items)]));
    }

    if !class.features.values().all(Vec::is_empty) {
        let levels = class
            .features
            .iter()
            .filter(|(_, features)| !features.is_empty())
            .map(|(level, features)| Block::Subsection {
                heading: format!("Level {level}"),
                blocks: features.iter().map(Block::entry).collect(),
            })
            .collect();
        sections.push(Section::new("Features", levels));
    }

    if let Some(spellcasting) = class.active_spellcasting() {
        let ability = spellcasting
            .ability
            .map_or(NONE, |ability| options.ability(ability));
        sections.push(Section::new(
            "Spellcasting",
            vec![
                Block::field("Spellcasting Ability", ability),
                Block::field("Caster Type", spellcasting.caster_type.label()),
                Block::field("Starting Level", spellcasting.start_level.to_string()),
            ],
        ));
    }
    Ok(sections)
}

fn race_sections(race: &RaceContent, options: RenderOptions) -> Result<Vec<Section>> {
    let size = race.size.ok_or(RenderError::MissingField {
        kind: ContentKind::Race,
        field: "size",
    })?;
    let mut basics = vec![
        Block::field("Size", size.as_str()),
        Block::field("Speed", format!("{} ft.", race.speed)),
        Block::field(
            "Ability Score Increases",
            increases(&race.ability_score_increases, options),
        ),
    ];
    if !race.age.maturity.trim().is_empty() {
        basics.push(Block::field("Maturity", race.age.maturity.trim()));
    }
    if !race.age.lifespan.trim().is_empty() {
        basics.push(Block::field("Lifespan", race.age.lifespan.trim()));
    }
    if !race.alignment.trim().is_empty() {
        basics.push(Block::field("Alignment", race.alignment.trim()));
    }
    if race.vision.darkvision {
        basics.push(Block::field(
            "Darkvision",
            format!("{} ft.", race.vision.range),
        ));
    }
    let mut sections = vec![Section::new("Basic Traits", basics)];

    if !race.languages.is_empty() {
        sections.push(Section::new(
            "Languages",
            vec![Block::field("Languages", race.languages.join(", "))],
        ));
    }

    if !race.traits.is_empty() {
        sections.push(Section::new(
            "Traits",
            race.traits.iter().map(Block::entry).collect(),
        ));
    }

    if !race.subraces.is_empty() {
        let subraces = race
            .subraces
            .iter()
            .map(|subrace| {
                let mut blocks = Vec::new();
                if !subrace.description.trim().is_empty() {
                    blocks.push(Block::Text(subrace.description.trim().to_string()));
                }
                blocks.push(Block::field(
                    "Ability Score Increases",
                    increases(&subrace.ability_score_increases, options),
                ));
                blocks.extend(subrace.traits.iter().map(Block::entry));
                Block::Subsection {
                    heading: subrace.name.clone(),
                    blocks,
                }
            })
            .collect();
        sections.push(Section::new("Subraces", subraces));
    }
    Ok(sections)
}

fn background_sections(background: &BackgroundContent) -> Vec<Section> {
    let mut sections = Vec::new();

    let has_proficiencies = !background.skill_proficiencies.is_empty()
        || !background.tool_proficiencies.is_empty()
        || background.languages > 0;
    if has_proficiencies {
        let mut blocks = vec![
            Block::field("Skills", join_or_none(&background.skill_proficiencies)),
            Block::field("Tools", join_or_none(&background.tool_proficiencies)),
        ];
        if background.languages > 0 {
            blocks.push(Block::field(
                "Languages",
                format!("Choose {}", background.languages),
            ));
        }
        sections.push(Section::new("Proficiencies", blocks));
    }

    if !background.equipment.is_empty() {
        sections.push(Section::new(
            "Equipment",
            vec![Block::List(background.equipment.clone())],
        ));
    }

    if let Some(feature) = &background.feature {
        sections.push(Section::new("Features", vec![Block::entry(feature)]));
    }

    let characteristics = &background.characteristics;
    if !characteristics.is_empty() {
        let groups = [
            ("Personality Traits", &characteristics.personality_traits),
            ("Ideals", &characteristics.ideals),
            ("Bonds", &characteristics.bonds),
            ("Flaws", &characteristics.flaws),
        ];
        let blocks = groups
            .into_iter()
            .map(|(heading, items)| Block::Subsection {
                heading: heading.to_string(),
                blocks: if items.is_empty() {
                    vec![Block::Text(NONE.to_string())]
                } else {
                    vec![Block::List(items.clone())]
                },
            })
            .collect();
        sections.push(Section::new("Suggested Characteristics", blocks));
    }
    sections
}
