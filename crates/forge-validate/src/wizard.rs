//! Step-gated editing session over one draft record.

use std::collections::BTreeMap;

use thiserror::Error;

use forge_model::{ContentKind, ContentRecord, RecordId};
use forge_store::{ContentStore, StoreError};

use crate::rules::{StepValidation, validate};
use crate::step::{WizardStep, steps_for};

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("records can only be saved from the last step (on step {current} of {total})")]
    NotOnLastStep { current: usize, total: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of asking the wizard to advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Moved { from: WizardStep, to: WizardStep },
    Blocked(StepValidation),
    AtBoundary,
}

/// Owns a draft record and the current position in its step table.
#[derive(Debug, Clone)]
pub struct Wizard {
    record: ContentRecord,
    position: usize,
    errors: BTreeMap<String, String>,
    persisted: bool,
}

impl Wizard {
    /// Start a fresh draft of `kind` on the first step.
    pub fn start(kind: ContentKind) -> Self {
        Self {
            record: ContentRecord::new(kind),
            position: 0,
            errors: BTreeMap::new(),
            persisted: false,
        }
    }

    /// Re-open a stored record for editing. Saving updates it in place.
    pub fn resume(record: ContentRecord) -> Self {
        Self {
            record,
            position: 0,
            errors: BTreeMap::new(),
            persisted: true,
        }
    }

    pub fn steps(&self) -> &'static [WizardStep] {
        steps_for(self.record.kind())
    }

    pub fn step(&self) -> WizardStep {
        self.steps()[self.position]
    }

    /// Current step, 1-based.
    pub fn step_number(&self) -> usize {
        self.position + 1
    }

    pub fn is_last_step(&self) -> bool {
        self.position + 1 == self.steps().len()
    }

    pub fn record(&self) -> &ContentRecord {
        &self.record
    }

    pub fn into_record(self) -> ContentRecord {
        self.record
    }

    /// Apply an edit to the draft and refresh its `updatedAt`.
    pub fn edit<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut ContentRecord),
    {
        self.record.update(edit);
    }

    /// Errors from the last blocked `next`.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn validate_current(&self) -> StepValidation {
        validate(self.step(), &self.record)
    }

    pub fn next(&mut self) -> Transition {
        if self.is_last_step() {
            return Transition::AtBoundary;
        }
        let result = self.validate_current();
        if !result.can_proceed {
            self.errors = result.errors.clone();
            return Transition::Blocked(result);
        }
        let from = self.step();
        self.position += 1;
        self.errors.clear();
        Transition::Moved {
            from,
            to: self.step(),
        }
    }

    /// Move back one step. Never validated; clears displayed errors.
    pub fn prev(&mut self) -> Transition {
        if self.position == 0 {
            return Transition::AtBoundary;
        }
        let from = self.step();
        self.position -= 1;
        self.errors.clear();
        Transition::Moved {
            from,
            to: self.step(),
        }
    }

    /// Hand the draft to the store. Only allowed from the last step.
    pub fn save<S>(&mut self, store: &mut S) -> Result<RecordId, WizardError>
    where
        S: ContentStore + ?Sized,
    {
        if !self.is_last_step() {
            return Err(WizardError::NotOnLastStep {
                current: self.step_number(),
                total: self.steps().len(),
            });
        }
        let id = if self.persisted {
            store.update(&self.record)?
        } else {
            store.create(&self.record)?
        };
        self.persisted = true;
        tracing::info!(id = %id, kind = %self.record.kind(), "saved record");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use forge_store::MemoryStore;

    use super::*;

    #[test]
    fn background_walks_to_preview() {
        let mut wizard = Wizard::start(ContentKind::Background);
        wizard.edit(|record| {
            record.name = "Sage".to_string();
            if let Some(background) = record.as_background_mut() {
                background.skill_proficiencies.push("Arcana".to_string());
            }
        });
        assert_eq!(
            wizard.next(),
            Transition::Moved {
                from: WizardStep::BasicInfo,
                to: WizardStep::Proficiencies
            }
        );
        wizard.next();
        wizard.next();
        assert!(wizard.is_last_step());
        assert_eq!(wizard.next(), Transition::AtBoundary);
    }

    #[test]
    fn save_requires_last_step() {
        let mut wizard = Wizard::start(ContentKind::Race);
        let mut store = MemoryStore::new();
        let err = wizard.save(&mut store).unwrap_err();
        assert!(matches!(
            err,
            WizardError::NotOnLastStep {
                current: 1,
                total: 6
            }
        ));
        assert!(store.is_empty());
    }
}
