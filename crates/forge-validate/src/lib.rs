//! Step validation for the content creation wizard.
//!
//! Each content kind walks a fixed table of [`WizardStep`]s. The validator
//! is pure: [`validate_step`] looks at a record snapshot and reports whether
//! the step may be left, with one message per offending field. [`Wizard`]
//! wraps a draft record and gates `next` on that result.

pub mod rules;
pub mod step;
pub mod wizard;

pub use rules::{MIN_DESCRIPTION_LEN, StepValidation, validate, validate_step};
pub use step::{WizardStep, step_at, steps_for};
pub use wizard::{Transition, Wizard, WizardError};
