//! Step sequencing engine.
//!
//! States are `1..=N` plus a terminal submitted state reachable only from `N`.
//! `go_next` is all-or-nothing per step and `go_back` never discards data.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use super::step::{RegistrationFlow, StepRecord};
use super::validation::{FieldError, FlowContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved forward to the contained ordinal.
    Advanced(usize),
    /// The final step passed validation; the draft is ready to submit.
    ReadyToSubmit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("step {step} has {} validation error(s)", .errors.len())]
    Validation { step: usize, errors: Vec<FieldError> },
    #[error("input for step {got} submitted while step {expected} is active")]
    WrongStep { expected: usize, got: usize },
    #[error("flow already submitted")]
    AlreadySubmitted,
}

impl StepError {
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            StepError::Validation { errors, .. } => errors,
            _ => &[],
        }
    }
}

pub struct Stepper<F: RegistrationFlow> {
    ctx: FlowContext,
    current: usize,
    completed: BTreeSet<usize>,
    draft: F::Draft,
    submitted: bool,
    _flow: PhantomData<F>,
}

impl<F: RegistrationFlow> std::fmt::Debug for Stepper<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stepper")
            .field("flow", &F::NAME)
            .field("current", &self.current)
            .field("completed", &self.completed)
            .field("submitted", &self.submitted)
            .finish()
    }
}

impl<F: RegistrationFlow> Stepper<F> {
    pub fn new(ctx: FlowContext) -> Self {
        Self {
            ctx,
            current: 1,
            completed: BTreeSet::new(),
            draft: F::Draft::default(),
            submitted: false,
            _flow: PhantomData,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn current_kind(&self) -> F::Step {
        F::steps()[self.current - 1]
    }

    pub fn current_record(&self) -> StepRecord {
        F::record(self.current_kind())
    }

    pub fn total_steps(&self) -> usize {
        F::len()
    }

    pub fn completed_steps(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    pub fn is_completed(&self, ordinal: usize) -> bool {
        self.completed.contains(&ordinal)
    }

    pub fn draft(&self) -> &F::Draft {
        &self.draft
    }

    pub fn context(&self) -> &FlowContext {
        &self.ctx
    }

    pub fn is_last_step(&self) -> bool {
        self.current == F::len()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Validate `input` against the active step and advance on success.
    ///
    /// On any error the step, the completed set and the draft are untouched.
    pub fn go_next(&mut self, input: F::Input) -> Result<StepOutcome, StepError> {
        if self.submitted {
            return Err(StepError::AlreadySubmitted);
        }
        let got = F::ordinal(F::step_of(&input));
        if got != self.current {
            return Err(StepError::WrongStep {
                expected: self.current,
                got,
            });
        }

        let errors = F::validate(&input, &self.draft, &self.ctx);
        if !errors.is_empty() {
            return Err(StepError::Validation {
                step: self.current,
                errors,
            });
        }

        F::merge(&mut self.draft, input);
        self.completed.insert(self.current);

        if self.current < F::len() {
            self.current += 1;
            Ok(StepOutcome::Advanced(self.current))
        } else {
            Ok(StepOutcome::ReadyToSubmit)
        }
    }

    /// Step back one screen, floored at 1. Returns the new ordinal.
    pub fn go_back(&mut self) -> usize {
        if !self.submitted && self.current > 1 {
            self.current -= 1;
        }
        self.current
    }

    /// Terminal transition after a successful submission of a complete draft.
    pub fn mark_submitted(&mut self) -> bool {
        if self.is_last_step() && self.completed.contains(&F::len()) {
            self.submitted = true;
        }
        self.submitted
    }

    pub fn payload(&self) -> Option<F::Payload> {
        F::payload(&self.draft, &self.ctx.fees)
    }
}
