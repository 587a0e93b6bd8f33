use std::fmt::Debug;

use serde::Serialize;

use super::fees::FeeSchedule;
use super::validation::{FieldError, FlowContext};

/// Static metadata for one screen of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub id: u8,
    pub title: &'static str,
    pub description: &'static str,
}

/// A fixed, strictly linear registration flow.
///
/// `Input` is the tagged union of per-step payloads, so a payload always
/// names the step it belongs to and no ordinal can dispatch to nothing.
pub trait RegistrationFlow {
    type Step: Copy + Eq + Debug + 'static;
    type Input: Clone + Debug;
    type Draft: Default + Clone + Debug + PartialEq;
    type Payload: Serialize;

    /// Short name used in logs and the submission endpoint lookup.
    const NAME: &'static str;

    /// Step kinds in flow order; ordinal `n` maps to `steps()[n - 1]`.
    fn steps() -> &'static [Self::Step];

    fn record(step: Self::Step) -> StepRecord;

    fn step_of(input: &Self::Input) -> Self::Step;

    fn validate(input: &Self::Input, draft: &Self::Draft, ctx: &FlowContext) -> Vec<FieldError>;

    fn merge(draft: &mut Self::Draft, input: Self::Input);

    /// Backend request body for a complete draft, `None` while any step is missing.
    fn payload(draft: &Self::Draft, fees: &FeeSchedule) -> Option<Self::Payload>;

    /// API path the payload is posted to.
    fn submission_path() -> &'static str;

    fn len() -> usize {
        Self::steps().len()
    }

    fn ordinal(step: Self::Step) -> usize {
        Self::steps()
            .iter()
            .position(|candidate| *candidate == step)
            .map(|index| index + 1)
            .unwrap_or(0)
    }

    fn step_records() -> Vec<StepRecord> {
        Self::steps().iter().map(|step| Self::record(*step)).collect()
    }
}
