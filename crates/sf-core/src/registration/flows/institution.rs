//! Four-step institution registration.

use serde::{Deserialize, Serialize};

use super::payload::InstitutionRegistrationPayload;
use crate::registration::fees::{FeeBreakdown, FeeSchedule};
use crate::registration::records::{
    ContactPerson, InstitutionDetails, ReviewConfirmation, SportsSelection,
};
use crate::registration::step::{RegistrationFlow, StepRecord};
use crate::registration::validation::{FieldError, FlowContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstitutionStep {
    Details,
    ContactPerson,
    Sports,
    Review,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstitutionInput {
    Details(InstitutionDetails),
    ContactPerson(ContactPerson),
    Sports(SportsSelection),
    Review(ReviewConfirmation),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionDraft {
    pub details: Option<InstitutionDetails>,
    pub contact_person: Option<ContactPerson>,
    pub sports: Option<SportsSelection>,
    pub review: Option<ReviewConfirmation>,
}

impl InstitutionDraft {
    pub fn fee_breakdown(&self, fees: &FeeSchedule) -> FeeBreakdown {
        fees.breakdown(self.sports.as_ref().map_or(0, |s| s.sports.len()))
    }
}

pub struct InstitutionFlow;

static STEPS: &[InstitutionStep] = &[
    InstitutionStep::Details,
    InstitutionStep::ContactPerson,
    InstitutionStep::Sports,
    InstitutionStep::Review,
];

impl RegistrationFlow for InstitutionFlow {
    type Step = InstitutionStep;
    type Input = InstitutionInput;
    type Draft = InstitutionDraft;
    type Payload = InstitutionRegistrationPayload;

    const NAME: &'static str = "institution";

    fn steps() -> &'static [InstitutionStep] {
        STEPS
    }

    fn record(step: InstitutionStep) -> StepRecord {
        let (id, title, description) = match step {
            InstitutionStep::Details => (1, "Institution Details", "Name, type and registration"),
            InstitutionStep::ContactPerson => (2, "Contact Person", "Who coordinates your teams"),
            InstitutionStep::Sports => (3, "Sports", "Sports your institution enters"),
            InstitutionStep::Review => (4, "Review & Payment", "Confirm and pay"),
        };
        StepRecord {
            id,
            title,
            description,
        }
    }

    fn step_of(input: &InstitutionInput) -> InstitutionStep {
        match input {
            InstitutionInput::Details(_) => InstitutionStep::Details,
            InstitutionInput::ContactPerson(_) => InstitutionStep::ContactPerson,
            InstitutionInput::Sports(_) => InstitutionStep::Sports,
            InstitutionInput::Review(_) => InstitutionStep::Review,
        }
    }

    fn validate(
        input: &InstitutionInput,
        draft: &InstitutionDraft,
        _ctx: &FlowContext,
    ) -> Vec<FieldError> {
        match input {
            InstitutionInput::Details(step) => step.validate(),
            InstitutionInput::ContactPerson(step) => step.validate(),
            InstitutionInput::Sports(step) => step.validate(),
            InstitutionInput::Review(step) => {
                let mut errors = step.validate();
                if draft.sports.is_none() {
                    errors.push(FieldError::new("sports", "Sports selection is missing"));
                }
                errors
            }
        }
    }

    fn merge(draft: &mut InstitutionDraft, input: InstitutionInput) {
        match input {
            InstitutionInput::Details(step) => draft.details = Some(step),
            InstitutionInput::ContactPerson(step) => draft.contact_person = Some(step),
            InstitutionInput::Sports(step) => draft.sports = Some(step),
            InstitutionInput::Review(step) => draft.review = Some(step),
        }
    }

    fn payload(draft: &InstitutionDraft, fees: &FeeSchedule) -> Option<InstitutionRegistrationPayload> {
        let details = draft.details.as_ref()?;
        let contact = draft.contact_person.as_ref()?;
        let sports = draft.sports.as_ref()?;
        let institution_type = match details.institution_type.as_str() {
            "Other" => details.other_type.clone()?,
            other => other.to_string(),
        };
        Some(InstitutionRegistrationPayload {
            name: details.name.trim().to_string(),
            institution_type,
            registration_number: details.registration_number.clone(),
            email: details.email.trim().to_string(),
            phone: details.phone.clone(),
            address: details.address.clone(),
            website: details.website.clone(),
            contact_person_name: contact.name.clone(),
            contact_person_designation: contact.designation.clone(),
            contact_person_phone: contact.phone.clone(),
            contact_person_email: contact.email.clone(),
            sports: sports.sport_names(),
            payment_method: draft.review.as_ref()?.payment_method?,
            fees: draft.fee_breakdown(fees),
        })
    }

    fn submission_path() -> &'static str {
        crate::api::endpoints::INSTITUTIONS
    }
}
