//! Five-step sport registration: personal, documents, parent/medical,
//! sports, review & payment.

use serde::{Deserialize, Serialize};

use super::payload::{StudentParts, StudentRegistrationPayload};
use crate::registration::fees::{FeeBreakdown, FeeSchedule};
use crate::registration::records::{
    DocumentUploads, InstitutionAffiliation, ParentMedical, PersonalDetails, ReviewConfirmation,
    SportsSelection,
};
use crate::registration::step::{RegistrationFlow, StepRecord};
use crate::registration::validation::{FieldError, FlowContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickStep {
    Personal,
    Documents,
    ParentMedical,
    Sports,
    Review,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickPersonal {
    pub personal: PersonalDetails,
    pub affiliation: InstitutionAffiliation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuickInput {
    Personal(QuickPersonal),
    Documents(DocumentUploads),
    ParentMedical(ParentMedical),
    Sports(SportsSelection),
    Review(ReviewConfirmation),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickSportDraft {
    pub personal: Option<QuickPersonal>,
    pub documents: Option<DocumentUploads>,
    pub parent_medical: Option<ParentMedical>,
    pub sports: Option<SportsSelection>,
    pub review: Option<ReviewConfirmation>,
}

impl QuickSportDraft {
    pub fn fee_breakdown(&self, fees: &FeeSchedule) -> FeeBreakdown {
        fees.breakdown(self.sports.as_ref().map_or(0, |s| s.sports.len()))
    }
}

pub struct QuickSportFlow;

static STEPS: &[QuickStep] = &[
    QuickStep::Personal,
    QuickStep::Documents,
    QuickStep::ParentMedical,
    QuickStep::Sports,
    QuickStep::Review,
];

impl RegistrationFlow for QuickSportFlow {
    type Step = QuickStep;
    type Input = QuickInput;
    type Draft = QuickSportDraft;
    type Payload = StudentRegistrationPayload;

    const NAME: &'static str = "quick_sport";

    fn steps() -> &'static [QuickStep] {
        STEPS
    }

    fn record(step: QuickStep) -> StepRecord {
        match step {
            QuickStep::Personal => StepRecord {
                id: 1,
                title: "Personal Details",
                description: "Your name, contact and institution",
            },
            QuickStep::Documents => StepRecord {
                id: 2,
                title: "Documents",
                description: "Student ID and proof of age",
            },
            QuickStep::ParentMedical => StepRecord {
                id: 3,
                title: "Parent & Medical",
                description: "Guardian, emergency contact and medical questions",
            },
            QuickStep::Sports => StepRecord {
                id: 4,
                title: "Sports",
                description: "Pick your sports and categories",
            },
            QuickStep::Review => StepRecord {
                id: 5,
                title: "Review & Payment",
                description: "Confirm your details and pay the fee",
            },
        }
    }

    fn step_of(input: &QuickInput) -> QuickStep {
        match input {
            QuickInput::Personal(_) => QuickStep::Personal,
            QuickInput::Documents(_) => QuickStep::Documents,
            QuickInput::ParentMedical(_) => QuickStep::ParentMedical,
            QuickInput::Sports(_) => QuickStep::Sports,
            QuickInput::Review(_) => QuickStep::Review,
        }
    }

    fn validate(input: &QuickInput, draft: &QuickSportDraft, ctx: &FlowContext) -> Vec<FieldError> {
        match input {
            QuickInput::Personal(step) => {
                let mut errors = step.personal.validate(ctx);
                errors.extend(step.affiliation.validate());
                errors
            }
            QuickInput::Documents(step) => step.validate(),
            QuickInput::ParentMedical(step) => step.validate(),
            QuickInput::Sports(step) => step.validate(),
            QuickInput::Review(step) => {
                let mut errors = step.validate();
                if draft.sports.is_none() {
                    errors.push(FieldError::new("sports", "Sports selection is missing"));
                }
                errors
            }
        }
    }

    fn merge(draft: &mut QuickSportDraft, input: QuickInput) {
        match input {
            QuickInput::Personal(step) => draft.personal = Some(step),
            QuickInput::Documents(step) => draft.documents = Some(step),
            QuickInput::ParentMedical(step) => draft.parent_medical = Some(step),
            QuickInput::Sports(step) => draft.sports = Some(step),
            QuickInput::Review(step) => draft.review = Some(step),
        }
    }

    fn payload(draft: &QuickSportDraft, fees: &FeeSchedule) -> Option<StudentRegistrationPayload> {
        let personal = draft.personal.as_ref()?;
        let parent_medical = draft.parent_medical.as_ref()?;
        StudentParts {
            personal: &personal.personal,
            password: None,
            affiliation: &personal.affiliation,
            documents: draft.documents.as_ref()?,
            guardian: &parent_medical.guardian,
            emergency: &parent_medical.emergency,
            medical: &parent_medical.medical,
            sports: draft.sports.as_ref()?,
            payment_method: draft.review.as_ref()?.payment_method?,
            fees: draft.fee_breakdown(fees),
        }
        .into_payload()
    }

    fn submission_path() -> &'static str {
        crate::api::endpoints::REGISTRATIONS
    }
}
