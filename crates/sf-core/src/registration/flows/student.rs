//! Full ten-step student registration, from account creation to payment.

use serde::{Deserialize, Serialize};

use super::payload::{StudentParts, StudentRegistrationPayload};
use crate::registration::fees::{FeeBreakdown, FeeSchedule};
use crate::registration::records::{
    AccountCredentials, ContactVerification, DocumentUploads, EmergencyContact, GuardianDetails,
    InstitutionAffiliation, MedicalInfo, PersonalDetails, ReviewConfirmation, SportsSelection,
};
use crate::registration::step::{RegistrationFlow, StepRecord};
use crate::registration::validation::{FieldError, FlowContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentStep {
    Account,
    Verification,
    Personal,
    Institution,
    Documents,
    Guardian,
    EmergencyContact,
    Medical,
    Sports,
    Review,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StudentInput {
    Account(AccountCredentials),
    Verification(ContactVerification),
    Personal(PersonalDetails),
    Institution(InstitutionAffiliation),
    Documents(DocumentUploads),
    Guardian(GuardianDetails),
    EmergencyContact(EmergencyContact),
    Medical(MedicalInfo),
    Sports(SportsSelection),
    Review(ReviewConfirmation),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    pub account: Option<AccountCredentials>,
    pub verification: Option<ContactVerification>,
    pub personal: Option<PersonalDetails>,
    pub institution: Option<InstitutionAffiliation>,
    pub documents: Option<DocumentUploads>,
    pub guardian: Option<GuardianDetails>,
    pub emergency_contact: Option<EmergencyContact>,
    pub medical: Option<MedicalInfo>,
    pub sports: Option<SportsSelection>,
    pub review: Option<ReviewConfirmation>,
}

impl StudentDraft {
    pub fn fee_breakdown(&self, fees: &FeeSchedule) -> FeeBreakdown {
        fees.breakdown(self.sports.as_ref().map_or(0, |s| s.sports.len()))
    }
}

pub struct StudentFlow;

static STEPS: &[StudentStep] = &[
    StudentStep::Account,
    StudentStep::Verification,
    StudentStep::Personal,
    StudentStep::Institution,
    StudentStep::Documents,
    StudentStep::Guardian,
    StudentStep::EmergencyContact,
    StudentStep::Medical,
    StudentStep::Sports,
    StudentStep::Review,
];

impl RegistrationFlow for StudentFlow {
    type Step = StudentStep;
    type Input = StudentInput;
    type Draft = StudentDraft;
    type Payload = StudentRegistrationPayload;

    const NAME: &'static str = "student";

    fn steps() -> &'static [StudentStep] {
        STEPS
    }

    fn record(step: StudentStep) -> StepRecord {
        let (id, title, description) = match step {
            StudentStep::Account => (1, "Create Account", "Email, phone and password"),
            StudentStep::Verification => (2, "Verify Contact", "Enter the code we sent you"),
            StudentStep::Personal => (3, "Personal Details", "Name, gender and date of birth"),
            StudentStep::Institution => (4, "Institution", "Where you study"),
            StudentStep::Documents => (5, "Documents", "Student ID and proof of age"),
            StudentStep::Guardian => (6, "Parent / Guardian", "Who we contact about you"),
            StudentStep::EmergencyContact => (7, "Emergency Contact", "Reachable during the event"),
            StudentStep::Medical => (8, "Medical Information", "Health questions and allergies"),
            StudentStep::Sports => (9, "Sports Selection", "Sports, categories and age bands"),
            StudentStep::Review => (10, "Review & Payment", "Check everything and pay"),
        };
        StepRecord {
            id,
            title,
            description,
        }
    }

    fn step_of(input: &StudentInput) -> StudentStep {
        match input {
            StudentInput::Account(_) => StudentStep::Account,
            StudentInput::Verification(_) => StudentStep::Verification,
            StudentInput::Personal(_) => StudentStep::Personal,
            StudentInput::Institution(_) => StudentStep::Institution,
            StudentInput::Documents(_) => StudentStep::Documents,
            StudentInput::Guardian(_) => StudentStep::Guardian,
            StudentInput::EmergencyContact(_) => StudentStep::EmergencyContact,
            StudentInput::Medical(_) => StudentStep::Medical,
            StudentInput::Sports(_) => StudentStep::Sports,
            StudentInput::Review(_) => StudentStep::Review,
        }
    }

    fn validate(input: &StudentInput, draft: &StudentDraft, ctx: &FlowContext) -> Vec<FieldError> {
        match input {
            StudentInput::Account(step) => step.validate(),
            StudentInput::Verification(step) => step.validate(),
            StudentInput::Personal(step) => step.validate(ctx),
            StudentInput::Institution(step) => step.validate(),
            StudentInput::Documents(step) => step.validate(),
            StudentInput::Guardian(step) => step.validate(),
            StudentInput::EmergencyContact(step) => step.validate(),
            StudentInput::Medical(step) => step.validate(),
            StudentInput::Sports(step) => step.validate(),
            StudentInput::Review(step) => {
                let mut errors = step.validate();
                if draft.sports.is_none() {
                    errors.push(FieldError::new("sports", "Sports selection is missing"));
                }
                errors
            }
        }
    }

    fn merge(draft: &mut StudentDraft, input: StudentInput) {
        match input {
            StudentInput::Account(step) => draft.account = Some(step),
            StudentInput::Verification(step) => draft.verification = Some(step),
            StudentInput::Personal(step) => draft.personal = Some(step),
            StudentInput::Institution(step) => draft.institution = Some(step),
            StudentInput::Documents(step) => draft.documents = Some(step),
            StudentInput::Guardian(step) => draft.guardian = Some(step),
            StudentInput::EmergencyContact(step) => draft.emergency_contact = Some(step),
            StudentInput::Medical(step) => draft.medical = Some(step),
            StudentInput::Sports(step) => draft.sports = Some(step),
            StudentInput::Review(step) => draft.review = Some(step),
        }
    }

    fn payload(draft: &StudentDraft, fees: &FeeSchedule) -> Option<StudentRegistrationPayload> {
        let account = draft.account.as_ref()?;
        draft.verification.as_ref().filter(|v| v.email_verified)?;
        StudentParts {
            personal: draft.personal.as_ref()?,
            password: Some(account.password.as_str()),
            affiliation: draft.institution.as_ref()?,
            documents: draft.documents.as_ref()?,
            guardian: draft.guardian.as_ref()?,
            emergency: draft.emergency_contact.as_ref()?,
            medical: draft.medical.as_ref()?,
            sports: draft.sports.as_ref()?,
            payment_method: draft.review.as_ref()?.payment_method?,
            fees: draft.fee_breakdown(fees),
        }
        .into_payload()
    }

    fn submission_path() -> &'static str {
        crate::api::endpoints::STUDENTS
    }
}
