//! One record type per registration step.
//!
//! Each record owns its fields until the stepper merges it into a draft.
//! Required-vs-optional is expressed in the types where the form allows it;
//! text inputs stay `String` because an empty input is a user fact the rules
//! have to report on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::{FieldError, FlowContext, Rules, MIN_PASSWORD_LEN};
use crate::catalog::{self, Gender, OTHER_INSTITUTE};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCredentials {
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl AccountCredentials {
    pub fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .email("email", &self.email, "Email")
            .phone("phone", &self.phone, "Phone number")
            .check(
                "password",
                self.password.chars().count() >= MIN_PASSWORD_LEN,
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            )
            .check(
                "confirmPassword",
                self.password == self.confirm_password,
                "Passwords do not match",
            )
            .finish()
    }
}

/// Outcome of the OTP round trips for the account's contact points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactVerification {
    pub email: String,
    pub email_verified: bool,
    pub phone_verified: bool,
}

impl ContactVerification {
    pub fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .check("emailOtp", self.email_verified, "Email must be verified")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub email: String,
    pub phone: String,
}

impl PersonalDetails {
    pub fn validate(&self, ctx: &FlowContext) -> Vec<FieldError> {
        let mut rules = Rules::new();
        rules
            .require("firstName", &self.first_name, "First name")
            .require("lastName", &self.last_name, "Last name")
            .require_some("gender", &self.gender, "Gender")
            .require_some("dateOfBirth", &self.date_of_birth, "Date of birth");
        if let Some(dob) = self.date_of_birth {
            rules.check(
                "dateOfBirth",
                dob <= ctx.today,
                "Date of birth cannot be in the future",
            );
        }
        rules
            .email("email", &self.email, "Email")
            .phone("phone", &self.phone, "Phone number")
            .finish()
    }

    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.trim()),
            self.middle_name.as_deref().map(str::trim),
            Some(self.last_name.trim()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Which institute the student belongs to.
///
/// `institute` holds a catalog entry; picking [`OTHER_INSTITUTE`] makes
/// `institution_name` mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionAffiliation {
    pub institute: String,
    pub institution_name: Option<String>,
    pub student_id: String,
}

impl InstitutionAffiliation {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut rules = Rules::new();
        rules.require("institute", &self.institute, "Institution");
        if self.institute == OTHER_INSTITUTE {
            rules.require_opt(
                "institutionName",
                self.institution_name.as_deref(),
                "Institution name",
            );
        }
        rules
            .require("studentId", &self.student_id, "Student ID")
            .finish()
    }

    pub fn resolved_name(&self) -> Option<String> {
        if self.institute == OTHER_INSTITUTE {
            self.institution_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        } else if self.institute.trim().is_empty() {
            None
        } else {
            Some(self.institute.trim().to_string())
        }
    }
}

const ALLOWED_DOCUMENT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

/// References to documents already handed to the upload boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUploads {
    pub student_id_image: Option<String>,
    pub age_proof_image: Option<String>,
    pub profile_picture: Option<String>,
}

impl DocumentUploads {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut rules = Rules::new();
        rules
            .require_opt("studentIdImage", self.student_id_image.as_deref(), "Student ID image")
            .require_opt("ageProofImage", self.age_proof_image.as_deref(), "Age proof document");
        for (field, value) in [
            ("studentIdImage", &self.student_id_image),
            ("ageProofImage", &self.age_proof_image),
            ("profilePicture", &self.profile_picture),
        ] {
            if let Some(name) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                rules.check(
                    field,
                    has_allowed_extension(name),
                    "Only JPG, PNG or PDF files are accepted",
                );
            }
        }
        rules.finish()
    }
}

fn has_allowed_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_DOCUMENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianDetails {
    pub parent_guardian_name: String,
    pub parent_phone: String,
    pub parent_email: Option<String>,
}

impl GuardianDetails {
    pub fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .require("parentGuardianName", &self.parent_guardian_name, "Parent/guardian name")
            .phone("parentPhone", &self.parent_phone, "Parent phone")
            .optional_email("parentEmail", self.parent_email.as_deref(), "Parent email")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub relation: String,
    pub phone: String,
    pub email: Option<String>,
}

impl EmergencyContact {
    pub fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .require("emergencyContactName", &self.name, "Emergency contact name")
            .require("emergencyContactRelation", &self.relation, "Relation")
            .phone("emergencyContactPhone", &self.phone, "Emergency contact phone")
            .optional_email("emergencyContactEmail", self.email.as_deref(), "Emergency contact email")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalInfo {
    pub medical_question_1: Option<String>,
    pub medical_question_2: Option<String>,
    pub has_allergies: bool,
    pub allergies_details: Option<String>,
}

impl MedicalInfo {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut rules = Rules::new();
        rules
            .require_opt("medicalQuestion1", self.medical_question_1.as_deref(), "Medical question 1")
            .require_opt("medicalQuestion2", self.medical_question_2.as_deref(), "Medical question 2");
        if self.has_allergies {
            rules.require_opt(
                "allergiesDetails",
                self.allergies_details.as_deref(),
                "Allergy details",
            );
        }
        rules.finish()
    }
}

/// Guardian, emergency contact and medical answers collected on one screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentMedical {
    pub guardian: GuardianDetails,
    pub emergency: EmergencyContact,
    pub medical: MedicalInfo,
}

impl ParentMedical {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = self.guardian.validate();
        errors.extend(self.emergency.validate());
        errors.extend(self.medical.validate());
        errors
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParticipationType {
    #[default]
    Individual,
    Team,
    Both,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportChoice {
    pub sport: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

impl SportChoice {
    pub fn new(sport: impl Into<String>) -> Self {
        Self {
            sport: sport.into(),
            ..Default::default()
        }
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn in_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportsSelection {
    pub participation_type: ParticipationType,
    pub sports: Vec<SportChoice>,
}

impl SportsSelection {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut rules = Rules::new();
        rules.check("sports", !self.sports.is_empty(), "Select at least one sport");

        let mut seen = Vec::with_capacity(self.sports.len());
        for choice in &self.sports {
            let Some(sport) = catalog::find_sport(&choice.sport) else {
                rules.check("sports", false, format!("Unknown sport: {}", choice.sport));
                continue;
            };
            rules.check(
                "sports",
                !seen.contains(&sport.name),
                format!("{} is selected more than once", sport.name),
            );
            seen.push(sport.name);

            if let Some(category) = choice.category.as_deref() {
                let known = catalog::categories_for_sport(sport.name).contains(&category);
                rules.check(
                    "category",
                    known,
                    format!("{} has no category {}", sport.name, category),
                );
                if let (true, Some(sub)) = (known, choice.subcategory.as_deref()) {
                    rules.check(
                        "subcategory",
                        catalog::subcategories_for(sport.name, category).contains(&sub),
                        format!("{} {} has no sub-category {}", sport.name, category, sub),
                    );
                }
            }
        }
        rules.finish()
    }

    pub fn sport_names(&self) -> Vec<String> {
        self.sports.iter().map(|c| c.sport.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Upi,
    BankTransfer,
    Sponsorship,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewConfirmation {
    pub accept_terms: bool,
    pub payment_method: Option<PaymentMethod>,
}

impl ReviewConfirmation {
    pub fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .check("acceptTerms", self.accept_terms, "You must accept the terms and conditions")
            .require_some("paymentMethod", &self.payment_method, "Payment method")
            .finish()
    }
}

pub const INSTITUTION_TYPES: &[&str] = &["School", "College", "University", "Academy", "Club", "Other"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionDetails {
    pub name: String,
    pub institution_type: String,
    pub other_type: Option<String>,
    pub registration_number: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub website: Option<String>,
}

impl InstitutionDetails {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut rules = Rules::new();
        rules
            .require("name", &self.name, "Institution name")
            .require("institutionType", &self.institution_type, "Institution type");
        if !self.institution_type.trim().is_empty() {
            rules.check(
                "institutionType",
                INSTITUTION_TYPES.contains(&self.institution_type.as_str()),
                format!("Unknown institution type: {}", self.institution_type),
            );
        }
        if self.institution_type == "Other" {
            rules.require_opt("otherType", self.other_type.as_deref(), "Institution type name");
        }
        rules
            .require("registrationNumber", &self.registration_number, "Registration number")
            .email("email", &self.email, "Institution email")
            .phone("phone", &self.phone, "Institution phone")
            .require("address", &self.address, "Address")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPerson {
    pub name: String,
    pub designation: String,
    pub phone: String,
    pub email: String,
}

impl ContactPerson {
    pub fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .require("contactPersonName", &self.name, "Contact person name")
            .require("designation", &self.designation, "Designation")
            .phone("contactPersonPhone", &self.phone, "Contact person phone")
            .email("contactPersonEmail", &self.email, "Contact person email")
            .finish()
    }
}
