//! Request bodies posted when a flow completes. Field names follow the
//! backend's snake_case schema.

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::Gender;
use crate::registration::fees::FeeBreakdown;
use crate::registration::records::{
    DocumentUploads, EmergencyContact, GuardianDetails, InstitutionAffiliation, MedicalInfo,
    ParticipationType, PaymentMethod, PersonalDetails, SportsSelection,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRegistrationPayload {
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    pub institution_name: Option<String>,
    pub student_id: String,

    pub parent_guardian_name: String,
    pub parent_phone: String,
    pub parent_email: Option<String>,

    pub emergency_contact_name: String,
    pub emergency_contact_relation: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_email: Option<String>,

    pub medical_question_1: Option<String>,
    pub medical_question_2: Option<String>,
    pub has_allergies: bool,
    pub allergies_details: Option<String>,

    pub participation_type: ParticipationType,
    pub selected_sports: Vec<String>,

    pub student_id_image: Option<String>,
    pub age_proof_image: Option<String>,
    pub profile_picture: Option<String>,

    pub payment_method: PaymentMethod,
    pub fees: FeeBreakdown,
}

/// Borrowed view over a complete student draft, shared by both student flows.
pub(crate) struct StudentParts<'a> {
    pub personal: &'a PersonalDetails,
    pub password: Option<&'a str>,
    pub affiliation: &'a InstitutionAffiliation,
    pub documents: &'a DocumentUploads,
    pub guardian: &'a GuardianDetails,
    pub emergency: &'a EmergencyContact,
    pub medical: &'a MedicalInfo,
    pub sports: &'a SportsSelection,
    pub payment_method: PaymentMethod,
    pub fees: FeeBreakdown,
}

impl StudentParts<'_> {
    pub fn into_payload(self) -> Option<StudentRegistrationPayload> {
        let personal = self.personal;
        Some(StudentRegistrationPayload {
            first_name: personal.first_name.trim().to_string(),
            middle_name: personal
                .middle_name
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            last_name: personal.last_name.trim().to_string(),
            gender: personal.gender?,
            date_of_birth: personal.date_of_birth?,
            email: personal.email.trim().to_string(),
            phone: personal.phone.trim().to_string(),
            password: self.password.map(str::to_string),
            institution_name: self.affiliation.resolved_name(),
            student_id: self.affiliation.student_id.trim().to_string(),
            parent_guardian_name: self.guardian.parent_guardian_name.clone(),
            parent_phone: self.guardian.parent_phone.clone(),
            parent_email: self.guardian.parent_email.clone(),
            emergency_contact_name: self.emergency.name.clone(),
            emergency_contact_relation: self.emergency.relation.clone(),
            emergency_contact_phone: self.emergency.phone.clone(),
            emergency_contact_email: self.emergency.email.clone(),
            medical_question_1: self.medical.medical_question_1.clone(),
            medical_question_2: self.medical.medical_question_2.clone(),
            has_allergies: self.medical.has_allergies,
            allergies_details: self
                .medical
                .has_allergies
                .then(|| self.medical.allergies_details.clone())
                .flatten(),
            participation_type: self.sports.participation_type,
            selected_sports: self.sports.sport_names(),
            student_id_image: self.documents.student_id_image.clone(),
            age_proof_image: self.documents.age_proof_image.clone(),
            profile_picture: self.documents.profile_picture.clone(),
            payment_method: self.payment_method,
            fees: self.fees,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstitutionRegistrationPayload {
    pub name: String,
    pub institution_type: String,
    pub registration_number: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub website: Option<String>,
    pub contact_person_name: String,
    pub contact_person_designation: String,
    pub contact_person_phone: String,
    pub contact_person_email: String,
    pub sports: Vec<String>,
    pub payment_method: PaymentMethod,
    pub fees: FeeBreakdown,
}
