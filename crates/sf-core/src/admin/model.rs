use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{InstitutionId, SponsorshipRequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Partial,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SponsorshipStatus {
    #[serde(rename = "Not Applied")]
    NotApplied,
    Applied,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// Institution-side status mirroring a request decision.
    pub fn as_sponsorship_status(self) -> SponsorshipStatus {
        match self {
            RequestStatus::Pending => SponsorshipStatus::Applied,
            RequestStatus::Approved => SponsorshipStatus::Approved,
            RequestStatus::Rejected => SponsorshipStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SponsorshipType {
    Full,
    Partial,
}

/// Institution as the admin screens see it. Amounts are minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: InstitutionId,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub payment_status: PaymentStatus,
    pub total_amount: u64,
    pub paid_amount: u64,
    #[serde(default)]
    pub last_payment: Option<NaiveDate>,
    pub sponsorship_status: SponsorshipStatus,
    #[serde(default)]
    pub sponsor_name: Option<String>,
    #[serde(default)]
    pub sponsored_amount: Option<u64>,
    #[serde(default)]
    pub sports: Vec<String>,
}

impl Institution {
    pub fn outstanding(&self) -> u64 {
        self.total_amount.saturating_sub(self.paid_amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipRequest {
    pub id: SponsorshipRequestId,
    pub institution_id: InstitutionId,
    pub institution_name: String,
    #[serde(rename = "type")]
    pub sponsorship_type: SponsorshipType,
    pub status: RequestStatus,
    pub requested_amount: u64,
    #[serde(default)]
    pub sponsored_amount: Option<u64>,
    #[serde(default)]
    pub sponsor_name: Option<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub submitted_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorData {
    pub sponsor_name: String,
    pub sponsored_amount: u64,
}
