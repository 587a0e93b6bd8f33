//! Signed-in identity and the records kept in durable client storage.

mod otp;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::UserId;
use crate::registration::records::{EmergencyContact, MedicalInfo};

pub use otp::{is_valid_otp_code, OtpChannel, OtpSendRequest, OtpVerifyRequest, OtpVerifyResponse};

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const STUDENT_KEY: &str = "student";
pub const ADMIN_SESSION_KEY: &str = "adminSession";

/// The currently signed-in student as cached under [`STUDENT_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthIdentity {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default, alias = "is_verified")]
    pub is_verified: bool,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "emergency_contact")]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(default, alias = "medical_info")]
    pub medical_info: Option<MedicalInfo>,
}

impl AuthIdentity {
    /// Identity used when the profile endpoint is unavailable right after login.
    pub fn minimal(id: Option<UserId>, email: &str) -> Self {
        let name = email.split('@').next().unwrap_or_default().to_string();
        Self {
            id: id.unwrap_or_else(|| UserId::from(email)),
            name,
            email: email.to_string(),
            is_verified: false,
            phone: None,
            emergency_contact: None,
            medical_info: None,
        }
    }

    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(phone) = &update.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(contact) = &update.emergency_contact {
            self.emergency_contact = Some(contact.clone());
        }
        if let Some(medical) = &update.medical_info {
            self.medical_info = Some(medical.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Token returned by login or registration. Some deployments name the
/// token `token`, others `access_token`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthTokenResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default, alias = "student")]
    pub user: Option<AuthIdentity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Partial profile update; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_info: Option<MedicalInfo>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.emergency_contact.is_none()
            && self.medical_info.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Institute,
    Student,
}

/// Account record behind a token, as returned by `auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub is_verified: bool,
}

/// Gate for admin-only screens, cached under [`ADMIN_SESSION_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("admin sign-in required")]
    NotSignedIn,
    #[error("role {0:?} may not open admin screens")]
    Forbidden(UserRole),
}

impl AdminSession {
    pub fn require_admin(&self) -> Result<(), AccessError> {
        if self.role == UserRole::Admin {
            Ok(())
        } else {
            Err(AccessError::Forbidden(self.role))
        }
    }
}
