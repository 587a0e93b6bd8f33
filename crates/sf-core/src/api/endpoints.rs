//! Paths relative to the API root (`/api/v1`).

use crate::ids::{InstitutionId, SponsorshipRequestId};

pub const HEALTHZ: &str = "healthz";

pub const AUTH_LOGIN: &str = "auth/login";
pub const AUTH_REGISTER: &str = "auth/register";
pub const AUTH_LOGOUT: &str = "auth/logout";
pub const AUTH_ME: &str = "auth/me";
pub const OTP_SEND: &str = "auth/otp/send";
pub const OTP_VERIFY: &str = "auth/otp/verify";

pub const STUDENTS: &str = "students";
pub const STUDENTS_ME: &str = "students/me";
pub const INSTITUTIONS: &str = "institutions";
pub const REGISTRATIONS: &str = "registrations";
pub const PAYMENTS: &str = "payments";
pub const SPONSORSHIPS: &str = "sponsorships";
pub const SPORTS: &str = "sports";

pub const ADMIN_DASHBOARD_STATS: &str = "admin/dashboard/stats";
pub const ADMIN_INSTITUTIONS: &str = "admin/institutions";
pub const ADMIN_STUDENTS: &str = "admin/students";
pub const ADMIN_PAYMENTS: &str = "admin/payments";
pub const ADMIN_INVOICES: &str = "admin/invoices";
pub const ADMIN_SPORTS: &str = "admin/sports";
pub const ADMIN_SPONSORSHIPS: &str = "admin/sponsorships";

pub fn sport_categories(sport_id: &str) -> String {
    format!("{SPORTS}/{sport_id}/categories")
}

pub fn sport_subcategories(category_id: &str) -> String {
    format!("{SPORTS}/subcategories/{category_id}")
}

pub fn sponsorship_decision(request_id: SponsorshipRequestId, approve: bool) -> String {
    let action = if approve { "approve" } else { "reject" };
    format!("{SPONSORSHIPS}/{request_id}/{action}")
}

pub fn admin_payment(institution_id: InstitutionId) -> String {
    format!("{ADMIN_PAYMENTS}/{institution_id}")
}

pub fn admin_sport(sport_id: &str) -> String {
    format!("{ADMIN_SPORTS}/{sport_id}")
}
