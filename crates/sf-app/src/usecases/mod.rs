//! Business logic use cases
//!
//! Each use case holds the ports it needs as `Arc<dyn Port>` and exposes an
//! `execute`-style entry point. [`UseCases`] builds them from [`AppDeps`].

pub mod admin;
pub mod otp;
pub mod registration;
pub mod session;

pub use admin::{
    ExportReport, ListSportCategories, LoadAdminData, ManageSportsCatalog, RecordPayment,
    ReviewSponsorship,
};
pub use otp::{OtpError, OtpVerification};
pub use registration::{NextOutcome, RegistrationOrchestrator, SubmitError};
pub use session::{AdminGate, AuthSession, SessionError};

use std::sync::Arc;

use sf_core::registration::{FlowContext, RegistrationFlow};

use crate::deps::AppDeps;

/// Use case accessor over shared dependencies.
#[derive(Clone)]
pub struct UseCases {
    deps: Arc<AppDeps>,
}

impl UseCases {
    pub fn new(deps: Arc<AppDeps>) -> Self {
        Self { deps }
    }

    pub fn deps(&self) -> &AppDeps {
        &self.deps
    }

    pub fn auth_session(&self) -> AuthSession {
        AuthSession::new(self.deps.api.clone(), self.deps.storage.clone())
    }

    pub fn admin_gate(&self) -> AdminGate {
        AdminGate::new(self.deps.api.clone(), self.deps.storage.clone())
    }

    pub fn otp_verification(&self) -> OtpVerification {
        OtpVerification::new(self.deps.api.clone())
    }

    /// A fresh flow dated from the clock and priced with the configured fees.
    pub fn registration<F: RegistrationFlow>(&self) -> RegistrationOrchestrator<F> {
        let ctx = FlowContext::new(self.deps.clock.today(), self.deps.fees.clone());
        RegistrationOrchestrator::new(self.deps.api.clone(), ctx)
    }

    pub fn load_admin_data(&self) -> LoadAdminData {
        LoadAdminData::new(self.deps.api.clone(), self.deps.admin_store.clone())
    }

    pub fn review_sponsorship(&self) -> ReviewSponsorship {
        ReviewSponsorship::new(self.deps.api.clone(), self.deps.admin_store.clone())
    }

    pub fn record_payment(&self) -> RecordPayment {
        RecordPayment::new(self.deps.api.clone(), self.deps.admin_store.clone())
    }

    pub fn export_report(&self) -> ExportReport {
        ExportReport::new(self.deps.admin_store.clone(), self.deps.clock.clone())
    }

    pub fn manage_sports_catalog(&self) -> ManageSportsCatalog {
        ManageSportsCatalog::new(self.deps.api.clone())
    }

    pub fn list_sport_categories(&self) -> ListSportCategories {
        ListSportCategories::new(self.deps.api.clone())
    }
}
