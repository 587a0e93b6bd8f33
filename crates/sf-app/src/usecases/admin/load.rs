use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, info_span, Instrument};

use sf_core::admin::{AdminDataStore, DashboardStats, Institution, SponsorshipRequest};
use sf_core::api::endpoints;
use sf_core::ports::{ApiTransportExt, ApiTransportPort};

use super::list_body;

/// Fetch institutions and sponsorship requests and swap them into the store.
pub struct LoadAdminData {
    api: Arc<dyn ApiTransportPort>,
    store: Arc<AdminDataStore>,
}

impl LoadAdminData {
    pub fn new(api: Arc<dyn ApiTransportPort>, store: Arc<AdminDataStore>) -> Self {
        Self { api, store }
    }

    pub async fn execute(&self) -> Result<DashboardStats> {
        let span = info_span!("usecase.admin.load_data");

        async {
            let institutions: Vec<Institution> = list_body(
                self.api
                    .get(endpoints::ADMIN_INSTITUTIONS)
                    .await
                    .context("Failed to fetch institutions")?,
            )
            .context("Failed to parse institutions")?;
            let requests: Vec<SponsorshipRequest> = list_body(
                self.api
                    .get(endpoints::ADMIN_SPONSORSHIPS)
                    .await
                    .context("Failed to fetch sponsorship requests")?,
            )
            .context("Failed to parse sponsorship requests")?;

            info!(
                institutions = institutions.len(),
                sponsorship_requests = requests.len(),
                "Admin data loaded"
            );
            self.store.replace_all(institutions, requests);
            Ok(self.store.dashboard_stats())
        }
        .instrument(span)
        .await
    }
}
