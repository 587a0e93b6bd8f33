use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde_json::json;
use tracing::{info, info_span, Instrument};

use sf_core::admin::{AdminDataStore, RequestStatus, SponsorData};
use sf_core::api::endpoints;
use sf_core::ids::SponsorshipRequestId;
use sf_core::ports::{ApiTransportExt, ApiTransportPort};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SponsorshipDecision {
    Approve(SponsorData),
    Reject { reason: Option<String> },
}

impl SponsorshipDecision {
    fn status(&self) -> RequestStatus {
        match self {
            SponsorshipDecision::Approve(_) => RequestStatus::Approved,
            SponsorshipDecision::Reject { .. } => RequestStatus::Rejected,
        }
    }
}

/// Approve or reject a loaded sponsorship request.
pub struct ReviewSponsorship {
    api: Arc<dyn ApiTransportPort>,
    store: Arc<AdminDataStore>,
}

impl ReviewSponsorship {
    pub fn new(api: Arc<dyn ApiTransportPort>, store: Arc<AdminDataStore>) -> Self {
        Self { api, store }
    }

    pub async fn execute(
        &self,
        request_id: SponsorshipRequestId,
        decision: SponsorshipDecision,
    ) -> Result<()> {
        let span = info_span!(
            "usecase.admin.review_sponsorship",
            request_id = %request_id,
            status = ?decision.status()
        );

        async {
            let request = self
                .store
                .sponsorship_requests()
                .into_iter()
                .find(|r| r.id == request_id)
                .ok_or_else(|| anyhow!("Sponsorship request {request_id} is not loaded"))?;

            let (approve, body) = match &decision {
                SponsorshipDecision::Approve(sponsor) => (
                    true,
                    json!({
                        "sponsor_name": sponsor.sponsor_name,
                        "sponsored_amount": sponsor.sponsored_amount,
                    }),
                ),
                SponsorshipDecision::Reject { reason } => (false, json!({ "reason": reason })),
            };
            self.api
                .post(&endpoints::sponsorship_decision(request_id, approve), &body)
                .await
                .with_context(|| format!("Failed to review sponsorship request {request_id}"))?;

            let status = decision.status();
            let sponsor = match decision {
                SponsorshipDecision::Approve(sponsor) => Some(sponsor),
                SponsorshipDecision::Reject { .. } => None,
            };
            self.store
                .update_sponsorship_request(request.id, status, sponsor);
            info!(institution_id = %request.institution_id, "Sponsorship decision recorded");
            Ok(())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedClock, ScriptedApi};
    use sf_core::admin::{
        Institution, PaymentStatus, SponsorshipRequest, SponsorshipStatus, SponsorshipType,
    };
    use sf_core::ids::InstitutionId;
    use sf_core::ports::HttpMethod;

    fn request(id: u64) -> SponsorshipRequest {
        SponsorshipRequest {
            id: SponsorshipRequestId::new(id),
            institution_id: InstitutionId::new(4),
            institution_name: "Riverside College".into(),
            sponsorship_type: SponsorshipType::Full,
            status: RequestStatus::Pending,
            requested_amount: 800_00,
            sponsored_amount: None,
            sponsor_name: None,
            reason: "Rural outreach".into(),
            submitted_on: None,
        }
    }

    fn store_with(requests: Vec<SponsorshipRequest>) -> Arc<AdminDataStore> {
        Arc::new(AdminDataStore::with_records(
            Arc::new(FixedClock),
            vec![Institution {
                id: InstitutionId::new(4),
                name: "Riverside College".into(),
                contact_person: "N. Das".into(),
                email: "sports@riverside.edu".into(),
                phone: String::new(),
                payment_status: PaymentStatus::Pending,
                total_amount: 800_00,
                paid_amount: 0,
                last_payment: None,
                sponsorship_status: SponsorshipStatus::Applied,
                sponsor_name: None,
                sponsored_amount: None,
                sports: vec![],
            }],
            requests,
        ))
    }

    fn store() -> Arc<AdminDataStore> {
        store_with(vec![request(21)])
    }

    fn sponsor() -> SponsorData {
        SponsorData {
            sponsor_name: "ABC Sports Company".into(),
            sponsored_amount: 800_00,
        }
    }

    #[tokio::test]
    async fn approval_is_mirrored_into_the_linked_institution() {
        let api = ScriptedApi::new();
        api.ok(HttpMethod::Post, "sponsorships/21/approve", serde_json::json!({"success": true}));
        let store = store();

        ReviewSponsorship::new(api.clone(), store.clone())
            .execute(SponsorshipRequestId::new(21), SponsorshipDecision::Approve(sponsor()))
            .await
            .unwrap();

        let institution = store.institution(InstitutionId::new(4)).unwrap();
        assert_eq!(institution.payment_status, PaymentStatus::Paid);
        assert_eq!(institution.paid_amount, 800_00);
        assert_eq!(store.sponsorship_requests()[0].status, RequestStatus::Approved);
        assert_eq!(
            api.calls()[0].body,
            Some(serde_json::json!({"sponsor_name": "ABC Sports Company", "sponsored_amount": 80000}))
        );
    }

    #[tokio::test]
    async fn decision_lands_on_the_reviewed_request_not_the_latest() {
        let api = ScriptedApi::new();
        api.ok(HttpMethod::Post, "sponsorships/21/approve", serde_json::json!({"success": true}));
        let store = store_with(vec![request(21), request(22)]);

        ReviewSponsorship::new(api.clone(), store.clone())
            .execute(SponsorshipRequestId::new(21), SponsorshipDecision::Approve(sponsor()))
            .await
            .unwrap();

        let requests = store.sponsorship_requests();
        assert_eq!(requests[0].id, SponsorshipRequestId::new(21));
        assert_eq!(requests[0].status, RequestStatus::Approved);
        assert_eq!(requests[1].id, SponsorshipRequestId::new(22));
        assert_eq!(requests[1].status, RequestStatus::Pending);
        assert_eq!(
            store.institution(InstitutionId::new(4)).unwrap().sponsorship_status,
            SponsorshipStatus::Approved
        );
        assert_eq!(api.calls_to("sponsorships/22/approve"), 0);
    }

    #[tokio::test]
    async fn server_error_leaves_store_untouched() {
        let api = ScriptedApi::new();
        api.fail(HttpMethod::Post, "sponsorships/21/reject", 500, serde_json::json!({}));
        let store = store();
        let before = store.snapshot();

        let err = ReviewSponsorship::new(api, store.clone())
            .execute(
                SponsorshipRequestId::new(21),
                SponsorshipDecision::Reject { reason: None },
            )
            .await
            .unwrap_err();

        assert_eq!(err.root_cause().to_string(), "HTTP error! status: 500");
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn unknown_request_is_refused_before_calling_the_server() {
        let api = ScriptedApi::new();
        let err = ReviewSponsorship::new(api.clone(), store())
            .execute(SponsorshipRequestId::new(99), SponsorshipDecision::Reject { reason: None })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("99"));
        assert!(api.calls().is_empty());
    }
}
