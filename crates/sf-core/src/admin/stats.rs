use serde::Serialize;

use super::model::{Institution, PaymentStatus, RequestStatus, SponsorshipRequest};

/// Figures shown on the admin dashboard cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_institutions: usize,
    pub paid: usize,
    pub partial: usize,
    pub pending: usize,
    pub collected: u64,
    pub outstanding: u64,
    pub pending_requests: usize,
    pub approved_requests: usize,
    pub sponsored_total: u64,
}

impl DashboardStats {
    pub fn compute(institutions: &[Institution], requests: &[SponsorshipRequest]) -> Self {
        let mut stats = DashboardStats {
            total_institutions: institutions.len(),
            ..Default::default()
        };
        for institution in institutions {
            match institution.payment_status {
                PaymentStatus::Paid => stats.paid += 1,
                PaymentStatus::Partial => stats.partial += 1,
                PaymentStatus::Pending => stats.pending += 1,
            }
            stats.collected += institution.paid_amount;
            stats.outstanding += institution.outstanding();
        }
        for request in requests {
            match request.status {
                RequestStatus::Pending => stats.pending_requests += 1,
                RequestStatus::Approved => {
                    stats.approved_requests += 1;
                    stats.sponsored_total += request.sponsored_amount.unwrap_or(0);
                }
                RequestStatus::Rejected => {}
            }
        }
        stats
    }
}
