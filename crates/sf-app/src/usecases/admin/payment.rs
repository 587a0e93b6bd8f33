use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span, Instrument};

use sf_core::admin::{AdminDataStore, PaymentStatus};
use sf_core::api::endpoints;
use sf_core::ids::InstitutionId;
use sf_core::ports::{ApiTransportExt, ApiTransportPort};

#[derive(Debug, Serialize)]
struct PaymentUpdate {
    payment_status: PaymentStatus,
    paid_amount: u64,
}

/// Record a payment against an institution.
pub struct RecordPayment {
    api: Arc<dyn ApiTransportPort>,
    store: Arc<AdminDataStore>,
}

impl RecordPayment {
    pub fn new(api: Arc<dyn ApiTransportPort>, store: Arc<AdminDataStore>) -> Self {
        Self { api, store }
    }

    pub async fn execute(
        &self,
        institution_id: InstitutionId,
        status: PaymentStatus,
        paid_amount: u64,
    ) -> Result<()> {
        let span = info_span!(
            "usecase.admin.record_payment",
            institution_id = %institution_id,
            status = ?status,
            paid_amount
        );

        async {
            let update = PaymentUpdate {
                payment_status: status,
                paid_amount,
            };
            self.api
                .patch(&endpoints::admin_payment(institution_id), &update)
                .await
                .with_context(|| format!("Failed to record payment for institution {institution_id}"))?;

            self.store
                .update_payment_status(institution_id, status, paid_amount);
            info!("Payment recorded");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
