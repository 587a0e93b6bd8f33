//! OTP round trips for the account's email and phone.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, info_span, warn, Instrument};

use sf_core::api::{endpoints, ApiError};
use sf_core::ports::{ApiTransportExt, ApiTransportPort};
use sf_core::registration::records::ContactVerification;
use sf_core::registration::validation::{is_valid_email, is_valid_phone};
use sf_core::session::{
    is_valid_otp_code, OtpChannel, OtpSendRequest, OtpVerifyRequest, OtpVerifyResponse,
};

#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    #[error("'{0}' is not a valid destination for this channel")]
    InvalidDestination(String),
    #[error("OTP code must be 4 to 8 letters or digits")]
    InvalidCode,
    #[error("no OTP was sent to {0}")]
    NotRequested(String),
    #[error("incorrect OTP code")]
    Rejected,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone)]
struct PendingOtp {
    channel: OtpChannel,
    otp_id: Option<String>,
}

#[derive(Debug, Default)]
struct OtpState {
    pending: HashMap<String, PendingOtp>,
    verified: HashMap<OtpChannel, String>,
}

pub struct OtpVerification {
    api: Arc<dyn ApiTransportPort>,
    state: Mutex<OtpState>,
}

impl OtpVerification {
    pub fn new(api: Arc<dyn ApiTransportPort>) -> Self {
        Self {
            api,
            state: Mutex::new(OtpState::default()),
        }
    }

    pub async fn send(&self, channel: OtpChannel, destination: &str) -> Result<(), OtpError> {
        let destination = destination.trim();
        let span = info_span!("usecase.otp.send", channel = ?channel);

        async {
            let valid = match channel {
                OtpChannel::Email => is_valid_email(destination),
                OtpChannel::Phone => is_valid_phone(destination),
            };
            if !valid {
                return Err(OtpError::InvalidDestination(destination.to_string()));
            }

            let response = self
                .api
                .post(endpoints::OTP_SEND, &OtpSendRequest::new(channel, destination))
                .await?;
            let otp_id = response
                .body
                .get("otp_id")
                .and_then(|v| v.as_str())
                .map(str::to_string);

            let mut state = self.state.lock().await;
            state
                .pending
                .insert(destination.to_string(), PendingOtp { channel, otp_id });
            if state.verified.get(&channel).map(String::as_str) == Some(destination) {
                state.verified.remove(&channel);
            }
            info!("OTP sent");
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Check `code` for a destination previously passed to [`send`](Self::send).
    ///
    /// The code shape is checked before anything goes over the network.
    pub async fn verify(&self, destination: &str, code: &str) -> Result<(), OtpError> {
        let destination = destination.trim();
        let code = code.trim();
        let span = info_span!("usecase.otp.verify");

        async {
            if !is_valid_otp_code(code) {
                return Err(OtpError::InvalidCode);
            }
            let pending = self
                .state
                .lock()
                .await
                .pending
                .get(destination)
                .cloned()
                .ok_or_else(|| OtpError::NotRequested(destination.to_string()))?;

            let request = OtpVerifyRequest {
                destination: destination.to_string(),
                code: code.to_string(),
                otp_id: pending.otp_id.clone(),
            };
            let response = self.api.post(endpoints::OTP_VERIFY, &request).await?;
            let verified = response
                .json::<OtpVerifyResponse>()
                .map(|r| r.verified)
                .unwrap_or(true);
            if !verified {
                warn!(channel = ?pending.channel, "OTP rejected");
                return Err(OtpError::Rejected);
            }

            let mut state = self.state.lock().await;
            state.pending.remove(destination);
            state
                .verified
                .insert(pending.channel, destination.to_string());
            info!(channel = ?pending.channel, "Contact verified");
            Ok(())
        }
        .instrument(span)
        .await
    }

    pub async fn is_verified(&self, channel: OtpChannel, destination: &str) -> bool {
        self.state.lock().await.verified.get(&channel).map(String::as_str) == Some(destination.trim())
    }

    /// Record for the Verification step of the student flow.
    pub async fn contact_verification(&self, email: &str) -> ContactVerification {
        let state = self.state.lock().await;
        let email = email.trim();
        ContactVerification {
            email: email.to_string(),
            email_verified: state.verified.get(&OtpChannel::Email).map(String::as_str) == Some(email),
            phone_verified: state.verified.contains_key(&OtpChannel::Phone),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedApi;
    use serde_json::json;
    use sf_core::ports::HttpMethod;

    #[tokio::test]
    async fn send_then_verify_marks_email_verified() {
        let api = ScriptedApi::new();
        api.ok(HttpMethod::Post, "auth/otp/send", json!({"otp_id": "otp-1", "message": "OTP sent successfully"}));
        api.ok(HttpMethod::Post, "auth/otp/verify", json!({"verified": true}));
        let otp = OtpVerification::new(api.clone());

        otp.send(OtpChannel::Email, "asha@example.com").await.unwrap();
        otp.verify("asha@example.com", "123456").await.unwrap();

        assert!(otp.is_verified(OtpChannel::Email, "asha@example.com").await);
        let record = otp.contact_verification("asha@example.com").await;
        assert!(record.email_verified);
        assert!(!record.phone_verified);
        assert_eq!(
            api.calls()[1].body,
            Some(json!({"destination": "asha@example.com", "code": "123456", "otp_id": "otp-1"}))
        );
    }

    #[tokio::test]
    async fn malformed_code_never_reaches_the_network() {
        let api = ScriptedApi::new();
        let otp = OtpVerification::new(api.clone());

        let err = otp.verify("asha@example.com", "12").await.unwrap_err();

        assert!(matches!(err, OtpError::InvalidCode));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn verify_without_send_is_refused() {
        let otp = OtpVerification::new(ScriptedApi::new());
        let err = otp.verify("asha@example.com", "1234").await.unwrap_err();
        assert!(matches!(err, OtpError::NotRequested(_)));
    }

    #[tokio::test]
    async fn invalid_destination_is_rejected_locally() {
        let api = ScriptedApi::new();
        let otp = OtpVerification::new(api.clone());
        assert!(matches!(
            otp.send(OtpChannel::Email, "not-an-email").await,
            Err(OtpError::InvalidDestination(_))
        ));
        assert!(matches!(
            otp.send(OtpChannel::Phone, "12").await,
            Err(OtpError::InvalidDestination(_))
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn wrong_code_keeps_destination_unverified() {
        let api = ScriptedApi::new();
        api.ok(HttpMethod::Post, "auth/otp/send", json!({}));
        api.fail(HttpMethod::Post, "auth/otp/verify", 400, json!({"detail": "Invalid OTP code"}));
        api.ok(HttpMethod::Post, "auth/otp/verify", json!({"valid": false}));
        let otp = OtpVerification::new(api);

        otp.send(OtpChannel::Phone, "+91 98450 12345").await.unwrap();
        let err = otp.verify("+91 98450 12345", "0000").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid OTP code");
        let err = otp.verify("+91 98450 12345", "0000").await.unwrap_err();
        assert!(matches!(err, OtpError::Rejected));

        assert!(!otp.is_verified(OtpChannel::Phone, "+91 98450 12345").await);
    }
}
