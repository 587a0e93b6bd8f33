use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpChannel {
    Email,
    Phone,
}

impl OtpChannel {
    pub fn purpose(self) -> &'static str {
        match self {
            OtpChannel::Email => "verify_email",
            OtpChannel::Phone => "phone_verification",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpSendRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub purpose: &'static str,
}

impl OtpSendRequest {
    pub fn new(channel: OtpChannel, destination: &str) -> Self {
        let destination = Some(destination.trim().to_string());
        let (email, phone) = match channel {
            OtpChannel::Email => (destination, None),
            OtpChannel::Phone => (None, destination),
        };
        Self {
            email,
            phone,
            purpose: channel.purpose(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpVerifyRequest {
    pub destination: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OtpVerifyResponse {
    #[serde(default = "verified_by_default", alias = "valid")]
    pub verified: bool,
}

fn verified_by_default() -> bool {
    true
}

/// 4 to 8 ASCII letters or digits.
pub fn is_valid_otp_code(code: &str) -> bool {
    (4..=8).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn otp_code_shape() {
        assert!(is_valid_otp_code("1234"));
        assert!(is_valid_otp_code("A1B2C3D4"));
        assert!(!is_valid_otp_code("123"));
        assert!(!is_valid_otp_code("123456789"));
        assert!(!is_valid_otp_code("12 34"));
    }

    #[test]
    fn send_request_targets_one_channel() {
        let body = serde_json::to_value(OtpSendRequest::new(OtpChannel::Phone, " +15550001 ")).unwrap();
        assert_eq!(body, json!({"phone": "+15550001", "purpose": "phone_verification"}));
    }

    #[test]
    fn verify_response_defaults_to_verified_on_success() {
        let empty: OtpVerifyResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.verified);
        let rejected: OtpVerifyResponse = serde_json::from_value(json!({"valid": false})).unwrap();
        assert!(!rejected.verified);
    }
}
