//! Admin dashboard use cases.
//!
//! Each one talks to the backend first and mirrors the accepted change into
//! the shared [`AdminDataStore`](sf_core::admin::AdminDataStore), so a server
//! error leaves every screen as it was.

mod export;
mod load;
mod payment;
mod review;
mod sports;

pub use export::{ExportReport, ExportedReport, ReportKind};
pub use load::LoadAdminData;
pub use payment::RecordPayment;
pub use review::{ReviewSponsorship, SponsorshipDecision};
pub use sports::{ListSportCategories, ManageSportsCatalog};

use serde::de::DeserializeOwned;
use serde_json::Value;
use sf_core::api::{ApiError, ApiResponse};

/// List endpoints answer either with a bare array or with a page object
/// carrying `items` (or `data`).
pub(crate) fn list_body<T: DeserializeOwned>(response: ApiResponse) -> Result<Vec<T>, ApiError> {
    let items = match response.body {
        Value::Array(_) => response.body,
        Value::Object(mut page) => page
            .remove("items")
            .or_else(|| page.remove("data"))
            .unwrap_or(Value::Array(Vec::new())),
        Value::Null => Value::Array(Vec::new()),
        other => other,
    };
    serde_json::from_value(items).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_body_accepts_arrays_and_pages() {
        let bare: Vec<u32> = list_body(ApiResponse::ok(json!([1, 2]))).unwrap();
        let page: Vec<u32> = list_body(ApiResponse::ok(json!({"items": [3], "total": 1}))).unwrap();
        let data: Vec<u32> = list_body(ApiResponse::ok(json!({"data": [4]}))).unwrap();
        let empty: Vec<u32> = list_body(ApiResponse::ok(Value::Null)).unwrap();
        assert_eq!((bare, page, data, empty), (vec![1, 2], vec![3], vec![4], vec![]));
        assert!(list_body::<u32>(ApiResponse::ok(json!("nope"))).is_err());
    }
}
