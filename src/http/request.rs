//! Request shapes and request ID generation.
//!
//! # Responsibilities
//! - Define the schema-validated write request body
//! - Generate a UUID v4 request ID when the client sent none
//!
//! # Design Decisions
//! - Unknown fields are rejected rather than ignored
//! - The credential is moved into the service and never logged

use axum::http::{HeaderName, HeaderValue, Request};
use serde::Deserialize;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::blockchain::wallet::Credential;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Body of `POST /deposit/{amount}` and `POST /withdrawal/{amount}`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepositRequest {
    #[serde(rename = "accountPrivateKey")]
    pub account_private_key: Credential,
}

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Read the request ID set by the request ID layer.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_request_schema() {
        let body: DepositRequest =
            serde_json::from_str(r#"{"accountPrivateKey":"0xabc"}"#).unwrap();
        assert_eq!(format!("{:?}", body.account_private_key), "Credential(<redacted>)");

        assert!(serde_json::from_str::<DepositRequest>(r#"{}"#).is_err());
        assert!(serde_json::from_str::<DepositRequest>(r#"{"accountPrivateKey":42}"#).is_err());
        assert!(serde_json::from_str::<DepositRequest>(
            r#"{"accountPrivateKey":"0xabc","extra":true}"#
        )
        .is_err());
    }

    #[test]
    fn test_request_ids_are_unique_uuids() {
        let request = Request::new(());
        let mut maker = MakeRequestUuid;
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();

        let a = a.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(a).is_ok());
        assert_ne!(a, b.header_value().to_str().unwrap());
    }
}
