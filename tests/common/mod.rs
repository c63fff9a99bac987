//! Shared utilities for integration tests.

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;

use alloy::primitives::{address, Address};
use ledger_gateway::blockchain::mock::MockChain;
use ledger_gateway::config::GatewayConfig;
use ledger_gateway::contract::ContractBinding;
use ledger_gateway::{HttpServer, LedgerService};

/// Anvil's first development account.
pub const ACCOUNT_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const ACCOUNT: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
pub const CONTRACT: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

/// Build the gateway router over an in-memory chain.
pub fn gateway(chain: Arc<MockChain>) -> Router {
    gateway_with_config(chain, GatewayConfig::default())
}

#[allow(dead_code)]
pub fn gateway_with_config(chain: Arc<MockChain>, config: GatewayConfig) -> Router {
    let binding = ContractBinding::new(CONTRACT, chain);
    let service = Arc::new(LedgerService::new(binding, &config.transactions));
    HttpServer::new(config, service).router()
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// POST a JSON body.
#[allow(dead_code)]
pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

/// POST a write request signed with `key`.
#[allow(dead_code)]
pub fn write_request(op: &str, amount: &str, key: &str) -> Request<Body> {
    post_json(
        &format!("/{}/{}", op, amount),
        &serde_json::json!({ "accountPrivateKey": key }).to_string(),
    )
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
