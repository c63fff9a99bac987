//! End-to-end ledger flows: nonce handling, concurrency and failure recovery.

use alloy::primitives::U256;
use axum::http::StatusCode;
use std::sync::Arc;
use tower::ServiceExt;

use ledger_gateway::blockchain::mock::{MockChain, MockFailure};
use ledger_gateway::contract::bindings::LedgerContract;
use ledger_gateway::config::GatewayConfig;
use alloy::sol_types::SolCall;

mod common;
use common::{body_json, gateway, gateway_with_config, write_request, ACCOUNT, ACCOUNT_KEY};

#[tokio::test]
async fn test_nonce_follows_chain_state() {
    let chain = Arc::new(MockChain::default());
    chain.set_nonce(ACCOUNT, 12);

    let response = gateway(chain)
        .oneshot(write_request("deposit", "5", ACCOUNT_KEY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["nonce"], 12);
}

#[tokio::test]
async fn test_concurrent_deposits_with_one_key_all_succeed() {
    let chain = Arc::new(MockChain::default());
    let app = gateway(chain.clone());

    let mut tasks = Vec::new();
    for i in 1..=10u64 {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            app.oneshot(write_request("deposit", &i.to_string(), ACCOUNT_KEY))
                .await
                .unwrap()
        }));
    }

    let mut nonces = Vec::new();
    for task in tasks {
        let response = task.await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        nonces.push(body_json(response).await["nonce"].as_u64().unwrap());
    }
    nonces.sort_unstable();
    assert_eq!(nonces, (0..10).collect::<Vec<u64>>());

    let total: U256 = chain
        .submitted()
        .await
        .iter()
        .map(|tx| tx.value())
        .fold(U256::ZERO, |acc, v| acc + v);
    assert_eq!(total, U256::from(55));
}

#[tokio::test]
async fn test_deposit_then_withdraw_calldata() {
    let chain = Arc::new(MockChain::default());
    let app = gateway(chain.clone());

    let response = app
        .clone()
        .oneshot(write_request("deposit", "300", ACCOUNT_KEY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .oneshot(write_request("withdrawal", "120", ACCOUNT_KEY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let submitted = chain.submitted().await;
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0].nonce(), 0);
    assert_eq!(submitted[1].nonce(), 1);

    let deposit = LedgerContract::depositeCall::abi_decode(submitted[0].input()).unwrap();
    assert_eq!(deposit.amount, U256::from(300));
    let withdraw = LedgerContract::withdrawlCall::abi_decode(submitted[1].input()).unwrap();
    assert_eq!(withdraw.amount, U256::from(120));
}

#[tokio::test]
async fn test_failed_submission_does_not_consume_nonce() {
    let chain = Arc::new(MockChain::default());
    let app = gateway(chain.clone());

    chain.set_failure(Some(MockFailure::RevertOnSubmit("paused".into())));
    let response = app
        .clone()
        .oneshot(write_request("deposit", "1", ACCOUNT_KEY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    chain.set_failure(None);
    let response = app
        .oneshot(write_request("deposit", "1", ACCOUNT_KEY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["nonce"], 0);
}

#[tokio::test]
async fn test_custom_gas_settings_are_applied() {
    let chain = Arc::new(MockChain::default());
    let mut config = GatewayConfig::default();
    config.transactions.gas_limit = 150_000;
    config.transactions.gas_price_wei = 20_000_000_000;

    let response = gateway_with_config(chain, config)
        .oneshot(write_request("deposit", "1", ACCOUNT_KEY))
        .await
        .unwrap();
    let handle = body_json(response).await;
    assert_eq!(handle["gasLimit"], 150_000);
    assert_eq!(handle["gasPrice"], "20000000000");
}
