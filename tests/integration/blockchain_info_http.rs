//! blockchain.info provider against a local HTTP stub
//!
//! Covers status-code classification, retry behaviour and a full check run
//! through the real reqwest client.

use anyhow::Result;
use chain_consistency::comparator::run_consistency_check;
use chain_consistency::errors::{ErrorKind, ProviderError};
use chain_consistency::fixtures::builtin::{
    block_299173_payment, BLOCK_100001_TXID, BLOCK_299173_TXID,
};
use chain_consistency::fixtures::{ExpectedIo, Fixture};
use chain_consistency::provider::TransactionProvider;
use chain_consistency::web_api::BlockchainInfoProvider;
use serde_json::json;
use std::sync::Arc;

use crate::common::builtin_fixtures;
use crate::common::http_stub::{HttpStub, StubResponse};
use crate::common::rpc_helpers::create_test_web_api_config;

fn rawtx_output(io: &ExpectedIo) -> serde_json::Value {
    json!({
        "spent": true,
        "type": 0,
        "n": io.index,
        "value": io.value,
        "addr": io.address,
        "tx_index": io.source_tx_index,
    })
}

/// A `rawtx` body agreeing with `fixture`
fn rawtx_body(fixture: &Fixture) -> String {
    json!({
        "hash": fixture.txid,
        "ver": 1,
        "time": fixture.timestamp,
        "block_height": fixture.block_height,
        "inputs": fixture
            .inputs
            .iter()
            .map(|io| json!({"sequence": 4294967295u32, "prev_out": rawtx_output(io)}))
            .collect::<Vec<_>>(),
        "out": fixture.outputs.iter().map(rawtx_output).collect::<Vec<_>>(),
    })
    .to_string()
}

fn provider_for(stub: &HttpStub, max_retries: usize) -> BlockchainInfoProvider {
    BlockchainInfoProvider::new(create_test_web_api_config(&stub.base_url, max_retries)).unwrap()
}

#[tokio::test]
async fn test_fetch_normalises_rawtx() -> Result<()> {
    let fixture = block_299173_payment();
    let stub = HttpStub::start(vec![(
        format!("/rawtx/{}", BLOCK_299173_TXID),
        StubResponse::json(rawtx_body(&fixture)),
    )])
    .await?;

    let record = provider_for(&stub, 3)
        .fetch_transaction(BLOCK_299173_TXID)
        .await?;
    assert_eq!(record, fixture.to_record());
    Ok(())
}

#[tokio::test]
async fn test_not_found_is_data_unavailable_without_retry() -> Result<()> {
    let stub = HttpStub::start(vec![]).await?;

    let err = provider_for(&stub, 3)
        .fetch_transaction(BLOCK_100001_TXID)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ProviderError::DataUnavailable {
            txid: BLOCK_100001_TXID.to_string()
        }
    );
    assert_eq!(stub.hits(), 1);
    Ok(())
}

#[tokio::test]
async fn test_server_error_with_not_found_text() -> Result<()> {
    let stub = HttpStub::start(vec![(
        format!("/rawtx/{}", BLOCK_100001_TXID),
        StubResponse::status(500, "Transaction not found"),
    )])
    .await?;

    let err = provider_for(&stub, 3)
        .fetch_transaction(BLOCK_100001_TXID)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataUnavailable);
    Ok(())
}

#[tokio::test]
async fn test_unavailable_service_is_retried_then_transport() -> Result<()> {
    let stub = HttpStub::start(vec![(
        format!("/rawtx/{}", BLOCK_100001_TXID),
        StubResponse::status(503, "Service Unavailable"),
    )])
    .await?;

    let err = provider_for(&stub, 3)
        .fetch_transaction(BLOCK_100001_TXID)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(stub.hits(), 3);
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_transport() -> Result<()> {
    let stub = HttpStub::start(vec![(
        format!("/rawtx/{}", BLOCK_100001_TXID),
        StubResponse::json("{\"hash\": 7}"),
    )])
    .await?;

    let err = provider_for(&stub, 1)
        .fetch_transaction(BLOCK_100001_TXID)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Transport(_)));
    Ok(())
}

#[tokio::test]
async fn test_check_run_against_stub() -> Result<()> {
    // Serves only the second fixture
    let stub = HttpStub::start(vec![(
        format!("/rawtx/{}", BLOCK_299173_TXID),
        StubResponse::json(rawtx_body(&block_299173_payment())),
    )])
    .await?;

    let fixtures = builtin_fixtures();
    let providers: Vec<Arc<dyn TransactionProvider>> = vec![Arc::new(provider_for(&stub, 1))];
    let report = run_consistency_check(&fixtures, &providers).await;

    let lines: Vec<String> = report.results.iter().map(|r| r.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            format!(
                "Test 1 [blockchain-info]: FAIL DataUnavailable: Transaction not found: {}",
                BLOCK_100001_TXID
            ),
            "Test 2 [blockchain-info]: PASS".to_string(),
        ]
    );
    Ok(())
}
