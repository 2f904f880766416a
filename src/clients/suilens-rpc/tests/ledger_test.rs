use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use num_bigint::BigInt;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pretty_assertions::assert_eq;
use suilens::model::{ExecutionStatus, Operation, Owner};
use suilens_rpc::{FetchError, LedgerClient, SuiRpcClient};

// Helper function to get fixture path
fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn load_fixture(name: &str) -> Value {
    let path = fixture_path(name);
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to read fixture file: {:?}", path));
    serde_json::from_str(&content).unwrap()
}

fn rpc_result(result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": 1, "result": result })
}

async fn client_for(server: &MockServer) -> SuiRpcClient {
    SuiRpcClient::new(Url::parse(&server.uri()).unwrap(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_swap_fixture() {
    let server = MockServer::start().await;
    let digest = "9XFneskU8tW7UxQf7tE5qL4x3Bq8vA5wXzG6kHc2N7pD";
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "sui_getTransactionBlock",
            "params": [digest],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(rpc_result(load_fixture("cetus_swap.json"))))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server).await.get_transaction(digest).await.unwrap();

    assert_eq!(record.digest, digest);
    assert_eq!(record.status, ExecutionStatus::Success);
    assert_eq!(record.commands.as_ref().map(Vec::len), Some(3));
    assert!(matches!(
        record.commands.as_deref(),
        Some([Operation::SplitCoins, Operation::MoveCall(call), Operation::TransferObjects])
            if call.function == "swap_b2a"
    ));
    assert_eq!(record.balance_changes.len(), 2);
    assert!(matches!(record.balance_changes[0].owner, Owner::Address(_)));
    assert_eq!(record.object_changes.len(), 4);
    assert_eq!(record.events.len(), 1);
    assert_eq!(record.events[0].payload.get("amount_in"), Some("2000000000"));
    assert_eq!(record.events[0].payload.get("pool"), None);
    assert_eq!(record.gas.total(), BigInt::from(2_736_008));
}

#[tokio::test]
async fn test_fetch_failed_transaction_is_a_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(rpc_result(load_fixture("failed_move_abort.json"))),
        )
        .mount(&server)
        .await;

    let record = client_for(&server)
        .await
        .get_transaction("HbNq4rS8dN3Vh7oZ4mWj2cYpQ6uE1xT5fK9aL3gB8vRs")
        .await
        .unwrap();

    let error = record.status.error().unwrap();
    assert!(error.starts_with("MoveAbort(MoveLocation"));
}

#[tokio::test]
async fn test_unknown_digest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": -32602,
                "message": "Could not find the referenced transaction [TransactionDigest(5kMvP3bQ8wYc2RzJ9DhT6nF4aX7gU1sE3LpK8oV2iWqN)]."
            }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .get_transaction("5kMvP3bQ8wYc2RzJ9DhT6nF4aX7gU1sE3LpK8oV2iWqN")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::NotFound(_)), "{err:?}");
}

#[tokio::test]
async fn test_http_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .get_transaction("5kMvP3bQ8wYc2RzJ9DhT6nF4aX7gU1sE3LpK8oV2iWqN")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 503, .. }), "{err:?}");
}

#[tokio::test]
async fn test_malformed_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rpc_result(json!({ "digest": 12 }))))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .get_transaction("5kMvP3bQ8wYc2RzJ9DhT6nF4aX7gU1sE3LpK8oV2iWqN")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Malformed(_)), "{err:?}");
}

#[tokio::test]
async fn test_missing_effects_is_malformed() {
    let server = MockServer::start().await;
    let mut body = load_fixture("sui_transfer.json");
    body.as_object_mut().unwrap().remove("effects");
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rpc_result(body)))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .get_transaction("5kMvP3bQ8wYc2RzJ9DhT6nF4aX7gU1sE3LpK8oV2iWqN")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Malformed(ref m) if m.contains("effects")), "{err:?}");
}
