//! Shared helpers for the end-to-end tests: fullnode fixtures and a mocked fullnode.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use suilens_rpc::config::NarrativeConfig;
use suilens_rpc::{Explainer, GroqNarrator, SuiRpcClient};

pub const SWAP_DIGEST: &str = "9XFneskU8tW7UxQf7tE5qL4x3Bq8vA5wXzG6kHc2N7pD";
pub const FAILED_DIGEST: &str = "HbNq4rS8dN3Vh7oZ4mWj2cYpQ6uE1xT5fK9aL3gB8vRs";
pub const TRANSFER_DIGEST: &str = "5kMvP3bQ8wYc2RzJ9DhT6nF4aX7gU1sE3LpK8oV2iWqN";

// The JSON-RPC fixtures live with the client crate.
pub fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("..");
    path.push("clients");
    path.push("suilens-rpc");
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

pub fn load_fixture(name: &str) -> Value {
    let path = fixture_path(name);
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to read fixture file: {:?}", path));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {e}", path))
}

/// Answers `sui_getTransactionBlock` for `digest` with the named fixture.
pub async fn serve_fixture(server: &MockServer, digest: &str, fixture: &str, delay: Duration) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "sui_getTransactionBlock",
            "params": [digest],
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": load_fixture(fixture) }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Answers every other digest with the fullnode's not-found error.
pub async fn serve_not_found(server: &MockServer) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "Could not find the referenced transaction." }
        })))
        .with_priority(u8::MAX)
        .mount(server)
        .await;
}

/// Explainer pointed at the mock fullnode, without a narrative key.
pub fn explainer_for(server: &MockServer) -> Explainer {
    let ledger = SuiRpcClient::new(
        Url::parse(&server.uri()).expect("mock server uri"),
        Duration::from_secs(5),
    )
    .expect("rpc client");
    let narrator = GroqNarrator::new(&NarrativeConfig::default(), Duration::from_secs(5))
        .expect("narrator");
    Explainer::new(Arc::new(ledger), Arc::new(narrator))
}
