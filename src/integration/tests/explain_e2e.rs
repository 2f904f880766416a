//! End-to-end: mocked fullnode -> JSON-RPC client -> classification.

use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::task::JoinSet;
use tracing_test::traced_test;
use url::Url;
use wiremock::MockServer;

use integration::{
    FAILED_DIGEST, SWAP_DIGEST, TRANSFER_DIGEST, explainer_for, serve_fixture, serve_not_found,
};
use suilens::activity::ActivityCard;
use suilens::test_utils::{assert_has_card, assert_has_step_with_detail, assert_narrative};
use suilens::utils::format_address;
use suilens::{
    FetchSession, NarrativeMode, consume_deep_link, parse_input, share_link,
};
use suilens_rpc::{ExplainOutcome, FETCH_FAILED_MESSAGE};

#[tokio::test]
async fn test_cetus_swap_end_to_end() {
    let server = MockServer::start().await;
    serve_fixture(&server, SWAP_DIGEST, "cetus_swap.json", Duration::ZERO).await;

    let outcome = explainer_for(&server)
        .explain(SWAP_DIGEST, NarrativeMode::Heuristic)
        .await
        .unwrap();
    let explanation = &outcome.explanation;

    assert_narrative(explanation, "Sender interacted with Cetus CLMM (pool_script::swap_b2a).");
    assert_has_step_with_detail(&explanation.steps, "Cetus CLMM", "swap_b2a");
    assert_has_card(&explanation.activity, "Swap on Cetus CLMM");

    let ActivityCard::Swap(swap) = &explanation.activity.cards()[0] else {
        panic!("expected a swap card");
    };
    assert_eq!((swap.coin_in.as_str(), swap.coin_out.as_str()), ("SUI", "USDC"));

    let summary = &explanation.summary;
    assert_eq!(summary.gas.display, "0.002736");
    assert_eq!(summary.objects.mutated.len(), 2);
    assert_eq!(summary.objects.hidden_low_level, 1);
    assert_eq!(summary.objects.created[0].display, "Coin (USDC)");
    assert_eq!(summary.flow.destination_label(), "Contract / State");
    assert_eq!(summary.balances[1].display_amount, "+0.007184");
}

#[tokio::test]
async fn test_failed_move_abort_end_to_end() {
    let server = MockServer::start().await;
    serve_fixture(&server, FAILED_DIGEST, "failed_move_abort.json", Duration::ZERO).await;

    let outcome = explainer_for(&server)
        .explain(FAILED_DIGEST, NarrativeMode::Heuristic)
        .await
        .unwrap();
    let summary = &outcome.explanation.summary;

    assert_eq!(summary.status.as_str(), "failure");
    let failure = summary.failure.as_ref().unwrap();
    assert_eq!(failure.raw_error, summary.status.error().unwrap());
    assert!(failure.raw_error.contains("MoveAbort"));
    assert_eq!(failure.cause_label, "contract rejected input");
    assert_narrative(
        &outcome.explanation,
        "Sender interacted with Turbos Finance (swap_router::swap_a_b).",
    );
}

#[tokio::test]
async fn test_plain_transfer_end_to_end() {
    let server = MockServer::start().await;
    serve_fixture(&server, TRANSFER_DIGEST, "sui_transfer.json", Duration::ZERO).await;

    let outcome = explainer_for(&server)
        .explain(TRANSFER_DIGEST, NarrativeMode::Ai)
        .await
        .unwrap();

    // No narrative key configured: AI mode falls back to the heuristic sentence.
    assert_eq!(outcome.narrative.mode, NarrativeMode::Heuristic);
    assert_eq!(
        outcome.narrative.text,
        format!(
            "Sender transferred 1.50 SUI to {}.",
            format_address(Some(
                "0xa11ce0000000000000000000000000000000000000000000000000000000b0b1"
            ))
        )
    );
    assert!(outcome.explanation.activity.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_fetch_failure_is_logged_not_shown() {
    let server = MockServer::start().await;
    serve_not_found(&server).await;

    let err = explainer_for(&server)
        .explain(TRANSFER_DIGEST, NarrativeMode::Heuristic)
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), FETCH_FAILED_MESSAGE);
    assert!(logs_contain("transaction fetch failed"));
}

#[tokio::test]
async fn test_stale_response_never_replaces_newer_result() {
    let server = MockServer::start().await;
    // Fetch A is slow, fetch B answers immediately.
    serve_fixture(&server, SWAP_DIGEST, "cetus_swap.json", Duration::from_millis(400)).await;
    serve_fixture(&server, TRANSFER_DIGEST, "sui_transfer.json", Duration::ZERO).await;

    let explainer = explainer_for(&server);
    let mut session: FetchSession<ExplainOutcome> = FetchSession::new();
    let ticket_a = session.begin(SWAP_DIGEST);
    let ticket_b = session.begin(TRANSFER_DIGEST);

    let mut fetches = JoinSet::new();
    for ticket in [ticket_a, ticket_b] {
        let explainer = explainer.clone();
        fetches.spawn(async move {
            let outcome = explainer
                .explain(ticket.digest(), NarrativeMode::Heuristic)
                .await;
            (ticket, outcome)
        });
    }

    let mut accepted = vec![];
    while let Some(joined) = fetches.join_next().await {
        let (ticket, outcome) = joined.unwrap();
        let digest = ticket.digest().to_string();
        accepted.push((digest, session.resolve(ticket, outcome.unwrap())));
    }

    assert_eq!(
        accepted,
        vec![
            (TRANSFER_DIGEST.to_string(), true),
            (SWAP_DIGEST.to_string(), false),
        ]
    );
    assert_eq!(session.displayed_digest(), Some(TRANSFER_DIGEST));
    assert_eq!(
        session.displayed().unwrap().explanation.summary.digest,
        TRANSFER_DIGEST
    );
}

#[tokio::test]
async fn test_shared_link_triggers_one_fetch() {
    let server = MockServer::start().await;
    serve_fixture(&server, SWAP_DIGEST, "cetus_swap.json", Duration::ZERO).await;

    let link = share_link(&Url::parse("https://suilens.app/").unwrap(), SWAP_DIGEST);
    let (from_link, stripped) = consume_deep_link(&link);
    let digest = parse_input(&from_link.unwrap()).unwrap();
    assert_eq!(stripped.query(), None);

    let outcome = explainer_for(&server)
        .explain(&digest, NarrativeMode::Heuristic)
        .await
        .unwrap();
    assert_eq!(outcome.explanation.summary.digest, SWAP_DIGEST);

    // Passing the link itself works as well.
    assert_eq!(parse_input(link.as_str()).unwrap(), SWAP_DIGEST);
}
