//! Provider tests against a wiremock server.

use std::time::Duration;

use futures_util::StreamExt;
use vidocs_core::{AssetHandle, PollPolicy, TurnRole};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::{HistoryTurn, PromptPart, ProviderClient};
use crate::error::ProviderError;
use crate::wire::AssetState;
use crate::{await_ready, generate_with_fallback};

const BACKOFF: Duration = Duration::from_millis(1);

fn test_client(server: &MockServer) -> ProviderClient {
    ProviderClient::new("test-key".to_owned(), server.uri()).unwrap()
}

fn chain(models: &[&str]) -> Vec<String> {
    models.iter().map(|m| (*m).to_owned()).collect()
}

fn sse_body(fragments: &[&str]) -> String {
    fragments
        .iter()
        .map(|f| {
            format!(
                "data: {}\n\n",
                serde_json::json!({
                    "candidates": [{"content": {"parts": [{"text": f}]}}]
                })
            )
        })
        .collect()
}

fn generate_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    })
}

async fn collect(mut stream: crate::TextStream) -> String {
    let mut out = String::new();
    while let Some(fragment) = stream.next().await {
        out.push_str(&fragment.unwrap());
    }
    out
}

#[tokio::test]
async fn first_candidate_wins_and_later_candidates_are_never_invoked() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/model-a:streamGenerateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sse_body(&["# Doc"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/model-b:streamGenerateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sse_body(&["unused"])))
        .expect(0)
        .mount(&server)
        .await;

    let parts = vec![PromptPart::Text("prompt".to_owned())];
    let (stream, winner) =
        generate_with_fallback(&client, &parts, "sys", &chain(&["model-a", "model-b"]), BACKOFF)
            .await
            .unwrap();

    assert_eq!(winner, "model-a");
    assert_eq!(collect(stream).await, "# Doc");
}

#[tokio::test]
async fn failed_candidate_advances_to_next() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/model-a:streamGenerateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/model-b:streamGenerateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sse_body(&["from b"])))
        .expect(1)
        .mount(&server)
        .await;

    let parts = vec![PromptPart::Text("prompt".to_owned())];
    let (stream, winner) =
        generate_with_fallback(&client, &parts, "sys", &chain(&["model-a", "model-b"]), BACKOFF)
            .await
            .unwrap();

    assert_eq!(winner, "model-b");
    assert_eq!(collect(stream).await, "from b");
}

#[tokio::test]
async fn every_candidate_failing_exhausts_the_chain() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    for model in ["model-a", "model-b", "model-c"] {
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{model}:streamGenerateContent")))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(1)
            .mount(&server)
            .await;
    }

    let parts = vec![PromptPart::Text("prompt".to_owned())];
    let err = generate_with_fallback(
        &client,
        &parts,
        "sys",
        &chain(&["model-a", "model-b", "model-c"]),
        BACKOFF,
    )
    .await
    .err()
    .expect("chain should be exhausted");

    assert!(matches!(err, ProviderError::AllModelsExhausted));
    assert_eq!(err.to_string(), "All AI models failed to respond.");
}

#[tokio::test]
async fn empty_chain_is_exhausted_immediately() {
    let server = MockServer::start().await;
    let client = test_client(&server);
    let parts = vec![PromptPart::Text("prompt".to_owned())];
    let err = generate_with_fallback(&client, &parts, "sys", &[], BACKOFF)
        .await
        .err()
        .expect("chain should be exhausted");
    assert!(matches!(err, ProviderError::AllModelsExhausted));
}

#[tokio::test]
async fn stream_fragments_concatenate_in_emission_order() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/m:streamGenerateContent"))
        .and(query_param("alt", "sse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(sse_body(&["# Title\n", "body ", "end"])),
        )
        .mount(&server)
        .await;

    let parts = vec![PromptPart::Text("prompt".to_owned())];
    let stream = client.stream_generate("m", &parts, "sys").await.unwrap();
    assert_eq!(collect(stream).await, "# Title\nbody end");
}

#[tokio::test]
async fn upload_parses_handle_and_state() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "file": {"name": "files/abc", "uri": "https://p/files/abc", "state": "PROCESSING"}
        })))
        .mount(&server)
        .await;

    let (handle, state) = client.upload_asset(vec![1, 2, 3], "video/webm").await.unwrap();
    assert_eq!(handle.name, "files/abc");
    assert_eq!(handle.uri, "https://p/files/abc");
    assert_eq!(state, AssetState::Processing);
}

#[tokio::test]
async fn poller_resolves_after_processing_cycles() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    // First-mounted matching mock wins; the capped PROCESSING mock goes
    // first so two processing cycles are served before ACTIVE.
    Mock::given(method("GET"))
        .and(path("/v1beta/files/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "files/abc", "uri": "", "state": "PROCESSING"
        })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta/files/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "files/abc", "uri": "https://p/files/abc", "state": "ACTIVE"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handle = AssetHandle { name: "files/abc".to_owned(), uri: String::new() };
    let policy = PollPolicy { interval: Duration::from_millis(1), max_attempts: 10 };
    let ready = await_ready(&client, &handle, &policy).await.unwrap();
    assert_eq!(ready.uri, "https://p/files/abc");
}

#[tokio::test]
async fn poller_treats_failed_as_fatal() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/v1beta/files/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "files/abc", "uri": "", "state": "FAILED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handle = AssetHandle { name: "files/abc".to_owned(), uri: String::new() };
    let policy = PollPolicy { interval: Duration::from_millis(1), max_attempts: 10 };
    let err = await_ready(&client, &handle, &policy).await.unwrap_err();
    assert!(matches!(err, ProviderError::AssetProcessingFailed(_)));
}

#[tokio::test]
async fn poller_times_out_after_max_attempts() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/v1beta/files/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "files/abc", "uri": "", "state": "PROCESSING"
        })))
        .expect(3)
        .mount(&server)
        .await;

    let handle = AssetHandle { name: "files/abc".to_owned(), uri: String::new() };
    let policy = PollPolicy { interval: Duration::from_millis(1), max_attempts: 3 };
    let err = await_ready(&client, &handle, &policy).await.unwrap_err();
    assert!(matches!(err, ProviderError::ProcessingTimeout { attempts: 3 }));
}

#[tokio::test]
async fn poller_timeout_has_no_trailing_interval_wait() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/v1beta/files/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "files/abc", "uri": "", "state": "PROCESSING"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handle = AssetHandle { name: "files/abc".to_owned(), uri: String::new() };
    let policy = PollPolicy { interval: Duration::from_secs(30), max_attempts: 1 };
    let started = std::time::Instant::now();
    let err = await_ready(&client, &handle, &policy).await.unwrap_err();
    assert!(matches!(err, ProviderError::ProcessingTimeout { attempts: 1 }));
    // A single allowed attempt must fail immediately, not after the interval.
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn chat_replays_history_and_returns_reply() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/m:generateContent"))
        .and(body_partial_json(serde_json::json!({
            "contents": [
                {"role": "user", "parts": [{"text": "Generate documentation."}]},
                {"role": "model", "parts": [{"text": "# Doc"}]},
                {"role": "user", "parts": [{"text": "What about tests?"}]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_body("the reply")))
        .expect(1)
        .mount(&server)
        .await;

    let history = vec![
        HistoryTurn::new(
            TurnRole::User,
            vec![PromptPart::Text("Generate documentation.".to_owned())],
        ),
        HistoryTurn::new(TurnRole::Model, vec![PromptPart::Text("# Doc".to_owned())]),
    ];
    let reply = client.chat("m", "sys", &history, "What about tests?").await.unwrap();
    assert_eq!(reply, "the reply");
}

#[tokio::test]
async fn non_success_status_is_not_retried_by_the_client() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/m:generateContent"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let parts = vec![PromptPart::Text("p".to_owned())];
    let err = client.generate("m", &parts, "sys").await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("401"));
    assert!(msg.contains("Unauthorized"));
}
