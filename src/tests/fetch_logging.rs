use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::tests::test_support::{API_PATH, base_config, capture_logs, drain_logs};
use crate::{Error, FetchPhase, GmailClient, RequestDispatchContext};

#[tokio::test]
async fn failed_listing_logs_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API_PATH}/messages")))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .expect(1)
        .mount(&server)
        .await;

    let client = GmailClient::new(RequestDispatchContext::new(base_config(&server.uri())))
        .expect("valid config");

    let (lines, guard) = capture_logs();
    let err = client
        .list_user_messages("expired", Some(5))
        .await
        .expect_err("401 must fail the call");
    drop(guard);

    match err {
        Error::Fetch { phase, status } => {
            assert_eq!(phase, FetchPhase::List);
            assert_eq!(status.as_u16(), 401);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let logs = drain_logs(lines);
    assert!(
        logs.iter().any(|line| line.contains("ERROR")
            && line.contains("list failed")
            && line.contains("invalid credentials")),
        "expected error log with body, got: {:?}",
        logs
    );
    assert!(
        logs.iter().any(|line| line.contains("fetch.outcome")
            && line.contains("list_messages")
            && line.contains("success=false")),
        "expected failed list outcome, got: {:?}",
        logs
    );
    assert!(
        !logs.iter().any(|line| line.contains("list_messages") && line.contains("success=true")),
        "failed page must not be reported as a success: {:?}",
        logs
    );
}

#[tokio::test]
async fn each_batch_emits_fetch_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API_PATH}/messages")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": [{"id": "a"}, {"id": "b"}, {"id": "c"}, {"id": "d"}]
        })))
        .mount(&server)
        .await;
    for id in ["a", "b", "c", "d"] {
        Mock::given(method("GET"))
            .and(path(format!("{API_PATH}/messages/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": id,
                "snippet": "",
                "payload": {"headers": []}
            })))
            .mount(&server)
            .await;
    }

    let client = GmailClient::new(RequestDispatchContext::new(base_config(&server.uri())))
        .expect("valid config");

    let (lines, guard) = capture_logs();
    let previews = client
        .list_user_messages("token", Some(4))
        .await
        .expect("listing succeeds");
    drop(guard);

    assert_eq!(previews.len(), 4);
    let logs = drain_logs(lines);
    let batches = logs
        .iter()
        .filter(|line| line.contains("fetch.outcome") && line.contains("get_message_batch"))
        .count();
    // batch size 3 in the test config: [a, b, c] then [d]
    assert_eq!(batches, 2, "logs: {:?}", logs);
}
