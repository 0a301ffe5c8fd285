use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::tests::test_support::{TOKEN_PATH, base_config, capture_logs, drain_logs};
use crate::token::{FixedClock, TokenError, TokenRecord, TokenRefresher};
use crate::RequestDispatchContext;

fn stale_record() -> TokenRecord {
    TokenRecord {
        access_token: Some("stale-access".into()),
        access_token_expires: Some(1_000),
        refresh_token: Some("refresh-1".into()),
        error: None,
    }
}

#[tokio::test]
async fn rejected_refresh_logs_failure_and_flags_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Token has been expired or revoked."
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let refresher = TokenRefresher::with_clock(
        RequestDispatchContext::new(base_config(&server.uri())),
        Arc::new(FixedClock::new(5_000)),
    );

    let (lines, guard) = capture_logs();
    let record = refresher.refresh_session(stale_record()).await;
    drop(guard);

    assert_eq!(record.error, Some(TokenError::RefreshAccessTokenError));
    assert_eq!(record.access_token.as_deref(), Some("stale-access"));
    assert_eq!(record.usable_access_token(), None);

    let logs = drain_logs(lines);
    assert!(
        logs.iter()
            .any(|line| line.contains("ERROR") && line.contains("refresh.failure")),
        "expected refresh.failure event, got: {:?}",
        logs
    );
    assert!(
        logs.iter().any(|line| line.contains("invalid_grant")),
        "expected provider error code in logs, got: {:?}",
        logs
    );
}

#[tokio::test]
async fn successful_refresh_never_logs_token_value() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "very-secret-access-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let refresher = TokenRefresher::with_clock(
        RequestDispatchContext::new(base_config(&server.uri())),
        Arc::new(FixedClock::new(5_000)),
    );

    let (lines, guard) = capture_logs();
    let record = refresher
        .ensure_fresh_token(&stale_record())
        .await
        .expect("refresh succeeds");
    drop(guard);

    assert_eq!(record.access_token.as_deref(), Some("very-secret-access-token"));
    let logs = drain_logs(lines);
    assert!(logs.iter().any(|line| line.contains("refresh.success")));
    assert!(
        !logs.iter().any(|line| line.contains("very-secret-access-token")),
        "token leaked into logs: {:?}",
        logs
    );
}
