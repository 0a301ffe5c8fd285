#![allow(dead_code)]

use std::sync::Once;

use inbox_preview::Config;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const API_PATH: &str = "/gmail/v1/users/me";
pub const TOKEN_PATH: &str = "/token";

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

pub fn config(server: &MockServer, max_page_size: u32, batch_size: usize) -> Config {
    Config::from_values(
        "client-id",
        "client-secret",
        Some(format!("{}{TOKEN_PATH}", server.uri())),
        Some(format!("{}{API_PATH}", server.uri())),
        Some(max_page_size),
        Some(batch_size),
    )
}

pub fn list_path() -> String {
    format!("{API_PATH}/messages")
}

fn query_value(req: &Request, key: &str) -> Option<String> {
    req.url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Listing endpoint over a mailbox of `total` messages named `m0`, `m1`, ...
/// Page tokens are the decimal offset of the next page. `total = None`
/// never runs out.
pub async fn mount_mailbox(server: &MockServer, total: Option<usize>) {
    Mock::given(method("GET"))
        .and(path(list_path()))
        .respond_with(move |req: &Request| {
            let offset: usize = query_value(req, "pageToken")
                .and_then(|t| t.parse().ok())
                .unwrap_or(0);
            let max: usize = query_value(req, "maxResults")
                .and_then(|m| m.parse().ok())
                .expect("maxResults is always sent");
            let end = match total {
                Some(total) => (offset + max).min(total),
                None => offset + max,
            };
            let messages: Vec<_> = (offset..end)
                .map(|i| serde_json::json!({"id": format!("m{i}"), "threadId": format!("t{i}")}))
                .collect();
            let mut body = serde_json::json!({
                "messages": messages,
                "resultSizeEstimate": total.unwrap_or(0),
            });
            if total.is_none_or(|total| end < total) {
                body["nextPageToken"] = serde_json::json!(end.to_string());
            }
            ResponseTemplate::new(200).set_body_json(body)
        })
        .mount(server)
        .await;
}

/// Detail endpoint answering for any id with headers derived from it.
pub async fn mount_details(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(format!(r"^{API_PATH}/messages/[^/]+$")))
        .respond_with(|req: &Request| {
            let id = req
                .url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .unwrap_or_default()
                .to_string();
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": id,
                "snippet": format!("snippet of {id}"),
                "payload": {"headers": [
                    {"name": "Subject", "value": format!("subject {id}")},
                    {"name": "From", "value": "Alice <alice@example.com>"},
                    {"name": "Date", "value": "Fri, 18 Oct 2024 09:30:00 +0000"}
                ]}
            }))
        })
        .mount(server)
        .await;
}

pub async fn count_requests(server: &MockServer, predicate: impl Fn(&Request) -> bool) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|&r| predicate(r))
        .count()
}

pub fn is_list_call(req: &Request) -> bool {
    req.url.path() == list_path()
}

pub fn is_detail_call(req: &Request) -> bool {
    req.url.path().starts_with(&format!("{}/", list_path()))
}

pub fn max_results_sent(req: &Request) -> Option<String> {
    query_value(req, "maxResults")
}
