//! Gmail REST client producing inbox previews
//!
//! Listing runs first and collects every requested identifier, then
//! metadata is fetched in bounded concurrent batches.

use std::time::Instant;

use reqwest::Response;
use tracing::{debug, error, info};

use crate::errors::{Error, FetchPhase};
use crate::request_context::RequestDispatchContext;
use crate::telemetry::fetch::{FetchOperation, FetchOutcome};

use super::batch::BatchPlan;
use super::headers::METADATA_HEADERS;
use super::pagination::PageBudget;
use super::types::{ListMessagesResponse, MessageMetadata, MessagePreview};

pub struct GmailClient {
    ctx: RequestDispatchContext,
    batch: BatchPlan,
}

impl GmailClient {
    pub fn new(ctx: RequestDispatchContext) -> Result<Self, Error> {
        ctx.config().validate()?;
        let batch = BatchPlan::new(ctx.config().batch_size)?;
        Ok(Self { ctx, batch })
    }

    /// Lists up to `limit` messages as previews, in provider order.
    ///
    /// `None` lists the whole mailbox. A non-positive limit returns an empty
    /// list without touching the network. Any non-success response aborts the
    /// call; no partial result is returned.
    pub async fn list_user_messages(
        &self,
        access_token: &str,
        limit: Option<i64>,
    ) -> Result<Vec<MessagePreview>, Error> {
        let ids = self.list_message_ids(access_token, limit).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let previews = self
            .batch
            .run(&ids, |id: &String| self.get_preview(access_token, id.clone()))
            .await?;
        info!("listed {} message previews", previews.len());
        Ok(previews)
    }

    /// Walks the listing pages until the budget or the stream runs out.
    pub async fn list_message_ids(
        &self,
        access_token: &str,
        limit: Option<i64>,
    ) -> Result<Vec<String>, Error> {
        let mut budget = PageBudget::new(limit, self.ctx.config().max_page_size);
        let mut ids: Vec<String> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0;

        while !budget.is_exhausted() {
            let start = Instant::now();
            let result = self
                .list_page(access_token, budget.next_page_size(), page_token.as_deref())
                .await;
            let received = match &result {
                Ok(page) => page.messages.as_ref().map(Vec::len).unwrap_or(0),
                Err(_) => 0,
            };
            FetchOutcome {
                operation: FetchOperation::ListMessages,
                sequence: pages,
                items: received,
                success: result.is_ok(),
                elapsed: start.elapsed(),
            }
            .log();
            let page = result?;
            pages += 1;

            ids.extend(page.messages.unwrap_or_default().into_iter().map(|m| m.id));
            budget.consume(received);
            if !budget.should_continue(received, page.next_page_token.as_deref()) {
                break;
            }
            page_token = page.next_page_token;
        }

        if let Some(cap) = PageBudget::limit_cap(limit) {
            ids.truncate(cap);
        }
        debug!("collected {} message ids over {} pages", ids.len(), pages);
        Ok(ids)
    }

    async fn list_page(
        &self,
        access_token: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<ListMessagesResponse, Error> {
        let mut url = format!(
            "{}/messages?maxResults={}&q=",
            self.ctx.config().api_base(),
            max_results
        );
        if let Some(token) = page_token {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
        }

        let resp = self.ctx.authorized_get(&url, access_token).send().await?;
        let resp = ensure_success(resp, FetchPhase::List).await?;
        Ok(resp.json().await?)
    }

    async fn get_preview(&self, access_token: &str, id: String) -> Result<MessagePreview, Error> {
        let headers = METADATA_HEADERS
            .iter()
            .map(|h| format!("&metadataHeaders={}", h))
            .collect::<String>();
        let url = format!(
            "{}/messages/{}?format=metadata{}",
            self.ctx.config().api_base(),
            urlencoding::encode(&id),
            headers
        );

        let resp = self.ctx.authorized_get(&url, access_token).send().await?;
        let resp = ensure_success(resp, FetchPhase::Detail).await?;
        let metadata: MessageMetadata = resp.json().await?;
        Ok(MessagePreview::from(metadata))
    }
}

async fn ensure_success(resp: Response, phase: FetchPhase) -> Result<Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().path().to_string();
    let body = resp.text().await.unwrap_or_default();
    error!("{}: status={} path='{}' body='{}'", phase, status, url, body);
    Err(Error::Fetch { phase, status })
}
