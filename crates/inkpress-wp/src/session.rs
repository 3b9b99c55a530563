//! HTTP session with bounded retry.

use inkpress_core::{Error, Result};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::warn;

const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];
const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Reqwest client wrapper that retries transient failures.
///
/// Requests that come back 429/500/502/503/504 are re-sent up to three more
/// times with exponential backoff starting at 500ms. Any other status is
/// returned to the caller untouched. One session is built per logical
/// operation so retry state never leaks across invocations.
pub struct WpSession {
    client: Client,
}

impl WpSession {
    pub fn new(user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }

    /// Send a request, retrying transient statuses.
    ///
    /// The builder closure is invoked once per attempt because request
    /// bodies (multipart in particular) are not reusable across sends.
    pub(crate) async fn execute<F>(&self, make: F) -> Result<Response>
    where
        F: Fn(&Client) -> Result<RequestBuilder>,
    {
        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 0;
        loop {
            let response = make(&self.client)?.send().await?;
            let status = response.status().as_u16();
            if RETRY_STATUSES.contains(&status) && attempt < MAX_RETRIES {
                attempt += 1;
                warn!(status, attempt, "transient response, retrying");
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                continue;
            }
            return Ok(response);
        }
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}

/// Fail with [`Error::UnexpectedStatus`] unless the response is 2xx.
pub(crate) fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}
