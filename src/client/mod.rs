//! Publish orchestrator.
//!
//! [`PushClient`] batches one or more [`PushMessage`] values into a
//! single POST to the Expo push endpoint and classifies the response
//! into per-message receipts or a typed batch failure. The client holds
//! no mutable state besides its endpoint URL and transport handle, so it
//! can be cloned cheaply and shared across concurrent publish calls.
//!
//! Retry and backoff are deliberately left to the caller: transient
//! transport failures and `MessageRateExceeded` receipts should be
//! retried with exponential backoff.

use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};
use tracing::{debug, instrument, warn};

use crate::error::{PushError, Result};
use crate::message::PushMessage;
use crate::response::{PushResponse, ResponseData};

const DEFAULT_HOST: &str = "https://exp.host";
const DEFAULT_API_BASE: &str = "/--/api/v2";
const SEND_PATH: &str = "/push/send";

/// Client for the Expo push notification HTTP/2 API.
///
/// See the service docs at
/// <https://docs.expo.dev/push-notifications/sending-notifications/>.
#[derive(Debug, Clone)]
pub struct PushClient {
    http: reqwest::Client,
    push_url: Url,
}

impl PushClient {
    /// Create a client against the default host (`https://exp.host`)
    /// with an internally constructed transport that negotiates
    /// gzip/deflate response decompression.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder to override the host, API base path, or the
    /// HTTP transport.
    pub fn builder() -> PushClientBuilder {
        PushClientBuilder::default()
    }

    /// The resolved push endpoint URL.
    pub fn push_url(&self) -> &Url {
        &self.push_url
    }

    /// Send a single push notification.
    ///
    /// Delegates to [`publish_multiple`](Self::publish_multiple) with a
    /// one-element batch and returns its sole receipt.
    pub async fn publish(&self, message: &PushMessage) -> Result<PushResponse> {
        self.publish_multiple(std::slice::from_ref(message))
            .await?
            .into_iter()
            .next()
            .ok_or(PushError::EmptyBatch)
    }

    /// Send multiple push notifications in one request.
    ///
    /// Returns one receipt per message, index-aligned with the input:
    /// `result[i]` corresponds to `messages[i]`. The whole batch is
    /// rendered and validated before the network call; any invalid token
    /// aborts the call with no partial submission. Batch-level integrity
    /// problems (rejected request, missing `data`, receipt count
    /// mismatch) fail the call as a whole, while per-receipt errors are
    /// returned as data for the caller to inspect via
    /// [`PushResponse::validate`].
    #[instrument(skip(self, messages), fields(batch_size = messages.len()))]
    pub async fn publish_multiple(&self, messages: &[PushMessage]) -> Result<Vec<PushResponse>> {
        if messages.is_empty() {
            return Err(PushError::EmptyBatch);
        }

        // Render everything up front so a bad token never reaches the
        // wire. Order is preserved for index alignment with the receipts.
        let payloads = messages
            .iter()
            .map(PushMessage::to_payload)
            .collect::<Result<Vec<_>>>()?;

        debug!(url = %self.push_url, "sending push batch");
        let response = self
            .http
            .post(self.push_url.clone())
            .header(ACCEPT, "application/json")
            .json(&payloads)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "push endpoint returned non-200");
            return Err(PushError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        let mut data: ResponseData = serde_json::from_str(&body)
            .map_err(|source| PushError::InvalidResponseBody { source, body: body.clone() })?;

        // A non-empty errors array means the whole batch was rejected,
        // independent of whatever is in data.
        if data.errors.as_ref().is_some_and(|errors| !errors.is_empty()) {
            let errors = data.errors.clone().unwrap_or_default();
            warn!(errors = errors.len(), "push service rejected the batch");
            return Err(PushError::BatchRequest { errors, response: data, body });
        }

        match data.data.take() {
            Some(receipts) if receipts.len() == messages.len() => {
                debug!(receipts = receipts.len(), "push batch accepted");
                Ok(receipts)
            }
            Some(receipts) => {
                let actual = receipts.len();
                data.data = Some(receipts);
                Err(PushError::MismatchedResponseLength {
                    expected: messages.len(),
                    actual,
                    response: data,
                    body,
                })
            }
            None => Err(PushError::InvalidServerResponse { response: data, body }),
        }
    }
}

/// Builder for [`PushClient`].
#[derive(Debug, Clone, Default)]
pub struct PushClientBuilder {
    host: Option<String>,
    api_base: Option<String>,
    http_client: Option<reqwest::Client>,
}

impl PushClientBuilder {
    /// Override the server protocol, hostname, and port.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Override the API base path at the host.
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Supply a pre-configured transport, e.g. one with timeouts or a
    /// proxy. The client never tears down a caller-supplied transport;
    /// `reqwest::Client` handles are reference-counted and released on
    /// drop.
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Build the client, resolving the push endpoint URL.
    pub fn build(self) -> Result<PushClient> {
        let host = self
            .host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(DEFAULT_HOST);
        let api_base = self
            .api_base
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(DEFAULT_API_BASE);

        let push_url = Url::parse(&format!("{host}{api_base}{SEND_PATH}"))
            .map_err(|e| PushError::InvalidUrl(e.to_string()))?;

        let http = match self.http_client {
            Some(http) => http,
            None => reqwest::Client::builder().gzip(true).deflate(true).build()?,
        };

        Ok(PushClient { http, push_url })
    }
}
