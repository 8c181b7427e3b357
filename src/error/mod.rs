//! Error taxonomy for publish operations.
//!
//! Three tiers: validation errors raised locally before any I/O,
//! transport errors from the HTTP layer, and protocol errors where the
//! service answered 200 but the envelope is unusable. Per-receipt errors
//! are not part of this taxonomy; they are returned as data and
//! classified by [`crate::response::PushResponse::validate`].

use thiserror::Error;

use crate::response::{ResponseData, ResponseError};

#[derive(Error, Debug)]
pub enum PushError {
    /// The recipient token does not look like an Exponent push token.
    /// Raised at render time, before any network call.
    #[error("Invalid push token: {0:?}")]
    InvalidToken(String),

    /// `publish_multiple` was called with an empty batch.
    #[error("No messages to publish")]
    EmptyBatch,

    /// The configured host or API base does not form a valid URL.
    #[error("Invalid push endpoint URL: {0}")]
    InvalidUrl(String),

    /// Connection-level failure (DNS, TLS, timeout). Propagated from the
    /// transport unwrapped.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-200 status; the body is not
    /// interpreted.
    #[error("{status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    /// A message could not be rendered to JSON.
    #[error("Failed to serialize push message: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The service answered 200 with a body that is not a valid
    /// response envelope.
    #[error("Failed to decode server response: {source}")]
    InvalidResponseBody {
        #[source]
        source: serde_json::Error,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// The entire batch was rejected, e.g. because the request was
    /// malformed. Carries the batch-level error list.
    #[error("Request failed.")]
    BatchRequest {
        errors: Vec<ResponseError>,
        response: ResponseData,
        body: String,
    },

    /// The service answered 200 but the envelope carries no `data`.
    #[error("Invalid server response.")]
    InvalidServerResponse { response: ResponseData, body: String },

    /// The number of receipts does not match the number of submitted
    /// messages. Guards against silent truncation or duplication.
    #[error("Mismatched response length. Expected {expected}, but only {actual} received.")]
    MismatchedResponseLength {
        expected: usize,
        actual: usize,
        response: ResponseData,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, PushError>;
