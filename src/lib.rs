//! Async client for the Expo push notification service.
//!
//! Construct one or more [`PushMessage`] values, publish them in a
//! single batch with [`PushClient`], and inspect the returned receipts.
//! Batch-level problems (rejected request, unusable response) fail the
//! whole call with a [`PushError`]; per-recipient problems are returned
//! as data and classified on demand with [`PushResponse::validate`].
//!
//! The client performs no retries. Callers should retry transport
//! failures and `MessageRateExceeded` receipts with exponential backoff.
//!
//! # Example
//!
//! ```no_run
//! use expo_push_client::{PushClient, PushMessage, PushSound};
//!
//! # async fn run() -> expo_push_client::Result<()> {
//! let client = PushClient::new()?;
//! let message = PushMessage::builder("ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]")
//!     .title("New order")
//!     .body("Order #123 has shipped")
//!     .sound(PushSound::Default)
//!     .build();
//!
//! let receipt = client.publish(&message).await?;
//! if let Err(err) = receipt.validate() {
//!     eprintln!("push rejected: {err}");
//! }
//! # Ok(())
//! # }
//! ```

// Message model (leaf)
pub mod message;
pub mod response;

// Publish orchestrator
pub mod client;

// Supporting modules
pub mod error;

pub use client::{PushClient, PushClientBuilder};
pub use error::{PushError, Result};
pub use message::{is_exponent_push_token, PushMessage, PushMessageBuilder, PushPriority, PushSound};
pub use response::{
    ContentDetails, PushResponse, PushStatus, ReceiptError, ResponseData, ResponseError,
};
