//! Server response model and per-receipt error classification.
//!
//! A 200 response from the push service carries either a `data` array
//! with one [`PushResponse`] per submitted message, or an `errors` array
//! describing a batch-level rejection. Per-receipt failures are embedded
//! in an otherwise successful batch and are classified lazily via
//! [`PushResponse::validate`].

use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback text when an error receipt carries no usable description.
const UNKNOWN_RECEIPT: &str = "Unknown push response error";

/// Outcome status of one receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStatus {
    Ok,
    Error,
}

impl Serialize for PushStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PushStatus::Ok => serializer.serialize_str("ok"),
            PushStatus::Error => serializer.serialize_str("error"),
        }
    }
}

impl<'de> Deserialize<'de> for PushStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        if value.eq_ignore_ascii_case("ok") {
            Ok(PushStatus::Ok)
        } else {
            Ok(PushStatus::Error)
        }
    }
}

/// Machine-readable detail attached to an error receipt.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentDetails {
    /// Error code, e.g. `DeviceNotRegistered`.
    #[serde(default)]
    pub error: Option<String>,
}

/// One recipient's outcome within a batch.
///
/// A successful receipt is `{"status": "ok"}`; a failed one carries a
/// human-readable `message` and machine-readable `details`:
/// `{"status": "error", "message": "...", "details": {"error": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PushResponse {
    pub status: PushStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<ContentDetails>,
}

impl PushResponse {
    /// Returns `true` if this push notification was accepted for
    /// delivery. Never fails.
    pub fn is_success(&self) -> bool {
        self.status == PushStatus::Ok
    }

    /// Raises a typed error if this receipt reports a failure, otherwise
    /// does nothing.
    ///
    /// Callers should handle each variant explicitly since they require
    /// different remediation: stop sending on `DeviceNotRegistered`,
    /// shrink the payload on `MessageTooBig`, back off exponentially on
    /// `MessageRateExceeded`. Purely local; no I/O.
    pub fn validate(&self) -> Result<(), ReceiptError> {
        if self.is_success() {
            return Ok(());
        }

        let text = self.to_string();
        match self.details.as_ref().and_then(|d| d.error.as_deref()) {
            Some("DeviceNotRegistered") => Err(ReceiptError::DeviceNotRegistered(text)),
            Some("MessageTooBig") => Err(ReceiptError::MessageTooBig(text)),
            Some("MessageRateExceeded") => Err(ReceiptError::MessageRateExceeded(text)),
            _ => Err(ReceiptError::Unknown(text)),
        }
    }
}

impl fmt::Display for PushResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, self.details.as_ref().and_then(|d| d.error.as_deref())) {
            (Some(message), Some(code)) => write!(f, "{code}: {message}"),
            (Some(message), None) => write!(f, "{message}"),
            (None, Some(code)) => write!(f, "{code}"),
            (None, None) => write!(f, "{UNKNOWN_RECEIPT}"),
        }
    }
}

/// One batch-level error.
///
/// Distinct from per-receipt errors: these arise from malformed requests
/// (for example a wrong field type), not from an invalid individual
/// recipient.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseError {
    pub code: String,
    pub message: String,
}

/// Decoded top-level response envelope.
///
/// A non-empty `errors` array signals a batch-level failure regardless
/// of `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseData {
    #[serde(default)]
    pub data: Option<Vec<PushResponse>>,
    #[serde(default)]
    pub errors: Option<Vec<ResponseError>>,
}

/// Classified per-receipt failure, raised by [`PushResponse::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiptError {
    /// The push token is no longer valid. Stop sending messages to this
    /// token.
    #[error("{0}")]
    DeviceNotRegistered(String),

    /// The notification was too large. On Android and iOS the total
    /// payload must be at most 4096 bytes.
    #[error("{0}")]
    MessageTooBig(String),

    /// Messages are being sent too frequently to this device. Implement
    /// exponential backoff and slowly retry.
    #[error("{0}")]
    MessageRateExceeded(String),

    /// The service reported an error this client does not recognize.
    #[error("{0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_receipt(code: Option<&str>, message: Option<&str>) -> PushResponse {
        PushResponse {
            status: PushStatus::Error,
            message: message.map(String::from),
            details: Some(ContentDetails {
                error: code.map(String::from),
            }),
        }
    }

    #[test]
    fn test_validate_device_not_registered() {
        let receipt = error_receipt(Some("DeviceNotRegistered"), None);

        assert!(!receipt.is_success());
        assert!(matches!(
            receipt.validate(),
            Err(ReceiptError::DeviceNotRegistered(_))
        ));
    }

    #[test]
    fn test_validate_message_too_big() {
        let receipt = error_receipt(Some("MessageTooBig"), None);
        assert!(matches!(receipt.validate(), Err(ReceiptError::MessageTooBig(_))));
    }

    #[test]
    fn test_validate_message_rate_exceeded() {
        let receipt = error_receipt(Some("MessageRateExceeded"), None);
        assert!(matches!(
            receipt.validate(),
            Err(ReceiptError::MessageRateExceeded(_))
        ));
    }

    #[test]
    fn test_validate_unrecognized_code() {
        let receipt = error_receipt(Some("Other"), None);
        assert!(matches!(receipt.validate(), Err(ReceiptError::Unknown(_))));
    }

    #[test]
    fn test_validate_missing_details() {
        let receipt = PushResponse {
            status: PushStatus::Error,
            message: None,
            details: None,
        };

        let err = receipt.validate().unwrap_err();
        assert_eq!(err, ReceiptError::Unknown(UNKNOWN_RECEIPT.to_string()));
    }

    #[test]
    fn test_validate_is_noop_on_success() {
        let receipt = PushResponse {
            status: PushStatus::Ok,
            message: None,
            // A stray detail on a successful receipt must not raise.
            details: Some(ContentDetails {
                error: Some("Other".to_string()),
            }),
        };

        assert!(receipt.is_success());
        assert!(receipt.validate().is_ok());
    }

    #[test]
    fn test_receipt_error_carries_code_and_message() {
        let receipt = error_receipt(
            Some("DeviceNotRegistered"),
            Some("\"ExponentPushToken[x]\" is not a registered push notification recipient"),
        );

        let err = receipt.validate().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("DeviceNotRegistered"));
        assert!(text.contains("not a registered push notification recipient"));
    }

    #[test]
    fn test_status_decodes_case_insensitively() {
        assert_eq!(serde_json::from_str::<PushStatus>("\"OK\"").unwrap(), PushStatus::Ok);
        assert_eq!(serde_json::from_str::<PushStatus>("\"ok\"").unwrap(), PushStatus::Ok);
        assert_eq!(
            serde_json::from_str::<PushStatus>("\"Error\"").unwrap(),
            PushStatus::Error
        );
        // Unknown statuses decode conservatively as errors.
        assert_eq!(
            serde_json::from_str::<PushStatus>("\"pending\"").unwrap(),
            PushStatus::Error
        );
    }

    #[test]
    fn test_decode_success_envelope() {
        let body = r#"{"data": [{"status": "ok"}, {"status": "error", "message": "bad", "details": {"error": "MessageTooBig"}}]}"#;
        let envelope: ResponseData = serde_json::from_str(body).unwrap();

        let data = envelope.data.unwrap();
        assert_eq!(data.len(), 2);
        assert!(data[0].is_success());
        assert!(!data[1].is_success());
        assert_eq!(data[1].message.as_deref(), Some("bad"));
        assert!(envelope.errors.is_none());
    }

    #[test]
    fn test_decode_batch_error_envelope() {
        let body = r#"{"errors": [{"code": "API_ERROR", "message": "child \"to\" fails"}]}"#;
        let envelope: ResponseData = serde_json::from_str(body).unwrap();

        assert!(envelope.data.is_none());
        let errors = envelope.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "API_ERROR");
    }
}
