//! Push message model.
//!
//! A [`PushMessage`] describes one notification request. It is immutable
//! after construction and renders itself into the Expo wire payload via
//! [`PushMessage::to_payload`]. Recipient tokens are validated at render
//! time, not at construction, so an invalid message can be built but will
//! fail before any network call is made.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::PushError;

/// Token prefix required by the Expo push service.
const TOKEN_PREFIX: &str = "ExponentPushToken";

/// Returns `true` if the token is an Exponent push token.
///
/// A valid token is non-blank and starts with `ExponentPushToken`,
/// e.g. `ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]`. This is a pure
/// predicate; the service itself is the final authority on whether the
/// token is registered.
pub fn is_exponent_push_token(token: &str) -> bool {
    !token.trim().is_empty() && token.starts_with(TOKEN_PREFIX)
}

/// A sound to play when the recipient receives the notification.
///
/// `Default` plays the device's default notification sound; `None` omits
/// the field from the payload so no sound is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushSound {
    #[default]
    None,
    Default,
}

impl PushSound {
    pub fn is_none(&self) -> bool {
        matches!(self, PushSound::None)
    }
}

impl Serialize for PushSound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PushSound::None => serializer.serialize_none(),
            PushSound::Default => serializer.serialize_str("default"),
        }
    }
}

impl<'de> Deserialize<'de> for PushSound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(match value.as_deref() {
            Some(s) if s.eq_ignore_ascii_case("default") => PushSound::Default,
            _ => PushSound::None,
        })
    }
}

/// Delivery priority of the message.
///
/// Specify `Default` to use the default priority on each platform, which
/// is `normal` on Android and `high` on iOS. On Android, normal-priority
/// messages may be delayed to conserve battery; high-priority messages
/// are delivered immediately and may wake sleeping devices. `None` omits
/// the field from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushPriority {
    None,
    #[default]
    Default,
    Normal,
    High,
}

impl PushPriority {
    pub fn is_none(&self) -> bool {
        matches!(self, PushPriority::None)
    }
}

impl Serialize for PushPriority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PushPriority::None => serializer.serialize_none(),
            PushPriority::Default => serializer.serialize_str("default"),
            PushPriority::Normal => serializer.serialize_str("normal"),
            PushPriority::High => serializer.serialize_str("high"),
        }
    }
}

impl<'de> Deserialize<'de> for PushPriority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(match value.as_deref() {
            Some(s) if s.eq_ignore_ascii_case("default") => PushPriority::Default,
            Some(s) if s.eq_ignore_ascii_case("normal") => PushPriority::Normal,
            Some(s) if s.eq_ignore_ascii_case("high") => PushPriority::High,
            _ => PushPriority::None,
        })
    }
}

/// A push notification request for a single recipient.
///
/// Unset optional fields are omitted from the wire payload entirely;
/// only `to`, `priority` (defaulting to `"default"`) and
/// `display_in_foreground` (defaulting to `false`) are always present.
#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    /// A token of the form `ExponentPushToken[xxxxxxx]`.
    pub to: String,
    /// Extra data to pass inside the push notification. The total
    /// notification payload must be at most 4096 bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// The title to display in the notification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The message to display in the notification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// A sound to play when the recipient receives the notification.
    #[serde(skip_serializing_if = "PushSound::is_none")]
    pub sound: PushSound,
    /// Number of seconds the message may be kept around for redelivery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i32>,
    /// UNIX timestamp for when this message expires. Same effect as
    /// `ttl`, as an absolute timestamp instead of a relative one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<i32>,
    /// Delivery priority of the message.
    #[serde(skip_serializing_if = "PushPriority::is_none")]
    pub priority: PushPriority,
    /// Unread notification count to show on the app icon (iOS only).
    /// Specify 0 to clear the badge count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<i32>,
    /// ID of the notification category through which to display this
    /// notification (iOS).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// ID of the notification channel through which to display this
    /// notification on Android. If the channel does not exist on the
    /// device, the notification is not shown to the user.
    #[serde(rename = "channelId", skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// Displays the notification when the app is foregrounded.
    #[serde(rename = "display_in_foreground")]
    pub display_in_foreground: bool,
}

impl PushMessage {
    /// Create a message with only a recipient token; all optional fields
    /// are unset and `priority` is `Default`.
    pub fn new(to: impl Into<String>) -> Self {
        PushMessageBuilder::new(to).build()
    }

    /// Create a builder for a message to the given recipient.
    pub fn builder(to: impl Into<String>) -> PushMessageBuilder {
        PushMessageBuilder::new(to)
    }

    /// Validate the recipient token and render the wire payload.
    ///
    /// Fails with [`PushError::InvalidToken`] when the token does not
    /// satisfy [`is_exponent_push_token`]. Rendering is deterministic and
    /// produces a fresh value on every call.
    pub fn to_payload(&self) -> Result<serde_json::Value, PushError> {
        if !is_exponent_push_token(&self.to) {
            return Err(PushError::InvalidToken(self.to.clone()));
        }
        serde_json::to_value(self).map_err(PushError::Serialize)
    }
}

/// Builder for [`PushMessage`].
#[derive(Debug, Clone)]
pub struct PushMessageBuilder {
    to: String,
    data: Option<serde_json::Value>,
    title: Option<String>,
    body: Option<String>,
    sound: PushSound,
    ttl: Option<i32>,
    expiration: Option<i32>,
    priority: PushPriority,
    badge: Option<i32>,
    category: Option<String>,
    channel_id: Option<String>,
    display_in_foreground: bool,
}

impl PushMessageBuilder {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            data: None,
            title: None,
            body: None,
            sound: PushSound::None,
            ttl: None,
            expiration: None,
            priority: PushPriority::default(),
            badge: None,
            category: None,
            channel_id: None,
            display_in_foreground: false,
        }
    }

    /// Set the extra data payload.
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the data payload from a serializable value.
    pub fn data_from<T: Serialize>(mut self, data: &T) -> Result<Self, serde_json::Error> {
        self.data = Some(serde_json::to_value(data)?);
        Ok(self)
    }

    /// Set the notification title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the notification body text.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the notification sound.
    pub fn sound(mut self, sound: PushSound) -> Self {
        self.sound = sound;
        self
    }

    /// Set the time-to-live in seconds.
    pub fn ttl(mut self, ttl: i32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the absolute expiration timestamp.
    pub fn expiration(mut self, expiration: i32) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Set the delivery priority.
    pub fn priority(mut self, priority: PushPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the iOS badge count.
    pub fn badge(mut self, badge: i32) -> Self {
        self.badge = Some(badge);
        self
    }

    /// Set the iOS notification category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the Android notification channel ID.
    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    /// Display the notification while the app is foregrounded.
    pub fn display_in_foreground(mut self, display: bool) -> Self {
        self.display_in_foreground = display;
        self
    }

    /// Build the push message.
    pub fn build(self) -> PushMessage {
        PushMessage {
            to: self.to,
            data: self.data,
            title: self.title,
            body: self.body,
            sound: self.sound,
            ttl: self.ttl,
            expiration: self.expiration,
            priority: self.priority,
            badge: self.badge,
            category: self.category,
            channel_id: self.channel_id,
            display_in_foreground: self.display_in_foreground,
        }
    }
}
