// --- File: crates/classifieds_common/src/models.rs ---

// Data structures shared between the store, the push components and the
// HTTP handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user profile record.
///
/// One record per authenticated identity, keyed by `user_id`. The push token
/// is overwritten on every registration; no history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserProfile {
    /// The identity this profile belongs to
    pub user_id: String,

    /// Account email captured at sign-up
    pub email: Option<String>,

    /// Most recently registered device push token
    pub push_token: Option<String>,

    /// The timestamp when this profile was created
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Create a new profile without a push token
    pub fn new(user_id: String, email: Option<String>) -> Self {
        Self {
            user_id,
            email,
            push_token: None,
            created_at: Some(Utc::now()),
        }
    }

    /// The push token, if it is present and non-empty.
    pub fn deliverable_token(&self) -> Option<&str> {
        self.push_token.as_deref().filter(|token| !token.is_empty())
    }
}

/// A user-submitted listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Ad {
    /// Store-generated identifier, immutable
    pub id: String,
    pub name: String,
    #[serde(alias = "desc")]
    pub description: String,
    /// Year of purchase, as entered
    pub year: String,
    /// Asking price, as entered
    pub price: String,
    pub phone: String,
    /// Download URL of the uploaded photo, or the configured default reference
    pub image: String,
    /// Identity of the poster, immutable
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// The fields of an ad before the store assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAd {
    pub name: String,
    pub description: String,
    pub year: String,
    pub price: String,
    pub phone: String,
    pub image: String,
    pub owner_id: String,
}

/// The fields an owner may change on an existing ad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AdUpdate {
    pub name: String,
    #[serde(alias = "desc")]
    pub description: String,
    pub price: String,
    pub year: String,
}

/// An identity as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

/// Explicit signed-in context handed to every operation that needs a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    /// Provider-issued bearer token for this session
    pub id_token: String,
}

impl Session {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
        }
    }
}

/// Routing data embedded in a notification: where the app should navigate on tap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RouteData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub params: Option<serde_json::Value>,
}

impl RouteData {
    pub fn to_screen(screen: impl Into<String>) -> Self {
        Self {
            screen: Some(screen.into()),
            params: None,
        }
    }
}

/// One notification addressed to a single device token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PushMessage {
    /// Target device token
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    pub title: String,
    pub body: String,
    pub data: RouteData,
}

/// The relay's acknowledgement of a single send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PushTicket {
    /// Relay-assigned receipt id, when the relay returns one
    pub id: Option<String>,
    pub status: String,
}
