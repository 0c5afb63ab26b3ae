// --- File: crates/classifieds_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite:data/classifieds.db, loaded via CLASSIFIEDS__DATABASE__URL
}

// --- Firebase Config ---
// Holds non-secret Firebase config. The web api key is loaded from env vars.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FirebaseConfig {
    pub api_key: String, // Secret: CLASSIFIEDS_SECRET_FIREBASE_API_KEY or FIREBASE_API_KEY
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>, // Mandatory for image uploads
    #[serde(default = "default_auth_base_url")]
    pub auth_base_url: String,
    #[serde(default = "default_storage_base_url")]
    pub storage_base_url: String,
}

fn default_auth_base_url() -> String {
    "https://identitytoolkit.googleapis.com".to_string()
}

fn default_storage_base_url() -> String {
    "https://firebasestorage.googleapis.com".to_string()
}

// --- Push Relay Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PushConfig {
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_body")]
    pub body: String,
    #[serde(default = "default_sound")]
    pub sound: Option<String>,
    /// Screen the client navigates to when the notification is tapped.
    #[serde(default = "default_target_screen")]
    pub target_screen: String,
    /// Upper bound of relay sends in flight; 1 keeps them strictly sequential.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_relay_url() -> String {
    "https://exp.host/--/api/v2/push/send".to_string()
}

fn default_title() -> String {
    "New Ad Posted!".to_string()
}

fn default_body() -> String {
    "Check out the new ad posted in the app.".to_string()
}

fn default_sound() -> Option<String> {
    Some("default".to_string())
}

fn default_target_screen() -> String {
    "Home".to_string()
}

fn default_max_concurrency() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            title: default_title(),
            body: default_body(),
            sound: default_sound(),
            target_screen: default_target_screen(),
            max_concurrency: default_max_concurrency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// --- Ads Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdsConfig {
    /// Image reference stored when an ad is posted without a photo.
    #[serde(default = "default_image_url")]
    pub default_image_url: String,
    /// Prefix of the object path images are uploaded to.
    #[serde(default = "default_image_prefix")]
    pub image_prefix: String,
    /// Largest accepted request body on the ad routes, base64 photo included.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_image_url() -> String {
    "default-image-url".to_string()
}

fn default_image_prefix() -> String {
    "ads".to_string()
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            default_image_url: default_image_url(),
            image_prefix: default_image_prefix(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    // Server config is mandatory
    #[serde(default)]
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_push: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub firebase: Option<FirebaseConfig>,
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub ads: AdsConfig,
}
