//! HTTP client for the Expo push relay
//!
//! One request per message: `POST {relay_url}` with the JSON message
//! `{to, sound, title, body, data}`. The relay answers with a ticket under
//! `data`; a ticket whose status is `error` counts as a failed send.

use classifieds_common::create_client;
use classifieds_common::models::{PushMessage, PushTicket};
use classifieds_common::services::{BoxFuture, PushRelay};
use classifieds_config::PushConfig;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::PushError;

#[derive(Debug, Deserialize)]
struct RelayResponse {
    data: RelayTicket,
}

#[derive(Debug, Deserialize)]
struct RelayTicket {
    status: String,
    id: Option<String>,
    message: Option<String>,
}

/// Client for the push relay HTTP endpoint
#[derive(Debug, Clone)]
pub struct ExpoPushClient {
    client: Client,
    relay_url: String,
}

impl ExpoPushClient {
    /// Creates a client for the configured relay endpoint and timeout.
    pub fn new(config: &PushConfig) -> Result<Self, PushError> {
        Ok(Self {
            client: create_client(config.timeout_secs)?,
            relay_url: config.relay_url.clone(),
        })
    }

    /// Creates a client that reuses an existing HTTP client.
    pub fn with_client(client: Client, relay_url: impl Into<String>) -> Self {
        Self {
            client,
            relay_url: relay_url.into(),
        }
    }

    /// Sends one message to the relay and returns its ticket.
    ///
    /// # Errors
    ///
    /// * The HTTP request fails
    /// * The relay answers with a non-2xx status
    /// * The relay's ticket has status `error`
    pub async fn send_message(&self, message: &PushMessage) -> Result<PushTicket, PushError> {
        debug!("Sending push message to {}", message.to);

        let response = self
            .client
            .post(&self.relay_url)
            .header(header::ACCEPT, "application/json")
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await?;
            return Err(PushError::RelayError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: RelayResponse = response.json().await?;
        if body.data.status == "error" {
            let reason = body
                .data
                .message
                .unwrap_or_else(|| "unknown relay error".to_string());
            warn!("Relay rejected message for {}: {}", message.to, reason);
            return Err(PushError::TicketError(reason));
        }

        Ok(PushTicket {
            id: body.data.id,
            status: body.data.status,
        })
    }
}

impl PushRelay for ExpoPushClient {
    type Error = PushError;

    fn send(&self, message: PushMessage) -> BoxFuture<'_, PushTicket, Self::Error> {
        Box::pin(async move { self.send_message(&message).await })
    }
}
