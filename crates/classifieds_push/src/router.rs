//! Notification tap routing
//!
//! A tapped notification carries `{screen, params}` in its content data. The
//! router turns that into a [`NavigationCommand`] and hands it to whichever
//! navigator is mounted. Navigators mount by taking a receiver and unmount by
//! dropping it or calling [`NotificationRouter::unmount`].

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Routing data decoded from a notification.
///
/// Decoding never fails: data that is not an object, or a `screen` that is
/// not a string, yields an empty message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RoutingMessage {
    pub screen: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub params: Option<Value>,
}

impl RoutingMessage {
    pub fn from_data(data: &Value) -> Self {
        Self {
            screen: data
                .get("screen")
                .and_then(Value::as_str)
                .map(str::to_string),
            params: data.get("params").filter(|p| !p.is_null()).cloned(),
        }
    }

    /// The navigation this message asks for, if it names a screen.
    pub fn into_command(self) -> Option<NavigationCommand> {
        let screen = self.screen.filter(|s| !s.is_empty())?;
        Some(NavigationCommand {
            screen,
            params: self.params,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NavigationCommand {
    pub screen: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Navigated(NavigationCommand),
    /// The payload named no screen
    NoScreen,
    NotMounted,
}

/// Delivers navigation commands to the mounted navigator.
#[derive(Debug, Default)]
pub struct NotificationRouter {
    navigator: RwLock<Option<mpsc::UnboundedSender<NavigationCommand>>>,
}

impl NotificationRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a navigator, replacing any previous one.
    pub fn mount(&self) -> mpsc::UnboundedReceiver<NavigationCommand> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.navigator.write().unwrap_or_else(|e| e.into_inner()) = Some(tx);
        debug!("Navigator mounted");
        rx
    }

    pub fn unmount(&self) {
        *self.navigator.write().unwrap_or_else(|e| e.into_inner()) = None;
        debug!("Navigator unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.navigator
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    pub fn route(&self, message: RoutingMessage) -> RouteOutcome {
        let Some(command) = message.into_command() else {
            debug!("Notification without screen ignored");
            return RouteOutcome::NoScreen;
        };

        let guard = self.navigator.read().unwrap_or_else(|e| e.into_inner());
        let Some(tx) = guard.as_ref() else {
            debug!("No navigator mounted, dropping route to {}", command.screen);
            return RouteOutcome::NotMounted;
        };

        match tx.send(command.clone()) {
            Ok(()) => {
                info!("Navigating to {}", command.screen);
                RouteOutcome::Navigated(command)
            }
            Err(_) => {
                debug!("Navigator went away, dropping route to {}", command.screen);
                RouteOutcome::NotMounted
            }
        }
    }

    /// Route the raw content data of a tapped notification.
    pub fn route_data(&self, data: &Value) -> RouteOutcome {
        self.route(RoutingMessage::from_data(data))
    }

    /// Route every notification response arriving on `responses` until the
    /// sending side closes.
    pub async fn run(&self, mut responses: mpsc::Receiver<Value>) {
        while let Some(data) = responses.recv().await {
            self.route_data(&data);
        }
        debug!("Notification response stream closed");
    }
}
