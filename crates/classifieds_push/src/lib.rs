//! Push notifications for the classifieds backend
//!
//! Three pieces:
//!
//! - [`registry::TokenRegistry`] stores a user's device push token on their
//!   profile after sign-in.
//! - [`dispatcher::FanOutDispatcher`] sends the "new ad" notification to
//!   every stored token through a bounded worker queue.
//! - [`router::NotificationRouter`] turns a tapped notification's
//!   `{screen, params}` data into a navigation command.
//!
//! [`client::ExpoPushClient`] is the HTTP relay the dispatcher sends through.
//!
//! # API Endpoints
//!
//! - `POST /push/token` - Register the caller's device token
//! - `POST /push/route` - Resolve notification data into a navigation

pub mod client;
pub mod dispatcher;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod error;
pub mod handlers;
#[cfg(test)]
mod mock;
pub mod registry;
pub mod router;
pub mod routes;

pub use client::ExpoPushClient;
pub use dispatcher::{spawn_fan_out, DispatchConfig, DispatchReport, FanOutDispatcher};
pub use error::PushError;
pub use registry::{ClientSuppliedToken, PushTokenSource, RegistrationOutcome, TokenRegistry};
pub use router::{NavigationCommand, NotificationRouter, RouteOutcome, RoutingMessage};
pub use routes::routes;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::PushApiDoc;
}
