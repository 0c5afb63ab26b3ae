//! New-ad fan-out
//!
//! After an ad is stored, every profile's push token is read and one
//! independent relay send is issued per non-empty token. A fixed pool of
//! workers drains the tokens in order; each result is collected into a
//! [`DispatchReport`] in the order the tokens were read. A failed send is
//! logged and the queue moves on. There is no retry and no deduplication.

use std::sync::{Arc, Mutex};

use classifieds_common::models::{Ad, PushMessage, RouteData, UserProfile};
use classifieds_common::services::PushRelay;
use classifieds_config::PushConfig;
use classifieds_db::ProfileRepository;
use serde::Serialize;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::error::PushError;

/// Message content and queue width for a fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchConfig {
    pub title: String,
    pub body: String,
    pub sound: Option<String>,
    /// Screen the notification routes to when tapped
    pub target_screen: String,
    /// Relay sends allowed in flight at once; at least 1
    pub max_concurrency: usize,
}

impl From<&PushConfig> for DispatchConfig {
    fn from(config: &PushConfig) -> Self {
        Self {
            title: config.title.clone(),
            body: config.body.clone(),
            sound: config.sound.clone(),
            target_screen: config.target_screen.clone(),
            max_concurrency: config.max_concurrency,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::from(&PushConfig::default())
    }
}

/// What happened to the send for one token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered { ticket_id: Option<String> },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenResult {
    pub token: String,
    pub outcome: DeliveryOutcome,
}

/// Per-token results of one fan-out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DispatchReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
    /// One entry per attempted token, in the order the tokens were read
    pub results: Vec<TokenResult>,
}

impl DispatchReport {
    fn from_results(results: Vec<TokenResult>) -> Self {
        let delivered = results
            .iter()
            .filter(|r| matches!(r.outcome, DeliveryOutcome::Delivered { .. }))
            .count();
        Self {
            attempted: results.len(),
            delivered,
            failed: results.len() - delivered,
            results,
        }
    }

    /// Tokens whose send failed. Nothing prunes them automatically.
    pub fn failed_tokens(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, DeliveryOutcome::Failed { .. }))
            .map(|r| r.token.as_str())
            .collect()
    }
}

/// Broadcasts the new-ad notification to every registered device.
pub struct FanOutDispatcher<R> {
    relay: Arc<R>,
    config: DispatchConfig,
}

impl<R> FanOutDispatcher<R>
where
    R: PushRelay + 'static,
{
    pub fn new(relay: Arc<R>, config: DispatchConfig) -> Self {
        Self { relay, config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// The tokens a fan-out targets: present and non-empty, in profile order.
    pub fn deliverable_tokens(profiles: &[UserProfile]) -> Vec<String> {
        profiles
            .iter()
            .filter_map(UserProfile::deliverable_token)
            .map(str::to_string)
            .collect()
    }

    /// The message sent to one token.
    pub fn message_for(&self, token: &str) -> PushMessage {
        build_message(&self.config, token)
    }

    /// Send one message per token and collect the results.
    ///
    /// `max_concurrency` workers drain one shared queue in token order, so
    /// with a width of 1 the sends go out one after another in that order.
    pub async fn dispatch(&self, tokens: Vec<String>) -> DispatchReport {
        let width = self.config.max_concurrency.max(1).min(tokens.len());
        let queue = Arc::new(Mutex::new(tokens.clone().into_iter().enumerate()));
        let mut workers = JoinSet::new();

        for _ in 0..width {
            let relay = Arc::clone(&self.relay);
            let queue = Arc::clone(&queue);
            let config = self.config.clone();

            workers.spawn(async move {
                let mut done = Vec::new();
                loop {
                    let next = queue.lock().unwrap_or_else(|e| e.into_inner()).next();
                    let Some((index, token)) = next else { break };

                    let outcome = match relay.send(build_message(&config, &token)).await {
                        Ok(ticket) => DeliveryOutcome::Delivered { ticket_id: ticket.id },
                        Err(e) => DeliveryOutcome::Failed {
                            reason: e.to_string(),
                        },
                    };
                    done.push((index, outcome));
                }
                done
            });
        }

        let mut outcomes: Vec<Option<DeliveryOutcome>> = vec![None; tokens.len()];
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(done) => {
                    for (index, outcome) in done {
                        outcomes[index] = Some(outcome);
                    }
                }
                Err(e) => error!("Push worker failed: {}", PushError::TaskError(e.to_string())),
            }
        }

        let results: Vec<TokenResult> = tokens
            .into_iter()
            .zip(outcomes)
            .map(|(token, outcome)| {
                let outcome = outcome.unwrap_or_else(|| DeliveryOutcome::Failed {
                    reason: "send task did not complete".to_string(),
                });
                if let DeliveryOutcome::Failed { reason } = &outcome {
                    warn!("Error sending notification to {}: {}", token, reason);
                }
                TokenResult { token, outcome }
            })
            .collect();

        DispatchReport::from_results(results)
    }

    /// Notify every registered device about a newly created ad.
    ///
    /// # Errors
    ///
    /// Fails only when the profiles cannot be read; individual send failures
    /// are reported in the returned [`DispatchReport`].
    pub async fn dispatch_new_ad<P>(&self, profiles: &P, ad: &Ad) -> Result<DispatchReport, PushError>
    where
        P: ProfileRepository,
    {
        let all = profiles.find_all().await?;
        let tokens = Self::deliverable_tokens(&all);
        debug!(
            "Fan-out for ad {}: {} of {} profiles have a token",
            ad.id,
            tokens.len(),
            all.len()
        );

        let report = self.dispatch(tokens).await;
        info!(
            "Fan-out for ad {} finished: {} delivered, {} failed",
            ad.id, report.delivered, report.failed
        );
        Ok(report)
    }
}

fn build_message(config: &DispatchConfig, token: &str) -> PushMessage {
    PushMessage {
        to: token.to_string(),
        sound: config.sound.clone(),
        title: config.title.clone(),
        body: config.body.clone(),
        data: RouteData::to_screen(config.target_screen.clone()),
    }
}

/// Run the new-ad fan-out on its own task.
///
/// The caller gets the handle but is not expected to await it; the report is
/// logged when the task finishes.
pub fn spawn_fan_out<R, P>(
    dispatcher: Arc<FanOutDispatcher<R>>,
    profiles: Arc<P>,
    ad: Ad,
) -> JoinHandle<Option<DispatchReport>>
where
    R: PushRelay + 'static,
    P: ProfileRepository + 'static,
{
    tokio::spawn(async move {
        match dispatcher.dispatch_new_ad(profiles.as_ref(), &ad).await {
            Ok(report) => Some(report),
            Err(e) => {
                error!("Fan-out for ad {} aborted: {}", ad.id, e);
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FakeRelay, RelayBehaviour};
    use chrono::Utc;
    use classifieds_db::{DbClient, SqlProfileRepository};

    fn ad() -> Ad {
        Ad {
            id: "ad-1".to_string(),
            name: "Bike".to_string(),
            description: "Red".to_string(),
            year: "2020".to_string(),
            price: "100".to_string(),
            phone: "555".to_string(),
            image: "default-image-url".to_string(),
            owner_id: "u1".to_string(),
            created_at: Utc::now(),
        }
    }

    async fn profiles_with_tokens(tokens: &[Option<&str>]) -> SqlProfileRepository {
        let client = DbClient::from_url("sqlite::memory:").await.unwrap();
        let repo = SqlProfileRepository::new(client);
        repo.init_schema().await.unwrap();
        for (i, token) in tokens.iter().enumerate() {
            let user_id = format!("user-{}", i);
            match token {
                Some(token) => repo.upsert_push_token(&user_id, token).await.unwrap(),
                None => repo
                    .put_profile(UserProfile::new(user_id, None))
                    .await
                    .unwrap(),
            }
        }
        repo
    }

    #[tokio::test]
    async fn test_only_non_empty_tokens_are_sent() {
        let relay = Arc::new(FakeRelay::new(RelayBehaviour::AcceptAll));
        let dispatcher = FanOutDispatcher::new(relay.clone(), DispatchConfig::default());
        let profiles = profiles_with_tokens(&[Some("A"), Some("B"), Some(""), None]).await;

        let report = dispatcher.dispatch_new_ad(&profiles, &ad()).await.unwrap();

        let mut sent = relay.sent_tokens();
        sent.sort();
        assert_eq!(sent, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(report.attempted, 2);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_message_content_and_routing() {
        let relay = Arc::new(FakeRelay::new(RelayBehaviour::AcceptAll));
        let dispatcher = FanOutDispatcher::new(relay.clone(), DispatchConfig::default());

        dispatcher.dispatch(vec!["A".to_string()]).await;

        let sent = relay.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "New Ad Posted!");
        assert_eq!(sent[0].body, "Check out the new ad posted in the app.");
        assert_eq!(sent[0].sound.as_deref(), Some("default"));
        assert_eq!(sent[0].data, RouteData::to_screen("Home"));
    }

    #[tokio::test]
    async fn test_failed_send_does_not_stop_queue() {
        let relay = Arc::new(FakeRelay::new(RelayBehaviour::RejectToken("B".to_string())));
        let dispatcher = FanOutDispatcher::new(relay.clone(), DispatchConfig::default());

        let report = dispatcher
            .dispatch(vec!["A".to_string(), "B".to_string(), "C".to_string()])
            .await;

        assert_eq!(relay.sent_tokens().len(), 3);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failed_tokens(), vec!["B"]);
        let order: Vec<&str> = report.results.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_default_queue_is_sequential() {
        let relay = Arc::new(FakeRelay::new(RelayBehaviour::AcceptAll));
        let dispatcher = FanOutDispatcher::new(relay.clone(), DispatchConfig::default());

        let tokens: Vec<String> = (0..8).map(|i| format!("T{}", i)).collect();
        dispatcher.dispatch(tokens).await;

        assert_eq!(relay.max_in_flight(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_worker_sends_in_profile_order() {
        let relay = Arc::new(FakeRelay::new(RelayBehaviour::AcceptAll));
        let dispatcher = FanOutDispatcher::new(relay.clone(), DispatchConfig::default());

        let tokens: Vec<String> = (0..16).map(|i| format!("T{}", i)).collect();
        dispatcher.dispatch(tokens.clone()).await;

        assert_eq!(relay.sent_tokens(), tokens);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let relay = Arc::new(FakeRelay::new(RelayBehaviour::AcceptAll));
        let config = DispatchConfig {
            max_concurrency: 3,
            ..DispatchConfig::default()
        };
        let dispatcher = FanOutDispatcher::new(relay.clone(), config);

        let tokens: Vec<String> = (0..12).map(|i| format!("T{}", i)).collect();
        let report = dispatcher.dispatch(tokens).await;

        assert_eq!(report.delivered, 12);
        assert!(relay.max_in_flight() <= 3);
    }

    #[tokio::test]
    async fn test_no_tokens_means_no_sends() {
        let relay = Arc::new(FakeRelay::new(RelayBehaviour::AcceptAll));
        let dispatcher = FanOutDispatcher::new(relay.clone(), DispatchConfig::default());
        let profiles = profiles_with_tokens(&[None, Some("")]).await;

        let report = dispatcher.dispatch_new_ad(&profiles, &ad()).await.unwrap();

        assert_eq!(report, DispatchReport::default());
        assert!(relay.sent().is_empty());
    }

    #[tokio::test]
    async fn test_spawned_fan_out_returns_report() {
        let relay = Arc::new(FakeRelay::new(RelayBehaviour::AcceptAll));
        let dispatcher = Arc::new(FanOutDispatcher::new(relay.clone(), DispatchConfig::default()));
        let profiles = Arc::new(profiles_with_tokens(&[Some("A")]).await);

        let report = spawn_fan_out(dispatcher, profiles, ad()).await.unwrap().unwrap();

        assert_eq!(report.delivered, 1);
    }
}
