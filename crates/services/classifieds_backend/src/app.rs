//! Router assembly for the classifieds server

use std::sync::Arc;

use axum::{routing::get, Router};
use classifieds_ads::AdsState;
use classifieds_common::services::{AuthEvent, AuthProvider};
use classifieds_config::AppConfig;
use classifieds_db::{
    AdRepository, AdRepositoryFactory, DbClientFactory, ProfileRepository,
    ProfileRepositoryFactory, RepositoryFactory,
};
use classifieds_firebase::{FirebaseAuthClient, FirebaseStorageClient};
use classifieds_push::{DispatchConfig, ExpoPushClient, FanOutDispatcher};
use tokio::sync::broadcast::{self, error::RecvError};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::StartupError;

/// The assembled server: the router plus the auth provider whose events
/// the caller may want to follow.
pub struct App {
    pub router: Router,
    pub auth: Arc<FirebaseAuthClient>,
}

/// Build every client and repository from the configuration and mount the
/// account, push and ad routes under `/api`.
///
/// # Errors
///
/// Fails when the `firebase` section is missing, the database cannot be
/// opened or its schema created, or one of the HTTP clients cannot be built.
pub async fn build_app(config: Arc<AppConfig>) -> Result<App, StartupError> {
    let firebase = config
        .firebase
        .as_ref()
        .ok_or(StartupError::MissingSection("firebase"))?;

    let db = DbClientFactory::new().from_app_config(&config).await?;
    let profiles = Arc::new(ProfileRepositoryFactory::new().create_repository(db.clone()));
    let ads = Arc::new(AdRepositoryFactory::new().create_repository(db));
    profiles.init_schema().await?;
    ads.init_schema().await?;

    let auth = Arc::new(FirebaseAuthClient::new(firebase)?);
    let storage = Arc::new(FirebaseStorageClient::new(firebase)?);

    let dispatcher: Option<Arc<FanOutDispatcher<ExpoPushClient>>> = if config.use_push {
        let relay = Arc::new(ExpoPushClient::new(&config.push)?);
        Some(Arc::new(FanOutDispatcher::new(
            relay,
            DispatchConfig::from(&config.push),
        )))
    } else {
        info!("Push disabled, ads will be posted without fan-out");
        None
    };

    let account_router = classifieds_firebase::routes(auth.clone(), profiles.clone());
    let push_router = classifieds_push::routes(auth.clone(), profiles.clone());
    let ads_router = classifieds_ads::routes(AdsState {
        auth: auth.clone(),
        ads,
        profiles,
        storage,
        dispatcher,
        config: config.ads.clone(),
    });

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Classifieds API!" }))
        .merge(account_router)
        .merge(push_router)
        .merge(ads_router);

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut router = Router::new().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        router = router.merge(swagger_ui());
    }

    Ok(App {
        router: router.layer(TraceLayer::new_for_http()),
        auth,
    })
}

#[cfg(feature = "openapi")]
fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    use classifieds_ads::openapi::AdsApiDoc;
    use classifieds_firebase::openapi::FirebaseApiDoc;
    use classifieds_push::openapi::PushApiDoc;
    use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
    use utoipa::OpenApi;

    struct BearerAuth;

    impl utoipa::Modify for BearerAuth {
        fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
            let components = openapi.components.get_or_insert_with(Default::default);
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }

    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Classifieds API",
            version = "0.1.0",
            description = "Accounts, ads and push notifications",
            license(name = "MIT", url = "https://opensource.org/licenses/MIT")
        ),
        modifiers(&BearerAuth),
        servers((url = "/api", description = "Main API Prefix")),
    )]
    struct ApiDoc;

    let mut openapi_doc = ApiDoc::openapi();
    openapi_doc.merge(FirebaseApiDoc::openapi());
    openapi_doc.merge(PushApiDoc::openapi());
    openapi_doc.merge(AdsApiDoc::openapi());
    info!("Adding Swagger UI at /api/docs");

    utoipa_swagger_ui::SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc)
}

/// Log sign-in and sign-out transitions until the provider goes away.
pub async fn log_auth_events(mut events: broadcast::Receiver<AuthEvent>) {
    loop {
        match events.recv().await {
            Ok(AuthEvent::SignedIn(identity)) => info!("User {} signed in", identity.user_id),
            Ok(AuthEvent::SignedOut(identity)) => info!("User {} signed out", identity.user_id),
            Err(RecvError::Lagged(skipped)) => warn!("Auth event log skipped {} events", skipped),
            Err(RecvError::Closed) => break,
        }
    }
}

/// Spawn [`log_auth_events`] for the app's auth provider.
pub fn spawn_auth_event_log(auth: &FirebaseAuthClient) -> tokio::task::JoinHandle<()> {
    tokio::spawn(log_auth_events(auth.subscribe()))
}
