use reqwest::Client;
use std::sync::Arc;

use crate::catalog::{HttpProductCatalog, ProductCatalog};
use crate::config::{CatalogConfig, Config};
use crate::correlator::{BuyResponse, CancelResponse, UpsellResponse};
use crate::envelope::{self, ResponseEnvelope};
use crate::error::{ConfigError, EnvelopeError, RouterError};
use crate::event::{Event, RequestScope};
use crate::facts::FactCatalog;
use crate::handler::{Context, Turn};
use crate::handlers::{
    Buy, CancelSubscription, Fallback, GetCategoryFact, GetFact, Help, Launch, No, ProductDetail,
    SessionEnd, Shopping, Yes,
};
use crate::response::SpokenResponse;
use crate::retry::RetryCatalog;
use crate::router::Router;

/// The production handler order. Specific intents come before the
/// connection responses, and the intent catch-all comes last.
pub fn default_router() -> Result<Router, RouterError> {
    Router::builder()
        .register(Launch)
        .register(GetFact)
        .register(Yes)
        .register(No)
        .register(GetCategoryFact)
        .register(BuyResponse)
        .register(CancelResponse)
        .register(UpsellResponse)
        .register(Shopping)
        .register(ProductDetail)
        .register(Buy)
        .register(CancelSubscription)
        .register(Help)
        .register(SessionEnd)
        .register(Fallback)
        .build()
}

/// HTTP catalog client with the configured retry policy.
pub fn http_catalog(config: &CatalogConfig) -> Result<Arc<dyn ProductCatalog>, ConfigError> {
    let client = Client::builder()
        .user_agent(concat!("premium-facts/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let http = match &config.endpoint {
        Some(endpoint) => HttpProductCatalog::with_endpoint(client, endpoint.clone()),
        None => HttpProductCatalog::new(client),
    };
    Ok(Arc::new(RetryCatalog::new(http, config.retry_policy())))
}

/// A fully wired skill: shared collaborators plus the router.
///
/// Holds no per-request state, so one instance can serve any number of
/// concurrent requests behind an `Arc`.
pub struct Skill {
    context: Context,
    router: Router,
}

impl Skill {
    /// Wire `context` to the production router.
    pub fn new(context: Context) -> Result<Self, RouterError> {
        Ok(Self::with_router(context, default_router()?))
    }

    pub fn with_router(context: Context, router: Router) -> Self {
        Self { context, router }
    }

    /// Build from configuration. `catalog` replaces the HTTP client when given.
    pub async fn from_config(
        config: &Config,
        catalog: Option<Arc<dyn ProductCatalog>>,
    ) -> Result<Self, ConfigError> {
        let facts = match &config.facts_file {
            Some(path) => FactCatalog::load(path).await?,
            None => FactCatalog::builtin()?,
        };
        let catalog = match catalog {
            Some(catalog) => catalog,
            None => http_catalog(&config.catalog)?,
        };
        tracing::info!(
            skill = %config.skill_name,
            facts = facts.len(),
            categories = ?facts.categories(),
            "skill configured"
        );
        let context = Context::new(config.skill_name.clone(), catalog, Arc::new(facts))
            .with_tokens(config.purchase.correlation_token.clone());
        Ok(Self::new(context)?)
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Answer one already-decoded event.
    pub async fn handle(&self, scope: &RequestScope, event: &Event) -> SpokenResponse {
        let turn = Turn::new(&self.context, scope);
        self.router.dispatch(&turn, event).await
    }

    /// Decode an inbound envelope, answer it and encode the reply.
    pub async fn handle_envelope(&self, text: &str) -> Result<ResponseEnvelope, EnvelopeError> {
        let (scope, event) = envelope::decode(text)?;
        let response = self.handle(&scope, &event).await;
        Ok(envelope::encode(&response))
    }
}
