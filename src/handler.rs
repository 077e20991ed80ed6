//! The capability every routed handler implements, and the per-turn context
//! handed to it.

use async_trait::async_trait;
use std::sync::Arc;

use crate::catalog::ProductCatalog;
use crate::error::DispatchError;
use crate::event::{Event, RequestScope};
use crate::facts::FactCatalog;
use crate::product::ProductCatalogSnapshot;
use crate::response::{CorrelationTokens, SpokenResponse};
use crate::speech::Phrasebook;

/// Long-lived collaborators shared by all handlers. Never mutated after
/// startup.
#[derive(Clone)]
pub struct Context {
    pub skill_name: String,
    pub catalog: Arc<dyn ProductCatalog>,
    pub facts: Arc<FactCatalog>,
    pub phrases: Phrasebook,
    pub tokens: CorrelationTokens,
}

impl Context {
    pub fn new(
        skill_name: impl Into<String>,
        catalog: Arc<dyn ProductCatalog>,
        facts: Arc<FactCatalog>,
    ) -> Self {
        Self {
            skill_name: skill_name.into(),
            catalog,
            facts,
            phrases: Phrasebook::default(),
            tokens: CorrelationTokens::default(),
        }
    }

    pub fn with_tokens(mut self, tokens: CorrelationTokens) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_phrases(mut self, phrases: Phrasebook) -> Self {
        self.phrases = phrases;
        self
    }
}

/// Everything a handler may consult while answering one event.
#[derive(Clone, Copy)]
pub struct Turn<'a> {
    pub context: &'a Context,
    pub scope: &'a RequestScope,
}

impl<'a> Turn<'a> {
    pub fn new(context: &'a Context, scope: &'a RequestScope) -> Self {
        Self { context, scope }
    }

    /// Fetch the product snapshot for this turn.
    ///
    /// Handlers call this at most once and use the result throughout.
    pub async fn snapshot(&self) -> Result<ProductCatalogSnapshot, DispatchError> {
        let snapshot = self.context.catalog.fetch_products(self.scope).await?;
        Ok(snapshot)
    }

    pub fn facts(&self) -> &'a FactCatalog {
        &self.context.facts
    }

    pub fn phrases(&self) -> &'a Phrasebook {
        &self.context.phrases
    }

    pub fn mint_token(&self) -> String {
        self.context.tokens.mint()
    }
}

/// A routed unit of behaviour: a predicate plus the response it produces.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Stable name used in logs and order tests.
    fn name(&self) -> &'static str;

    fn matches(&self, event: &Event) -> bool;

    async fn handle(
        &self,
        turn: &Turn<'_>,
        event: &Event,
    ) -> Result<SpokenResponse, DispatchError>;
}
