use async_trait::async_trait;

use super::intent_of;
use crate::entitlement::{Access, authorize_category};
use crate::error::DispatchError;
use crate::event::{Event, IntentRequest, intents, slots};
use crate::facts::FactCatalog;
use crate::handler::{Handler, Turn};
use crate::response::{Directive, SpokenResponse};
use crate::speech::join_alternatives;

/// A fact from the whole table, free for everyone.
pub struct GetFact;

impl GetFact {
    pub(crate) fn respond(turn: &Turn<'_>) -> Result<SpokenResponse, DispatchError> {
        let fact = turn.facts().random_fact(None)?;
        let phrases = turn.phrases();
        Ok(SpokenResponse::speak(format!(
            "Here's your random fact: {} {}",
            fact.text,
            phrases.yes_no_question()
        ))
        .ask(phrases.yes_no_question()))
    }
}

#[async_trait]
impl Handler for GetFact {
    fn name(&self) -> &'static str {
        "GetFact"
    }

    fn matches(&self, event: &Event) -> bool {
        event.is_intent(intents::GET_FACT)
    }

    async fn handle(
        &self,
        turn: &Turn<'_>,
        _event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        Self::respond(turn)
    }
}

/// "Yes" to another fact behaves exactly like asking for one.
pub struct Yes;

#[async_trait]
impl Handler for Yes {
    fn name(&self) -> &'static str {
        "Yes"
    }

    fn matches(&self, event: &Event) -> bool {
        event.is_intent(intents::YES)
    }

    async fn handle(
        &self,
        turn: &Turn<'_>,
        event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        GetFact.handle(turn, event).await
    }
}

/// A fact from one category, gated on owning its pack or the bundle.
pub struct GetCategoryFact;

/// The requested category if it resolved to one the fact table knows.
fn requested_category<'a>(
    facts: &FactCatalog,
    intent: &'a IntentRequest,
) -> Result<&'a str, DispatchError> {
    intent
        .resolved(slots::FACT_CATEGORY)
        .filter(|c| facts.has_category(c))
        .ok_or_else(|| DispatchError::UnresolvedSlot(slots::FACT_CATEGORY.to_string()))
}

fn clarify(facts: &FactCatalog, intent: &IntentRequest) -> SpokenResponse {
    let categories = join_alternatives(&facts.categories());
    let heard = intent
        .spoken(slots::FACT_CATEGORY)
        .map(|said| format!("I heard you say {said}. "))
        .unwrap_or_default();
    SpokenResponse::speak(format!(
        "{heard}I don't have facts for that category.  You can ask for {categories} facts.  \
         Which one would you like?"
    ))
    .ask(format!(
        "Which fact category would you like?  I have {categories}."
    ))
}

#[async_trait]
impl Handler for GetCategoryFact {
    fn name(&self) -> &'static str {
        "GetCategoryFact"
    }

    fn matches(&self, event: &Event) -> bool {
        event.is_intent(intents::GET_CATEGORY_FACT)
    }

    async fn handle(
        &self,
        turn: &Turn<'_>,
        event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        let intent = intent_of(event)?;
        let facts = turn.facts();
        let category = match requested_category(facts, intent) {
            Ok(category) => category,
            Err(e) => {
                tracing::debug!(error = %e, spoken = ?intent.spoken(slots::FACT_CATEGORY), "asking for a category");
                return Ok(clarify(facts, intent));
            }
        };
        tracing::debug!(%category, "category fact requested");

        let snapshot = turn.snapshot().await?;
        let phrases = turn.phrases();
        match authorize_category(&snapshot, category) {
            Access::Granted => {
                let fact = facts.random_fact(Some(category))?;
                Ok(SpokenResponse::speak(format!(
                    "Here's your {category} fact: {} {}",
                    fact.text,
                    phrases.yes_no_question()
                ))
                .ask(phrases.yes_no_question()))
            }
            Access::Upsell(product) => {
                let message = format!(
                    "You don't currently own the {category} pack. {} Want to learn more?",
                    product.summary
                );
                tracing::info!(product = %product.reference_name, "offering upsell");
                Ok(SpokenResponse::handoff(Directive::upsell(
                    product,
                    message,
                    turn.mint_token(),
                )))
            }
            Access::Unavailable => {
                tracing::warn!(%category, "no product sells this category");
                Ok(SpokenResponse::speak(format!(
                    "Sorry, the {category} pack isn't available for purchase right now. \
                     Would you like a random fact instead?"
                ))
                .ask(phrases.yes_no_question()))
            }
        }
    }
}
