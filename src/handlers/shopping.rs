use async_trait::async_trait;

use super::{WHAT_CAN_I_HELP, intent_of, no_such_product};
use crate::entitlement::{pack_reference, purchasable_offers, resolve_entitlement};
use crate::error::DispatchError;
use crate::event::{Event, IntentRequest, intents, slots};
use crate::handler::{Handler, Turn};
use crate::product::ALL_ACCESS;
use crate::response::SpokenResponse;
use crate::speech::join_for_speech;

/// "What can I buy?"
pub struct Shopping;

#[async_trait]
impl Handler for Shopping {
    fn name(&self) -> &'static str {
        "Shopping"
    }

    fn matches(&self, event: &Event) -> bool {
        event.is_intent(intents::SHOPPING)
    }

    async fn handle(
        &self,
        turn: &Turn<'_>,
        _event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        let snapshot = turn.snapshot().await?;
        let offers: Vec<&str> = purchasable_offers(&snapshot)
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        let speech = if offers.is_empty() {
            "There are no more products to buy. To hear a random fact, you could say, 'Tell me a \
             fact', or you can ask for a specific category you have purchased, for example, say \
             'Tell me a science fact'. So what can I help you with?"
                .to_string()
        } else {
            format!(
                "Products available for purchase at this time are {}.  To learn more about a \
                 product, say 'Tell me more about' followed by the product name.  If you are \
                 ready to buy say 'Buy' followed by the product name. So what can I help you with?",
                join_for_speech(&offers)
            )
        };
        Ok(SpokenResponse::speak(speech).ask(WHAT_CAN_I_HELP))
    }
}

/// Describes one product and how to buy it.
pub struct ProductDetail;

/// Reference name asked about; the bundle slot wins over a category.
fn asked_reference(intent: &IntentRequest) -> Option<String> {
    if intent.resolved(slots::ALL_ACCESS).is_some() {
        return Some(ALL_ACCESS.to_string());
    }
    intent.resolved(slots::PRODUCT_CATEGORY).map(pack_reference)
}

#[async_trait]
impl Handler for ProductDetail {
    fn name(&self) -> &'static str {
        "ProductDetail"
    }

    fn matches(&self, event: &Event) -> bool {
        event.is_intent(intents::PRODUCT_DETAIL)
    }

    async fn handle(
        &self,
        turn: &Turn<'_>,
        event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        let intent = intent_of(event)?;
        let Some(reference) = asked_reference(intent) else {
            return Ok(no_such_product());
        };
        let snapshot = turn.snapshot().await?;
        let Some(product) = resolve_entitlement(&snapshot, &reference) else {
            tracing::debug!(%reference, "asked about a product not in the catalog");
            return Ok(no_such_product());
        };
        Ok(SpokenResponse::speak(format!(
            "{}.  To buy it, say Buy {}",
            product.summary.trim_end_matches('.'),
            product.name
        ))
        .ask(format!(
            "I didn't catch that. To buy {0}, say Buy {0}",
            product.name
        )))
    }
}
