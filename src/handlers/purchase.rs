use async_trait::async_trait;

use super::{intent_of, no_such_product};
use crate::entitlement::{pack_reference, resolve_entitlement};
use crate::error::DispatchError;
use crate::event::{DirectiveName, Event, IntentRequest, intents, slots};
use crate::handler::{Handler, Turn};
use crate::product::ALL_ACCESS;
use crate::response::{Directive, SpokenResponse};

/// Product a buy or cancel request targets: the named category's pack, or
/// the bundle when no category was given.
pub(crate) fn target_reference(intent: &IntentRequest) -> String {
    intent
        .resolved(slots::PRODUCT_CATEGORY)
        .map(pack_reference)
        .unwrap_or_else(|| ALL_ACCESS.to_string())
}

/// Hand the turn to the purchasing host for the targeted product.
async fn request_purchase_flow(
    turn: &Turn<'_>,
    event: &Event,
    directive: DirectiveName,
) -> Result<SpokenResponse, DispatchError> {
    let reference = target_reference(intent_of(event)?);
    let snapshot = turn.snapshot().await?;
    let Some(product) = resolve_entitlement(&snapshot, &reference) else {
        tracing::debug!(%reference, %directive, "no such product to hand off");
        return Ok(no_such_product());
    };
    let token = turn.mint_token();
    tracing::info!(%directive, product = %product.product_id, %token, "sending directive");
    let directive = match directive {
        DirectiveName::Buy => Directive::buy(product, token),
        DirectiveName::Cancel => Directive::cancel(product, token),
        DirectiveName::Upsell => return Err(DispatchError::Unroutable(event.kind())),
    };
    Ok(SpokenResponse::handoff(directive))
}

/// "Buy the science pack."
pub struct Buy;

#[async_trait]
impl Handler for Buy {
    fn name(&self) -> &'static str {
        "Buy"
    }

    fn matches(&self, event: &Event) -> bool {
        event.is_intent(intents::BUY)
    }

    async fn handle(
        &self,
        turn: &Turn<'_>,
        event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        request_purchase_flow(turn, event, DirectiveName::Buy).await
    }
}

/// "Cancel my subscription."
pub struct CancelSubscription;

#[async_trait]
impl Handler for CancelSubscription {
    fn name(&self) -> &'static str {
        "CancelSubscription"
    }

    fn matches(&self, event: &Event) -> bool {
        event.is_intent(intents::CANCEL_SUBSCRIPTION)
    }

    async fn handle(
        &self,
        turn: &Turn<'_>,
        event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        request_purchase_flow(turn, event, DirectiveName::Cancel).await
    }
}
