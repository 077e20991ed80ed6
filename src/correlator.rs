//! Resumes the conversation when the purchasing host answers a directive.
//!
//! No state is kept between the directive and its answer. The host's
//! response names the directive it answers, which picks the handler here,
//! and carries the product id, which is looked up in a freshly fetched
//! snapshot.

use async_trait::async_trait;

use crate::entitlement::category_of;
use crate::error::DispatchError;
use crate::event::{ConnectionResponse, DirectiveName, Event, PurchaseResult};
use crate::handler::{Handler, Turn};
use crate::handlers::fallback_response;
use crate::product::{Product, ProductCatalogSnapshot, PurchasableState};
use crate::response::SpokenResponse;

const ANOTHER_RANDOM_FACT: &str = "Would you like another random fact?";

fn response_of(event: &Event) -> Result<&ConnectionResponse, DispatchError> {
    match event {
        Event::ConnectionResponse(r) => Ok(r),
        other => Err(DispatchError::Unroutable(other.kind())),
    }
}

/// Reject anything but a 200 from the host before looking further.
fn delivered(response: &ConnectionResponse) -> Result<(), DispatchError> {
    if response.succeeded() {
        return Ok(());
    }
    Err(DispatchError::DirectiveDeliveryFailure {
        directive: response.directive,
        code: response.status_code,
        message: response.status_message.clone(),
    })
}

/// The reported outcome, if it is one this build knows how to continue from.
fn outcome(response: &ConnectionResponse) -> Result<&PurchaseResult, DispatchError> {
    match &response.payload.purchase_result {
        Some(PurchaseResult::Other(raw)) => Err(DispatchError::UnknownPurchaseResult(raw.clone())),
        Some(result) => Ok(result),
        None => Err(DispatchError::UnknownPurchaseResult(String::new())),
    }
}

fn purchased_product<'s>(
    snapshot: &'s ProductCatalogSnapshot,
    response: &ConnectionResponse,
) -> Result<&'s Product, DispatchError> {
    let id = response.payload.product_id.as_deref().unwrap_or_default();
    snapshot.by_id(id).ok_or_else(|| {
        tracing::error!(product_id = %id, directive = %response.directive, "host answered for a product we do not sell");
        DispatchError::UnknownProduct(id.to_string())
    })
}

fn degrade(response: &ConnectionResponse, err: DispatchError) -> SpokenResponse {
    tracing::warn!(directive = %response.directive, error = %err, "continuing with fallback");
    fallback_response()
}

/// Answer to a Buy directive.
pub struct BuyResponse;

#[async_trait]
impl Handler for BuyResponse {
    fn name(&self) -> &'static str {
        "BuyResponse"
    }

    fn matches(&self, event: &Event) -> bool {
        event.is_response_to(DirectiveName::Buy)
    }

    async fn handle(
        &self,
        turn: &Turn<'_>,
        event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        let response = response_of(event)?;
        delivered(response)?;
        let result = match outcome(response) {
            Ok(result) => result,
            Err(e) => return Ok(degrade(response, e)),
        };
        let snapshot = turn.snapshot().await?;
        let product = purchased_product(&snapshot, response)?;
        let phrases = turn.phrases();
        tracing::info!(product = %product.reference_name, result = result.as_str(), "purchase answered");
        let reply = match result {
            PurchaseResult::Accepted => {
                let category = category_of(&product.reference_name).filter(|c| {
                    let known = turn.facts().has_category(c);
                    if !known {
                        tracing::warn!(category = %c, "purchased pack has no facts; using the full table");
                    }
                    known
                });
                let fact = turn.facts().random_fact(category)?;
                let which = category.map(|c| format!("{c} fact")).unwrap_or_else(|| "fact".into());
                SpokenResponse::speak(format!(
                    "You have unlocked the {}.  Here is your {which}: {}  {}",
                    product.name,
                    fact.text,
                    phrases.yes_no_question()
                ))
                .ask(phrases.yes_no_question())
            }
            PurchaseResult::Declined | PurchaseResult::Error | PurchaseResult::NotEntitled => {
                SpokenResponse::speak(format!(
                    "Thanks for your interest in {}.  {ANOTHER_RANDOM_FACT}",
                    product.name
                ))
                .ask(ANOTHER_RANDOM_FACT)
            }
            PurchaseResult::AlreadyPurchased => SpokenResponse::speak(format!(
                "You already own the {}. Do you want to hear a fact?",
                product.name
            ))
            .ask("What can I help you with?"),
            PurchaseResult::Other(raw) => {
                return Ok(degrade(
                    response,
                    DispatchError::UnknownPurchaseResult(raw.clone()),
                ));
            }
        };
        Ok(reply)
    }
}

/// Answer to a Cancel directive.
pub struct CancelResponse;

#[async_trait]
impl Handler for CancelResponse {
    fn name(&self) -> &'static str {
        "CancelResponse"
    }

    fn matches(&self, event: &Event) -> bool {
        event.is_response_to(DirectiveName::Cancel)
    }

    async fn handle(
        &self,
        turn: &Turn<'_>,
        event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        let response = response_of(event)?;
        delivered(response)?;
        let result = match outcome(response) {
            Ok(result @ (PurchaseResult::Accepted | PurchaseResult::Declined)) => result,
            Ok(other) => {
                let err = DispatchError::UnknownPurchaseResult(other.as_str().to_string());
                return Ok(degrade(response, err));
            }
            Err(e) => return Ok(degrade(response, e)),
        };
        let snapshot = turn.snapshot().await?;
        let product = purchased_product(&snapshot, response)?;
        let phrases = turn.phrases();
        tracing::info!(product = %product.reference_name, result = result.as_str(), "cancellation answered");
        let speech = match result {
            PurchaseResult::Accepted => format!(
                "You have successfully cancelled your subscription. {}",
                phrases.yes_no_question()
            ),
            _ if product.purchasable == PurchasableState::Purchasable => format!(
                "You don't currently have a subscription. {}",
                phrases.yes_no_question()
            ),
            _ => phrases.yes_no_question().to_string(),
        };
        Ok(SpokenResponse::speak(speech).ask(phrases.yes_no_question()))
    }
}

/// Answer to an Upsell directive.
pub struct UpsellResponse;

#[async_trait]
impl Handler for UpsellResponse {
    fn name(&self) -> &'static str {
        "UpsellResponse"
    }

    fn matches(&self, event: &Event) -> bool {
        event.is_response_to(DirectiveName::Upsell)
    }

    async fn handle(
        &self,
        turn: &Turn<'_>,
        event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        let response = response_of(event)?;
        delivered(response)?;
        match outcome(response) {
            Ok(PurchaseResult::Declined) => {
                let fact = turn.facts().random_fact(None)?;
                let phrases = turn.phrases();
                Ok(SpokenResponse::speak(format!(
                    "Ok. Here's a random fact: {} {}",
                    fact.text,
                    phrases.yes_no_question()
                ))
                .ask(phrases.yes_no_question()))
            }
            // Accepting an upsell has no continuation yet.
            Ok(other) => {
                tracing::warn!(result = other.as_str(), "upsell outcome not handled");
                Ok(fallback_response())
            }
            Err(e) => Ok(degrade(response, e)),
        }
    }
}
