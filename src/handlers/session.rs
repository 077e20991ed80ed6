use async_trait::async_trait;

use super::{GUIDANCE, WHAT_CAN_I_HELP};
use crate::error::DispatchError;
use crate::event::{Event, intents};
use crate::handler::{Handler, Turn};
use crate::response::SpokenResponse;

fn farewell(turn: &Turn<'_>) -> SpokenResponse {
    SpokenResponse::speak(turn.phrases().goodbye()).end_session()
}

/// "No" to another fact ends the conversation.
pub struct No;

#[async_trait]
impl Handler for No {
    fn name(&self) -> &'static str {
        "No"
    }

    fn matches(&self, event: &Event) -> bool {
        event.is_intent(intents::NO)
    }

    async fn handle(
        &self,
        turn: &Turn<'_>,
        _event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        Ok(farewell(turn))
    }
}

/// Session end from the platform, or the user saying stop or cancel.
///
/// The cancel intent here is the conversational one, unrelated to the
/// Cancel purchase directive.
pub struct SessionEnd;

#[async_trait]
impl Handler for SessionEnd {
    fn name(&self) -> &'static str {
        "SessionEnd"
    }

    fn matches(&self, event: &Event) -> bool {
        matches!(event, Event::SessionEnded)
            || event.is_intent(intents::STOP)
            || event.is_intent(intents::CANCEL)
    }

    async fn handle(
        &self,
        turn: &Turn<'_>,
        _event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        Ok(farewell(turn))
    }
}

pub struct Help;

#[async_trait]
impl Handler for Help {
    fn name(&self) -> &'static str {
        "Help"
    }

    fn matches(&self, event: &Event) -> bool {
        event.is_intent(intents::HELP)
    }

    async fn handle(
        &self,
        _turn: &Turn<'_>,
        _event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        Ok(SpokenResponse::speak(GUIDANCE).ask(WHAT_CAN_I_HELP))
    }
}

/// Scripted answer for anything we cannot help with.
pub fn fallback_response() -> SpokenResponse {
    SpokenResponse::speak(format!(
        "Sorry. I cannot help with that. I can help you with some facts. {GUIDANCE}"
    ))
    .ask(WHAT_CAN_I_HELP)
}

/// Catch-all for every intent, including the platform's fallback intent.
/// Must stay last.
pub struct Fallback;

#[async_trait]
impl Handler for Fallback {
    fn name(&self) -> &'static str {
        "Fallback"
    }

    fn matches(&self, event: &Event) -> bool {
        event.intent().is_some()
    }

    async fn handle(
        &self,
        _turn: &Turn<'_>,
        event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        if let Some(intent) = event.intent().filter(|i| i.name != intents::FALLBACK) {
            tracing::warn!(intent = %intent.name, "no dedicated handler for intent");
        }
        Ok(fallback_response())
    }
}
