use async_trait::async_trait;

use super::WHAT_CAN_I_HELP;
use crate::entitlement::{category_of, entitled_products};
use crate::error::DispatchError;
use crate::event::Event;
use crate::handler::{Handler, Turn};
use crate::response::SpokenResponse;
use crate::speech::join_for_speech;

/// Greets the user, naming what they already own.
pub struct Launch;

#[async_trait]
impl Handler for Launch {
    fn name(&self) -> &'static str {
        "Launch"
    }

    fn matches(&self, event: &Event) -> bool {
        matches!(event, Event::Launch)
    }

    async fn handle(
        &self,
        turn: &Turn<'_>,
        _event: &Event,
    ) -> Result<SpokenResponse, DispatchError> {
        let snapshot = turn.snapshot().await?;
        let entitled = entitled_products(&snapshot);
        let owned: Vec<&str> = entitled.iter().map(|p| p.name.as_str()).collect();
        // The bundle owns no single category, so it borrows the table's first.
        let example = entitled
            .iter()
            .find_map(|p| category_of(&p.reference_name))
            .or_else(|| turn.facts().categories().first().copied())
            .unwrap_or("science");
        let skill = &turn.context.skill_name;
        let speech = if owned.is_empty() {
            tracing::debug!("no entitled products");
            format!(
                "Welcome to {skill}. To hear a random fact you can say 'Tell me a fact', or to \
                 hear about the premium categories for purchase, say 'What can I buy'. For help, \
                 say 'Help me'... So, what can I help you with?"
            )
        } else {
            format!(
                "Welcome to {skill}. You currently own {} products. To hear a random fact, you \
                 could say, 'Tell me a fact', or you can ask for a specific category you have \
                 purchased, for example, say 'Tell me a {example} fact'. To know what else you can \
                 buy, say, 'What can i buy?'. So, what can I help you with?",
                join_for_speech(&owned)
            )
        };
        Ok(SpokenResponse::speak(speech).ask(WHAT_CAN_I_HELP))
    }
}
