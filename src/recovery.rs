//! Last line of defence: turns any [`DispatchError`] into something safe to say.

use crate::error::DispatchError;
use crate::event::Event;
use crate::response::SpokenResponse;

pub const SAFE_UTTERANCE: &str = "Sorry, I can't understand the command. Please try again!!";
pub const CATALOG_APOLOGY: &str = "Something went wrong in loading your purchase history.";
pub const DELIVERY_FAILURE: &str =
    "There was an error handling your request. Please try again or contact us for help.";

/// Map a handler failure to a scripted response. The session always stays
/// open and raw error text never reaches speech.
pub fn recover(event: &Event, err: &DispatchError) -> SpokenResponse {
    match err {
        DispatchError::CatalogUnavailable(e) => {
            tracing::warn!(reason = %e.reason, kind = event.kind(), "catalog unavailable");
            SpokenResponse::speak(CATALOG_APOLOGY).ask(CATALOG_APOLOGY)
        }
        DispatchError::DirectiveDeliveryFailure {
            directive,
            code,
            message,
        } => {
            tracing::warn!(%directive, code, %message, "connection response indicated failure");
            SpokenResponse::speak(DELIVERY_FAILURE)
        }
        other => {
            tracing::error!(?event, error = %other, "unhandled dispatch error");
            SpokenResponse::speak(SAFE_UTTERANCE).ask(SAFE_UTTERANCE)
        }
    }
}
