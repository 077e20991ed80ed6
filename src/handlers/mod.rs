//! Conversation handlers, one per intent or request kind.
//!
//! Connection responses from the purchasing host are handled separately in
//! [`crate::correlator`].

mod facts;
mod launch;
mod purchase;
mod session;
mod shopping;

pub use facts::{GetCategoryFact, GetFact, Yes};
pub use launch::Launch;
pub use purchase::{Buy, CancelSubscription};
pub use session::{Fallback, Help, No, SessionEnd, fallback_response};
pub use shopping::{ProductDetail, Shopping};

use crate::error::DispatchError;
use crate::event::{Event, IntentRequest};
use crate::response::SpokenResponse;

pub(crate) const WHAT_CAN_I_HELP: &str = "I didn't catch that. What can I help you with?";

pub(crate) const GUIDANCE: &str = "To hear a random fact you can say 'Tell me a fact', or to hear \
     about the premium categories for purchase, say 'What can I buy'. For help, say 'Help me'... \
     So, what can I help you with?";

const NO_SUCH_PRODUCT: &str = "I don't think we have a product by that name.  Can you try again?";
const TRY_AGAIN: &str = "I didn't catch that. Can you try again?";

/// Shared answer when a named product cannot be found.
pub(crate) fn no_such_product() -> SpokenResponse {
    SpokenResponse::speak(NO_SUCH_PRODUCT).ask(TRY_AGAIN)
}

/// The intent carried by `event`. Only reachable from handlers whose
/// predicate already required an intent.
pub(crate) fn intent_of(event: &Event) -> Result<&IntentRequest, DispatchError> {
    event.intent().ok_or(DispatchError::Unroutable(event.kind()))
}
