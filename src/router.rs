use crate::error::{DispatchError, RouterError};
use crate::event::{ConnectionResponse, DirectiveName, Event, IntentRequest, PurchasePayload};
use crate::handler::{Handler, Turn};
use crate::recovery::recover;
use crate::response::SpokenResponse;

/// Intent name no real model will ever produce; used to prove an intent
/// catch-all is registered.
const PROBE_INTENT: &str = "premium-facts.ProbeIntent";

/// Ordered, immutable handler list. The first handler whose predicate matches
/// an event handles it.
pub struct Router {
    handlers: Vec<Box<dyn Handler>>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("handlers", &self.handler_names())
            .finish()
    }
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// Handler names in priority order.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// The handler that would answer `event`.
    pub fn route(&self, event: &Event) -> Option<&dyn Handler> {
        self.handlers
            .iter()
            .find(|h| h.matches(event))
            .map(|h| &**h)
    }

    /// Answer one event. Never fails: handler errors and unroutable events
    /// become scripted recovery responses.
    pub async fn dispatch(&self, turn: &Turn<'_>, event: &Event) -> SpokenResponse {
        tracing::info!(
            kind = event.kind(),
            session = ?turn.scope.session_id,
            ?event,
            "inbound event"
        );
        let response = match self.route(event) {
            Some(handler) => {
                tracing::debug!(handler = handler.name(), "routing event");
                match handler.handle(turn, event).await {
                    Ok(response) => response,
                    Err(e) => recover(event, &e),
                }
            }
            None => recover(event, &DispatchError::Unroutable(event.kind())),
        };
        tracing::info!(?response, "outbound response");
        response
    }
}

/// Collects handlers in registration order and validates coverage.
#[derive(Default)]
pub struct RouterBuilder {
    handlers: Vec<Box<dyn Handler>>,
}

impl RouterBuilder {
    pub fn register<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Finish the router, rejecting any configuration that leaves an event
    /// category without a handler.
    pub fn build(self) -> Result<Router, RouterError> {
        if self.handlers.is_empty() {
            return Err(RouterError::Empty);
        }
        let router = Router {
            handlers: self.handlers,
        };
        for (label, probe) in probes() {
            if router.route(&probe).is_none() {
                return Err(RouterError::Uncovered(label));
            }
        }
        tracing::debug!(handlers = ?router.handler_names(), "router built");
        Ok(router)
    }
}

/// One representative event for every category the router must cover.
fn probes() -> Vec<(String, Event)> {
    let mut probes = vec![
        ("launch".to_string(), Event::Launch),
        (
            "unknown intent".to_string(),
            Event::Intent(IntentRequest::new(PROBE_INTENT)),
        ),
        ("session-ended".to_string(), Event::SessionEnded),
    ];
    for directive in DirectiveName::ALL {
        probes.push((
            format!("{directive} connection-response"),
            Event::ConnectionResponse(ConnectionResponse {
                directive,
                status_code: 200,
                status_message: String::new(),
                payload: PurchasePayload::default(),
            }),
        ));
    }
    probes
}
