use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Intent names supplied by the NLU layer.
pub mod intents {
    pub const GET_FACT: &str = "GetFactIntent";
    pub const GET_CATEGORY_FACT: &str = "GetCategoryFactIntent";
    pub const SHOPPING: &str = "ShoppingIntent";
    pub const PRODUCT_DETAIL: &str = "ProductDetailIntent";
    pub const BUY: &str = "BuyIntent";
    pub const CANCEL_SUBSCRIPTION: &str = "CancelSubscriptionIntent";
    pub const YES: &str = "AMAZON.YesIntent";
    pub const NO: &str = "AMAZON.NoIntent";
    pub const HELP: &str = "AMAZON.HelpIntent";
    pub const FALLBACK: &str = "AMAZON.FallbackIntent";
    pub const STOP: &str = "AMAZON.StopIntent";
    pub const CANCEL: &str = "AMAZON.CancelIntent";
}

/// Slot names read by the handlers.
pub mod slots {
    pub const FACT_CATEGORY: &str = "factCategory";
    pub const PRODUCT_CATEGORY: &str = "productCategory";
    pub const ALL_ACCESS: &str = "allAccess";
}

/// Per-request metadata passed through to the catalog client and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestScope {
    pub locale: String,
    pub api_endpoint: Option<String>,
    pub api_access_token: Option<String>,
    pub session_id: Option<String>,
    pub request_id: Option<String>,
}

impl Default for RequestScope {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            api_endpoint: None,
            api_access_token: None,
            session_id: None,
            request_id: None,
        }
    }
}

impl RequestScope {
    pub fn for_locale(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            ..Self::default()
        }
    }
}

/// A single inbound occurrence. Built once per call and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Launch,
    Intent(IntentRequest),
    ConnectionResponse(ConnectionResponse),
    SessionEnded,
}

impl Event {
    /// Short label used in logs and router diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Launch => "launch",
            Event::Intent(_) => "intent",
            Event::ConnectionResponse(_) => "connection-response",
            Event::SessionEnded => "session-ended",
        }
    }

    /// Whether this is an intent with the given name.
    pub fn is_intent(&self, name: &str) -> bool {
        matches!(self, Event::Intent(i) if i.name == name)
    }

    /// Whether this is a connection response for the given directive.
    pub fn is_response_to(&self, directive: DirectiveName) -> bool {
        matches!(self, Event::ConnectionResponse(r) if r.directive == directive)
    }

    pub fn intent(&self) -> Option<&IntentRequest> {
        match self {
            Event::Intent(i) => Some(i),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntentRequest {
    pub name: String,
    pub slots: HashMap<String, Slot>,
}

impl IntentRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: HashMap::new(),
        }
    }

    /// Builder used by tests and the envelope decoder.
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.insert(slot.name.clone(), slot);
        self
    }

    /// Resolved value of `slot`, if the NLU layer produced exactly one.
    pub fn resolved(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).and_then(|s| s.resolved.as_deref())
    }

    /// What the user actually said for `slot`, for echoing back only.
    pub fn spoken(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).and_then(|s| s.spoken.as_deref())
    }
}

/// A slot with its entity-resolved value and the raw utterance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Slot {
    pub name: String,
    pub resolved: Option<String>,
    pub spoken: Option<String>,
}

impl Slot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn resolved_to(mut self, value: impl Into<String>) -> Self {
        self.resolved = Some(value.into());
        self
    }

    pub fn spoken_as(mut self, value: impl Into<String>) -> Self {
        self.spoken = Some(value.into());
        self
    }
}

/// Names of the purchase directives sent to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectiveName {
    Buy,
    Cancel,
    Upsell,
}

impl DirectiveName {
    pub const ALL: [DirectiveName; 3] = [Self::Buy, Self::Cancel, Self::Upsell];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Cancel => "Cancel",
            Self::Upsell => "Upsell",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }
}

impl fmt::Display for DirectiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The host's asynchronous answer to a directive we emitted earlier.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionResponse {
    pub directive: DirectiveName,
    pub status_code: u16,
    pub status_message: String,
    pub payload: PurchasePayload,
}

impl ConnectionResponse {
    pub fn succeeded(&self) -> bool {
        self.status_code == 200
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PurchasePayload {
    pub product_id: Option<String>,
    pub purchase_result: Option<PurchaseResult>,
    pub message: Option<String>,
}

/// Outcome reported by the purchasing host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseResult {
    Accepted,
    Declined,
    AlreadyPurchased,
    NotEntitled,
    Error,
    /// A value this build does not know yet.
    Other(String),
}

impl PurchaseResult {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "ACCEPTED" => Self::Accepted,
            "DECLINED" => Self::Declined,
            "ALREADY_PURCHASED" => Self::AlreadyPurchased,
            "NOT_ENTITLED" => Self::NotEntitled,
            "ERROR" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
            Self::AlreadyPurchased => "ALREADY_PURCHASED",
            Self::NotEntitled => "NOT_ENTITLED",
            Self::Error => "ERROR",
            Self::Other(raw) => raw,
        }
    }
}
