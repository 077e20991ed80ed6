use serde::Deserialize;
use uuid::Uuid;

use crate::event::DirectiveName;
use crate::product::Product;

/// Instruction for the host to run a purchase flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: DirectiveName,
    pub product_id: String,
    /// Only present on [`DirectiveName::Upsell`].
    pub upsell_message: Option<String>,
    pub token: String,
}

impl Directive {
    pub fn buy(product: &Product, token: String) -> Self {
        Self {
            name: DirectiveName::Buy,
            product_id: product.product_id.clone(),
            upsell_message: None,
            token,
        }
    }

    pub fn cancel(product: &Product, token: String) -> Self {
        Self {
            name: DirectiveName::Cancel,
            product_id: product.product_id.clone(),
            upsell_message: None,
            token,
        }
    }

    pub fn upsell(product: &Product, message: impl Into<String>, token: String) -> Self {
        Self {
            name: DirectiveName::Upsell,
            product_id: product.product_id.clone(),
            upsell_message: Some(message.into()),
            token,
        }
    }
}

/// Terminal output of every handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpokenResponse {
    pub speech: String,
    pub reprompt: Option<String>,
    pub should_end_session: bool,
    pub directive: Option<Directive>,
}

impl SpokenResponse {
    pub fn speak(speech: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            ..Self::default()
        }
    }

    /// A silent response handing the turn to the purchasing host.
    pub fn handoff(directive: Directive) -> Self {
        Self {
            directive: Some(directive),
            ..Self::default()
        }
    }

    pub fn ask(mut self, reprompt: impl Into<String>) -> Self {
        self.reprompt = Some(reprompt.into());
        self
    }

    pub fn end_session(mut self) -> Self {
        self.should_end_session = true;
        self
    }
}

/// How directive correlation tokens are minted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum CorrelationTokens {
    /// A fresh UUID per directive.
    #[default]
    Unique,
    /// The same literal every time, for hosts that expect it.
    Fixed(String),
}

impl From<String> for CorrelationTokens {
    fn from(s: String) -> Self {
        if s.is_empty() || s.eq_ignore_ascii_case("unique") {
            Self::Unique
        } else {
            Self::Fixed(s)
        }
    }
}

impl CorrelationTokens {
    pub fn mint(&self) -> String {
        match self {
            Self::Unique => Uuid::new_v4().to_string(),
            Self::Fixed(token) => token.clone(),
        }
    }
}
