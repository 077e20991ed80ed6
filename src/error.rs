use thiserror::Error;

use crate::event::DirectiveName;

/// Failure talking to the monetization service.
///
/// Every non-success shape (transport error, HTTP status, undecodable body)
/// collapses into this one type; callers never branch on the cause.
#[derive(Debug, Error)]
#[error("product catalog unavailable: {reason}")]
pub struct CatalogError {
    pub reason: String,
}

impl CatalogError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Errors a handler may return to the router.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    CatalogUnavailable(#[from] CatalogError),
    #[error("slot `{0}` has no resolved value")]
    UnresolvedSlot(String),
    #[error("unrecognised purchase result `{0}`")]
    UnknownPurchaseResult(String),
    #[error("{directive} directive failed with status {code}: {message}")]
    DirectiveDeliveryFailure {
        directive: DirectiveName,
        code: u16,
        message: String,
    },
    #[error("product `{0}` is not in the catalog snapshot")]
    UnknownProduct(String),
    #[error("no facts for category `{0}`")]
    EmptyCategory(String),
    #[error("no handler matches {0} events")]
    Unroutable(&'static str),
}

/// Problems found while assembling a [`Router`](crate::Router).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("router has no handlers")]
    Empty,
    #[error("no handler covers {0} events")]
    Uncovered(String),
}

/// An inbound envelope that cannot become an [`Event`](crate::Event).
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed envelope: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported request type `{0}`")]
    UnsupportedRequest(String),
    #[error("unknown connection response name `{0}`")]
    UnknownDirective(String),
    #[error("missing field `{0}`")]
    Missing(&'static str),
    #[error("invalid status code `{0}`")]
    StatusCode(String),
}

/// Configuration and static data loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("fact table is empty")]
    NoFacts,
    #[error("invalid product catalog file {path}: {source}")]
    CatalogFile {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Router(#[from] RouterError),
}
