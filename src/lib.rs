//! Conversational backend for a premium facts voice skill.
//!
//! Inbound events are routed through an ordered [`Router`] to exactly one
//! [`Handler`]. Some handlers gate content on entitlements read from a
//! [`ProductCatalog`], and hand purchases to the host via a [`Directive`].
//! The host's later answer comes back as a separate event and is picked up
//! by the [`correlator`] handlers.

pub mod catalog;
pub mod config;
pub mod correlator;
pub mod entitlement;
pub mod envelope;
pub mod error;
pub mod event;
pub mod facts;
pub mod handler;
pub mod handlers;
pub mod logger;
pub mod product;
pub mod recovery;
pub mod response;
pub mod retry;
pub mod router;
pub mod skill;
pub mod speech;

pub use catalog::{HttpProductCatalog, ProductCatalog, StaticProductCatalog};
pub use config::Config;
pub use error::{CatalogError, ConfigError, DispatchError, EnvelopeError, RouterError};
pub use event::{
    ConnectionResponse, DirectiveName, Event, IntentRequest, PurchasePayload, PurchaseResult,
    RequestScope, Slot,
};
pub use facts::{FactCatalog, FactRecord};
pub use handler::{Context, Handler, Turn};
pub use product::{EntitledState, Product, ProductCatalogSnapshot, PurchasableState};
pub use response::{CorrelationTokens, Directive, SpokenResponse};
pub use retry::{RetryCatalog, RetryPolicy};
pub use router::{Router, RouterBuilder};
pub use skill::{Skill, default_router};
