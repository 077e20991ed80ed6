#![allow(dead_code)]

use async_trait::async_trait;
use premium_facts::{
    CatalogError, ConnectionResponse, Context, DirectiveName, EntitledState, Event, FactCatalog,
    IntentRequest, Product, ProductCatalog, ProductCatalogSnapshot, PurchasableState,
    PurchasePayload, PurchaseResult, RequestScope, Skill, SpokenResponse, StaticProductCatalog,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn product(reference: &str, entitled: bool) -> Product {
    Product {
        product_id: format!("amzn1.adg.product.{reference}"),
        reference_name: reference.into(),
        name: reference.replace('_', " "),
        summary: format!("The {} unlocks more facts.", reference.replace('_', " ")),
        entitled: if entitled {
            EntitledState::Entitled
        } else {
            EntitledState::NotEntitled
        },
        purchasable: if entitled {
            PurchasableState::NotPurchasable
        } else {
            PurchasableState::Purchasable
        },
    }
}

pub fn context(catalog: Arc<dyn ProductCatalog>) -> Context {
    Context::new(
        "Premium Facts Sample",
        catalog,
        Arc::new(FactCatalog::builtin().unwrap()),
    )
}

pub fn skill(products: Vec<Product>) -> Skill {
    Skill::new(context(Arc::new(StaticProductCatalog::new(products)))).unwrap()
}

/// Catalog whose service is always down.
pub struct DownCatalog;

#[async_trait]
impl ProductCatalog for DownCatalog {
    async fn fetch_products(
        &self,
        _scope: &RequestScope,
    ) -> Result<ProductCatalogSnapshot, CatalogError> {
        Err(CatalogError::new("service unavailable"))
    }
}

/// Static catalog that counts how often it is fetched.
#[derive(Default)]
pub struct CountingCatalog {
    inner: StaticProductCatalog,
    fetches: AtomicUsize,
}

impl CountingCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            inner: StaticProductCatalog::new(products),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Fetches since the last call.
    pub fn take(&self) -> usize {
        self.fetches.swap(0, Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductCatalog for CountingCatalog {
    async fn fetch_products(
        &self,
        scope: &RequestScope,
    ) -> Result<ProductCatalogSnapshot, CatalogError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_products(scope).await
    }
}

pub fn intent(name: &str) -> Event {
    Event::Intent(IntentRequest::new(name))
}

pub fn answer(
    directive: DirectiveName,
    code: u16,
    product_id: &str,
    result: Option<&str>,
) -> Event {
    Event::ConnectionResponse(ConnectionResponse {
        directive,
        status_code: code,
        status_message: if code == 200 { "OK" } else { "Internal error" }.into(),
        payload: PurchasePayload {
            product_id: Some(product_id.into()),
            purchase_result: result.map(PurchaseResult::parse),
            message: None,
        },
    })
}

pub async fn say(skill: &Skill, event: Event) -> SpokenResponse {
    skill.handle(&RequestScope::default(), &event).await
}

pub fn yes_no_questions() -> Vec<String> {
    premium_facts::speech::Phrasebook::default().yes_no_questions
}

pub fn ends_with_yes_no(text: &str) -> bool {
    yes_no_questions().iter().any(|q| text.ends_with(q.as_str()))
}

pub fn facts_in(category: Option<&str>) -> Vec<String> {
    FactCatalog::builtin()
        .unwrap()
        .all()
        .iter()
        .filter(|f| category.is_none_or(|c| f.category == c))
        .map(|f| f.text.clone())
        .collect()
}
