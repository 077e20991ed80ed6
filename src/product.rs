use serde::{Deserialize, Serialize};

/// Reference name of the umbrella subscription.
pub const ALL_ACCESS: &str = "all_access";
/// Suffix of per-category product reference names.
pub const PACK_SUFFIX: &str = "_pack";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntitledState {
    Entitled,
    NotEntitled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchasableState {
    Purchasable,
    NotPurchasable,
    #[serde(other)]
    Unknown,
}

/// An in-skill product as reported by the monetization service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub reference_name: String,
    pub name: String,
    #[serde(default)]
    pub summary: String,
    pub entitled: EntitledState,
    pub purchasable: PurchasableState,
}

impl Product {
    pub fn is_entitled(&self) -> bool {
        self.entitled == EntitledState::Entitled
    }

    pub fn is_bundle(&self) -> bool {
        self.reference_name == ALL_ACCESS
    }
}

/// Products visible to the current user, fetched fresh for every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCatalogSnapshot {
    pub products: Vec<Product>,
}

impl ProductCatalogSnapshot {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn by_reference(&self, reference_name: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.reference_name == reference_name)
    }

    pub fn by_id(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<Product> for ProductCatalogSnapshot {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
