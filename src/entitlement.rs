//! Mapping between content categories and purchasable products.
//!
//! Categories and products are linked purely by naming convention: the
//! category `science` is sold as `science_pack`, and `all_access` unlocks
//! every category. A product missing from the snapshot is simply not
//! entitled.

use crate::product::{
    ALL_ACCESS, EntitledState, PACK_SUFFIX, Product, ProductCatalogSnapshot, PurchasableState,
};

/// Reference name of the product that sells `category`.
pub fn pack_reference(category: &str) -> String {
    format!("{category}{PACK_SUFFIX}")
}

/// Category unlocked by a product reference name, `None` for the bundle.
///
/// ```
/// use premium_facts::entitlement::category_of;
/// assert_eq!(category_of("space_pack"), Some("space"));
/// assert_eq!(category_of("all_access"), None);
/// ```
pub fn category_of(reference_name: &str) -> Option<&str> {
    if reference_name == ALL_ACCESS {
        return None;
    }
    Some(
        reference_name
            .strip_suffix(PACK_SUFFIX)
            .unwrap_or(reference_name),
    )
}

/// Look up a product by reference name.
pub fn resolve_entitlement<'a>(
    snapshot: &'a ProductCatalogSnapshot,
    reference_name: &str,
) -> Option<&'a Product> {
    snapshot.by_reference(reference_name)
}

/// True iff there is a first product and it is entitled.
pub fn is_entitled<'a>(products: impl IntoIterator<Item = &'a Product>) -> bool {
    products
        .into_iter()
        .next()
        .is_some_and(Product::is_entitled)
}

/// Decision for a category fact request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access<'a> {
    /// Bundle or category pack is owned.
    Granted,
    /// Not owned; offer this product.
    Upsell(&'a Product),
    /// Not owned and nothing in the catalog sells it.
    Unavailable,
}

/// Subscription and à-la-carte entitlements are independent; either one
/// unlocks the category.
pub fn authorize_category<'a>(snapshot: &'a ProductCatalogSnapshot, category: &str) -> Access<'a> {
    let bundle = resolve_entitlement(snapshot, ALL_ACCESS);
    let pack = resolve_entitlement(snapshot, &pack_reference(category));
    if is_entitled(bundle) || is_entitled(pack) {
        return Access::Granted;
    }
    match pack.or(bundle) {
        Some(product) => Access::Upsell(product),
        None => Access::Unavailable,
    }
}

/// Products the user currently owns, in catalog order.
pub fn entitled_products(snapshot: &ProductCatalogSnapshot) -> Vec<&Product> {
    snapshot.iter().filter(|p| p.is_entitled()).collect()
}

/// Products the user could buy right now, in catalog order.
pub fn purchasable_offers(snapshot: &ProductCatalogSnapshot) -> Vec<&Product> {
    snapshot
        .iter()
        .filter(|p| {
            p.entitled == EntitledState::NotEntitled
                && p.purchasable == PurchasableState::Purchasable
        })
        .collect()
}
