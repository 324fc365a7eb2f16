use crate::cache::PriceCache;
use crate::tiers::TierPolicy;
use kamasa_catalog::{CatalogReader, Product};
use kamasa_core::identity::Customer;
use kamasa_shared::ids::ProductId;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of a price resolution.
///
/// Anonymous and non-B2B callers get `Hidden` and the storefront renders a
/// login prompt; a numeric zero is reserved for products that genuinely
/// price at zero or have no price configured at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "status", content = "amount")]
pub enum DisplayPrice {
    Hidden,
    /// Full-precision amount; round only at the presentation boundary.
    Amount(f64),
}

impl DisplayPrice {
    pub fn amount(&self) -> Option<f64> {
        match self {
            Self::Amount(amount) => Some(*amount),
            Self::Hidden => None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }
}

/// Two-stage B2B price computation.
///
/// The tier stage (`base * (1 - tier/100)`) is memoized per
/// (product, customer); the volume stage applies on top of the tier-adjusted
/// price for quantity contexts and is never cached. The same pipeline serves
/// catalog tiles, single-product pages and cart lines.
pub struct PriceResolver {
    catalog: Arc<dyn CatalogReader>,
    tiers: Arc<dyn TierPolicy>,
    cache: Arc<PriceCache>,
}

impl PriceResolver {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        tiers: Arc<dyn TierPolicy>,
        cache: Arc<PriceCache>,
    ) -> Self {
        Self {
            catalog,
            tiers,
            cache,
        }
    }

    /// Price for catalog and single-product display, with no quantity in
    /// play.
    pub fn display_price(&self, product_id: ProductId, customer: Option<&Customer>) -> DisplayPrice {
        self.resolve(product_id, customer, None)
    }

    /// Full resolution: hidden for unauthorized callers, tier stage through
    /// the cache, optional volume stage for the given quantity.
    pub fn resolve(
        &self,
        product_id: ProductId,
        customer: Option<&Customer>,
        quantity: Option<i32>,
    ) -> DisplayPrice {
        let Some(customer) = customer.filter(|c| c.b2b_authorized) else {
            return DisplayPrice::Hidden;
        };

        let tier_price = self.tier_adjusted_price(product_id, customer);
        let final_price = match quantity {
            Some(quantity) => apply_volume_discount(
                tier_price,
                self.volume_discount(product_id, quantity),
            ),
            None => tier_price,
        };

        DisplayPrice::Amount(final_price)
    }

    /// Tier stage, memoized per (product, customer) for the cache TTL.
    pub fn tier_adjusted_price(&self, product_id: ProductId, customer: &Customer) -> f64 {
        self.cache.get_or_compute(product_id, customer.id, || {
            let base = self.base_price(product_id);
            let discount = self.tiers.discount_percent(&customer.tier);
            tracing::debug!(
                %product_id,
                customer_id = %customer.id,
                tier = %customer.tier,
                base,
                discount,
                "price cache miss, computing tier-adjusted price"
            );
            (base * (1.0 - discount / 100.0)).max(0.0)
        })
    }

    /// Volume discount for the current quantity. A variant without its own
    /// schedule inherits the parent's; no schedule anywhere means 0.
    pub fn volume_discount(&self, product_id: ProductId, quantity: i32) -> f64 {
        if quantity <= 0 {
            return 0.0;
        }
        let Some(product) = self.catalog.product(product_id) else {
            return 0.0;
        };
        if let Some(schedule) = &product.volume_schedule {
            return schedule.discount_for_quantity(quantity);
        }
        if let Some(parent) = self.parent_of(&product) {
            if let Some(schedule) = &parent.volume_schedule {
                return schedule.discount_for_quantity(quantity);
            }
        }
        0.0
    }

    /// B2B base price with variant and regular-price fallback. A product
    /// with no price anywhere degrades to 0 so a render is never aborted.
    fn base_price(&self, product_id: ProductId) -> f64 {
        let Some(product) = self.catalog.product(product_id) else {
            return 0.0;
        };
        if let Some(base) = product.b2b_base_price {
            return base;
        }
        if let Some(base) = self.parent_of(&product).and_then(|p| p.b2b_base_price) {
            return base;
        }
        product.regular_price.unwrap_or(0.0)
    }

    fn parent_of(&self, product: &Product) -> Option<Product> {
        product.parent_id.and_then(|id| self.catalog.product(id))
    }
}

/// Volume stage: percentage off the tier-adjusted price, never the raw base
/// price. A 15% tier discount followed by a 10% volume discount compounds to
/// 76.5% of base, not 75%.
pub fn apply_volume_discount(tier_adjusted_price: f64, discount_percent: f64) -> f64 {
    (tier_adjusted_price * (1.0 - discount_percent / 100.0)).max(0.0)
}
