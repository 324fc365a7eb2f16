use crate::models::{Cart, CartLine};
use chrono::Utc;
use kamasa_core::identity::Customer;
use kamasa_pricing::{apply_volume_discount, PriceResolver};

/// Prices produced for one line by a recalculation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrice {
    /// Base price after the tier stage, before any volume discount.
    pub tier_adjusted: f64,
    /// Final working unit price for the line.
    pub unit: f64,
}

/// Pure pricing of one line.
///
/// Reuses the stashed tier-adjusted price when the line has one, so the
/// tier stage is applied at most once per session; the volume stage is
/// re-derived from the line's current quantity on every call.
pub fn compute_line_price(
    line: &CartLine,
    customer: &Customer,
    resolver: &PriceResolver,
) -> LinePrice {
    let tier_adjusted = line
        .tier_price_stash
        .unwrap_or_else(|| resolver.tier_adjusted_price(line.product_id, customer));
    let discount = resolver.volume_discount(line.product_id, line.quantity);
    LinePrice {
        tier_adjusted,
        unit: apply_volume_discount(tier_adjusted, discount),
    }
}

/// Totals-recalculation pass, invoked whenever cart contents or quantities
/// change. Carts without a logged-in, B2B-authorized owner are left
/// untouched. Running the pass twice with unchanged quantities yields the
/// same prices.
pub fn recalculate_cart(cart: &mut Cart, customer: Option<&Customer>, resolver: &PriceResolver) {
    let Some(customer) = customer.filter(|c| c.b2b_authorized) else {
        return;
    };

    for line in &mut cart.lines {
        let priced = compute_line_price(line, customer, resolver);
        line.tier_price_stash = Some(priced.tier_adjusted);
        line.unit_price = priced.unit;
    }
    cart.updated_at = Utc::now();
}

#[cfg(test)]
mod tests {
    use super::*;
    use kamasa_catalog::{CatalogReader, InMemoryCatalog, Product, VolumeRange, VolumeSchedule};
    use kamasa_core::identity::CustomerTier;
    use kamasa_pricing::{PriceCache, TierDiscountTable};
    use kamasa_shared::money::round_currency;
    use std::sync::Arc;
    use uuid::Uuid;

    fn fixture() -> (Arc<InMemoryCatalog>, PriceResolver, Uuid) {
        let catalog = Arc::new(InMemoryCatalog::new());
        let product = Uuid::new_v4();
        let mut p = Product::new(product, "Mixer");
        p.b2b_base_price = Some(100.0);
        p.volume_schedule =
            Some(VolumeSchedule::new(vec![VolumeRange::unbounded(10, 10.0).unwrap()]));
        catalog.upsert(p);

        let resolver = PriceResolver::new(
            Arc::clone(&catalog) as Arc<dyn CatalogReader>,
            Arc::new(TierDiscountTable::standard()),
            Arc::new(PriceCache::default()),
        );
        (catalog, resolver, product)
    }

    fn wholesale() -> Customer {
        Customer::b2b(Uuid::new_v4(), CustomerTier::Wholesale)
    }

    #[test]
    fn test_recalculation_is_idempotent_for_unchanged_quantity() {
        let (_catalog, resolver, product) = fixture();
        let customer = wholesale();
        let mut cart = Cart::new(Some(customer.id));
        cart.add_line(product, 10).unwrap();

        recalculate_cart(&mut cart, Some(&customer), &resolver);
        let first = cart.lines[0].unit_price;

        recalculate_cart(&mut cart, Some(&customer), &resolver);
        let second = cart.lines[0].unit_price;

        // 100 * 0.85 * 0.90 both times, not 0.90 applied twice.
        assert_eq!(round_currency(first), 76.5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_volume_stage_reacts_to_quantity_change() {
        let (_catalog, resolver, product) = fixture();
        let customer = wholesale();
        let mut cart = Cart::new(Some(customer.id));
        cart.add_line(product, 5).unwrap();

        recalculate_cart(&mut cart, Some(&customer), &resolver);
        assert_eq!(round_currency(cart.lines[0].unit_price), 85.0);

        cart.set_quantity(product, 10).unwrap();
        recalculate_cart(&mut cart, Some(&customer), &resolver);
        assert_eq!(round_currency(cart.lines[0].unit_price), 76.5);

        cart.set_quantity(product, 5).unwrap();
        recalculate_cart(&mut cart, Some(&customer), &resolver);
        assert_eq!(round_currency(cart.lines[0].unit_price), 85.0);
    }

    #[test]
    fn test_anonymous_and_non_b2b_carts_are_untouched() {
        let (_catalog, resolver, product) = fixture();
        let mut cart = Cart::new(None);
        cart.add_line(product, 10).unwrap();

        recalculate_cart(&mut cart, None, &resolver);
        assert_eq!(cart.lines[0].unit_price, 0.0);

        let shopper = Customer::retail(Uuid::new_v4());
        recalculate_cart(&mut cart, Some(&shopper), &resolver);
        assert_eq!(cart.lines[0].unit_price, 0.0);
    }

    #[test]
    fn test_compute_line_price_prefers_the_stash() {
        let (_catalog, resolver, product) = fixture();
        let customer = wholesale();
        let mut line = CartLine::new(product, 10);
        line.tier_price_stash = Some(50.0);

        let priced = compute_line_price(&line, &customer, &resolver);
        assert_eq!(priced.tier_adjusted, 50.0);
        assert_eq!(round_currency(priced.unit), 45.0);
    }

    #[test]
    fn test_reset_pricing_forces_fresh_tier_stage() {
        let (_catalog, resolver, product) = fixture();
        let customer = wholesale();
        let mut cart = Cart::new(Some(customer.id));
        cart.add_line(product, 10).unwrap();

        recalculate_cart(&mut cart, Some(&customer), &resolver);
        assert!(cart.lines[0].tier_price_stash.is_some());

        // Rehydration path: stash cleared, next pass re-derives the tier
        // stage (here for a different customer of a better tier).
        cart.reset_pricing();
        assert!(cart.lines[0].tier_price_stash.is_none());

        let distributor = Customer::b2b(Uuid::new_v4(), CustomerTier::Distributor);
        recalculate_cart(&mut cart, Some(&distributor), &resolver);
        // 100 * 0.75 * 0.90.
        assert_eq!(round_currency(cart.lines[0].unit_price), 67.5);
    }

    #[test]
    fn test_subtotal_after_recalculation() {
        let (catalog, resolver, product) = fixture();
        let plain = Uuid::new_v4();
        let mut p = Product::new(plain, "Ladle");
        p.b2b_base_price = Some(10.0);
        catalog.upsert(p);

        let customer = wholesale();
        let mut cart = Cart::new(Some(customer.id));
        cart.add_line(product, 10).unwrap();
        cart.add_line(plain, 2).unwrap();

        recalculate_cart(&mut cart, Some(&customer), &resolver);
        // 10 * 76.5 + 2 * 8.5.
        assert_eq!(round_currency(cart.subtotal()), 782.0);
    }
}
