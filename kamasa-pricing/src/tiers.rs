use kamasa_core::identity::CustomerTier;
use std::collections::HashMap;

/// Pluggable tier→discount policy.
///
/// The resolver only sees this trait, so deployments can swap the standard
/// table for their own policy without touching the pricing pipeline.
pub trait TierPolicy: Send + Sync {
    /// Percentage off the base price for a tier. Unknown tiers get 0.
    fn discount_percent(&self, tier: &CustomerTier) -> f64;
}

/// Table-backed tier policy.
#[derive(Debug, Clone, PartialEq)]
pub struct TierDiscountTable {
    discounts: HashMap<CustomerTier, f64>,
}

impl TierDiscountTable {
    /// The standard table: retail 0%, wholesale 15%, distributor 25%.
    pub fn standard() -> Self {
        let mut discounts = HashMap::new();
        discounts.insert(CustomerTier::Retail, 0.0);
        discounts.insert(CustomerTier::Wholesale, 15.0);
        discounts.insert(CustomerTier::Distributor, 25.0);
        Self { discounts }
    }

    /// Builds a table from configuration entries keyed by tier name
    /// (case-insensitive).
    pub fn from_percentages<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let discounts = entries
            .into_iter()
            .map(|(name, percent)| (CustomerTier::parse(name), percent))
            .collect();
        Self { discounts }
    }

    pub fn set(&mut self, tier: CustomerTier, percent: f64) {
        self.discounts.insert(tier, percent);
    }
}

impl Default for TierDiscountTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TierPolicy for TierDiscountTable {
    fn discount_percent(&self, tier: &CustomerTier) -> f64 {
        self.discounts.get(tier).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_defaults() {
        let table = TierDiscountTable::standard();
        assert_eq!(table.discount_percent(&CustomerTier::Retail), 0.0);
        assert_eq!(table.discount_percent(&CustomerTier::Wholesale), 15.0);
        assert_eq!(table.discount_percent(&CustomerTier::Distributor), 25.0);
    }

    #[test]
    fn test_unknown_tier_gets_zero() {
        let table = TierDiscountTable::standard();
        assert_eq!(
            table.discount_percent(&CustomerTier::parse("importer")),
            0.0
        );
        assert_eq!(table.discount_percent(&CustomerTier::parse("")), 0.0);
    }

    #[test]
    fn test_config_table_overrides_and_extends() {
        let table =
            TierDiscountTable::from_percentages([("Wholesale", 18.0), ("importer", 30.0)]);
        assert_eq!(table.discount_percent(&CustomerTier::Wholesale), 18.0);
        assert_eq!(
            table.discount_percent(&CustomerTier::parse("IMPORTER")),
            30.0
        );
        // Not in this table at all.
        assert_eq!(table.discount_percent(&CustomerTier::Distributor), 0.0);
    }
}
