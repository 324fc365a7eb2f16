use chrono::{DateTime, Duration, Utc};
use kamasa_shared::ids::{CustomerId, ProductId};
use std::collections::HashMap;
use std::sync::RwLock;

/// Default lifetime of a cached tier-adjusted price: one hour.
pub const DEFAULT_PRICE_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    value: f64,
    expires_at: DateTime<Utc>,
}

/// Memoizes the tier-adjusted price per (product, customer) pair.
///
/// Only the tier stage is cached; the volume stage depends on the quantity
/// of an individual cart line and is always recomputed. Expired entries are
/// overwritten lazily on the next read, there is no sweeper and no size
/// bound. A lost write race only costs one extra recomputation.
pub struct PriceCache {
    ttl: Duration,
    entries: RwLock<HashMap<(ProductId, CustomerId), CacheEntry>>,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value while it is fresh; otherwise invokes
    /// `compute`, stores the result for the TTL window, and returns it.
    pub fn get_or_compute<F>(
        &self,
        product_id: ProductId,
        customer_id: CustomerId,
        compute: F,
    ) -> f64
    where
        F: FnOnce() -> f64,
    {
        let key = (product_id, customer_id);
        let now = Utc::now();

        if let Some(entry) = self
            .entries
            .read()
            .expect("price cache lock poisoned")
            .get(&key)
        {
            if now < entry.expires_at {
                return entry.value;
            }
        }

        let value = compute();
        self.entries
            .write()
            .expect("price cache lock poisoned")
            .insert(
                key,
                CacheEntry {
                    value,
                    expires_at: now + self.ttl,
                },
            );
        value
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .expect("price cache lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Backdates an entry so tests can cross the TTL boundary without
    /// sleeping.
    #[cfg(test)]
    pub(crate) fn force_expire(&self, product_id: ProductId, customer_id: CustomerId) {
        if let Some(entry) = self
            .entries
            .write()
            .expect("price cache lock poisoned")
            .get_mut(&(product_id, customer_id))
        {
            entry.expires_at = Utc::now() - Duration::seconds(1);
        }
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_PRICE_TTL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_fresh_entry_skips_recompute() {
        let cache = PriceCache::default();
        let product = Uuid::new_v4();
        let customer = Uuid::new_v4();

        let mut calls = 0;
        let first = cache.get_or_compute(product, customer, || {
            calls += 1;
            85.0
        });
        let second = cache.get_or_compute(product, customer, || {
            calls += 1;
            42.0
        });

        assert_eq!(first, 85.0);
        assert_eq!(second, 85.0);
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_recomputed_and_overwritten() {
        let cache = PriceCache::default();
        let product = Uuid::new_v4();
        let customer = Uuid::new_v4();

        cache.get_or_compute(product, customer, || 85.0);
        cache.force_expire(product, customer);

        let recomputed = cache.get_or_compute(product, customer, || 90.0);
        assert_eq!(recomputed, 90.0);

        // The overwrite refreshed the expiry.
        let cached = cache.get_or_compute(product, customer, || 0.0);
        assert_eq!(cached, 90.0);
    }

    #[test]
    fn test_keys_are_scoped_per_customer() {
        let cache = PriceCache::default();
        let product = Uuid::new_v4();

        let wholesale = cache.get_or_compute(product, Uuid::new_v4(), || 85.0);
        let distributor = cache.get_or_compute(product, Uuid::new_v4(), || 75.0);

        assert_eq!(wholesale, 85.0);
        assert_eq!(distributor, 75.0);
        assert_eq!(cache.len(), 2);
    }
}
