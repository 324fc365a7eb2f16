use crate::schedule::VolumeSchedule;
use kamasa_shared::ids::ProductId;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;

/// Read-only view of a catalog product as consumed by pricing.
///
/// The catalog itself is owned by an external store; this core never writes
/// product data except for persisting a validated volume schedule through
/// the admin surface.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    /// Set on variants. Pricing data missing on the variant is looked up on
    /// the parent.
    pub parent_id: Option<ProductId>,
    pub name: String,
    /// B2B-specific base price; falls back to `regular_price` when unset.
    pub b2b_base_price: Option<f64>,
    pub regular_price: Option<f64>,
    pub volume_schedule: Option<VolumeSchedule>,
    pub is_active: bool,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id: None,
            name: name.into(),
            b2b_base_price: None,
            regular_price: None,
            volume_schedule: None,
            is_active: true,
        }
    }

    /// A variant inheriting pricing data from `parent_id` where absent.
    pub fn variant_of(parent_id: ProductId, id: ProductId, name: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(id, name)
        }
    }
}

/// Read side of the external product/catalog store.
pub trait CatalogReader: Send + Sync {
    fn product(&self, id: ProductId) -> Option<Product>;
}

/// In-memory catalog used by tests and local development.
#[derive(Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, product: Product) {
        self.products
            .write()
            .expect("catalog lock poisoned")
            .insert(product.id, product);
    }

    /// Persists a validated schedule on a product. Returns `false` when the
    /// product is unknown.
    pub fn set_volume_schedule(&self, id: ProductId, schedule: VolumeSchedule) -> bool {
        let mut products = self.products.write().expect("catalog lock poisoned");
        match products.get_mut(&id) {
            Some(product) => {
                product.volume_schedule = Some(schedule);
                true
            }
            None => false,
        }
    }
}

impl CatalogReader for InMemoryCatalog {
    fn product(&self, id: ProductId) -> Option<Product> {
        self.products
            .read()
            .expect("catalog lock poisoned")
            .get(&id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::VolumeRange;
    use uuid::Uuid;

    #[test]
    fn test_upsert_and_read_back() {
        let catalog = InMemoryCatalog::new();
        let id = Uuid::new_v4();
        let mut product = Product::new(id, "Industrial blender");
        product.b2b_base_price = Some(100.0);
        catalog.upsert(product);

        let found = catalog.product(id).unwrap();
        assert_eq!(found.b2b_base_price, Some(100.0));
        assert!(found.parent_id.is_none());
        assert!(catalog.product(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_set_volume_schedule_requires_known_product() {
        let catalog = InMemoryCatalog::new();
        let id = Uuid::new_v4();
        catalog.upsert(Product::new(id, "Stock pot"));

        let schedule =
            VolumeSchedule::new(vec![VolumeRange::unbounded(10, 5.0).unwrap()]);
        assert!(catalog.set_volume_schedule(id, schedule.clone()));
        assert!(!catalog.set_volume_schedule(Uuid::new_v4(), schedule));

        let found = catalog.product(id).unwrap();
        assert_eq!(found.volume_schedule.unwrap().len(), 1);
    }

    #[test]
    fn test_variant_links_to_parent() {
        let parent = Uuid::new_v4();
        let variant = Product::variant_of(parent, Uuid::new_v4(), "Stock pot 20L");
        assert_eq!(variant.parent_id, Some(parent));
        assert!(variant.b2b_base_price.is_none());
    }
}
