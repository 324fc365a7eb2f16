use kamasa_cart::Cart;
use kamasa_catalog::InMemoryCatalog;
use kamasa_core::identity::CustomerDirectory;
use kamasa_pricing::PriceResolver;
use kamasa_shared::ids::CartId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<PriceResolver>,
    pub catalog: Arc<InMemoryCatalog>,
    pub directory: Arc<dyn CustomerDirectory>,
    /// Session-scoped carts; a persistent cart store is an external
    /// collaborator in production.
    pub carts: Arc<RwLock<HashMap<CartId, Cart>>>,
}
