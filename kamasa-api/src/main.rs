use chrono::Duration;
use kamasa_api::{app, AppState};
use kamasa_catalog::{InMemoryCatalog, Product, VolumeRange, VolumeSchedule};
use kamasa_core::identity::{Customer, CustomerTier, InMemoryDirectory};
use kamasa_pricing::{PriceCache, PriceResolver, TierDiscountTable};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kamasa_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = kamasa_api::config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Kamasa B2B API on port {}", config.server.port);

    let tiers = if config.pricing.tier_discounts.is_empty() {
        TierDiscountTable::standard()
    } else {
        TierDiscountTable::from_percentages(
            config
                .pricing
                .tier_discounts
                .iter()
                .map(|(name, percent)| (name.as_str(), *percent)),
        )
    };
    let cache = Arc::new(PriceCache::new(Duration::seconds(
        config.pricing.cache_ttl_seconds,
    )));

    let catalog = Arc::new(InMemoryCatalog::new());
    let directory = Arc::new(InMemoryDirectory::new());
    seed_demo_data(&catalog, &directory);

    let resolver = Arc::new(PriceResolver::new(
        Arc::clone(&catalog) as _,
        Arc::new(tiers),
        cache,
    ));

    let state = AppState {
        resolver,
        catalog,
        directory,
        carts: Arc::new(RwLock::new(HashMap::new())),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app(state)).await.unwrap();
}

/// Local-development stand-ins for the external catalog store and customer
/// directory.
fn seed_demo_data(catalog: &InMemoryCatalog, directory: &InMemoryDirectory) {
    let product_id = Uuid::new_v4();
    let mut product = Product::new(product_id, "Industrial stock pot 50L");
    product.b2b_base_price = Some(100.0);
    product.volume_schedule = Some(VolumeSchedule::new(vec![
        VolumeRange::new(10, Some(49), 10.0).expect("valid demo range"),
        VolumeRange::unbounded(50, 20.0).expect("valid demo range"),
    ]));
    catalog.upsert(product);

    let wholesale = Customer::b2b(Uuid::new_v4(), CustomerTier::Wholesale);
    let distributor = Customer::b2b(Uuid::new_v4(), CustomerTier::Distributor);
    tracing::info!(
        %product_id,
        wholesale_customer = %wholesale.id,
        distributor_customer = %distributor.id,
        "seeded demo catalog and customers"
    );
    directory.insert(wholesale);
    directory.insert(distributor);
}
