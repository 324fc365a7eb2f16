pub mod cache;
pub mod resolver;
pub mod tiers;

pub use cache::{PriceCache, DEFAULT_PRICE_TTL_SECS};
pub use resolver::{apply_volume_discount, DisplayPrice, PriceResolver};
pub use tiers::{TierDiscountTable, TierPolicy};
