pub mod models;
pub mod recalc;

pub use models::{Cart, CartError, CartLine};
pub use recalc::{compute_line_price, recalculate_cart, LinePrice};
