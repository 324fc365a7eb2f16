use chrono::{DateTime, Utc};
use kamasa_shared::ids::{CartId, CustomerId, ProductId};
use serde::Serialize;
use uuid::Uuid;

/// One product-and-quantity entry in a shopping cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: i32,
    /// Working unit price written back by the totals pass; 0 until the
    /// first recalculation.
    pub unit_price: f64,
    /// Tier-adjusted price captured on the first recalculation of this
    /// session. Keeps repeated passes from compounding the volume stage.
    #[serde(skip)]
    pub(crate) tier_price_stash: Option<f64>,
}

impl CartLine {
    pub fn new(product_id: ProductId, quantity: i32) -> Self {
        Self {
            product_id,
            quantity,
            unit_price: 0.0,
            tier_price_stash: None,
        }
    }

    /// Full-precision line total.
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// A shopping cart owned by the cart/session subsystem.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub id: CartId,
    /// Owning customer; anonymous carts never receive B2B prices.
    pub customer_id: Option<CustomerId>,
    pub lines: Vec<CartLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(customer_id: Option<CustomerId>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_id,
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds a line, merging quantities when the product is already present.
    pub fn add_line(&mut self, product_id: ProductId, quantity: i32) -> Result<(), CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(CartLine::new(product_id, quantity)),
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replaces the quantity of an existing line.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i32) -> Result<(), CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or(CartError::LineNotFound(product_id))?;
        line.quantity = quantity;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Drops every stashed tier price. Call after rehydrating a cart from
    /// storage so a tier change is picked up by the next totals pass.
    pub fn reset_pricing(&mut self) {
        for line in &mut self.lines {
            line.tier_price_stash = None;
        }
    }

    /// Full-precision subtotal over all lines.
    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i32),
    #[error("Product not in cart: {0}")]
    LineNotFound(ProductId),
}
