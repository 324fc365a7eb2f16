use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use kamasa_cart::{recalculate_cart, Cart, CartError};
use kamasa_shared::money::round_currency;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/carts", post(create_cart))
        .route("/v1/carts/{id}/lines", post(add_line))
        .route("/v1/carts/{id}/recalculate", post(recalculate))
}

#[derive(Debug, Deserialize)]
pub struct CreateCartRequest {
    pub customer_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CreateCartResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AddLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub id: Uuid,
    pub lines: Vec<CartLineResponse>,
    pub subtotal: f64,
}

impl CartResponse {
    /// Rounds every amount; the cart keeps full precision internally.
    fn from_cart(cart: &Cart) -> Self {
        Self {
            id: cart.id,
            lines: cart
                .lines
                .iter()
                .map(|line| CartLineResponse {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price: round_currency(line.unit_price),
                    line_total: round_currency(line.line_total()),
                })
                .collect(),
            subtotal: round_currency(cart.subtotal()),
        }
    }
}

/// POST /v1/carts
async fn create_cart(
    State(state): State<AppState>,
    Json(req): Json<CreateCartRequest>,
) -> Result<Json<CreateCartResponse>, AppError> {
    let cart = Cart::new(req.customer_id);
    let id = cart.id;
    state
        .carts
        .write()
        .expect("cart store lock poisoned")
        .insert(id, cart);
    tracing::debug!(cart_id = %id, "cart created");
    Ok(Json(CreateCartResponse { id }))
}

/// POST /v1/carts/{id}/lines
async fn add_line(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
    Json(req): Json<AddLineRequest>,
) -> Result<Json<CartResponse>, AppError> {
    let mut carts = state.carts.write().expect("cart store lock poisoned");
    let cart = carts
        .get_mut(&cart_id)
        .ok_or_else(|| AppError::NotFoundError(format!("Cart not found: {cart_id}")))?;

    cart.add_line(req.product_id, req.quantity)
        .map_err(|err| match err {
            CartError::InvalidQuantity(_) => AppError::ValidationError(err.to_string()),
            CartError::LineNotFound(_) => AppError::NotFoundError(err.to_string()),
        })?;

    Ok(Json(CartResponse::from_cart(cart)))
}

/// POST /v1/carts/{id}/recalculate
///
/// Runs one totals pass: tier stage stashed per line, volume stage
/// re-derived from each line's current quantity.
async fn recalculate(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
) -> Result<Json<CartResponse>, AppError> {
    let customer_id = {
        let carts = state.carts.read().expect("cart store lock poisoned");
        let cart = carts
            .get(&cart_id)
            .ok_or_else(|| AppError::NotFoundError(format!("Cart not found: {cart_id}")))?;
        cart.customer_id
    };

    // Directory lookup happens outside the cart lock.
    let customer = match customer_id {
        Some(id) => state.directory.find(id).await,
        None => None,
    };

    let mut carts = state.carts.write().expect("cart store lock poisoned");
    let cart = carts
        .get_mut(&cart_id)
        .ok_or_else(|| AppError::NotFoundError(format!("Cart not found: {cart_id}")))?;
    recalculate_cart(cart, customer.as_ref(), &state.resolver);

    Ok(Json(CartResponse::from_cart(cart)))
}
