use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use kamasa_core::identity::Customer;
use kamasa_pricing::DisplayPrice;
use kamasa_shared::money::round_currency;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/products/{id}/price", get(get_price))
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// GET /v1/products/{id}/price?quantity=N
///
/// Hidden prices come back as 200 with `hidden: true` so a storefront
/// render is never broken by a pricing decision.
async fn get_price(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Query(query): Query<PriceQuery>,
    headers: HeaderMap,
) -> Result<Json<PriceResponse>, AppError> {
    let customer = customer_from_headers(&state, &headers).await?;
    let price = state
        .resolver
        .resolve(product_id, customer.as_ref(), query.quantity);

    Ok(Json(match price {
        DisplayPrice::Hidden => PriceResponse {
            hidden: true,
            price: None,
        },
        DisplayPrice::Amount(amount) => PriceResponse {
            hidden: false,
            price: Some(round_currency(amount)),
        },
    }))
}

/// Resolves the caller through the customer directory. No header means an
/// anonymous shopper; an unknown id is treated the same way rather than as
/// an error.
pub(crate) async fn customer_from_headers(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<Customer>, AppError> {
    let Some(raw) = headers.get("x-customer-id") else {
        return Ok(None);
    };
    let raw = raw
        .to_str()
        .map_err(|_| AppError::ValidationError("invalid x-customer-id header".to_string()))?;
    let customer_id = Uuid::parse_str(raw)
        .map_err(|_| AppError::ValidationError("x-customer-id must be a UUID".to_string()))?;
    Ok(state.directory.find(customer_id).await)
}
