//! Identifier aliases shared across the workspace.

use uuid::Uuid;

pub type ProductId = Uuid;
pub type CustomerId = Uuid;
pub type CartId = Uuid;
