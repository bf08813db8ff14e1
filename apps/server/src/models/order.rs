//! Order models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::order;

/// Order as returned by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub customer_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub order_date: DateTime<Utc>,
    pub total_price: f64,
}

impl From<order::Model> for OrderResponse {
    fn from(model: order::Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            product_id: model.product_id,
            quantity: model.quantity,
            order_date: model.order_date,
            total_price: model.total_price,
        }
    }
}

/// Order to insert (fixture seeding).
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total_price: f64,
    /// Defaults to the insertion time
    pub order_date: Option<DateTime<Utc>>,
}
