//! Database queries for orders.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use crate::entity::order::{self, ActiveModel, Entity as Order};
use crate::error::{AppError, AppResult};
use crate::models::NewOrder;

use super::DbPool;

impl DbPool {
    /// List all orders ordered by id.
    pub async fn list_orders(&self) -> AppResult<Vec<order::Model>> {
        Order::find()
            .order_by_asc(order::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list orders: {}", e)))
    }

    /// Insert a new order, dated now unless the order carries a date.
    pub async fn insert_order(&self, new: NewOrder) -> AppResult<order::Model> {
        let model = ActiveModel {
            customer_id: Set(new.customer_id),
            product_id: Set(new.product_id),
            quantity: Set(new.quantity),
            order_date: Set(new.order_date.unwrap_or_else(Utc::now)),
            total_price: Set(new.total_price),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert order: {}", e)))
    }
}
