//! Database queries for customers.

use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use crate::entity::customer::{self, ActiveModel, Entity as Customer};
use crate::error::{AppError, AppResult};
use crate::models::NewCustomer;

use super::DbPool;

impl DbPool {
    /// List all customers ordered by id.
    pub async fn list_customers(&self) -> AppResult<Vec<customer::Model>> {
        Customer::find()
            .order_by_asc(customer::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list customers: {}", e)))
    }

    /// Insert a new customer.
    pub async fn insert_customer(&self, new: NewCustomer) -> AppResult<customer::Model> {
        let model = ActiveModel {
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            email: Set(new.email),
            phone: Set(new.phone),
            address: Set(new.address),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert customer: {}", e)))
    }
}
