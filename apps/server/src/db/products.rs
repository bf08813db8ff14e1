//! Database queries for products.

use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, QueryOrder, Set};

use crate::entity::product::{self, ActiveModel, Entity as Product};
use crate::error::{AppError, AppResult};
use crate::models::{NewProduct, ProductPatch};

use super::DbPool;

impl DbPool {
    /// List all products ordered by id.
    pub async fn list_products(&self) -> AppResult<Vec<product::Model>> {
        Product::find()
            .order_by_asc(product::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list products: {}", e)))
    }

    /// Get a product by ID.
    pub async fn get_product(&self, id: i32) -> AppResult<Option<product::Model>> {
        Product::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get product: {}", e)))
    }

    /// Insert a new product.
    pub async fn insert_product(&self, new: NewProduct) -> AppResult<product::Model> {
        let model = ActiveModel {
            name: Set(new.name),
            description: Set(new.description),
            price: Set(new.price),
            available: Set(new.available),
            stock: Set(new.stock),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert product: {}", e)))
    }

    /// Apply a partial update. Returns `None` when the product does not exist.
    pub async fn update_product(
        &self,
        id: i32,
        patch: ProductPatch,
    ) -> AppResult<Option<product::Model>> {
        let Some(existing) = self.get_product(id).await? else {
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(existing));
        }

        let mut active: ActiveModel = existing.into();
        patch.apply(&mut active);

        let updated = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update product: {}", e)))?;

        Ok(Some(updated))
    }

    /// Delete a product. Returns false when it did not exist.
    pub async fn delete_product(&self, id: i32) -> AppResult<bool> {
        let Some(existing) = self.get_product(id).await? else {
            return Ok(false);
        };

        existing
            .delete(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete product: {}", e)))?;

        Ok(true)
    }
}
