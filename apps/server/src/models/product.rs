//! Product request/response models and field validation.

use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::product;
use crate::error::{AppError, AppResult, FieldError};

/// Maximum product name length, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Product as returned by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub available: bool,
    pub stock: i32,
}

impl From<product::Model> for ProductResponse {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            available: model.available,
            stock: model.stock,
        }
    }
}

/// Request body for `POST /products`.
///
/// Required fields are optional here so that a missing field is reported as a
/// validation error alongside the others.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub available: Option<bool>,
    pub stock: Option<i32>,
}

/// A validated product ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub available: bool,
    pub stock: i32,
}

impl CreateProductRequest {
    /// Validate the request, collecting every field error.
    pub fn validate(self) -> AppResult<NewProduct> {
        let mut errors = Vec::new();

        match &self.name {
            None => errors.push(FieldError::new("name", "field required")),
            Some(name) => check_name(name, &mut errors),
        }
        if self.description.is_none() {
            errors.push(FieldError::new("description", "field required"));
        }
        match self.price {
            None => errors.push(FieldError::new("price", "field required")),
            Some(price) => check_price(price, &mut errors),
        }
        let stock = self.stock.unwrap_or(0);
        check_stock(stock, &mut errors);

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(NewProduct {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            available: self.available.unwrap_or(true),
            stock,
        })
    }
}

/// Partial update for `PUT /products/{id}`.
///
/// Only fields present in the request are applied.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub available: Option<bool>,
    pub stock: Option<i32>,
}

impl ProductPatch {
    /// Validate the fields that are present.
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();

        if let Some(name) = &self.name {
            check_name(name, &mut errors);
        }
        if let Some(price) = self.price {
            check_price(price, &mut errors);
        }
        if let Some(stock) = self.stock {
            check_stock(stock, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// True when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.available.is_none()
            && self.stock.is_none()
    }

    /// Copy every present field onto the active model.
    pub fn apply(self, active: &mut product::ActiveModel) {
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(price) = self.price {
            active.price = Set(price);
        }
        if let Some(available) = self.available {
            active.available = Set(available);
        }
        if let Some(stock) = self.stock {
            active.stock = Set(stock);
        }
    }
}

fn check_name(name: &str, errors: &mut Vec<FieldError>) {
    if name.chars().count() > MAX_NAME_LENGTH {
        errors.push(FieldError::new(
            "name",
            format!("ensure this value has at most {} characters", MAX_NAME_LENGTH),
        ));
    }
}

fn check_price(price: f64, errors: &mut Vec<FieldError>) {
    if price.is_nan() || price <= 0.0 {
        errors.push(FieldError::new("price", "ensure this value is greater than 0"));
    }
}

fn check_stock(stock: i32, errors: &mut Vec<FieldError>) {
    if stock < 0 {
        errors.push(FieldError::new(
            "stock",
            "ensure this value is greater than or equal to 0",
        ));
    }
}
