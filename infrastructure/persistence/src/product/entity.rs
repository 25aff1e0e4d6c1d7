use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use business::domain::errors::RepositoryError;
use business::domain::product::model::Product;

use crate::conversions::{money_from_decimal, quantity_from_db};

#[derive(Debug, FromRow)]
pub struct ProductEntity {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductEntity {
    pub fn into_domain(self) -> Result<Product, RepositoryError> {
        Ok(Product::from_repository(
            self.id,
            self.name,
            money_from_decimal(&self.price)?,
            quantity_from_db(self.stock_quantity)?,
            self.created_at,
            self.updated_at,
        ))
    }
}
