use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use business::domain::errors::RepositoryError;
use business::domain::order::model::{Order, OrderItem};
use business::domain::order::value_objects::OrderStatus;
use business::domain::shared::value_objects::UserId;

use crate::conversions::{money_from_decimal, quantity_from_db};

#[derive(Debug, FromRow)]
pub struct OrderEntity {
    pub id: Uuid,
    pub user_id: String,
    pub total_price: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderEntity {
    pub fn into_domain(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let status = self.status.parse::<OrderStatus>().map_err(|e| {
            tracing::error!("Order {} has unreadable status: {e}", self.id);
            RepositoryError::DatabaseError
        })?;

        Ok(Order::from_repository(
            self.id,
            UserId::new(self.user_id),
            items,
            money_from_decimal(&self.total_price)?,
            status,
            self.created_at,
            self.updated_at,
        ))
    }
}

#[derive(Debug, FromRow)]
pub struct OrderItemEntity {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    /// Position in the placement request; only used for ordering.
    #[allow(dead_code)]
    pub line_number: i32,
    pub quantity: i32,
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

impl OrderItemEntity {
    pub fn into_domain(self) -> Result<OrderItem, RepositoryError> {
        Ok(OrderItem::from_repository(
            self.id,
            self.order_id,
            self.product_id,
            quantity_from_db(self.quantity)?,
            money_from_decimal(&self.price)?,
            self.created_at,
        ))
    }
}
