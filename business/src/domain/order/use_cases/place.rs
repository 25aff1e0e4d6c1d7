use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::order::errors::OrderError;
use crate::domain::order::model::Order;
use crate::domain::shared::value_objects::UserId;

/// A raw request line. Quantity is validated by the use case.
#[derive(Debug, Clone)]
pub struct PlaceOrderItem {
    pub product_id: Uuid,
    pub quantity: i64,
}

pub struct PlaceOrderParams {
    pub user_id: UserId,
    pub items: Vec<PlaceOrderItem>,
}

#[async_trait]
pub trait PlaceOrderUseCase: Send + Sync {
    async fn execute(&self, params: PlaceOrderParams) -> Result<Order, OrderError>;
}
