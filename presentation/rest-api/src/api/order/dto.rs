use chrono::{DateTime, Utc};
use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use business::domain::order::model::{Order, OrderItem};
use business::domain::order::use_cases::place::PlaceOrderItem;
use business::domain::order::value_objects::OrderStatus;
use business::domain::shared::pagination::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Enum)]
pub enum OrderStatusDto {
    #[oai(rename = "pending")]
    Pending,
    #[oai(rename = "processing")]
    Processing,
    #[oai(rename = "completed")]
    Completed,
    #[oai(rename = "cancelled")]
    Cancelled,
}

impl From<OrderStatus> for OrderStatusDto {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => OrderStatusDto::Pending,
            OrderStatus::Processing => OrderStatusDto::Processing,
            OrderStatus::Completed => OrderStatusDto::Completed,
            OrderStatus::Cancelled => OrderStatusDto::Cancelled,
        }
    }
}

impl From<OrderStatusDto> for OrderStatus {
    fn from(dto: OrderStatusDto) -> Self {
        match dto {
            OrderStatusDto::Pending => OrderStatus::Pending,
            OrderStatusDto::Processing => OrderStatus::Processing,
            OrderStatusDto::Completed => OrderStatus::Completed,
            OrderStatusDto::Cancelled => OrderStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct PlaceOrderItemRequest {
    pub product_id: Uuid,
    /// Units to buy (must be at least 1)
    pub quantity: i64,
}

#[derive(Debug, Clone, Object)]
pub struct PlaceOrderRequest {
    /// Lines in the order they should be reserved; at least one
    pub items: Vec<PlaceOrderItemRequest>,
}

impl From<PlaceOrderItemRequest> for PlaceOrderItem {
    fn from(item: PlaceOrderItemRequest) -> Self {
        PlaceOrderItem {
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatusDto,
}

#[derive(Debug, Clone, Object)]
pub struct OrderItemResponse {
    pub id: String,
    pub product_id: String,
    pub quantity: u32,
    /// Price per unit when the order was placed, e.g. "100.00"
    pub unit_price: String,
    pub subtotal: String,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        let subtotal = item
            .subtotal()
            .map(|subtotal| subtotal.to_string())
            .unwrap_or_default();
        Self {
            id: item.id.to_string(),
            product_id: item.product_id.to_string(),
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
            subtotal,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItemResponse>,
    /// Sum of all item subtotals, two decimals
    pub total_price: String,
    pub status: OrderStatusDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_string(),
            user_id: order.user_id.to_string(),
            items: order.items.into_iter().map(Into::into).collect(),
            total_price: order.total_price.to_string(),
            status: order.status.into(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct OrderPageResponse {
    pub items: Vec<OrderResponse>,
    /// Number of orders across all pages
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl From<Page<Order>> for OrderPageResponse {
    fn from(page: Page<Order>) -> Self {
        let page = page.map(OrderResponse::from);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use business::domain::order::model::PricedLine;
    use business::domain::shared::value_objects::{Money, UserId};

    #[test]
    fn should_render_money_with_two_decimals() {
        let order = Order::place(
            UserId::new("alice"),
            vec![
                PricedLine {
                    product_id: Uuid::new_v4(),
                    quantity: 2,
                    unit_price: Money::from_cents(10_000).unwrap(),
                },
                PricedLine {
                    product_id: Uuid::new_v4(),
                    quantity: 1,
                    unit_price: Money::from_cents(20_000).unwrap(),
                },
            ],
        )
        .unwrap();

        let response = OrderResponse::from(order);

        assert_eq!(response.total_price, "400.00");
        assert_eq!(response.items[0].unit_price, "100.00");
        assert_eq!(response.items[0].subtotal, "200.00");
        assert_eq!(response.status, OrderStatusDto::Pending);
    }

    #[test]
    fn should_map_every_status_both_ways() {
        for status in OrderStatus::ALL {
            let dto = OrderStatusDto::from(status);
            assert_eq!(OrderStatus::from(dto), status);
        }
    }
}
