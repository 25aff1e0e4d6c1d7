use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::{InvalidOrderRequest, OrderError};
use super::value_objects::OrderStatus;
use crate::domain::shared::value_objects::{Money, UserId};

/// A validated `(product, quantity)` pair from a placement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: u32,
}

impl OrderLine {
    /// Validates a raw request line. `line` is its zero-based position.
    pub fn new(product_id: Uuid, quantity: i64, line: usize) -> Result<Self, InvalidOrderRequest> {
        if quantity < 1 {
            return Err(InvalidOrderRequest::NonPositiveQuantity { line });
        }
        // Quantities are stored as INTEGER columns.
        let quantity = i32::try_from(quantity)
            .ok()
            .and_then(|q| u32::try_from(q).ok())
            .ok_or(InvalidOrderRequest::QuantityTooLarge { line })?;

        Ok(Self {
            product_id,
            quantity,
        })
    }
}

/// An order line whose stock has been reserved, with the price read at reservation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_price: Money,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    /// Price snapshot taken when the order was placed.
    pub unit_price: Money,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    pub fn from_repository(
        id: Uuid,
        order_id: Uuid,
        product_id: Uuid,
        quantity: u32,
        unit_price: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_id,
            product_id,
            quantity,
            unit_price,
            created_at,
        }
    }

    pub fn subtotal(&self) -> Option<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total_price: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds a new pending order from reserved lines. Items keep request order.
    pub fn place(user_id: UserId, lines: Vec<PricedLine>) -> Result<Self, OrderError> {
        if lines.is_empty() {
            return Err(InvalidOrderRequest::EmptyItems.into());
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let items: Vec<OrderItem> = lines
            .into_iter()
            .map(|line| OrderItem {
                id: Uuid::new_v4(),
                order_id: id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                created_at: now,
            })
            .collect();
        let total_price = Self::compute_total(&items)?;

        Ok(Self {
            id,
            user_id,
            items,
            total_price,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Sum of `unit_price * quantity` over all items, at most `Money::MAX`.
    pub fn compute_total(items: &[OrderItem]) -> Result<Money, OrderError> {
        items
            .iter()
            .try_fold(Money::ZERO, |total, item| {
                item.subtotal().and_then(|subtotal| total.checked_add(subtotal))
            })
            .ok_or(InvalidOrderRequest::TotalOverflow.into())
    }

    /// Moves the order to `next`, rejecting anything outside the transition table.
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), OrderError> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Constructor for data already persisted in the repository (no validation).
    pub fn from_repository(
        id: Uuid,
        user_id: UserId,
        items: Vec<OrderItem>,
        total_price: Money,
        status: OrderStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            items,
            total_price,
            status,
            created_at,
            updated_at,
        }
    }
}
