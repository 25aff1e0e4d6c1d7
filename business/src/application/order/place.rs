use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::inventory::store::Reservation;
use crate::domain::logger::Logger;
use crate::domain::order::errors::{InvalidOrderRequest, OrderError};
use crate::domain::order::model::{Order, OrderLine, PricedLine};
use crate::domain::order::use_cases::place::{PlaceOrderItem, PlaceOrderParams, PlaceOrderUseCase};
use crate::domain::shared::value_objects::UserId;
use crate::domain::unit_of_work::{TransactionManager, UnitOfWork};

pub struct PlaceOrderUseCaseImpl {
    pub transactions: Arc<dyn TransactionManager>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl PlaceOrderUseCase for PlaceOrderUseCaseImpl {
    async fn execute(&self, params: PlaceOrderParams) -> Result<Order, OrderError> {
        self.logger.info(&format!(
            "Placing order for user {} with {} line(s)",
            params.user_id,
            params.items.len()
        ));

        let lines = validate_lines(&params.items)?;

        let mut uow = self.transactions.begin().await?;
        match reserve_and_persist(uow.as_mut(), params.user_id, &lines).await {
            Ok(order) => {
                uow.commit().await?;
                self.logger.info(&format!(
                    "Order placed: {} (total {})",
                    order.id, order.total_price
                ));
                Ok(order)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback().await {
                    self.logger
                        .error(&format!("Rollback after failed placement failed: {rollback_err}"));
                }
                self.logger.warn(&format!("Order placement rejected: {err:?}"));
                Err(err)
            }
        }
    }
}

fn validate_lines(items: &[PlaceOrderItem]) -> Result<Vec<OrderLine>, InvalidOrderRequest> {
    if items.is_empty() {
        return Err(InvalidOrderRequest::EmptyItems);
    }
    items
        .iter()
        .enumerate()
        .map(|(line, item)| OrderLine::new(item.product_id, item.quantity, line))
        .collect()
}

/// Locks every product up front, reserves lines in request order, then
/// writes the order. Stops at the first line that cannot be reserved.
async fn reserve_and_persist(
    uow: &mut dyn UnitOfWork,
    user_id: UserId,
    lines: &[OrderLine],
) -> Result<Order, OrderError> {
    uow.lock_products(&product_ids(lines.iter().map(|line| line.product_id)))
        .await?;

    let mut priced = Vec::with_capacity(lines.len());

    for (line, order_line) in lines.iter().enumerate() {
        let reservation = uow
            .try_reserve(order_line.product_id, order_line.quantity)
            .await?;

        match reservation {
            Reservation::Reserved { unit_price } => priced.push(PricedLine {
                product_id: order_line.product_id,
                quantity: order_line.quantity,
                unit_price,
            }),
            Reservation::InsufficientStock { available } => {
                return Err(OrderError::InsufficientStock {
                    line,
                    product_id: order_line.product_id,
                    requested: order_line.quantity,
                    available,
                });
            }
            Reservation::ProductNotFound => {
                return Err(OrderError::ProductNotFound {
                    line,
                    product_id: order_line.product_id,
                });
            }
        }
    }

    let order = Order::place(user_id, priced)?;
    uow.insert(&order).await?;
    Ok(order)
}

/// Distinct ids in ascending order, the order rows are locked in.
pub(crate) fn product_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
