use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::place::product_ids;
use crate::domain::errors::RepositoryError;
use crate::domain::logger::Logger;
use crate::domain::order::access::OrderAccessGate;
use crate::domain::order::errors::OrderError;
use crate::domain::order::model::Order;
use crate::domain::order::use_cases::update_status::{
    UpdateOrderStatusParams, UpdateOrderStatusUseCase,
};
use crate::domain::order::value_objects::OrderStatus;
use crate::domain::unit_of_work::{TransactionManager, UnitOfWork};

pub struct UpdateOrderStatusUseCaseImpl {
    pub transactions: Arc<dyn TransactionManager>,
    pub access_gate: Arc<dyn OrderAccessGate>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl UpdateOrderStatusUseCase for UpdateOrderStatusUseCaseImpl {
    async fn execute(&self, params: UpdateOrderStatusParams) -> Result<Order, OrderError> {
        self.logger.info(&format!(
            "Updating order {} to status {}",
            params.id, params.status
        ));

        if !self.access_gate.can_manage_orders(&params.caller) {
            self.logger.warn(&format!(
                "User {} is not allowed to update order {}",
                params.caller.user_id, params.id
            ));
            return Err(OrderError::Forbidden);
        }

        let mut uow = self.transactions.begin().await?;
        match apply_transition(uow.as_mut(), params.id, params.status).await {
            Ok(order) => {
                uow.commit().await?;
                self.logger
                    .info(&format!("Order {} is now {}", order.id, order.status));
                Ok(order)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback().await {
                    self.logger.error(&format!(
                        "Rollback after failed status update failed: {rollback_err}"
                    ));
                }
                self.logger
                    .warn(&format!("Status update of order {} rejected: {err:?}", params.id));
                Err(err)
            }
        }
    }
}

/// Locks the order, validates the transition and, for cancellations,
/// returns every item's quantity to stock before persisting the status.
async fn apply_transition(
    uow: &mut dyn UnitOfWork,
    id: Uuid,
    next: OrderStatus,
) -> Result<Order, OrderError> {
    let mut order = uow.get_for_update(id).await.map_err(|e| match e {
        RepositoryError::NotFound => OrderError::NotFound,
        other => OrderError::Repository(other),
    })?;

    order.transition_to(next)?;

    if next == OrderStatus::Cancelled {
        uow.lock_products(&product_ids(order.items.iter().map(|item| item.product_id)))
            .await?;
        for item in &order.items {
            uow.release(item.product_id, item.quantity).await?;
        }
    }

    uow.update_status(&order).await?;
    Ok(order)
}
