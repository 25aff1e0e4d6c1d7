use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::logger::Logger;
use crate::domain::order::access::OrderAccessGate;
use crate::domain::order::errors::OrderError;
use crate::domain::order::model::Order;
use crate::domain::order::repository::OrderRepository;
use crate::domain::order::use_cases::get_all::{GetAllOrdersParams, GetAllOrdersUseCase};
use crate::domain::shared::pagination::Page;

pub struct GetAllOrdersUseCaseImpl {
    pub repository: Arc<dyn OrderRepository>,
    pub access_gate: Arc<dyn OrderAccessGate>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl GetAllOrdersUseCase for GetAllOrdersUseCaseImpl {
    async fn execute(&self, params: GetAllOrdersParams) -> Result<Page<Order>, OrderError> {
        let page = if self.access_gate.can_manage_orders(&params.caller) {
            self.logger
                .info(&format!("Fetching all orders (page {})", params.page.page));
            self.repository.get_all(params.page).await?
        } else {
            self.logger.info(&format!(
                "Fetching orders of user {} (page {})",
                params.caller.user_id, params.page.page
            ));
            self.repository
                .get_all_by_user(&params.caller.user_id, params.page)
                .await?
        };

        Ok(page)
    }
}
