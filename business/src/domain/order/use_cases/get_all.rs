use async_trait::async_trait;

use crate::domain::order::errors::OrderError;
use crate::domain::order::model::Order;
use crate::domain::shared::pagination::{Page, PageRequest};
use crate::domain::shared::value_objects::Caller;

pub struct GetAllOrdersParams {
    pub caller: Caller,
    pub page: PageRequest,
}

#[async_trait]
pub trait GetAllOrdersUseCase: Send + Sync {
    async fn execute(&self, params: GetAllOrdersParams) -> Result<Page<Order>, OrderError>;
}
