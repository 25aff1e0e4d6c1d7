use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryError;
use crate::domain::shared::pagination::{Page, PageRequest};
use crate::domain::shared::value_objects::UserId;

use super::model::Order;

/// Read side of the order store. Orders come back with their items, newest first.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn get_all(&self, page: PageRequest) -> Result<Page<Order>, RepositoryError>;
    async fn get_all_by_user(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<Order>, RepositoryError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Order, RepositoryError>;
}

/// Write side of the order store, scoped to an open unit of work.
#[async_trait]
pub trait OrderWriter: Send {
    /// Persists the order row and all of its items.
    async fn insert(&mut self, order: &Order) -> Result<(), RepositoryError>;
    /// Loads an order and locks it until the unit of work ends.
    async fn get_for_update(&mut self, id: Uuid) -> Result<Order, RepositoryError>;
    /// Persists `status` and `updated_at`; items and total never change.
    async fn update_status(&mut self, order: &Order) -> Result<(), RepositoryError>;
}
