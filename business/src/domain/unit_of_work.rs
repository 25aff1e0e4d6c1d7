use async_trait::async_trait;

use crate::domain::errors::RepositoryError;
use crate::domain::inventory::store::InventoryStore;
use crate::domain::order::repository::OrderWriter;

/// One database transaction spanning stock and order writes.
///
/// Nothing written through a unit of work is visible to others before
/// `commit`. Dropping it without committing rolls everything back.
#[async_trait]
pub trait UnitOfWork: InventoryStore + OrderWriter + Send {
    async fn commit(&mut self) -> Result<(), RepositoryError>;
    async fn rollback(&mut self) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError>;
}
