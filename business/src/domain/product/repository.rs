use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryError;

use super::model::Product;

/// Read-only view of the product catalog. Stock is never written through this port.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Product, RepositoryError>;
}
