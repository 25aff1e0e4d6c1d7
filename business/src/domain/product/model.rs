use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::shared::value_objects::Money;

/// Catalog read model of a sellable product.
///
/// `available_quantity` is only ever changed through the inventory store
/// inside a unit of work; this struct is a snapshot, not a handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub unit_price: Money,
    pub available_quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Constructor for data already persisted in the repository (no validation).
    pub fn from_repository(
        id: Uuid,
        name: String,
        unit_price: Money,
        available_quantity: u32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            unit_price,
            available_quantity,
            created_at,
            updated_at,
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.available_quantity > 0
    }
}
