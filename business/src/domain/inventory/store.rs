use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryError;
use crate::domain::shared::value_objects::Money;

/// Outcome of a stock reservation attempt.
///
/// Running out of stock is an expected business result, so it is reported
/// here rather than through `RepositoryError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// Stock was decremented. `unit_price` is read from the same locked row.
    Reserved { unit_price: Money },
    InsufficientStock { available: u32 },
    ProductNotFound,
}

/// Per-product stock primitives, scoped to an open unit of work.
///
/// Implementations must make `try_reserve` a single conditional write
/// (check and decrement in one step) so that concurrent reservations of the
/// same product serialize and stock never goes negative.
#[async_trait]
pub trait InventoryStore: Send {
    /// Locks the rows of `product_ids` in ascending id order and holds them
    /// until the unit of work ends. Units of work that touch overlapping
    /// products take this first, so they queue instead of deadlocking.
    /// Unknown ids are skipped.
    async fn lock_products(&mut self, product_ids: &[Uuid]) -> Result<(), RepositoryError>;

    async fn try_reserve(
        &mut self,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<Reservation, RepositoryError>;

    /// Adds `quantity` back. Not idempotent; callers guard against double release.
    async fn release(&mut self, product_id: Uuid, quantity: u32) -> Result<(), RepositoryError>;
}
