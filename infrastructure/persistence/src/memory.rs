use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use business::domain::errors::RepositoryError;
use business::domain::inventory::store::{InventoryStore, Reservation};
use business::domain::order::model::Order;
use business::domain::order::repository::{OrderRepository, OrderWriter};
use business::domain::product::model::Product;
use business::domain::product::repository::ProductCatalog;
use business::domain::shared::pagination::{Page, PageRequest};
use business::domain::shared::value_objects::{Money, UserId};
use business::domain::unit_of_work::{TransactionManager, UnitOfWork};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    products: HashMap<Uuid, Product>,
    /// Insertion order; the newest order is last.
    orders: Vec<Order>,
}

/// Process-local store used by tests and local runs without Postgres.
///
/// Units of work are fully serialized: `begin` takes the store lock and
/// keeps it until commit or rollback, editing a private copy of the state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert_product(&self, product: Product) {
        let mut state = self.state.lock().await;
        state.products.insert(product.id, product);
    }

    /// Changes the catalog price without touching existing orders.
    pub async fn set_unit_price(&self, product_id: Uuid, unit_price: Money) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        let product = state
            .products
            .get_mut(&product_id)
            .ok_or(RepositoryError::NotFound)?;
        product.unit_price = unit_price;
        product.updated_at = Utc::now();
        Ok(())
    }

    pub async fn stock_of(&self, product_id: Uuid) -> Option<u32> {
        let state = self.state.lock().await;
        state
            .products
            .get(&product_id)
            .map(|product| product.available_quantity)
    }

    pub async fn order_count(&self) -> usize {
        self.state.lock().await.orders.len()
    }

    fn paginate<'a>(orders: impl DoubleEndedIterator<Item = &'a Order>, page: PageRequest) -> Page<Order> {
        let matching: Vec<&Order> = orders.rev().collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Page::new(items, total, page)
    }
}

#[async_trait]
impl TransactionManager for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryUnitOfWork {
            guard: Some(guard),
            working,
        }))
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn get_all(&self, page: PageRequest) -> Result<Page<Order>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(Self::paginate(state.orders.iter(), page))
    }

    async fn get_all_by_user(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<Order>, RepositoryError> {
        let state = self.state.lock().await;
        let owned = state.orders.iter().filter(|order| order.is_owned_by(user_id));
        Ok(Self::paginate(owned, page))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Order, RepositoryError> {
        let state = self.state.lock().await;
        state
            .orders
            .iter()
            .find(|order| order.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl ProductCatalog for InMemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Product, RepositoryError> {
        let state = self.state.lock().await;
        state
            .products
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

pub struct InMemoryUnitOfWork {
    guard: Option<OwnedMutexGuard<MemoryState>>,
    working: MemoryState,
}

impl InMemoryUnitOfWork {
    fn state(&mut self) -> Result<&mut MemoryState, RepositoryError> {
        if self.guard.is_none() {
            return Err(RepositoryError::Persistence);
        }
        Ok(&mut self.working)
    }
}

#[async_trait]
impl InventoryStore for InMemoryUnitOfWork {
    /// The whole state is already held by this unit of work.
    async fn lock_products(&mut self, _product_ids: &[Uuid]) -> Result<(), RepositoryError> {
        self.state().map(|_| ())
    }

    async fn try_reserve(
        &mut self,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<Reservation, RepositoryError> {
        let state = self.state()?;
        let Some(product) = state.products.get_mut(&product_id) else {
            return Ok(Reservation::ProductNotFound);
        };

        if product.available_quantity < quantity {
            return Ok(Reservation::InsufficientStock {
                available: product.available_quantity,
            });
        }

        product.available_quantity -= quantity;
        product.updated_at = Utc::now();
        Ok(Reservation::Reserved {
            unit_price: product.unit_price,
        })
    }

    async fn release(&mut self, product_id: Uuid, quantity: u32) -> Result<(), RepositoryError> {
        let state = self.state()?;
        let product = state
            .products
            .get_mut(&product_id)
            .ok_or(RepositoryError::NotFound)?;

        product.available_quantity = product
            .available_quantity
            .checked_add(quantity)
            .ok_or(RepositoryError::DatabaseError)?;
        product.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl OrderWriter for InMemoryUnitOfWork {
    async fn insert(&mut self, order: &Order) -> Result<(), RepositoryError> {
        let state = self.state()?;
        if state.orders.iter().any(|existing| existing.id == order.id) {
            return Err(RepositoryError::DatabaseError);
        }
        state.orders.push(order.clone());
        Ok(())
    }

    async fn get_for_update(&mut self, id: Uuid) -> Result<Order, RepositoryError> {
        let state = self.state()?;
        state
            .orders
            .iter()
            .find(|order| order.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update_status(&mut self, order: &Order) -> Result<(), RepositoryError> {
        let state = self.state()?;
        let stored = state
            .orders
            .iter_mut()
            .find(|existing| existing.id == order.id)
            .ok_or(RepositoryError::NotFound)?;
        stored.status = order.status;
        stored.updated_at = order.updated_at;
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(&mut self) -> Result<(), RepositoryError> {
        let mut guard = self.guard.take().ok_or(RepositoryError::Persistence)?;
        *guard = std::mem::take(&mut self.working);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), RepositoryError> {
        self.guard.take().ok_or(RepositoryError::Persistence)?;
        self.working = MemoryState::default();
        Ok(())
    }
}
