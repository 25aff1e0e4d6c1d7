use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use business::domain::errors::RepositoryError;
use business::domain::inventory::store::{InventoryStore, Reservation};
use business::domain::order::model::Order;
use business::domain::order::repository::OrderWriter;
use business::domain::unit_of_work::{TransactionManager, UnitOfWork};

use crate::conversions::{money_from_decimal, money_to_decimal, quantity_from_db, quantity_to_db};
use crate::db::database_error;
use crate::order::entity::OrderEntity;
use crate::order::repository::{ORDER_COLUMNS, attach_items};

pub struct PostgresTransactionManager {
    pool: PgPool,
}

impl PostgresTransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PostgresTransactionManager {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        let tx = self.pool.begin().await.map_err(database_error)?;
        Ok(Box::new(PostgresUnitOfWork { tx: Some(tx) }))
    }
}

/// A read-committed transaction. Product rows are locked in id order by
/// `lock_products` before any stock changes, order rows by `get_for_update`.
/// If dropped before `commit`, sqlx rolls the transaction back.
pub struct PostgresUnitOfWork {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresUnitOfWork {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>, RepositoryError> {
        self.tx.as_mut().ok_or(RepositoryError::Persistence)
    }
}

#[async_trait]
impl InventoryStore for PostgresUnitOfWork {
    async fn lock_products(&mut self, product_ids: &[Uuid]) -> Result<(), RepositoryError> {
        let tx = self.tx()?;

        // Rows are locked as the sorted result is read, so every caller takes them in the same order.
        sqlx::query("SELECT id FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(product_ids)
            .execute(&mut **tx)
            .await
            .map_err(database_error)?;
        Ok(())
    }

    async fn try_reserve(
        &mut self,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<Reservation, RepositoryError> {
        let quantity = quantity_to_db(quantity)?;
        let tx = self.tx()?;

        // Check and decrement in one statement; concurrent reservations queue on the row lock.
        let price: Option<BigDecimal> = sqlx::query_scalar(
            r#"UPDATE products
            SET stock_quantity = stock_quantity - $2, updated_at = NOW()
            WHERE id = $1 AND stock_quantity >= $2
            RETURNING price"#,
        )
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(&mut **tx)
        .await
        .map_err(database_error)?;

        if let Some(price) = price {
            return Ok(Reservation::Reserved {
                unit_price: money_from_decimal(&price)?,
            });
        }

        let available: Option<i32> =
            sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(database_error)?;

        match available {
            Some(available) => Ok(Reservation::InsufficientStock {
                available: quantity_from_db(available)?,
            }),
            None => Ok(Reservation::ProductNotFound),
        }
    }

    async fn release(&mut self, product_id: Uuid, quantity: u32) -> Result<(), RepositoryError> {
        let quantity = quantity_to_db(quantity)?;
        let tx = self.tx()?;

        let restored: Option<Uuid> = sqlx::query_scalar(
            r#"UPDATE products
            SET stock_quantity = (stock_quantity::BIGINT + $2)::INTEGER, updated_at = NOW()
            WHERE id = $1 AND stock_quantity::BIGINT + $2 <= 2147483647
            RETURNING id"#,
        )
        .bind(product_id)
        .bind(i64::from(quantity))
        .fetch_optional(&mut **tx)
        .await
        .map_err(database_error)?;

        if restored.is_some() {
            return Ok(());
        }

        let current: Option<i32> =
            sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(database_error)?;

        match current {
            Some(current) => {
                tracing::error!(
                    "Releasing {quantity} unit(s) of product {product_id} would overflow stock of {current}"
                );
                Err(RepositoryError::DatabaseError)
            }
            None => {
                tracing::error!("Cannot release stock of missing product {product_id}");
                Err(RepositoryError::NotFound)
            }
        }
    }
}

#[async_trait]
impl OrderWriter for PostgresUnitOfWork {
    async fn insert(&mut self, order: &Order) -> Result<(), RepositoryError> {
        let tx = self.tx()?;

        sqlx::query(
            r#"INSERT INTO orders (id, user_id, total_price, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(order.id)
        .bind(order.user_id.as_str())
        .bind(money_to_decimal(order.total_price))
        .bind(order.status.to_string())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(database_error)?;

        for (line_number, item) in order.items.iter().enumerate() {
            let line_number = i32::try_from(line_number).map_err(|_| RepositoryError::DatabaseError)?;
            sqlx::query(
                r#"INSERT INTO order_items (id, order_id, product_id, line_number, quantity, price, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
            )
            .bind(item.id)
            .bind(order.id)
            .bind(item.product_id)
            .bind(line_number)
            .bind(quantity_to_db(item.quantity)?)
            .bind(money_to_decimal(item.unit_price))
            .bind(item.created_at)
            .execute(&mut **tx)
            .await
            .map_err(database_error)?;
        }

        Ok(())
    }

    async fn get_for_update(&mut self, id: Uuid) -> Result<Order, RepositoryError> {
        let tx = self.tx()?;

        let entity = sqlx::query_as::<_, OrderEntity>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(database_error)?
        .ok_or(RepositoryError::NotFound)?;

        attach_items(&mut **tx, vec![entity])
            .await?
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update_status(&mut self, order: &Order) -> Result<(), RepositoryError> {
        let tx = self.tx()?;

        let result = sqlx::query("UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(order.id)
            .bind(order.status.to_string())
            .bind(order.updated_at)
            .execute(&mut **tx)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn commit(&mut self) -> Result<(), RepositoryError> {
        let tx = self.tx.take().ok_or(RepositoryError::Persistence)?;
        tx.commit().await.map_err(database_error)
    }

    async fn rollback(&mut self) -> Result<(), RepositoryError> {
        let tx = self.tx.take().ok_or(RepositoryError::Persistence)?;
        tx.rollback().await.map_err(database_error)
    }
}
