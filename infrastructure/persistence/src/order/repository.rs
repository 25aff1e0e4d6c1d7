use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use business::domain::errors::RepositoryError;
use business::domain::order::model::{Order, OrderItem};
use business::domain::order::repository::OrderRepository;
use business::domain::shared::pagination::{Page, PageRequest};
use business::domain::shared::value_objects::UserId;

use super::entity::{OrderEntity, OrderItemEntity};
use crate::db::database_error;

pub(crate) const ORDER_COLUMNS: &str = "id, user_id, total_price, status, created_at, updated_at";

pub struct OrderRepositoryPostgres {
    pool: PgPool,
}

impl OrderRepositoryPostgres {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for OrderRepositoryPostgres {
    async fn get_all(&self, page: PageRequest) -> Result<Page<Order>, RepositoryError> {
        let mut conn = self.pool.acquire().await.map_err(database_error)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&mut *conn)
            .await
            .map_err(database_error)?;

        let entities = sqlx::query_as::<_, OrderEntity>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(to_i64(page.limit()))
        .bind(to_i64(page.offset()))
        .fetch_all(&mut *conn)
        .await
        .map_err(database_error)?;

        let orders = attach_items(&mut conn, entities).await?;
        Ok(Page::new(orders, total.unsigned_abs(), page))
    }

    async fn get_all_by_user(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<Order>, RepositoryError> {
        let mut conn = self.pool.acquire().await.map_err(database_error)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_one(&mut *conn)
            .await
            .map_err(database_error)?;

        let entities = sqlx::query_as::<_, OrderEntity>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id.as_str())
        .bind(to_i64(page.limit()))
        .bind(to_i64(page.offset()))
        .fetch_all(&mut *conn)
        .await
        .map_err(database_error)?;

        let orders = attach_items(&mut conn, entities).await?;
        Ok(Page::new(orders, total.unsigned_abs(), page))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Order, RepositoryError> {
        let mut conn = self.pool.acquire().await.map_err(database_error)?;

        let entity = sqlx::query_as::<_, OrderEntity>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(database_error)?
        .ok_or(RepositoryError::NotFound)?;

        attach_items(&mut conn, vec![entity])
            .await?
            .pop()
            .ok_or(RepositoryError::NotFound)
    }
}

/// Loads the items of every given order in one query and assembles the domain orders,
/// keeping the order of `entities`.
pub(crate) async fn attach_items(
    conn: &mut PgConnection,
    entities: Vec<OrderEntity>,
) -> Result<Vec<Order>, RepositoryError> {
    if entities.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = entities.iter().map(|e| e.id).collect();
    let item_entities = sqlx::query_as::<_, OrderItemEntity>(
        "SELECT id, order_id, product_id, line_number, quantity, price, created_at FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, line_number",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(database_error)?;

    let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for item in item_entities {
        let order_id = item.order_id;
        items_by_order
            .entry(order_id)
            .or_default()
            .push(item.into_domain()?);
    }

    entities
        .into_iter()
        .map(|entity| {
            let items = items_by_order.remove(&entity.id).unwrap_or_default();
            entity.into_domain(items)
        })
        .collect()
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
