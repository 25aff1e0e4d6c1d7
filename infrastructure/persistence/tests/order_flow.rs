use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;

use business::application::order::place::PlaceOrderUseCaseImpl;
use business::application::order::update_status::UpdateOrderStatusUseCaseImpl;
use business::domain::logger::Logger;
use business::domain::order::access::OwnerOrAdminGate;
use business::domain::order::errors::{InvalidOrderRequest, OrderError};
use business::domain::order::model::Order;
use business::domain::order::repository::OrderRepository;
use business::domain::order::use_cases::place::{PlaceOrderItem, PlaceOrderParams, PlaceOrderUseCase};
use business::domain::order::use_cases::update_status::{
    UpdateOrderStatusParams, UpdateOrderStatusUseCase,
};
use business::domain::order::value_objects::OrderStatus;
use business::domain::product::model::Product;
use business::domain::shared::pagination::PageRequest;
use business::domain::shared::value_objects::{Caller, Money, UserId};
use persistence::memory::InMemoryStore;

struct SilentLogger;

impl Logger for SilentLogger {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn debug(&self, _message: &str) {}
}

fn product(name: &str, cents: i64, stock: u32) -> Product {
    let now = Utc::now();
    Product::from_repository(
        Uuid::new_v4(),
        name.to_string(),
        Money::from_cents(cents).unwrap(),
        stock,
        now,
        now,
    )
}

fn place_use_case(store: &InMemoryStore) -> Arc<PlaceOrderUseCaseImpl> {
    Arc::new(PlaceOrderUseCaseImpl {
        transactions: Arc::new(store.clone()),
        logger: Arc::new(SilentLogger),
    })
}

fn status_use_case(store: &InMemoryStore) -> UpdateOrderStatusUseCaseImpl {
    UpdateOrderStatusUseCaseImpl {
        transactions: Arc::new(store.clone()),
        access_gate: Arc::new(OwnerOrAdminGate),
        logger: Arc::new(SilentLogger),
    }
}

fn params(user: &str, lines: &[(Uuid, i64)]) -> PlaceOrderParams {
    PlaceOrderParams {
        user_id: UserId::new(user),
        items: lines
            .iter()
            .map(|&(product_id, quantity)| PlaceOrderItem {
                product_id,
                quantity,
            })
            .collect(),
    }
}

async fn set_status(
    store: &InMemoryStore,
    id: Uuid,
    status: OrderStatus,
) -> Result<Order, OrderError> {
    status_use_case(store)
        .execute(UpdateOrderStatusParams {
            caller: Caller::admin("ops"),
            id,
            status,
        })
        .await
}

#[tokio::test]
async fn should_compute_total_from_reserved_prices() {
    let store = InMemoryStore::new();
    let widget = product("Widget", 10_000, 10);
    let gadget = product("Gadget", 5_000, 5);
    store.upsert_product(widget.clone()).await;
    store.upsert_product(gadget.clone()).await;

    let order = place_use_case(&store)
        .execute(params("alice", &[(widget.id, 3), (gadget.id, 2)]))
        .await
        .unwrap();

    assert_eq!(order.total_price.to_string(), "400.00");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].product_id, widget.id);
    assert_eq!(order.items[1].product_id, gadget.id);
    assert_eq!(store.stock_of(widget.id).await, Some(7));
    assert_eq!(store.stock_of(gadget.id).await, Some(3));
}

#[tokio::test]
async fn should_leave_stock_untouched_when_a_later_line_fails() {
    let store = InMemoryStore::new();
    let first = product("Notebook", 300, 10);
    let second = product("Pen", 150, 1);
    let third = product("Ruler", 200, 10);
    for p in [&first, &second, &third] {
        store.upsert_product(p.clone()).await;
    }

    let result = place_use_case(&store)
        .execute(params("alice", &[(first.id, 4), (second.id, 2), (third.id, 1)]))
        .await;

    match result {
        Err(OrderError::InsufficientStock {
            line,
            product_id,
            requested,
            available,
        }) => {
            assert_eq!(line, 1);
            assert_eq!(product_id, second.id);
            assert_eq!(requested, 2);
            assert_eq!(available, 1);
        }
        other => panic!("expected insufficient stock, got {other:?}"),
    }

    assert_eq!(store.stock_of(first.id).await, Some(10));
    assert_eq!(store.stock_of(second.id).await, Some(1));
    assert_eq!(store.stock_of(third.id).await, Some(10));
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn should_reject_unknown_product_without_writing_anything() {
    let store = InMemoryStore::new();
    let known = product("Mug", 900, 4);
    store.upsert_product(known.clone()).await;
    let missing = Uuid::new_v4();

    let result = place_use_case(&store)
        .execute(params("alice", &[(known.id, 1), (missing, 1)]))
        .await;

    assert!(matches!(
        result,
        Err(OrderError::ProductNotFound { line: 1, product_id }) if product_id == missing
    ));
    assert_eq!(store.stock_of(known.id).await, Some(4));
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_sell_the_last_unit_exactly_once() {
    let store = InMemoryStore::new();
    let last = product("Limited Print", 4_200, 1);
    store.upsert_product(last.clone()).await;
    let use_case = place_use_case(&store);

    let handles: Vec<_> = (0..8)
        .map(|buyer| {
            let use_case = Arc::clone(&use_case);
            let id = last.id;
            tokio::spawn(async move {
                use_case
                    .execute(params(&format!("buyer-{buyer}"), &[(id, 1)]))
                    .await
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(OrderError::InsufficientStock { available, .. }) => assert_eq!(available, 0),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(store.stock_of(last.id).await, Some(0));
    assert_eq!(store.order_count().await, 1);
}

#[tokio::test]
async fn should_restore_stock_when_order_is_cancelled() {
    let store = InMemoryStore::new();
    let widget = product("Widget", 10_000, 10);
    let gadget = product("Gadget", 5_000, 5);
    store.upsert_product(widget.clone()).await;
    store.upsert_product(gadget.clone()).await;

    let order = place_use_case(&store)
        .execute(params("alice", &[(widget.id, 2), (gadget.id, 1)]))
        .await
        .unwrap();
    assert_eq!(store.stock_of(widget.id).await, Some(8));
    assert_eq!(store.stock_of(gadget.id).await, Some(4));

    let cancelled = set_status(&store, order.id, OrderStatus::Cancelled)
        .await
        .unwrap();

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(store.stock_of(widget.id).await, Some(10));
    assert_eq!(store.stock_of(gadget.id).await, Some(5));

    let again = set_status(&store, order.id, OrderStatus::Cancelled).await;
    assert!(matches!(
        again,
        Err(OrderError::InvalidTransition {
            from: OrderStatus::Cancelled,
            to: OrderStatus::Cancelled
        })
    ));
    assert_eq!(store.stock_of(widget.id).await, Some(10));
    assert_eq!(store.stock_of(gadget.id).await, Some(5));
}

#[tokio::test]
async fn should_restore_stock_when_processing_order_is_cancelled() {
    let store = InMemoryStore::new();
    let widget = product("Widget", 1_000, 6);
    store.upsert_product(widget.clone()).await;

    let order = place_use_case(&store)
        .execute(params("alice", &[(widget.id, 4)]))
        .await
        .unwrap();

    set_status(&store, order.id, OrderStatus::Processing)
        .await
        .unwrap();
    assert_eq!(store.stock_of(widget.id).await, Some(2));

    set_status(&store, order.id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(store.stock_of(widget.id).await, Some(6));
}

#[tokio::test]
async fn should_keep_stock_when_transition_is_illegal() {
    let store = InMemoryStore::new();
    let widget = product("Widget", 1_000, 6);
    store.upsert_product(widget.clone()).await;

    let order = place_use_case(&store)
        .execute(params("alice", &[(widget.id, 4)]))
        .await
        .unwrap();
    set_status(&store, order.id, OrderStatus::Processing)
        .await
        .unwrap();
    set_status(&store, order.id, OrderStatus::Completed)
        .await
        .unwrap();

    let result = set_status(&store, order.id, OrderStatus::Cancelled).await;

    assert!(matches!(result, Err(OrderError::InvalidTransition { .. })));
    assert_eq!(store.stock_of(widget.id).await, Some(2));
    let stored = OrderRepository::get_by_id(&store, order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);
}

#[tokio::test]
async fn should_keep_price_snapshot_after_catalog_change() {
    let store = InMemoryStore::new();
    let widget = product("Widget", 10_000, 10);
    store.upsert_product(widget.clone()).await;

    let order = place_use_case(&store)
        .execute(params("alice", &[(widget.id, 2)]))
        .await
        .unwrap();

    store
        .set_unit_price(widget.id, Money::from_cents(15_000).unwrap())
        .await
        .unwrap();

    let stored = OrderRepository::get_by_id(&store, order.id).await.unwrap();
    assert_eq!(stored.items[0].unit_price.to_string(), "100.00");
    assert_eq!(stored.total_price.to_string(), "200.00");
}

#[tokio::test]
async fn should_reject_total_beyond_storable_amount_and_keep_stock() {
    let store = InMemoryStore::new();
    let bulk = product("Bulk Pallet", 9_999_999, 2_000_000);
    store.upsert_product(bulk.clone()).await;

    let result = place_use_case(&store)
        .execute(params("alice", &[(bulk.id, 2_000_000)]))
        .await;

    assert!(matches!(
        result,
        Err(OrderError::InvalidRequest(InvalidOrderRequest::TotalOverflow))
    ));
    assert_eq!(store.stock_of(bulk.id).await, Some(2_000_000));
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn should_list_newest_orders_first_per_user() {
    let store = InMemoryStore::new();
    let widget = product("Widget", 100, 50);
    store.upsert_product(widget.clone()).await;
    let use_case = place_use_case(&store);

    let mut alice_orders = Vec::new();
    for _ in 0..3 {
        alice_orders.push(
            use_case
                .execute(params("alice", &[(widget.id, 1)]))
                .await
                .unwrap()
                .id,
        );
    }
    use_case
        .execute(params("bob", &[(widget.id, 1)]))
        .await
        .unwrap();

    let page = store
        .get_all_by_user(&UserId::new("alice"), PageRequest::new(Some(1), Some(2)))
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, alice_orders[2]);
    assert_eq!(page.items[1].id, alice_orders[1]);

    let everything = store.get_all(PageRequest::default()).await.unwrap();
    assert_eq!(everything.total, 4);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn should_never_oversell_under_concurrent_demand(
        stock in 0u32..20,
        demands in prop::collection::vec(1i64..6, 1..12),
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        let (sold, remaining) = runtime.block_on(async {
            let store = InMemoryStore::new();
            let item = product("Contested", 100, stock);
            store.upsert_product(item.clone()).await;
            let use_case = place_use_case(&store);

            let handles: Vec<_> = demands
                .iter()
                .enumerate()
                .map(|(buyer, &quantity)| {
                    let use_case = Arc::clone(&use_case);
                    let id = item.id;
                    tokio::spawn(async move {
                        use_case
                            .execute(params(&format!("buyer-{buyer}"), &[(id, quantity)]))
                            .await
                    })
                })
                .collect();

            let mut sold = 0u32;
            for handle in handles {
                if let Ok(order) = handle.await.unwrap() {
                    sold += order.items[0].quantity;
                }
            }
            (sold, store.stock_of(item.id).await.unwrap())
        });

        prop_assert!(sold <= stock);
        prop_assert_eq!(sold + remaining, stock);
    }
}
