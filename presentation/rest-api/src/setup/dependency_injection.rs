use std::sync::Arc;

use logger::TracingLogger;
use persistence::order::repository::OrderRepositoryPostgres;
use persistence::product::repository::ProductCatalogPostgres;
use persistence::unit_of_work::PostgresTransactionManager;

use business::application::order::get_all::GetAllOrdersUseCaseImpl;
use business::application::order::get_by_id::GetOrderByIdUseCaseImpl;
use business::application::order::place::PlaceOrderUseCaseImpl;
use business::application::order::update_status::UpdateOrderStatusUseCaseImpl;
use business::application::product::get_by_id::GetProductByIdUseCaseImpl;
use business::domain::order::access::{OrderAccessGate, OwnerOrAdminGate};

use crate::api::health::routes::HealthApi;
use crate::api::order::routes::OrderApi;
use crate::api::product::routes::ProductApi;

pub struct DependencyContainer {
    pub health_api: HealthApi,
    pub order_api: OrderApi,
    pub product_api: ProductApi,
}

impl DependencyContainer {
    pub fn new(pool: sqlx::PgPool) -> Self {
        let order_logger = Arc::new(TracingLogger::new("orders"));
        let catalog_logger = Arc::new(TracingLogger::new("catalog"));
        let access_gate: Arc<dyn OrderAccessGate> = Arc::new(OwnerOrAdminGate);

        // Infrastructure adapters
        let transactions = Arc::new(PostgresTransactionManager::new(pool.clone()));
        let order_repository = Arc::new(OrderRepositoryPostgres::new(pool.clone()));
        let product_catalog = Arc::new(ProductCatalogPostgres::new(pool.clone()));

        // Order use cases
        let place_use_case = Arc::new(PlaceOrderUseCaseImpl {
            transactions: transactions.clone(),
            logger: order_logger.clone(),
        });
        let get_all_use_case = Arc::new(GetAllOrdersUseCaseImpl {
            repository: order_repository.clone(),
            access_gate: access_gate.clone(),
            logger: order_logger.clone(),
        });
        let get_by_id_use_case = Arc::new(GetOrderByIdUseCaseImpl {
            repository: order_repository,
            access_gate: access_gate.clone(),
            logger: order_logger.clone(),
        });
        let update_status_use_case = Arc::new(UpdateOrderStatusUseCaseImpl {
            transactions,
            access_gate,
            logger: order_logger,
        });

        // Catalog use cases
        let get_product_use_case = Arc::new(GetProductByIdUseCaseImpl {
            catalog: product_catalog,
            logger: catalog_logger,
        });

        Self {
            health_api: HealthApi::new(pool),
            order_api: OrderApi::new(
                place_use_case,
                get_all_use_case,
                get_by_id_use_case,
                update_status_use_case,
            ),
            product_api: ProductApi::new(get_product_use_case),
        }
    }
}
